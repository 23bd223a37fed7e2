//! Line tokenizer
//!
//! Runs a compiled [Grammar] over one line at a time.
//!
//! Matching
//!
//!     At the current position every candidate of the innermost open rule is searched forward.
//!     The earliest match wins. Ties go to declaration order, with the open rule's `end` pattern
//!     tried first, or last when the rule sets `applyEndPatternLast`. Text skipped over between
//!     two matches becomes a token carrying the open rule's content scopes.
//!
//!     - `match` rules emit their captures, nested by position, and leave the stack alone.
//!     - `begin` rules emit their begin captures and push a frame.
//!     - an `end` match emits its captures under the frame's name scopes and pops the frame.
//!
//!     Zero-width `match`/`begin` matches are never taken (the search resumes one character
//!     later) so every push consumes input. Zero-width `end` matches are allowed; each one pops a
//!     frame, which bounds them by the stack depth.
//!
//! Tokens
//!
//!     Tokens never have zero width, with one exception: a line that yields nothing at all (the
//!     empty line) produces a single zero-width token with the current content scopes, so every
//!     line reports at least one token.

use super::compile::{CaptureRule, Grammar, RuleId, RuleKind};
use super::token::GrammarToken;
use regex::{Captures, Regex};

/// Opaque continuation state threaded from one line to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleStack {
    frames: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    rule: RuleId,
    /// Scopes of the begin/end delimiters.
    name_scopes: Vec<String>,
    /// Scopes of everything between the delimiters (adds `contentName`).
    content_scopes: Vec<String>,
}

impl RuleStack {
    /// Number of open rules, the grammar root included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn top(&self) -> &Frame {
        // The root frame is never popped: it has no end pattern.
        &self.frames[self.frames.len() - 1]
    }
}

/// Result of tokenizing one line.
#[derive(Debug, Clone)]
pub struct LineTokens {
    pub tokens: Vec<GrammarToken>,
    pub rule_stack: RuleStack,
}

enum Found<'l> {
    End(Captures<'l>),
    Rule(RuleId, Captures<'l>),
}

impl Grammar {
    /// State for the first line of a document.
    pub fn initial_stack(&self) -> RuleStack {
        let root = vec![self.scope_name().to_string()];
        RuleStack {
            frames: vec![Frame {
                rule: self.root(),
                name_scopes: root.clone(),
                content_scopes: root,
            }],
        }
    }

    /// Tokenize `line` (without its line terminator), resuming from `previous` if given.
    pub fn tokenize_line(&self, line: &str, previous: Option<&RuleStack>) -> LineTokens {
        let mut stack = previous
            .cloned()
            .unwrap_or_else(|| self.initial_stack());
        let mut sink = TokenSink::default();
        let mut pos = 0;

        while let Some(found) = self.next_match(stack.top(), line, pos) {
            let frame = stack.top().clone();
            match found {
                Found::End(caps) => {
                    let (start, end) = bounds(&caps);
                    sink.produce(start, &frame.content_scopes);
                    if let RuleKind::BeginEnd { end_captures, .. } = &self.rule(frame.rule).kind {
                        emit_captures(&mut sink, &frame.name_scopes, &caps, end_captures, end);
                    }
                    stack.frames.pop();
                    pos = end;
                }
                Found::Rule(id, caps) => {
                    let (start, end) = bounds(&caps);
                    let rule = self.rule(id);
                    sink.produce(start, &frame.content_scopes);

                    let mut scopes = frame.content_scopes.clone();
                    scopes.extend(rule.scopes.iter().cloned());

                    match &rule.kind {
                        RuleKind::Match { captures, .. } => {
                            emit_captures(&mut sink, &scopes, &caps, captures, end);
                        }
                        RuleKind::BeginEnd {
                            begin_captures,
                            content_scopes,
                            ..
                        } => {
                            emit_captures(&mut sink, &scopes, &caps, begin_captures, end);
                            let mut content = scopes.clone();
                            content.extend(content_scopes.iter().cloned());
                            stack.frames.push(Frame {
                                rule: id,
                                name_scopes: scopes,
                                content_scopes: content,
                            });
                        }
                        RuleKind::Container { .. } => {}
                    }
                    pos = end;
                }
            }
        }

        let scopes = stack.top().content_scopes.clone();
        sink.produce(line.len(), &scopes);
        let tokens = sink.finish(&scopes);

        tracing::trace!(
            line,
            tokens = tokens.len(),
            depth = stack.depth(),
            "tokenized line"
        );

        LineTokens {
            tokens,
            rule_stack: stack,
        }
    }

    fn next_match<'l>(&self, frame: &Frame, line: &'l str, pos: usize) -> Option<Found<'l>> {
        let (end_regex, end_last) = match &self.rule(frame.rule).kind {
            RuleKind::BeginEnd {
                end,
                apply_end_pattern_last,
                ..
            } => (Some(end), *apply_end_pattern_last),
            _ => (None, false),
        };

        let mut best: Option<(usize, Found<'l>)> = None;

        if let (Some(end), false) = (end_regex, end_last) {
            if let Some(caps) = end.captures_at(line, pos) {
                keep_earliest(&mut best, Found::End(caps));
            }
        }

        for &id in self.candidates(frame.rule) {
            if best.as_ref().is_some_and(|(start, _)| *start == pos) {
                break;
            }
            let regex = match &self.rule(id).kind {
                RuleKind::Match { regex, .. } => regex,
                RuleKind::BeginEnd { begin, .. } => begin,
                RuleKind::Container { .. } => continue,
            };
            if let Some(caps) = find_non_empty(regex, line, pos) {
                keep_earliest(&mut best, Found::Rule(id, caps));
            }
        }

        if let (Some(end), true) = (end_regex, end_last) {
            if let Some(caps) = end.captures_at(line, pos) {
                keep_earliest(&mut best, Found::End(caps));
            }
        }

        best.map(|(_, found)| found)
    }
}

/// Replace `best` only on a strictly earlier start, so ties keep the first candidate tried.
fn keep_earliest<'l>(best: &mut Option<(usize, Found<'l>)>, found: Found<'l>) {
    let caps = match &found {
        Found::End(caps) | Found::Rule(_, caps) => caps,
    };
    let start = bounds(caps).0;
    if best.as_ref().map_or(true, |(current, _)| start < *current) {
        *best = Some((start, found));
    }
}

fn bounds(caps: &Captures<'_>) -> (usize, usize) {
    caps.get(0).map_or((0, 0), |m| (m.start(), m.end()))
}

fn find_non_empty<'l>(regex: &Regex, line: &'l str, mut at: usize) -> Option<Captures<'l>> {
    while at <= line.len() {
        let caps = regex.captures_at(line, at)?;
        let (start, end) = bounds(&caps);
        if end > start {
            return Some(caps);
        }
        at = line[start..]
            .chars()
            .next()
            .map_or(line.len() + 1, |c| start + c.len_utf8());
    }
    None
}

/// Emit the tokens of one match: capture 0 scopes apply to the whole match, numbered captures
/// nest inside it by position.
fn emit_captures(
    sink: &mut TokenSink,
    base: &[String],
    caps: &Captures<'_>,
    rules: &[CaptureRule],
    end: usize,
) {
    let mut base = base.to_vec();
    for rule in rules.iter().filter(|r| r.index == 0) {
        base.extend(rule.scopes.iter().cloned());
    }

    let mut open: Vec<(usize, Vec<String>)> = Vec::new();
    for rule in rules.iter().filter(|r| r.index > 0) {
        let Some(m) = caps.get(rule.index) else {
            continue;
        };
        if m.start() == m.end() {
            continue;
        }
        while open.last().is_some_and(|(open_end, _)| *open_end <= m.start()) {
            if let Some((open_end, scopes)) = open.pop() {
                sink.produce(open_end, &scopes);
            }
        }
        let parent = open.last().map_or(&base, |(_, scopes)| scopes);
        sink.produce(m.start(), parent);
        let mut scopes = parent.clone();
        scopes.extend(rule.scopes.iter().cloned());
        open.push((m.end(), scopes));
    }
    while let Some((open_end, scopes)) = open.pop() {
        sink.produce(open_end, &scopes);
    }
    sink.produce(end, &base);
}

#[derive(Default)]
struct TokenSink {
    tokens: Vec<GrammarToken>,
    last_end: usize,
}

impl TokenSink {
    /// Cover everything from the previous token up to `end` with `scopes`.
    fn produce(&mut self, end: usize, scopes: &[String]) {
        if end <= self.last_end {
            return;
        }
        self.tokens
            .push(GrammarToken::new(self.last_end, end, scopes.to_vec()));
        self.last_end = end;
    }

    fn finish(mut self, scopes: &[String]) -> Vec<GrammarToken> {
        if self.tokens.is_empty() {
            self.tokens.push(GrammarToken::new(0, 0, scopes.to_vec()));
        }
        self.tokens
    }
}
