//! Rule compilation
//!
//! Turns a [RawGrammar] into an arena of [Rule]s addressed by [RuleId]:
//! - `include` references are resolved to rule ids (`#name` for repository entries, `$self` and
//!   `$base` for the grammar root). Includes of other grammars are rejected.
//! - Every pattern is compiled with the `regex` crate up front, so a broken artifact fails at load
//!   time rather than halfway through a line.
//! - Repository entries get their ids reserved before anything is compiled, which is what lets
//!   rules include each other (or themselves) recursively.
//!
//! The flattened candidate list of a rule (containers and includes expanded, in declaration
//! order) is computed the first time the tokenizer enters that rule and cached afterwards.

use super::error::GrammarError;
use super::model::{RawCaptures, RawGrammar, RawRule};
use super::BUILTIN_GRAMMAR;
use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Index of a rule in the compiled arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(pub(crate) usize);

/// A named capture group of a `match`, `begin` or `end` pattern.
#[derive(Debug, Clone)]
pub(crate) struct CaptureRule {
    pub index: usize,
    pub scopes: Vec<String>,
}

#[derive(Debug)]
pub(crate) enum RuleKind {
    Match {
        regex: Regex,
        captures: Vec<CaptureRule>,
    },
    BeginEnd {
        begin: Regex,
        end: Regex,
        begin_captures: Vec<CaptureRule>,
        end_captures: Vec<CaptureRule>,
        content_scopes: Vec<String>,
        apply_end_pattern_last: bool,
        patterns: Vec<RuleId>,
    },
    /// Only groups other rules (`patterns` or `include` with nothing else).
    Container { patterns: Vec<RuleId> },
}

#[derive(Debug)]
pub(crate) struct Rule {
    pub location: String,
    pub scopes: Vec<String>,
    pub kind: RuleKind,
}

impl Rule {
    fn placeholder(location: &str) -> Self {
        Rule {
            location: location.to_string(),
            scopes: Vec::new(),
            kind: RuleKind::Container {
                patterns: Vec::new(),
            },
        }
    }

    fn direct_patterns(&self) -> &[RuleId] {
        match &self.kind {
            RuleKind::Container { patterns } | RuleKind::BeginEnd { patterns, .. } => patterns,
            RuleKind::Match { .. } => &[],
        }
    }
}

/// A compiled, immutable grammar.
#[derive(Debug)]
pub struct Grammar {
    name: Option<String>,
    scope_name: String,
    file_types: Vec<String>,
    rules: Vec<Rule>,
    root: RuleId,
    candidates: Vec<OnceCell<Vec<RuleId>>>,
}

impl Grammar {
    pub fn compile(raw: &RawGrammar) -> Result<Self, GrammarError> {
        let grammar = Compiler::new(raw).run()?;
        tracing::info!(
            scope = %grammar.scope_name,
            rules = grammar.rules.len(),
            "compiled grammar"
        );
        Ok(grammar)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, GrammarError> {
        Self::compile(&RawGrammar::from_yaml_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading grammar artifact");
        Self::compile(&RawGrammar::from_path(path)?)
    }

    /// The grammar bundled with the crate.
    pub fn builtin() -> Result<Self, GrammarError> {
        Self::from_yaml_str(BUILTIN_GRAMMAR)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The root scope every token starts with (e.g. `source.powerquery`).
    pub fn scope_name(&self) -> &str {
        &self.scope_name
    }

    pub fn file_types(&self) -> &[String] {
        &self.file_types
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub(crate) fn root(&self) -> RuleId {
        self.root
    }

    pub(crate) fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.0]
    }

    /// Candidate rules to try while `id` is the innermost open rule, in priority order.
    pub(crate) fn candidates(&self, id: RuleId) -> &[RuleId] {
        self.candidates[id.0].get_or_init(|| {
            let mut out = Vec::new();
            let mut expanded = HashSet::new();
            self.flatten_into(self.rule(id).direct_patterns(), &mut out, &mut expanded);
            tracing::trace!(
                rule = %self.rule(id).location,
                candidates = out.len(),
                "flattened rule patterns"
            );
            out
        })
    }

    fn flatten_into(
        &self,
        patterns: &[RuleId],
        out: &mut Vec<RuleId>,
        expanded: &mut HashSet<RuleId>,
    ) {
        for &id in patterns {
            match &self.rule(id).kind {
                RuleKind::Container { patterns } => {
                    if expanded.insert(id) {
                        self.flatten_into(patterns, out, expanded);
                    }
                }
                _ => {
                    if !out.contains(&id) {
                        out.push(id);
                    }
                }
            }
        }
    }
}

// ============================================================================
// COMPILER
// ============================================================================

struct Compiler<'a> {
    raw: &'a RawGrammar,
    rules: Vec<Rule>,
    repository: HashMap<&'a str, RuleId>,
}

impl<'a> Compiler<'a> {
    fn new(raw: &'a RawGrammar) -> Self {
        Self {
            raw,
            rules: Vec::new(),
            repository: HashMap::new(),
        }
    }

    fn run(mut self) -> Result<Grammar, GrammarError> {
        let raw = self.raw;
        let root = self.reserve("grammar");

        for name in raw.repository.keys() {
            let id = self.reserve(&format!("repository.{}", name));
            self.repository.insert(name.as_str(), id);
        }

        for (name, raw_rule) in &raw.repository {
            let id = self.repository[name.as_str()];
            let rule = self.build(raw_rule, &format!("repository.{}", name))?;
            self.rules[id.0] = rule;
        }

        let patterns = self.compile_patterns(&raw.patterns, "grammar")?;
        self.rules[root.0].kind = RuleKind::Container { patterns };

        let candidates = (0..self.rules.len()).map(|_| OnceCell::new()).collect();
        Ok(Grammar {
            name: raw.name.clone(),
            scope_name: raw.scope_name.clone(),
            file_types: raw.file_types.clone(),
            rules: self.rules,
            root,
            candidates,
        })
    }

    fn reserve(&mut self, location: &str) -> RuleId {
        self.rules.push(Rule::placeholder(location));
        RuleId(self.rules.len() - 1)
    }

    fn compile_patterns(
        &mut self,
        raws: &[RawRule],
        location: &str,
    ) -> Result<Vec<RuleId>, GrammarError> {
        let mut ids = Vec::with_capacity(raws.len());
        for (i, raw) in raws.iter().enumerate() {
            let location = format!("{}.patterns[{}]", location, i);
            let is_pure_include =
                raw.include.is_some() && raw.match_.is_none() && raw.begin.is_none();
            let id = match &raw.include {
                Some(include) if is_pure_include => self.resolve(include, &location)?,
                _ => {
                    let rule = self.build(raw, &location)?;
                    self.rules.push(rule);
                    RuleId(self.rules.len() - 1)
                }
            };
            ids.push(id);
        }
        Ok(ids)
    }

    fn build(&mut self, raw: &RawRule, location: &str) -> Result<Rule, GrammarError> {
        let scopes = split_scopes(raw.name.as_deref());

        let kind = if let Some(pattern) = &raw.match_ {
            RuleKind::Match {
                regex: compile_regex(pattern, location)?,
                captures: compile_captures(&raw.captures, location)?,
            }
        } else if let Some(begin) = &raw.begin {
            let end = raw.end.as_ref().ok_or_else(|| GrammarError::MissingEnd {
                location: location.to_string(),
            })?;
            // `captures` applies to both ends unless the specific map is given
            let begin_captures = if raw.begin_captures.is_empty() {
                &raw.captures
            } else {
                &raw.begin_captures
            };
            let end_captures = if raw.end_captures.is_empty() {
                &raw.captures
            } else {
                &raw.end_captures
            };
            RuleKind::BeginEnd {
                begin: compile_regex(begin, &format!("{}.begin", location))?,
                end: compile_regex(end, &format!("{}.end", location))?,
                begin_captures: compile_captures(begin_captures, location)?,
                end_captures: compile_captures(end_captures, location)?,
                content_scopes: split_scopes(raw.content_name.as_deref()),
                apply_end_pattern_last: raw.apply_end_pattern_last,
                patterns: self.compile_patterns(&raw.patterns, location)?,
            }
        } else if let Some(include) = &raw.include {
            RuleKind::Container {
                patterns: vec![self.resolve(include, location)?],
            }
        } else if !raw.patterns.is_empty() {
            RuleKind::Container {
                patterns: self.compile_patterns(&raw.patterns, location)?,
            }
        } else {
            return Err(GrammarError::EmptyRule {
                location: location.to_string(),
            });
        };

        Ok(Rule {
            location: location.to_string(),
            scopes,
            kind,
        })
    }

    fn resolve(&self, include: &str, location: &str) -> Result<RuleId, GrammarError> {
        match include {
            "$self" | "$base" => Ok(RuleId(0)),
            _ => match include.strip_prefix('#') {
                Some(name) => self.repository.get(name).copied().ok_or_else(|| {
                    GrammarError::UnknownInclude {
                        location: location.to_string(),
                        name: name.to_string(),
                    }
                }),
                None => Err(GrammarError::UnsupportedInclude {
                    location: location.to_string(),
                    include: include.to_string(),
                }),
            },
        }
    }
}

fn split_scopes(name: Option<&str>) -> Vec<String> {
    name.map(|n| n.split_whitespace().map(String::from).collect())
        .unwrap_or_default()
}

fn compile_regex(pattern: &str, location: &str) -> Result<Regex, GrammarError> {
    Regex::new(pattern).map_err(|source| GrammarError::InvalidPattern {
        location: location.to_string(),
        source: Box::new(source),
    })
}

fn compile_captures(
    raw: &RawCaptures,
    location: &str,
) -> Result<Vec<CaptureRule>, GrammarError> {
    let mut captures = Vec::new();
    for (key, capture) in raw {
        let index = key
            .0
            .parse::<usize>()
            .map_err(|_| GrammarError::InvalidCaptureKey {
                location: location.to_string(),
                key: key.to_string(),
            })?;
        let scopes = split_scopes(capture.name.as_deref());
        if !scopes.is_empty() {
            captures.push(CaptureRule { index, scopes });
        }
    }
    captures.sort_by_key(|c| c.index);
    Ok(captures)
}
