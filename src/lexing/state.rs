//! Incremental lexer state
//!
//! Accumulates lexed lines. Positions reported by [LexerState::all_tokens] are
//! document-relative: the offset of the line start plus the line-relative offset, with each
//! line break counting one byte.

use super::error::LexError;
use super::kinds::LineTokenKind;
use super::line_lexer::{lex_line, LineMode};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceToken {
    pub kind: LineTokenKind,
    pub start: usize,
    pub end: usize,
}

impl ReferenceToken {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct LexerState {
    tokens: Vec<ReferenceToken>,
    mode: LineMode,
    lines: usize,
    /// Document offset the next appended line starts at.
    next_line_start: usize,
}

impl LexerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lex a whole document. Lines are split on `\n`; a trailing `\r` is not part of any token.
    #[allow(clippy::should_implement_trait)]
    pub fn from(text: &str) -> Result<Self, LexError> {
        text.split('\n')
            .try_fold(Self::new(), |state, line| state.append_line(line))
    }

    /// Lex one more line in the mode the previous line left behind.
    pub fn append_line(mut self, line: &str) -> Result<Self, LexError> {
        let raw_len = line.len();
        let line = line.strip_suffix('\r').unwrap_or(line);
        let lexed = lex_line(line, self.mode, self.lines + 1)?;

        let base = self.next_line_start;
        self.tokens
            .extend(lexed.tokens.into_iter().map(|t| ReferenceToken {
                kind: t.kind,
                start: base + t.start,
                end: base + t.end,
            }));
        self.mode = lexed.mode;
        self.lines += 1;
        self.next_line_start = base + raw_len + 1;
        Ok(self)
    }

    pub fn all_tokens(&self) -> &[ReferenceToken] {
        &self.tokens
    }

    /// Tokens beyond a previously observed [token_count](Self::token_count).
    pub fn tokens_since(&self, count: usize) -> &[ReferenceToken] {
        self.tokens.get(count..).unwrap_or(&[])
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn mode(&self) -> LineMode {
        self.mode
    }

    pub fn line_count(&self) -> usize {
        self.lines
    }
}
