use thiserror::Error;

/// A character the reference lexer has no token for.
///
/// `line` and `column` are 1-based; `column` counts characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected character {ch:?} at line {line}, column {column}")]
pub struct LexError {
    pub line: usize,
    pub column: usize,
    pub ch: char,
}
