//! Grammar tokens
//!
//! One token per contiguous run of a line that shares the same scope stack. Positions are byte
//! offsets relative to the start of the line; `scopes` is ordered outermost first, so the first
//! entry is always the grammar's root scope and the last is the most specific label.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarToken {
    pub start: usize,
    pub end: usize,
    pub scopes: Vec<String>,
    /// Set on logical tokens produced by normalization from several raw tokens.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub merged: bool,
}

impl GrammarToken {
    pub fn new(start: usize, end: usize, scopes: Vec<String>) -> Self {
        Self {
            start,
            end,
            scopes,
            merged: false,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The most specific scope label.
    pub fn innermost(&self) -> Option<&str> {
        self.scopes.last().map(String::as_str)
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// The slice of `line` this token covers, if the positions are valid for it.
    pub fn text<'a>(&self, line: &'a str) -> Option<&'a str> {
        line.get(self.range())
    }
}

impl fmt::Display for GrammarToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{} {}", self.start, self.end, self.scopes.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(start: usize, end: usize, scopes: &[&str]) -> GrammarToken {
        GrammarToken::new(start, end, scopes.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_innermost_is_last_scope() {
        let t = token(0, 2, &["source.test", "meta.test", "keyword.test"]);
        assert_eq!(t.innermost(), Some("keyword.test"));
        assert!(t.has_scope("meta.test"));
        assert!(!t.has_scope("meta"));
    }

    #[test]
    fn test_text_slices_line() {
        let t = token(4, 7, &["source.test"]);
        assert_eq!(t.text("let abc = 1"), Some("abc"));
        assert_eq!(t.text("let"), None);
    }

    #[test]
    fn test_display() {
        let t = token(3, 5, &["source.test", "keyword.test"]);
        assert_eq!(t.to_string(), "3..5 source.test keyword.test");
    }
}
