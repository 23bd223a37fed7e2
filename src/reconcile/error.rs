//! Reconciliation faults
//!
//! Three classes, matching how a scenario can go wrong:
//!     - [NormalizeError]: the grammar's raw tokens do not have the shape a merge expects.
//!       Aborts the scenario.
//!     - [MappingError]: the classification table has no entry for a reference kind (or two).
//!       A defect in the table, not in the input.
//!     - [EquivalenceFault]: both sides tokenized fine but disagree.
//!
//! [ReconcileError] wraps them (and reference lexer failures) for scenario entry points.

use crate::lexing::{LexError, LineTokenKind};
use std::fmt;
use thiserror::Error;

/// Multi-token construct the normalizer collapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    QuotedIdentifier,
    String,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::QuotedIdentifier => f.write_str("quoted identifier"),
            Construct::String => f.write_str("string"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("{construct} opened by token {opened_at} is cut short: expected a token carrying {expected}")]
    Exhausted {
        construct: Construct,
        opened_at: usize,
        expected: &'static str,
    },

    #[error("{construct} opened by token {opened_at}: token {index} should carry {expected}, found [{found}]")]
    Mislabeled {
        construct: Construct,
        opened_at: usize,
        index: usize,
        expected: &'static str,
        found: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("no classification for token kind {0}")]
    Unmapped(LineTokenKind),

    #[error("token kind {0} is classified more than once")]
    Duplicate(LineTokenKind),
}

/// One position where the two token streams disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMismatch {
    pub index: usize,
    /// Source text under the grammar token.
    pub snippet: String,
    pub kind: LineTokenKind,
    pub expected_label: String,
    pub actual_label: String,
    /// Reference token positions.
    pub expected: (usize, usize),
    /// Grammar token positions.
    pub actual: (usize, usize),
}

impl fmt::Display for TokenMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {:?} ({}): expected {} at {}..{}, found {} at {}..{}",
            self.index,
            self.snippet,
            self.kind,
            self.expected_label,
            self.expected.0,
            self.expected.1,
            self.actual_label,
            self.actual.0,
            self.actual.1
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquivalenceFault {
    #[error("token count mismatch: grammar produced {grammar}, reference produced {reference}")]
    Count { grammar: usize, reference: usize },

    #[error("{} token(s) differ:\n{}", .0.len(), render_mismatches(.0))]
    Tokens(Vec<TokenMismatch>),
}

fn render_mismatches(mismatches: &[TokenMismatch]) -> String {
    mismatches
        .iter()
        .map(|m| format!("  {}", m))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("structural fault: {0}")]
    Structural(#[from] NormalizeError),

    #[error("mapping fault: {0}")]
    Mapping(#[from] MappingError),

    #[error("equivalence fault: {0}")]
    Equivalence(#[from] EquivalenceFault),

    #[error("reference lexer failed: {0}")]
    Lex(#[from] LexError),
}
