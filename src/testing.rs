//! Testing utilities
//!
//! Shared by unit tests, integration tests and the CLI's plain-text output.
//!
//! Rendering
//!
//!     One token per line, `start..end` followed by the scopes (grammar tokens) or the kind
//!     (reference tokens). The format is stable and meant for inline snapshots.
//!
//! Assertions
//!
//!     [assert_reconciles] and [assert_document_reconciles] panic with the full fault and both
//!     rendered token streams, which is usually all that is needed to localize a discrepancy.

use crate::grammar::GrammarToken;
use crate::lexing::{LexerState, ReferenceToken};
use crate::reconcile::{normalize, LineReport, Reconciler, StepReport};

/// Sample document used for incremental scenarios.
pub const LET_DOCUMENT: &str =
    "let\n    a = 1,\n    b = \"text\",\n    c = Text.From(a)\nin\n    c";

pub fn render_grammar_tokens(tokens: &[GrammarToken]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_reference_tokens(tokens: &[ReferenceToken]) -> String {
    tokens
        .iter()
        .map(|t| format!("{}..{} {}", t.start, t.end, t.kind))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reconcile a single line, panicking with both token streams on failure.
pub fn assert_reconciles(reconciler: &Reconciler<'_>, text: &str) -> LineReport {
    match reconciler.reconcile_line(text) {
        Ok(report) => report,
        Err(err) => panic!(
            "{:?} does not reconcile: {}\n\ngrammar:\n{}\n\nreference:\n{}",
            text,
            err,
            describe_grammar_side(reconciler, text),
            describe_reference_side(text)
        ),
    }
}

/// Reconcile a document line by line, panicking with the fault on failure.
pub fn assert_document_reconciles(reconciler: &Reconciler<'_>, text: &str) -> Vec<StepReport> {
    match reconciler.reconcile_document(text) {
        Ok(steps) => steps,
        Err(err) => panic!("document does not reconcile: {}\n\n{}", err, text),
    }
}

fn describe_grammar_side(reconciler: &Reconciler<'_>, text: &str) -> String {
    let raw = reconciler.grammar().tokenize_line(text, None);
    match normalize(&raw.tokens) {
        Ok(tokens) => render_grammar_tokens(&tokens),
        Err(err) => format!(
            "(normalization failed: {})\n{}",
            err,
            render_grammar_tokens(&raw.tokens)
        ),
    }
}

fn describe_reference_side(text: &str) -> String {
    match LexerState::from(text) {
        Ok(state) => render_reference_tokens(state.all_tokens()),
        Err(err) => format!("(lexing failed: {})", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::lexing::LineTokenKind;
    use crate::reconcile::ClassificationTable;

    #[test]
    fn test_render_reference_tokens() {
        let tokens = [
            ReferenceToken {
                kind: LineTokenKind::KeywordLet,
                start: 0,
                end: 3,
            },
            ReferenceToken {
                kind: LineTokenKind::Identifier,
                start: 4,
                end: 5,
            },
        ];
        assert_eq!(
            render_reference_tokens(&tokens),
            "0..3 KeywordLet\n4..5 Identifier"
        );
    }

    #[test]
    #[should_panic(expected = "does not reconcile")]
    fn test_assert_reconciles_panics_on_mismatch() {
        let grammar = Grammar::builtin().unwrap();
        let table = ClassificationTable::new().unwrap();
        assert_reconciles(&Reconciler::new(&grammar, &table), "each _");
    }
}
