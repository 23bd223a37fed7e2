//! Scenario entry points
//!
//! A [Reconciler] borrows a loaded [Grammar] and [ClassificationTable]. Both are built once per
//! run and shared by every scenario; each scenario creates its own tokenizer states.

use super::classification::ClassificationTable;
use super::comparison::TokenComparer;
use super::error::ReconcileError;
use super::incremental::{IncrementalReconciler, OffsetCheck, StepReport};
use super::normalization::normalize;
use crate::grammar::{Grammar, GrammarToken};
use crate::lexing::{LexerState, ReferenceToken};
use serde::Serialize;

/// Both token streams of a reconciled line.
#[derive(Debug, Clone, Serialize)]
pub struct LineReport {
    pub grammar_tokens: Vec<GrammarToken>,
    pub reference_tokens: Vec<ReferenceToken>,
}

#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    grammar: &'a Grammar,
    table: &'a ClassificationTable,
    offsets: OffsetCheck,
    normalize: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(grammar: &'a Grammar, table: &'a ClassificationTable) -> Self {
        Self {
            grammar,
            table,
            offsets: OffsetCheck::default(),
            normalize: true,
        }
    }

    /// Compare the grammar's raw tokens in [reconcile_line](Self::reconcile_line). Whitespace and
    /// multi-token constructs are left as they are, so this mostly serves to inspect them.
    pub fn without_normalization(mut self) -> Self {
        self.normalize = false;
        self
    }

    /// Offset policy used by [reconcile_document](Self::reconcile_document).
    pub fn with_offset_check(mut self, offsets: OffsetCheck) -> Self {
        self.offsets = offsets;
        self
    }

    pub fn grammar(&self) -> &'a Grammar {
        self.grammar
    }

    pub fn table(&self) -> &'a ClassificationTable {
        self.table
    }

    /// Tokenize `text` as a single line on both sides and require full equivalence: same count,
    /// labels, starts and ends.
    pub fn reconcile_line(&self, text: &str) -> Result<LineReport, ReconcileError> {
        let raw = self.grammar.tokenize_line(text, None);
        let grammar_tokens = if self.normalize {
            normalize(&raw.tokens)?
        } else {
            raw.tokens
        };
        let lexer = LexerState::from(text)?;
        let reference_tokens = lexer.all_tokens().to_vec();

        TokenComparer::new(text, &grammar_tokens, &reference_tokens, self.table).assert_same()?;
        tracing::debug!(text, tokens = grammar_tokens.len(), "line reconciled");

        Ok(LineReport {
            grammar_tokens,
            reference_tokens,
        })
    }

    /// Feed `text` line by line through both tokenizers.
    pub fn reconcile_document(&self, text: &str) -> Result<Vec<StepReport>, ReconcileError> {
        IncrementalReconciler::new(self.grammar, self.table)
            .with_offset_check(self.offsets)
            .run(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::error::{EquivalenceFault, NormalizeError};

    #[test]
    fn test_reconcile_simple_line() {
        let grammar = Grammar::builtin().unwrap();
        let table = ClassificationTable::new().unwrap();
        let report = Reconciler::new(&grammar, &table)
            .reconcile_line(r#""string one" & "string 2""#)
            .unwrap();
        assert_eq!(report.grammar_tokens.len(), 3);
        assert_eq!(report.reference_tokens.len(), 3);
    }

    #[test]
    fn test_label_mismatch_is_an_equivalence_fault() {
        let grammar = Grammar::builtin().unwrap();
        let table = ClassificationTable::new().unwrap();
        let err = Reconciler::new(&grammar, &table)
            .reconcile_line("each _")
            .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::Equivalence(EquivalenceFault::Tokens(_))
        ));
    }

    #[test]
    fn test_multi_line_string_start_is_a_structural_fault() {
        let grammar = Grammar::builtin().unwrap();
        let table = ClassificationTable::new().unwrap();
        let err = Reconciler::new(&grammar, &table)
            .reconcile_line(r#"x = "open"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::Structural(NormalizeError::Exhausted { .. })
        ));
    }

    #[test]
    fn test_without_normalization_whitespace_counts() {
        let grammar = Grammar::builtin().unwrap();
        let table = ClassificationTable::new().unwrap();
        let reconciler = Reconciler::new(&grammar, &table);

        assert!(reconciler.reconcile_line("1+2").is_ok());
        assert!(reconciler.without_normalization().reconcile_line("1+2").is_ok());
        let err = reconciler
            .without_normalization()
            .reconcile_line("1 + 2")
            .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::Equivalence(EquivalenceFault::Count {
                grammar: 5,
                reference: 3
            })
        ));
    }

    #[test]
    fn test_lexer_failure_is_reported() {
        let grammar = Grammar::builtin().unwrap();
        let table = ClassificationTable::new().unwrap();
        let err = Reconciler::new(&grammar, &table)
            .reconcile_line("a $ b")
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Lex(_)));
    }
}
