//! Incremental reconciliation
//!
//! Advances both tokenizers one line at a time: the grammar by threading its [RuleStack], the
//! reference lexer by appending the line to its state. After every line only the reference
//! tokens produced by that append are compared with the line's normalized grammar tokens.
//!
//! Offsets
//!
//!     The reference lexer reports document-relative positions while the grammar reports
//!     line-relative ones, so by default only token counts are compared
//!     ([OffsetCheck::CountOnly]). [OffsetCheck::Raw] compares the raw positions anyway: every
//!     line after the first then fails, which makes the discrepancy visible instead of hiding
//!     it.

use super::classification::ClassificationTable;
use super::comparison::TokenComparer;
use super::error::ReconcileError;
use super::normalization::normalize;
use crate::grammar::{Grammar, GrammarToken, RuleStack};
use crate::lexing::{LexerState, ReferenceToken};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum OffsetCheck {
    #[default]
    CountOnly,
    Raw,
}

impl OffsetCheck {
    pub fn from_flag(check_offsets: bool) -> Self {
        if check_offsets {
            OffsetCheck::Raw
        } else {
            OffsetCheck::CountOnly
        }
    }
}

/// Outcome of one reconciled line.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// 1-based.
    pub line: usize,
    pub text: String,
    pub grammar_tokens: Vec<GrammarToken>,
    /// Only the tokens this line produced, with document-relative positions.
    pub reference_tokens: Vec<ReferenceToken>,
}

pub struct IncrementalReconciler<'a> {
    grammar: &'a Grammar,
    table: &'a ClassificationTable,
    offsets: OffsetCheck,
    rule_stack: Option<RuleStack>,
    lexer: LexerState,
    lines: usize,
}

impl<'a> IncrementalReconciler<'a> {
    pub fn new(grammar: &'a Grammar, table: &'a ClassificationTable) -> Self {
        Self {
            grammar,
            table,
            offsets: OffsetCheck::default(),
            rule_stack: None,
            lexer: LexerState::new(),
            lines: 0,
        }
    }

    pub fn with_offset_check(mut self, offsets: OffsetCheck) -> Self {
        if offsets == OffsetCheck::Raw {
            tracing::warn!(
                "raw offset check enabled: reference positions are document-relative, \
                 grammar positions are line-relative"
            );
        }
        self.offsets = offsets;
        self
    }

    /// Reconcile the next line. After an error the reconciler's state is unspecified and it
    /// should be dropped.
    pub fn step(&mut self, line: &str) -> Result<StepReport, ReconcileError> {
        let text = line.strip_suffix('\r').unwrap_or(line);
        self.lines += 1;

        let raw = self.grammar.tokenize_line(text, self.rule_stack.as_ref());
        let grammar_tokens = normalize(&raw.tokens)?;
        self.rule_stack = Some(raw.rule_stack);

        let before = self.lexer.token_count();
        self.lexer = std::mem::take(&mut self.lexer).append_line(line)?;
        let reference_tokens = self.lexer.tokens_since(before).to_vec();

        tracing::debug!(
            line = self.lines,
            grammar = grammar_tokens.len(),
            reference = reference_tokens.len(),
            "incremental step"
        );

        let comparer = TokenComparer::new(text, &grammar_tokens, &reference_tokens, self.table);
        match self.offsets {
            OffsetCheck::CountOnly => comparer.assert_token_count()?,
            OffsetCheck::Raw => comparer.assert_same()?,
        }

        Ok(StepReport {
            line: self.lines,
            text: text.to_string(),
            grammar_tokens,
            reference_tokens,
        })
    }

    /// Reconcile every line of `text`, stopping at the first fault.
    pub fn run(mut self, text: &str) -> Result<Vec<StepReport>, ReconcileError> {
        text.split('\n').map(|line| self.step(line)).collect()
    }
}
