//! Token stream comparison
//!
//! Checks a normalized grammar token stream against the reference lexer's tokens for the same
//! text. Order is significant; nothing is reordered or matched fuzzily.

use super::classification::ClassificationTable;
use super::error::{EquivalenceFault, ReconcileError, TokenMismatch};
use crate::grammar::GrammarToken;
use crate::lexing::ReferenceToken;

pub struct TokenComparer<'a> {
    source: &'a str,
    grammar_tokens: &'a [GrammarToken],
    reference_tokens: &'a [ReferenceToken],
    table: &'a ClassificationTable,
}

impl<'a> TokenComparer<'a> {
    /// `source` is the text the grammar tokens' positions refer to.
    pub fn new(
        source: &'a str,
        grammar_tokens: &'a [GrammarToken],
        reference_tokens: &'a [ReferenceToken],
        table: &'a ClassificationTable,
    ) -> Self {
        Self {
            source,
            grammar_tokens,
            reference_tokens,
            table,
        }
    }

    pub fn assert_token_count(&self) -> Result<(), EquivalenceFault> {
        let grammar = self.grammar_tokens.len();
        let reference = self.reference_tokens.len();
        if grammar == reference {
            Ok(())
        } else {
            Err(EquivalenceFault::Count { grammar, reference })
        }
    }

    /// Compare label, start and end at every index. Collects every mismatching index before
    /// failing; a kind missing from the table aborts straight away.
    pub fn assert_token_offsets(&self) -> Result<(), ReconcileError> {
        let mut mismatches = Vec::new();

        for (index, (actual, expected)) in self
            .grammar_tokens
            .iter()
            .zip(self.reference_tokens)
            .enumerate()
        {
            let scope = self.table.expected(expected.kind)?;
            let innermost = actual.innermost().unwrap_or_default();

            let label_ok = scope.matches(innermost);
            let start_ok = actual.start == expected.start;
            let end_ok = actual.end == expected.end;

            tracing::trace!(
                index,
                kind = %expected.kind,
                label_ok,
                start_ok,
                end_ok,
                "compared token"
            );

            if !(label_ok && start_ok && end_ok) {
                mismatches.push(TokenMismatch {
                    index,
                    snippet: actual.text(self.source).unwrap_or_default().to_string(),
                    kind: expected.kind,
                    expected_label: scope.to_string(),
                    actual_label: innermost.to_string(),
                    expected: (expected.start, expected.end),
                    actual: (actual.start, actual.end),
                });
            }
        }

        if mismatches.is_empty() {
            Ok(())
        } else {
            Err(EquivalenceFault::Tokens(mismatches).into())
        }
    }

    /// Count check followed by the per-position check.
    pub fn assert_same(&self) -> Result<(), ReconcileError> {
        self.assert_token_count()?;
        self.assert_token_offsets()
    }
}
