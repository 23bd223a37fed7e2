//! Property-based tests for normalization and single-line reconciliation
//!
//! Lines are built from literal atoms (identifiers, numbers, strings, quoted identifiers)
//! joined by binary operators with surrounding whitespace. Every such line must reconcile, and
//! normalizing an already normalized stream must not change it.

use once_cell::sync::Lazy;
use proptest::prelude::*;
use pq_tmlanguage::grammar::Grammar;
use pq_tmlanguage::reconcile::{normalize, ClassificationTable, Reconciler};

static GRAMMAR: Lazy<Grammar> =
    Lazy::new(|| Grammar::builtin().expect("bundled grammar to compile"));
static TABLE: Lazy<ClassificationTable> =
    Lazy::new(|| ClassificationTable::new().expect("classification table to be total"));

const KEYWORDS: &[&str] = &[
    "and", "as", "each", "else", "error", "false", "if", "in", "is", "let", "meta", "not", "null",
    "or", "otherwise", "section", "shared", "then", "true", "try", "type",
];

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,6}"
        .prop_filter("keywords are not identifiers", |s| !KEYWORDS.contains(&s.as_str()))
}

fn number_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,4}",
        "[0-9]{1,3}\\.[0-9]{1,3}",
        "[0-9]{1,2}e[0-9]{1,2}",
        "0x[0-9a-f]{1,4}",
    ]
}

/// Text literals, some with an escaped quote in the middle
fn string_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,8}".prop_map(|s| format!("\"{}\"", s)),
        ("[a-z]{1,4}", "[a-z ]{0,4}").prop_map(|(a, b)| format!("\"{}\"\"{}\"", a, b)),
    ]
}

/// Quoted identifiers, some with an escaped quote in the middle
fn quoted_identifier_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z ]{0,8}".prop_map(|s| format!("#\"{}\"", s)),
        ("[a-z]{1,4}", "[a-z ]{0,4}").prop_map(|(a, b)| format!("#\"{}\"\"{}\"", a, b)),
    ]
}

fn atom_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        identifier_strategy(),
        number_strategy(),
        string_strategy(),
        quoted_identifier_strategy(),
        Just("null".to_string()),
        Just("true".to_string()),
    ]
}

fn operator_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "+", "-", "*", "/", "&", "=", "<>", "<", "<=", ">", ">=", ",", "??", "and", "or",
    ])
}

/// A line of atoms separated by operators
fn line_strategy() -> impl Strategy<Value = String> {
    (
        atom_strategy(),
        prop::collection::vec((operator_strategy(), atom_strategy()), 0..5),
    )
        .prop_map(|(first, rest)| {
            rest.into_iter().fold(first, |mut line, (op, atom)| {
                line.push(' ');
                line.push_str(op);
                line.push(' ');
                line.push_str(&atom);
                line
            })
        })
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_generated_lines_reconcile(line in line_strategy()) {
            let result = Reconciler::new(&GRAMMAR, &TABLE).reconcile_line(&line);
            prop_assert!(result.is_ok(), "{:?} failed: {}", line, result.unwrap_err());
        }

        #[test]
        fn test_normalization_is_idempotent(line in line_strategy()) {
            let raw = GRAMMAR.tokenize_line(&line, None).tokens;

            let once = normalize(&raw).unwrap();
            let twice = normalize(&once).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_normalized_tokens_are_ordered_and_scoped(line in line_strategy()) {
            let tokens = normalize(&GRAMMAR.tokenize_line(&line, None).tokens).unwrap();

            prop_assert!(tokens.iter().all(|t| t.scopes.len() > 1));
            prop_assert!(tokens.iter().all(|t| t.start < t.end && t.end <= line.len()));
            for pair in tokens.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
            }
        }
    }
}
