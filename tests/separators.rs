//! Binary separators between identifiers, with and without surrounding whitespace.

use pq_tmlanguage::grammar::Grammar;
use pq_tmlanguage::lexing::LineTokenKind;
use pq_tmlanguage::reconcile::{ClassificationTable, Reconciler};
use pq_tmlanguage::testing::assert_reconciles;
use rstest::{fixture, rstest};

#[fixture]
#[once]
fn grammar() -> Grammar {
    Grammar::builtin().expect("bundled grammar to compile")
}

#[fixture]
#[once]
fn table() -> ClassificationTable {
    ClassificationTable::new().expect("classification table to be total")
}

#[rstest]
fn test_separator_between_identifiers(
    grammar: &Grammar,
    table: &ClassificationTable,
    #[values(
        ("&", LineTokenKind::Ampersand),
        ("<", LineTokenKind::LessThan),
        (">", LineTokenKind::GreaterThan),
        ("*", LineTokenKind::Asterisk),
        ("+", LineTokenKind::Plus),
        ("/", LineTokenKind::Division),
        ("-", LineTokenKind::Minus),
        ("=", LineTokenKind::Equal),
        (">=", LineTokenKind::GreaterThanEqualTo),
        ("<=", LineTokenKind::LessThanEqualTo),
        ("<>", LineTokenKind::NotEqual),
        (",", LineTokenKind::Comma)
    )]
    separator: (&str, LineTokenKind),
    #[values("", " ")] padding: &str,
) {
    let (op, kind) = separator;
    let text = format!("ident1{pad}{op}{pad}ident2", pad = padding, op = op);

    let report = assert_reconciles(&Reconciler::new(grammar, table), &text);
    let kinds: Vec<LineTokenKind> = report.reference_tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![LineTokenKind::Identifier, kind, LineTokenKind::Identifier]
    );
}
