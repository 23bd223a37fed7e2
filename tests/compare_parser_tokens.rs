//! Single-line regression scenarios: each expression must tokenize identically under the grammar
//! and the reference lexer (same count, labels and positions).
//!
//! Known gaps are kept as ignored tests so the list stays visible. Run them with
//! `cargo test -- --ignored`.

use pq_tmlanguage::grammar::Grammar;
use pq_tmlanguage::reconcile::{ClassificationTable, EquivalenceFault, ReconcileError, Reconciler};
use pq_tmlanguage::testing::{assert_reconciles, render_grammar_tokens, render_reference_tokens};
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

fn reconciler<'a>(grammar: &'a Grammar, table: &'a ClassificationTable) -> Reconciler<'a> {
    Reconciler::new(grammar, table)
}

#[rstest]
#[case::logical("if true then true else false")]
#[case::text(r#""string one" & "string 2""#)]
#[case::escaped_text(r#""with  ""escaped "" 'text""#)]
#[case::numbers("1 1.1 5e123 534.1223 2.2e555 -1.3")]
#[case::numeric_expression("5 / 1.2e+2 + 0x1234abc")]
#[case::quoted_identifier(r#"#"identifier with spaces""#)]
#[case::quoted_identifier_no_space(r#"#"identifier""#)]
#[case::simple_function("x = () => 1")]
#[case::duration_constructor("#duration(1,1,1,1)")]
#[case::line_comment("1; // comment")]
#[case::block_comment("1 + /* just a comment */ 1")]
#[case::exception_flow(r#"try true otherwise error "error text""#)]
#[case::escaped_identifier_and_step(r#"#"A  B" = 1+2,"#)]
#[case::escaped_quote_in_identifier(r#"#"a""b" & #"say ""hi""""#)]
#[case::dotted_identifier("Table.FromRecords")]
#[case::section_header(r#"[Version="1.0.1"] section Foo; shared Member.Name = 1;"#)]
#[case::recursion("@RecursiveFunction()+@Rec.Func()")]
#[case::null_coalescing("a ?? null")]
#[case::list_range("{1..10}")]
#[case::intrinsics("#shared & #sections, #nan, #infinity")]
#[case::empty_line("")]
fn test_scenario_reconciles(
    grammar: &Grammar,
    table: &ClassificationTable,
    #[case] expression: &str,
) {
    assert_reconciles(&reconciler(grammar, table), expression);
}

#[rstest]
fn test_strings_merge_into_single_tokens(grammar: &Grammar, table: &ClassificationTable) {
    let report = assert_reconciles(&reconciler(grammar, table), r#""string one" & "string 2""#);

    insta::assert_snapshot!(render_grammar_tokens(&report.grammar_tokens), @r###"
    0..12 source.powerquery string.quoted.double.powerquery
    13..14 source.powerquery keyword.operator.combination.powerquery
    15..25 source.powerquery string.quoted.double.powerquery
    "###);
    insta::assert_snapshot!(render_reference_tokens(&report.reference_tokens), @r###"
    0..12 TextLiteral
    13..14 Ampersand
    15..25 TextLiteral
    "###);
}

#[rstest]
fn test_quoted_identifier_spans_delimiters(grammar: &Grammar, table: &ClassificationTable) {
    let report = assert_reconciles(&reconciler(grammar, table), r#"#"identifier with spaces""#);

    insta::assert_snapshot!(render_grammar_tokens(&report.grammar_tokens), @"0..25 source.powerquery entity.name.powerquery");
}

// ============================================================================
// KNOWN GAPS
// ============================================================================
//
// Each gap is ignored with its full expectation and pinned by a test asserting the current
// failure, so a fix shows up as a failing pin rather than going unnoticed.

#[rstest]
#[ignore = "known gap: `_` is an implicit-variable operator in the grammar but an identifier in the lexer"]
fn test_gap_keyword_case_sensitivity(grammar: &Grammar, table: &ClassificationTable) {
    assert_reconciles(&reconciler(grammar, table), "And as Each each _");
}

#[rstest]
fn test_keyword_case_sensitivity_still_fails(grammar: &Grammar, table: &ClassificationTable) {
    let result = reconciler(grammar, table).reconcile_line("And as Each each _");
    assert!(matches!(
        result,
        Err(ReconcileError::Equivalence(EquivalenceFault::Tokens(_)))
    ));
}

#[rstest]
#[ignore = "known gap: field access is tokenized as a record expression"]
fn test_gap_record_and_list_access(grammar: &Grammar, table: &ClassificationTable) {
    assert_reconciles(&reconciler(grammar, table), "Source{0}[Column Name]");
}

#[rstest]
fn test_record_and_list_access_still_fails(grammar: &Grammar, table: &ClassificationTable) {
    let result = reconciler(grammar, table).reconcile_line("Source{0}[Column Name]");
    assert!(matches!(result, Err(ReconcileError::Equivalence(_))));
}
