//! Classification table
//!
//! Maps every reference [LineTokenKind] to the scope label the grammar should give the same
//! token. The mapping is a keyed table built from [STANDARD_ENTRIES] and checked for totality
//! when it is built, so a kind added to the lexer without an entry fails at startup rather than
//! in the middle of a comparison.
//!
//! Exact and prefix labels
//!
//!     A label ending in the grammar namespace (`.powerquery`) must equal the grammar token's
//!     innermost scope. Any other label is a prefix: some reference kinds cover several grammar
//!     labels (`NumericLiteral` is an integer, a float or a decimal on the grammar side).

use super::error::MappingError;
use super::scopes::NAMESPACE_SUFFIX;
use crate::lexing::{LineTokenKind, LineTokenKind as K};
use std::collections::HashMap;
use std::fmt;
use strum::IntoEnumIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedScope {
    Exact(&'static str),
    Prefix(&'static str),
}

impl ExpectedScope {
    pub fn from_label(label: &'static str) -> Self {
        if label.ends_with(NAMESPACE_SUFFIX) {
            ExpectedScope::Exact(label)
        } else {
            ExpectedScope::Prefix(label)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpectedScope::Exact(label) | ExpectedScope::Prefix(label) => label,
        }
    }

    /// Whether a grammar token's innermost scope satisfies this expectation.
    pub fn matches(&self, innermost: &str) -> bool {
        match self {
            ExpectedScope::Exact(label) => innermost == *label,
            ExpectedScope::Prefix(prefix) => innermost.starts_with(prefix),
        }
    }
}

impl fmt::Display for ExpectedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedScope::Exact(label) => f.write_str(label),
            ExpectedScope::Prefix(prefix) => write!(f, "{}*", prefix),
        }
    }
}

pub const STANDARD_ENTRIES: &[(LineTokenKind, &str)] = &[
    (K::Ampersand, "keyword.operator.combination.powerquery"),
    (K::Asterisk, "keyword.operator.arithmetic.powerquery"),
    (K::AtSign, "keyword.operator.inclusiveidentifier.powerquery"),
    (K::Bang, "keyword.operator.sectionaccess.powerquery"),
    (K::Comma, "punctuation.separator.powerquery"),
    (K::Division, "keyword.operator.arithmetic.powerquery"),
    (K::DotDot, "keyword.operator.list.powerquery"),
    (K::Ellipsis, "keyword.operator.ellipsis.powerquery"),
    (K::Equal, "keyword.operator.assignment-or-comparison.powerquery"),
    (K::FatArrow, "keyword.operator.function.powerquery"),
    (K::GreaterThan, "keyword.operator.comparison.powerquery"),
    (K::GreaterThanEqualTo, "keyword.operator.comparison.powerquery"),
    (K::HexLiteral, "constant.numeric.integer.hexadecimal.powerquery"),
    (K::Identifier, "entity.name.powerquery"),
    (K::KeywordAnd, "keyword.operator.word.logical.powerquery"),
    (K::KeywordAs, "keyword.other.powerquery"),
    (K::KeywordEach, "keyword.other.powerquery"),
    (K::KeywordElse, "keyword.control.conditional.powerquery"),
    (K::KeywordError, "keyword.control.exception.powerquery"),
    (K::KeywordFalse, "constant.language.logical.powerquery"),
    (K::KeywordHashBinary, "keyword.other.constructor.powerquery"),
    (K::KeywordHashDate, "keyword.other.constructor.powerquery"),
    (K::KeywordHashDateTime, "keyword.other.constructor.powerquery"),
    (K::KeywordHashDateTimeZone, "keyword.other.constructor.powerquery"),
    (K::KeywordHashDuration, "keyword.other.constructor.powerquery"),
    (K::KeywordHashInfinity, "constant.language.numeric.float.powerquery"),
    (K::KeywordHashNan, "constant.language.numeric.float.powerquery"),
    (K::KeywordHashSections, "constant.language.intrinsicvariable.powerquery"),
    (K::KeywordHashShared, "constant.language.intrinsicvariable.powerquery"),
    (K::KeywordHashTable, "keyword.other.constructor.powerquery"),
    (K::KeywordHashTime, "keyword.other.constructor.powerquery"),
    (K::KeywordIf, "keyword.control.conditional.powerquery"),
    (K::KeywordIn, "keyword.other.powerquery"),
    (K::KeywordIs, "keyword.other.powerquery"),
    (K::KeywordLet, "keyword.other.powerquery"),
    (K::KeywordMeta, "keyword.other.powerquery"),
    (K::KeywordNot, "keyword.operator.word.logical.powerquery"),
    (K::KeywordOr, "keyword.operator.word.logical.powerquery"),
    (K::KeywordOtherwise, "keyword.control.exception.powerquery"),
    (K::KeywordSection, "keyword.other.powerquery"),
    (K::KeywordShared, "keyword.other.powerquery"),
    (K::KeywordThen, "keyword.control.conditional.powerquery"),
    (K::KeywordTrue, "constant.language.logical.powerquery"),
    (K::KeywordTry, "keyword.control.exception.powerquery"),
    (K::KeywordType, "keyword.other.powerquery"),
    (K::LeftBrace, "punctuation.section.braces.begin.powerquery"),
    (K::LeftBracket, "punctuation.section.brackets.begin.powerquery"),
    (K::LeftParenthesis, "punctuation.section.parens.begin.powerquery"),
    (K::LessThan, "keyword.operator.comparison.powerquery"),
    (K::LessThanEqualTo, "keyword.operator.comparison.powerquery"),
    (K::LineComment, "comment.line.double-slash.powerquery"),
    (K::Minus, "keyword.operator.arithmetic.powerquery"),
    (K::MultilineComment, "comment.block.powerquery"),
    (K::MultilineCommentContent, "comment.block.powerquery"),
    (K::MultilineCommentEnd, "comment.block.powerquery"),
    (K::MultilineCommentStart, "comment.block.powerquery"),
    (K::NotEqual, "keyword.operator.comparison.powerquery"),
    (K::NullCoalescingOperator, "keyword.operator.nullcoalescing.powerquery"),
    (K::NullLiteral, "constant.language.null.powerquery"),
    (K::NumericLiteral, "constant.numeric."),
    (K::Plus, "keyword.operator.arithmetic.powerquery"),
    (K::QuestionMark, "keyword.operator.optional.powerquery"),
    (K::QuotedIdentifierContent, "entity.name.powerquery"),
    (K::QuotedIdentifierEnd, "entity.name.powerquery"),
    (K::QuotedIdentifierStart, "entity.name.powerquery"),
    (K::RightBrace, "punctuation.section.braces.end.powerquery"),
    (K::RightBracket, "punctuation.section.brackets.end.powerquery"),
    (K::RightParenthesis, "punctuation.section.parens.end.powerquery"),
    (K::Semicolon, "punctuation.terminator.powerquery"),
    (K::TextLiteral, "string.quoted.double.powerquery"),
    (K::TextLiteralContent, "string.quoted.double.powerquery"),
    (K::TextLiteralEnd, "string.quoted.double.powerquery"),
    (K::TextLiteralStart, "string.quoted.double.powerquery"),
];

#[derive(Debug, Clone)]
pub struct ClassificationTable {
    entries: HashMap<LineTokenKind, ExpectedScope>,
}

impl ClassificationTable {
    /// The standard table, checked for duplicates and totality.
    pub fn new() -> Result<Self, MappingError> {
        let table = Self::from_entries(STANDARD_ENTRIES.iter().copied())?;
        table.validate()?;
        tracing::debug!(entries = table.len(), "classification table ready");
        Ok(table)
    }

    /// Build a table from arbitrary entries. Duplicates are rejected; totality is not checked.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (LineTokenKind, &'static str)>,
    ) -> Result<Self, MappingError> {
        let mut map = HashMap::new();
        for (kind, label) in entries {
            if map.insert(kind, ExpectedScope::from_label(label)).is_some() {
                return Err(MappingError::Duplicate(kind));
            }
        }
        Ok(Self { entries: map })
    }

    /// Check that every kind the reference lexer can report has an entry.
    pub fn validate(&self) -> Result<(), MappingError> {
        match LineTokenKind::iter().find(|kind| !self.entries.contains_key(kind)) {
            Some(kind) => Err(MappingError::Unmapped(kind)),
            None => Ok(()),
        }
    }

    pub fn expected(&self, kind: LineTokenKind) -> Result<ExpectedScope, MappingError> {
        self.entries
            .get(&kind)
            .copied()
            .ok_or(MappingError::Unmapped(kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_standard_table_is_total() {
        let table = ClassificationTable::new().unwrap();
        assert_eq!(table.len(), LineTokenKind::iter().count());
    }

    #[rstest]
    #[case(LineTokenKind::Ampersand, ExpectedScope::Exact("keyword.operator.combination.powerquery"))]
    #[case(LineTokenKind::NumericLiteral, ExpectedScope::Prefix("constant.numeric."))]
    #[case(LineTokenKind::KeywordHashNan, ExpectedScope::Exact("constant.language.numeric.float.powerquery"))]
    #[case(LineTokenKind::QuotedIdentifierStart, ExpectedScope::Exact("entity.name.powerquery"))]
    fn test_expected_scope(#[case] kind: LineTokenKind, #[case] expected: ExpectedScope) {
        let table = ClassificationTable::new().unwrap();
        assert_eq!(table.expected(kind).unwrap(), expected);
    }

    #[rstest]
    #[case("constant.numeric.integer.powerquery", true)]
    #[case("constant.numeric.float.powerquery", true)]
    #[case("constant.numeric.integer.hexadecimal.powerquery", true)]
    #[case("constant.language.null.powerquery", false)]
    fn test_prefix_matching(#[case] actual: &str, #[case] matches: bool) {
        assert_eq!(ExpectedScope::Prefix("constant.numeric.").matches(actual), matches);
    }

    #[test]
    fn test_exact_matching_rejects_longer_labels() {
        let expected = ExpectedScope::from_label("entity.name.powerquery");
        assert!(expected.matches("entity.name.powerquery"));
        assert!(!expected.matches("entity.name.powerquery.extra"));
    }

    #[test]
    fn test_missing_kind_fails_validation() {
        let table = ClassificationTable::from_entries(
            STANDARD_ENTRIES
                .iter()
                .copied()
                .filter(|(kind, _)| *kind != LineTokenKind::Semicolon),
        )
        .unwrap();
        assert_eq!(
            table.validate(),
            Err(MappingError::Unmapped(LineTokenKind::Semicolon))
        );
        assert_eq!(
            table.expected(LineTokenKind::Semicolon),
            Err(MappingError::Unmapped(LineTokenKind::Semicolon))
        );
    }

    #[test]
    fn test_duplicate_entries_are_rejected() {
        let result = ClassificationTable::from_entries([
            (LineTokenKind::Comma, "punctuation.separator.powerquery"),
            (LineTokenKind::Comma, "punctuation.other.powerquery"),
        ]);
        assert!(matches!(
            result,
            Err(MappingError::Duplicate(LineTokenKind::Comma))
        ));
    }

    #[test]
    fn test_display_marks_prefixes() {
        assert_eq!(ExpectedScope::Prefix("constant.numeric.").to_string(), "constant.numeric.*");
    }
}
