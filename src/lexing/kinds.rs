//! Reference token kinds
//!
//! The closed set of classifications the reference lexer reports. Unlike [RawToken], these
//! distinguish the parts of constructs spread over several lines (`...Start`, `...Content`,
//! `...End`), and a closed quoted identifier is reported as a plain [LineTokenKind::Identifier].
//!
//! [RawToken]: super::tokens_core::RawToken

use serde::Serialize;
use std::fmt;
use strum::EnumIter;

/// `LineTokenKind::iter()` (from [strum::IntoEnumIterator]) visits every kind, which is what
/// the classification table checks its totality against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, EnumIter)]
pub enum LineTokenKind {
    Ampersand,
    Asterisk,
    AtSign,
    Bang,
    Comma,
    Division,
    DotDot,
    Ellipsis,
    Equal,
    FatArrow,
    GreaterThan,
    GreaterThanEqualTo,
    HexLiteral,
    Identifier,
    KeywordAnd,
    KeywordAs,
    KeywordEach,
    KeywordElse,
    KeywordError,
    KeywordFalse,
    KeywordHashBinary,
    KeywordHashDate,
    KeywordHashDateTime,
    KeywordHashDateTimeZone,
    KeywordHashDuration,
    KeywordHashInfinity,
    KeywordHashNan,
    KeywordHashSections,
    KeywordHashShared,
    KeywordHashTable,
    KeywordHashTime,
    KeywordIf,
    KeywordIn,
    KeywordIs,
    KeywordLet,
    KeywordMeta,
    KeywordNot,
    KeywordOr,
    KeywordOtherwise,
    KeywordSection,
    KeywordShared,
    KeywordThen,
    KeywordTrue,
    KeywordTry,
    KeywordType,
    LeftBrace,
    LeftBracket,
    LeftParenthesis,
    LessThan,
    LessThanEqualTo,
    LineComment,
    Minus,
    MultilineComment,
    MultilineCommentContent,
    MultilineCommentEnd,
    MultilineCommentStart,
    NotEqual,
    NullCoalescingOperator,
    NullLiteral,
    NumericLiteral,
    Plus,
    QuestionMark,
    QuotedIdentifierContent,
    QuotedIdentifierEnd,
    QuotedIdentifierStart,
    RightBrace,
    RightBracket,
    RightParenthesis,
    Semicolon,
    TextLiteral,
    TextLiteralContent,
    TextLiteralEnd,
    TextLiteralStart,
}

impl fmt::Display for LineTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_iter_follows_declaration_order() {
        let kinds: Vec<LineTokenKind> = LineTokenKind::iter().collect();
        let mut sorted = kinds.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, kinds);
        assert_eq!(kinds.first(), Some(&LineTokenKind::Ampersand));
        assert_eq!(kinds.last(), Some(&LineTokenKind::TextLiteralStart));
    }

    #[test]
    fn test_display_uses_variant_name() {
        assert_eq!(LineTokenKind::KeywordHashNan.to_string(), "KeywordHashNan");
    }
}
