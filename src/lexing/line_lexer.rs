//! Line lexer
//!
//! Lexes one line given the mode the previous line left behind.
//!
//! Modes
//!
//!     A line that starts inside an open construct first resolves it: if the closer is on this
//!     line the construct's `...End` token runs up to and including it and lexing continues in
//!     default mode after it; otherwise the whole line is a `...Content` token and the mode
//!     carries over. An empty line inside a construct therefore yields a zero-width
//!     `...Content` token.
//!
//!     In default mode the logos core tokens are mapped onto [LineTokenKind]. A construct that
//!     opens but does not close swallows the rest of the line as its `...Start` token and
//!     switches the mode for the next line.

use super::error::LexError;
use super::kinds::LineTokenKind;
use super::tokens_core::{find_closing_quote, find_comment_end, Closure, RawToken};
use logos::Logos;
use serde::Serialize;

/// What the next line starts inside of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum LineMode {
    #[default]
    Default,
    Comment,
    Text,
    QuotedIdentifier,
}

/// A token with line-relative byte positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineToken {
    pub kind: LineTokenKind,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedLine {
    pub tokens: Vec<LineToken>,
    /// Mode the following line starts in.
    pub mode: LineMode,
}

/// Lex `line` starting in `mode`. `line_number` (1-based) is only used for error reporting.
pub fn lex_line(line: &str, mode: LineMode, line_number: usize) -> Result<LexedLine, LexError> {
    let mut tokens = Vec::new();

    let resume = match mode {
        LineMode::Default => Some(0),
        LineMode::Comment => resolve_open(
            &mut tokens,
            line,
            find_comment_end(line),
            LineTokenKind::MultilineCommentEnd,
            LineTokenKind::MultilineCommentContent,
        ),
        LineMode::Text => resolve_open(
            &mut tokens,
            line,
            find_closing_quote(line).map(|q| q + 1),
            LineTokenKind::TextLiteralEnd,
            LineTokenKind::TextLiteralContent,
        ),
        LineMode::QuotedIdentifier => resolve_open(
            &mut tokens,
            line,
            find_closing_quote(line).map(|q| q + 1),
            LineTokenKind::QuotedIdentifierEnd,
            LineTokenKind::QuotedIdentifierContent,
        ),
    };

    let Some(offset) = resume else {
        return Ok(LexedLine { tokens, mode });
    };

    let rest = &line[offset..];
    let mut lexer = RawToken::lexer(rest);
    let mut next_mode = LineMode::Default;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let raw = result.map_err(|_| {
            let ch = rest[span.start..].chars().next().unwrap_or('\u{fffd}');
            LexError {
                line: line_number,
                column: line[..offset + span.start].chars().count() + 1,
                ch,
            }
        })?;

        let (kind, mode_after) = classify(raw);
        if let Some(m) = mode_after {
            next_mode = m;
        }
        tokens.push(LineToken {
            kind,
            start: offset + span.start,
            end: offset + span.end,
        });
    }

    tracing::trace!(
        line = line_number,
        tokens = tokens.len(),
        mode = ?next_mode,
        "lexed line"
    );

    Ok(LexedLine {
        tokens,
        mode: next_mode,
    })
}

/// Push the token for a construct continued from the previous line. Returns the offset to
/// resume default lexing from, or `None` if the construct runs on past this line.
fn resolve_open(
    tokens: &mut Vec<LineToken>,
    line: &str,
    closer_end: Option<usize>,
    end_kind: LineTokenKind,
    content_kind: LineTokenKind,
) -> Option<usize> {
    match closer_end {
        Some(end) => {
            tokens.push(LineToken {
                kind: end_kind,
                start: 0,
                end,
            });
            Some(end)
        }
        None => {
            tokens.push(LineToken {
                kind: content_kind,
                start: 0,
                end: line.len(),
            });
            None
        }
    }
}

fn classify(raw: RawToken) -> (LineTokenKind, Option<LineMode>) {
    use LineTokenKind as K;

    let kind = match raw {
        RawToken::BlockComment(Closure::Closed) => K::MultilineComment,
        RawToken::BlockComment(Closure::Open) => {
            return (K::MultilineCommentStart, Some(LineMode::Comment))
        }
        RawToken::Text(Closure::Closed) => K::TextLiteral,
        RawToken::Text(Closure::Open) => return (K::TextLiteralStart, Some(LineMode::Text)),
        RawToken::QuotedIdentifier(Closure::Closed) => K::Identifier,
        RawToken::QuotedIdentifier(Closure::Open) => {
            return (K::QuotedIdentifierStart, Some(LineMode::QuotedIdentifier))
        }
        RawToken::LineComment => K::LineComment,

        RawToken::Ampersand => K::Ampersand,
        RawToken::Asterisk => K::Asterisk,
        RawToken::AtSign => K::AtSign,
        RawToken::Bang => K::Bang,
        RawToken::Comma => K::Comma,
        RawToken::Division => K::Division,
        RawToken::DotDot => K::DotDot,
        RawToken::Ellipsis => K::Ellipsis,
        RawToken::Equal => K::Equal,
        RawToken::FatArrow => K::FatArrow,
        RawToken::GreaterThan => K::GreaterThan,
        RawToken::GreaterThanEqualTo => K::GreaterThanEqualTo,
        RawToken::LessThan => K::LessThan,
        RawToken::LessThanEqualTo => K::LessThanEqualTo,
        RawToken::NotEqual => K::NotEqual,
        RawToken::Minus => K::Minus,
        RawToken::Plus => K::Plus,
        RawToken::NullCoalescingOperator => K::NullCoalescingOperator,
        RawToken::QuestionMark => K::QuestionMark,

        RawToken::LeftBrace => K::LeftBrace,
        RawToken::RightBrace => K::RightBrace,
        RawToken::LeftBracket => K::LeftBracket,
        RawToken::RightBracket => K::RightBracket,
        RawToken::LeftParenthesis => K::LeftParenthesis,
        RawToken::RightParenthesis => K::RightParenthesis,
        RawToken::Semicolon => K::Semicolon,

        RawToken::HexLiteral => K::HexLiteral,
        RawToken::NumericLiteral => K::NumericLiteral,
        RawToken::NullLiteral => K::NullLiteral,
        RawToken::Identifier => K::Identifier,

        RawToken::KeywordAnd => K::KeywordAnd,
        RawToken::KeywordAs => K::KeywordAs,
        RawToken::KeywordEach => K::KeywordEach,
        RawToken::KeywordElse => K::KeywordElse,
        RawToken::KeywordError => K::KeywordError,
        RawToken::KeywordFalse => K::KeywordFalse,
        RawToken::KeywordIf => K::KeywordIf,
        RawToken::KeywordIn => K::KeywordIn,
        RawToken::KeywordIs => K::KeywordIs,
        RawToken::KeywordLet => K::KeywordLet,
        RawToken::KeywordMeta => K::KeywordMeta,
        RawToken::KeywordNot => K::KeywordNot,
        RawToken::KeywordOr => K::KeywordOr,
        RawToken::KeywordOtherwise => K::KeywordOtherwise,
        RawToken::KeywordSection => K::KeywordSection,
        RawToken::KeywordShared => K::KeywordShared,
        RawToken::KeywordThen => K::KeywordThen,
        RawToken::KeywordTrue => K::KeywordTrue,
        RawToken::KeywordTry => K::KeywordTry,
        RawToken::KeywordType => K::KeywordType,

        RawToken::KeywordHashBinary => K::KeywordHashBinary,
        RawToken::KeywordHashDate => K::KeywordHashDate,
        RawToken::KeywordHashDateTime => K::KeywordHashDateTime,
        RawToken::KeywordHashDateTimeZone => K::KeywordHashDateTimeZone,
        RawToken::KeywordHashDuration => K::KeywordHashDuration,
        RawToken::KeywordHashInfinity => K::KeywordHashInfinity,
        RawToken::KeywordHashNan => K::KeywordHashNan,
        RawToken::KeywordHashSections => K::KeywordHashSections,
        RawToken::KeywordHashShared => K::KeywordHashShared,
        RawToken::KeywordHashTable => K::KeywordHashTable,
        RawToken::KeywordHashTime => K::KeywordHashTime,
    };
    (kind, None)
}
