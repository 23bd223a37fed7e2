//! Core tokens
//!
//! Raw tokens recognized by logos within a single line. Constructs that may run past the
//! end of the line (block comments, text literals, quoted identifiers) are matched by their
//! opening delimiter and finished by a callback that either finds the closer or swallows the
//! rest of the line, reporting which of the two happened.
//!
//! Horizontal whitespace is skipped. Line breaks never reach this lexer: lines are split
//! before lexing.

use logos::{Lexer, Logos};

/// Whether a delimited construct was closed on the line it started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closure {
    Closed,
    Open,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
pub enum RawToken {
    // Operators
    #[token("&")]
    Ampersand,
    #[token("*")]
    Asterisk,
    #[token("@")]
    AtSign,
    #[token("!")]
    Bang,
    #[token(",")]
    Comma,
    #[token("/")]
    Division,
    #[token("..")]
    DotDot,
    #[token("...")]
    Ellipsis,
    #[token("=")]
    Equal,
    #[token("=>")]
    FatArrow,
    #[token(">")]
    GreaterThan,
    #[token(">=")]
    GreaterThanEqualTo,
    #[token("<")]
    LessThan,
    #[token("<=")]
    LessThanEqualTo,
    #[token("<>")]
    NotEqual,
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,
    #[token("??")]
    NullCoalescingOperator,
    #[token("?")]
    QuestionMark,

    // Punctuation
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("(")]
    LeftParenthesis,
    #[token(")")]
    RightParenthesis,
    #[token(";")]
    Semicolon,

    // Literals
    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexLiteral,
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    NumericLiteral,
    #[token("null")]
    NullLiteral,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*(\.[_\p{L}][_\p{L}\p{Nd}]*)*")]
    Identifier,

    // Keywords
    #[token("and")]
    KeywordAnd,
    #[token("as")]
    KeywordAs,
    #[token("each")]
    KeywordEach,
    #[token("else")]
    KeywordElse,
    #[token("error")]
    KeywordError,
    #[token("false")]
    KeywordFalse,
    #[token("if")]
    KeywordIf,
    #[token("in")]
    KeywordIn,
    #[token("is")]
    KeywordIs,
    #[token("let")]
    KeywordLet,
    #[token("meta")]
    KeywordMeta,
    #[token("not")]
    KeywordNot,
    #[token("or")]
    KeywordOr,
    #[token("otherwise")]
    KeywordOtherwise,
    #[token("section")]
    KeywordSection,
    #[token("shared")]
    KeywordShared,
    #[token("then")]
    KeywordThen,
    #[token("true")]
    KeywordTrue,
    #[token("try")]
    KeywordTry,
    #[token("type")]
    KeywordType,

    // Hash keywords
    #[token("#binary")]
    KeywordHashBinary,
    #[token("#date")]
    KeywordHashDate,
    #[token("#datetime")]
    KeywordHashDateTime,
    #[token("#datetimezone")]
    KeywordHashDateTimeZone,
    #[token("#duration")]
    KeywordHashDuration,
    #[token("#infinity")]
    KeywordHashInfinity,
    #[token("#nan")]
    KeywordHashNan,
    #[token("#sections")]
    KeywordHashSections,
    #[token("#shared")]
    KeywordHashShared,
    #[token("#table")]
    KeywordHashTable,
    #[token("#time")]
    KeywordHashTime,

    // Delimited constructs
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment(Closure),
    #[token("\"", quoted_run)]
    Text(Closure),
    #[token("#\"", quoted_run)]
    QuotedIdentifier(Closure),
}

fn block_comment(lex: &mut Lexer<RawToken>) -> Closure {
    match find_comment_end(lex.remainder()) {
        Some(end) => {
            lex.bump(end);
            Closure::Closed
        }
        None => {
            lex.bump(lex.remainder().len());
            Closure::Open
        }
    }
}

fn quoted_run(lex: &mut Lexer<RawToken>) -> Closure {
    match find_closing_quote(lex.remainder()) {
        Some(quote) => {
            lex.bump(quote + 1);
            Closure::Closed
        }
        None => {
            lex.bump(lex.remainder().len());
            Closure::Open
        }
    }
}

/// Byte offset just past the first `*/` in `text`.
pub fn find_comment_end(text: &str) -> Option<usize> {
    text.find("*/").map(|i| i + 2)
}

/// Byte offset of the first `"` in `text` that is not part of a doubled `""` escape.
pub fn find_closing_quote(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            if bytes.get(i + 1) == Some(&b'"') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}
