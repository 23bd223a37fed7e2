//! Token normalization
//!
//! Rewrites the grammar's raw tokens for one line into one token per logical unit, the
//! granularity the reference lexer reports at.
//!
//! Rules, applied left to right:
//!     1. Tokens carrying only the root scope are whitespace and are dropped.
//!     2. A quoted identifier opener merges with exactly the next two tokens: the identifier
//!        content (whose scopes the merged token takes) and the closer.
//!     3. A string opener merges forward through every string-labelled token up to the string
//!        closer. The merged token is labelled `[root, string.quoted.double.powerquery]`.
//!     4. A block comment token merges with the positionally contiguous comment tokens after
//!        it, stopping after the comment closer. A comment still open at the end of the line is
//!        not a fault; it continues on the next line.
//!     5. Everything else passes through.
//!
//! Merged tokens are flagged, and a flagged token is never merged again, which makes
//! normalizing a normalized stream a no-op.

use super::error::{Construct, NormalizeError};
use super::scopes::{
    BLOCK_COMMENT, BLOCK_COMMENT_END, IDENTIFIER, QUOTED_IDENTIFIER_BEGIN, QUOTED_IDENTIFIER_END,
    STRING, STRING_BEGIN, STRING_END,
};
use crate::grammar::GrammarToken;

pub fn normalize(tokens: &[GrammarToken]) -> Result<Vec<GrammarToken>, NormalizeError> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];

        if token.scopes.len() <= 1 {
            i += 1;
            continue;
        }
        if token.merged {
            out.push(token.clone());
            i += 1;
            continue;
        }

        let (merged, next) = if token.has_scope(QUOTED_IDENTIFIER_BEGIN) {
            merge_quoted_identifier(tokens, i)?
        } else if token.has_scope(STRING_BEGIN) {
            merge_string(tokens, i)?
        } else if token.has_scope(BLOCK_COMMENT) {
            merge_block_comment(tokens, i)
        } else {
            out.push(token.clone());
            i += 1;
            continue;
        };

        tracing::trace!(
            from = i,
            to = next,
            span = ?merged.range(),
            "merged tokens"
        );
        out.push(merged);
        i = next;
    }

    tracing::debug!(raw = tokens.len(), normalized = out.len(), "normalized line");
    Ok(out)
}

fn merge_quoted_identifier(
    tokens: &[GrammarToken],
    at: usize,
) -> Result<(GrammarToken, usize), NormalizeError> {
    let content = expect_next(tokens, at, at + 1, Construct::QuotedIdentifier, IDENTIFIER, |t| {
        t.innermost() == Some(IDENTIFIER)
    })?;
    let closer = expect_next(
        tokens,
        at,
        at + 2,
        Construct::QuotedIdentifier,
        QUOTED_IDENTIFIER_END,
        |t| t.has_scope(QUOTED_IDENTIFIER_END),
    )?;

    let merged = GrammarToken {
        start: tokens[at].start,
        end: closer.end,
        scopes: content.scopes.clone(),
        merged: true,
    };
    Ok((merged, at + 3))
}

fn merge_string(
    tokens: &[GrammarToken],
    at: usize,
) -> Result<(GrammarToken, usize), NormalizeError> {
    let opener = &tokens[at];
    let mut index = at + 1;

    loop {
        let token = tokens.get(index).ok_or(NormalizeError::Exhausted {
            construct: Construct::String,
            opened_at: at,
            expected: STRING_END,
        })?;

        if token.has_scope(STRING_END) {
            let root = opener.scopes.first().cloned().unwrap_or_default();
            let merged = GrammarToken {
                start: opener.start,
                end: token.end,
                scopes: vec![root, STRING.to_string()],
                merged: true,
            };
            return Ok((merged, index + 1));
        }
        if !token.has_scope(STRING) {
            return Err(mislabeled(Construct::String, at, index, STRING, token));
        }
        index += 1;
    }
}

/// Never fails: a comment may continue past the end of the line.
fn merge_block_comment(tokens: &[GrammarToken], at: usize) -> (GrammarToken, usize) {
    let first = &tokens[at];
    let mut end = first.end;
    let mut next = at + 1;

    if !first.has_scope(BLOCK_COMMENT_END) {
        while let Some(token) = tokens.get(next) {
            if token.merged || token.start != end || !token.has_scope(BLOCK_COMMENT) {
                break;
            }
            end = token.end;
            next += 1;
            if token.has_scope(BLOCK_COMMENT_END) {
                break;
            }
        }
    }

    // Keep the opener's scopes down to the comment label. A line that starts on the closer
    // would otherwise report the closer's punctuation label for the whole comment.
    let mut scopes = first.scopes.clone();
    if let Some(pos) = scopes.iter().position(|s| s == BLOCK_COMMENT) {
        scopes.truncate(pos + 1);
    }

    let merged = GrammarToken {
        start: first.start,
        end,
        scopes,
        merged: true,
    };
    (merged, next)
}

fn expect_next<'t>(
    tokens: &'t [GrammarToken],
    opened_at: usize,
    index: usize,
    construct: Construct,
    expected: &'static str,
    accept: impl Fn(&GrammarToken) -> bool,
) -> Result<&'t GrammarToken, NormalizeError> {
    let token = tokens.get(index).ok_or(NormalizeError::Exhausted {
        construct,
        opened_at,
        expected,
    })?;
    if accept(token) {
        Ok(token)
    } else {
        Err(mislabeled(construct, opened_at, index, expected, token))
    }
}

fn mislabeled(
    construct: Construct,
    opened_at: usize,
    index: usize,
    expected: &'static str,
    token: &GrammarToken,
) -> NormalizeError {
    NormalizeError::Mislabeled {
        construct,
        opened_at,
        index,
        expected,
        found: token.scopes.join(" "),
    }
}
