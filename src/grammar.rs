//! Grammar
//!
//! This module owns the pattern side of the reconciliation: the declarative grammar artifact
//! and the line tokenizer that runs it.
//!
//! Structure:
//!     The artifact is a TextMate-style rule file written in YAML (grammar/PowerQuery.YAML-tmLanguage).
//!     It is deserialized into a raw model ([model]), compiled once into an arena of rules with
//!     resolved includes and compiled regexes ([compile]), and then driven line by line by the
//!     tokenizer ([tokenizer]).
//!
//! Continuation
//!
//!     Tokenization is line oriented. Each call returns the tokens of one line together with a
//!     [RuleStack], an opaque continuation value that must be handed back for the next line so
//!     constructs such as block comments and strings can span lines. Callers never look inside it.
//!
//! Sharing
//!
//!     A compiled [Grammar] is immutable and `Send + Sync`. It is loaded once per run and passed by
//!     reference to whoever needs it; there is no global registry.

pub mod compile;
pub mod error;
pub mod model;
pub mod token;
pub mod tokenizer;

pub use compile::{Grammar, RuleId};
pub use error::GrammarError;
pub use model::RawGrammar;
pub use token::GrammarToken;
pub use tokenizer::{LineTokens, RuleStack};

/// The grammar artifact bundled with the crate.
pub const BUILTIN_GRAMMAR: &str = include_str!("../grammar/PowerQuery.YAML-tmLanguage");
