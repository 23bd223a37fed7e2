//! # pq-tmlanguage
//!
//! A lexical grammar for the Power Query (M) formula language, plus the tooling that proves
//! the grammar tokenizes the same way as a reference lexer.
//!
//! File Layout
//!
//! Two independent tokenizers run side by side over the same source text, and the reconciliation
//! core decides whether they agree. The contract is the same global input (a line or a document of
//! M source) and the same logical token stream out, even though the two designs produce very
//! different raw output: the grammar emits fine-grained tokens with nested scope labels, the
//! reference lexer emits one classified token per lexical unit.
//!
//! src/
//!   ├── grammar      Grammar artifact loading, rule compilation and the line tokenizer
//!   ├── lexing       The reference lexer (logos core tokens + line modes)
//!   ├── reconcile    Normalizer, classification table, comparator, incremental mode
//!   ├── config       Layered configuration
//!   └── testing      Rendering and assertion helpers shared by the test suites
//!
//! For the regression scenarios see `tests/compare_parser_tokens.rs`.

pub mod config;
pub mod grammar;
pub mod lexing;
pub mod reconcile;
pub mod testing;

pub use grammar::{Grammar, GrammarToken, LineTokens, RuleStack};
pub use lexing::{LexerState, LineTokenKind, ReferenceToken};
pub use reconcile::{ClassificationTable, ReconcileError, Reconciler};
