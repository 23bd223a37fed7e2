//! Reference lexer
//!
//! Hand-written lexer for Power Query / M used as the reference the grammar's output is
//! checked against.
//!
//! Structure:
//!     1. Core tokenization with logos, one line at a time (tokens_core.rs)
//!     2. Line modes: constructs that cross a line break (block comments, text literals,
//!        quoted identifiers) are tracked as a [LineMode] threaded from line to line
//!        (line_lexer.rs)
//!     3. Incremental state: lines are appended one by one and the tokens they produce are
//!        accumulated with document-relative positions (state.rs)
//!
//! The lexer only classifies; it never validates the expression structure.

pub mod error;
pub mod kinds;
pub mod line_lexer;
pub mod state;
pub mod tokens_core;

pub use error::LexError;
pub use kinds::LineTokenKind;
pub use line_lexer::{lex_line, LexedLine, LineMode, LineToken};
pub use state::{LexerState, ReferenceToken};
