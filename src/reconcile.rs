//! Token reconciliation
//!
//! Proves that the grammar and the reference lexer tokenize the same text the same way.
//!
//! Pipeline:
//!     source text
//!         -> grammar tokenizer, reference lexer (independently)
//!         -> normalization (grammar side only, normalization.rs)
//!         -> comparison (comparison.rs), translating reference kinds into expected scope
//!            labels through the classification table (classification.rs)
//!
//! Two modes: single-line scenarios require full equivalence ([Reconciler::reconcile_line]);
//! multi-line documents are reconciled line by line (incremental.rs), where only token counts
//! are compared unless raw offset checking is switched on.

pub mod classification;
pub mod comparison;
pub mod error;
pub mod incremental;
pub mod normalization;
pub mod reconciler;
pub mod scopes;

pub use classification::{ClassificationTable, ExpectedScope, STANDARD_ENTRIES};
pub use comparison::TokenComparer;
pub use error::{
    Construct, EquivalenceFault, MappingError, NormalizeError, ReconcileError, TokenMismatch,
};
pub use incremental::{IncrementalReconciler, OffsetCheck, StepReport};
pub use normalization::normalize;
pub use reconciler::{LineReport, Reconciler};
