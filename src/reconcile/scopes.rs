//! Scope labels of the bundled grammar that reconciliation keys on.

/// Every label defined by the grammar ends with this namespace.
pub const NAMESPACE_SUFFIX: &str = ".powerquery";

pub const STRING: &str = "string.quoted.double.powerquery";
pub const STRING_BEGIN: &str = "punctuation.definition.string.begin.powerquery";
pub const STRING_END: &str = "punctuation.definition.string.end.powerquery";

pub const IDENTIFIER: &str = "entity.name.powerquery";
pub const QUOTED_IDENTIFIER_BEGIN: &str =
    "punctuation.definition.quotedidentifier.begin.powerquery";
pub const QUOTED_IDENTIFIER_END: &str = "punctuation.definition.quotedidentifier.end.powerquery";

pub const BLOCK_COMMENT: &str = "comment.block.powerquery";
pub const BLOCK_COMMENT_END: &str = "punctuation.definition.comment.end.powerquery";
