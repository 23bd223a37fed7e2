//! Errors raised while loading and compiling a grammar artifact.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("failed to read grammar file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("grammar artifact is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid pattern in {location}: {source}")]
    InvalidPattern {
        location: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("{location} includes unknown repository rule '{name}'")]
    UnknownInclude { location: String, name: String },

    #[error("{location} includes '{include}', external grammars are not supported")]
    UnsupportedInclude { location: String, include: String },

    #[error("{location} has a begin pattern but no end pattern")]
    MissingEnd { location: String },

    #[error("{location} has no match, begin, include or patterns")]
    EmptyRule { location: String },

    #[error("{location} has invalid capture key '{key}'")]
    InvalidCaptureKey { location: String, key: String },
}
