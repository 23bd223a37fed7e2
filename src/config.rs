//! Configuration loader for pqgrammar.
//!
//! `defaults/pqgrammar.default.toml` is embedded into the crate so that the documented defaults
//! and runtime behavior stay in sync. Callers layer user files and key overrides on top of those
//! defaults via [`Loader`] before deserializing into [`AppConfig`].

use crate::grammar::{Grammar, GrammarError};
use crate::reconcile::OffsetCheck;
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/pqgrammar.default.toml");

/// Picked up from the working directory when no configuration file is given explicitly.
pub const LOCAL_CONFIG_FILE: &str = "pqgrammar.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub grammar: GrammarConfig,
    pub incremental: IncrementalConfig,
    pub logging: LoggingConfig,
}

/// Which grammar artifact to load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrammarConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl GrammarConfig {
    /// Load the configured artifact, or the bundled one when no path is set.
    pub fn load(&self) -> Result<Grammar, GrammarError> {
        match &self.path {
            Some(path) => Grammar::from_path(path),
            None => Grammar::builtin(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncrementalConfig {
    pub check_offsets: bool,
}

impl IncrementalConfig {
    pub fn offset_check(&self) -> OffsetCheck {
        OffsetCheck::from_flag(self.check_offsets)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<AppConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.grammar.path.is_none());
        assert!(!config.incremental.check_offsets);
        assert_eq!(config.incremental.offset_check(), OffsetCheck::CountOnly);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_supports_overrides() {
        let config = Loader::new()
            .set_override("incremental.check_offsets", true)
            .expect("override to apply")
            .set_override("grammar.path", "custom.YAML-tmLanguage")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.incremental.offset_check(), OffsetCheck::Raw);
        assert_eq!(
            config.grammar.path.as_deref(),
            Some(Path::new("custom.YAML-tmLanguage"))
        );
    }

    #[test]
    fn test_missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("does/not/exist.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_optional_file_is_layered_when_present() {
        let path = std::env::temp_dir().join(format!("pqgrammar-{}.toml", std::process::id()));
        std::fs::write(&path, "[incremental]\ncheck_offsets = true\n").unwrap();

        let config = Loader::new().with_optional_file(&path).build();
        std::fs::remove_file(&path).unwrap();

        let config = config.expect("config to build");
        assert_eq!(config.incremental.offset_check(), OffsetCheck::Raw);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = Loader::new().with_file("does/not/exist.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_default_grammar_is_bundled() {
        let config = load_defaults().expect("defaults to deserialize");
        let grammar = config.grammar.load().expect("bundled grammar to load");
        assert_eq!(grammar.scope_name(), "source.powerquery");
    }
}
