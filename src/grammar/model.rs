//! Raw grammar model
//!
//! Serde mirror of the TextMate rule file as it is written on disk. Nothing here is validated
//! beyond what serde checks; [compile](super::compile) turns it into something runnable.
//!
//! Only the keys the tokenizer understands are modelled. Unknown keys (`uuid`, `comment`,
//! `foldingStartMarker`, ...) are ignored.

use super::error::GrammarError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Capture map keyed by group index (`'0'`, `1`, ...).
pub type RawCaptures = BTreeMap<CaptureKey, RawCapture>;

/// Top-level grammar document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGrammar {
    #[serde(default)]
    pub name: Option<String>,
    pub scope_name: String,
    #[serde(default)]
    pub file_types: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<RawRule>,
    #[serde(default)]
    pub repository: BTreeMap<String, RawRule>,
}

impl RawGrammar {
    pub fn from_yaml_str(text: &str) -> Result<Self, GrammarError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GrammarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }
}

/// A single rule in either `patterns` or `repository`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRule {
    pub name: Option<String>,
    pub content_name: Option<String>,
    #[serde(rename = "match")]
    pub match_: Option<String>,
    pub begin: Option<String>,
    pub end: Option<String>,
    pub captures: RawCaptures,
    pub begin_captures: RawCaptures,
    pub end_captures: RawCaptures,
    pub patterns: Vec<RawRule>,
    pub include: Option<String>,
    pub apply_end_pattern_last: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCapture {
    pub name: Option<String>,
}

/// Capture group key. YAML happily parses `1:` as an integer and `'1':` as a string, and
/// grammars in the wild use both.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(from = "KeyRepr")]
pub struct CaptureKey(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyRepr {
    Index(u64),
    Text(String),
}

impl From<KeyRepr> for CaptureKey {
    fn from(repr: KeyRepr) -> Self {
        match repr {
            KeyRepr::Index(index) => CaptureKey(index.to_string()),
            KeyRepr::Text(text) => CaptureKey(text),
        }
    }
}

impl fmt::Display for CaptureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_match_and_begin_rules() {
        let grammar = RawGrammar::from_yaml_str(
            r#"
scopeName: source.test
patterns:
  - include: '#word'
repository:
  word:
    match: '[a-z]+'
    name: entity.name.test
  block:
    begin: '\('
    end: '\)'
    applyEndPatternLast: true
"#,
        )
        .unwrap();

        assert_eq!(grammar.scope_name, "source.test");
        assert_eq!(grammar.patterns.len(), 1);
        assert_eq!(grammar.patterns[0].include.as_deref(), Some("#word"));
        assert_eq!(
            grammar.repository["word"].match_.as_deref(),
            Some("[a-z]+")
        );
        assert!(grammar.repository["block"].apply_end_pattern_last);
    }

    #[test]
    fn test_capture_keys_accept_integers_and_strings() {
        let grammar = RawGrammar::from_yaml_str(
            r#"
scopeName: source.test
patterns:
  - match: '(a)(b)'
    captures:
      '0': { name: whole.test }
      1: { name: first.test }
      '2': { name: second.test }
"#,
        )
        .unwrap();

        let keys: Vec<String> = grammar.patterns[0]
            .captures
            .keys()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(keys, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_missing_scope_name_is_rejected() {
        let result = RawGrammar::from_yaml_str("patterns: []");
        assert!(matches!(result, Err(GrammarError::Yaml(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let result = RawGrammar::from_path("does/not/exist.YAML-tmLanguage");
        match result {
            Err(GrammarError::Io { path, .. }) => {
                assert!(path.ends_with("exist.YAML-tmLanguage"))
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
