//! Engine configuration loaded from TOML.
//!
//! Only word lists and input limits are configurable. Score thresholds and
//! category weights are fixed in each analyzer.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::lexicon::{Lexicon, LexiconTables};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Reject inputs longer than this many bytes. Unlimited when unset.
    pub max_text_bytes: Option<usize>,
}

/// Top-level configuration.
///
/// ```toml
/// [lexicon]
/// strongly_positive = ["amazing", "stellar"]
///
/// [limits]
/// max_text_bytes = 200000
/// ```
///
/// Lists left out of `[lexicon]` keep their built-in values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lexicon: LexiconTables,
    pub limits: Limits,
}

impl Config {
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Self::parse(toml_str, "<string>")
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        tracing::debug!(origin, "loaded engine config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_text_bytes == Some(0) {
            return Err(ConfigError::Validation {
                field: "limits.max_text_bytes".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Compile the configured tables into the shared lexicon.
    pub fn build_lexicon(&self) -> Result<Arc<Lexicon>, ConfigError> {
        Ok(Arc::new(Lexicon::from_tables(&self.lexicon)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_lexicon_override_keeps_other_lists() {
        let config = Config::from_toml(
            r#"
            [lexicon]
            strongly_positive = ["stellar"]
            "#,
        )
        .unwrap();
        assert_eq!(config.lexicon.strongly_positive, vec!["stellar".to_string()]);
        assert_eq!(
            config.lexicon.strongly_negative,
            LexiconTables::default().strongly_negative
        );
    }

    #[test]
    fn states_table_accepts_missing_abbreviation() {
        let config = Config::from_toml(
            r#"
            [[lexicon.states]]
            name = "Ohio"

            [[lexicon.states]]
            name = "Oregon"
            abbreviation = "Ore."
            "#,
        )
        .unwrap();
        assert_eq!(config.lexicon.states.len(), 2);
        assert_eq!(config.lexicon.states[0].abbreviation, None);
    }

    #[test]
    fn zero_byte_limit_is_rejected() {
        let err = Config::from_toml("[limits]\nmax_text_bytes = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn malformed_toml_reports_origin() {
        let err = Config::from_toml("[limits\n").unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, "<string>"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_pattern_surfaces_as_lexicon_error() {
        let config = Config::from_toml(
            r#"
            [lexicon]
            attribution_patterns = ["(unclosed"]
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.build_lexicon(),
            Err(ConfigError::Lexicon(_))
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = Config::load(Path::new("/nonexistent/copydesk.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
