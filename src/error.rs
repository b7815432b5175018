//! Error types. One enum per concern, `thiserror` only.
//!
//! None of these escape the public `verify`/`evaluate`/`validate` entry points;
//! analyzers convert them into failure reports.

/// Errors raised while loading or validating a [`crate::Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid value for {field}: {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Lexicon(#[from] LexiconError),
}

/// Errors raised while compiling lexicon tables into patterns.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("lexicon list '{list}' produced an invalid pattern: {source}")]
    InvalidPattern {
        list: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Faults inside a single analysis call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("input is {len} bytes, limit is {max}")]
    InputTooLarge { len: usize, max: usize },

    #[error("metric '{0}' evaluated to a non-finite value")]
    NonFiniteMetric(&'static str),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
