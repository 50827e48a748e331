//! Error types for the dissect engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DissectError>;

/// Static errors raised while compiling a tokenizer pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,

    #[error("pattern contains no field placeholders")]
    NoKeys,

    #[error("unterminated placeholder starting at offset {0}")]
    Unterminated(usize),

    #[error("keys '{left}' and '{right}' are adjacent with no delimiter between them")]
    AdjacentKeys { left: String, right: String },

    #[error("placeholder '%{{{0}}}' requires a name")]
    EmptyName(String),

    #[error("invalid append index '{index}' for key '{key}'")]
    InvalidAppendIndex { key: String, index: String },

    #[error("append index {index} is used twice for key '{key}'")]
    DuplicateAppendIndex { key: String, index: u32 },

    #[error("key '{0}' is extracted more than once")]
    DuplicateKey(String),

    #[error("failed to build delimiter searcher: {0}")]
    Searcher(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DissectError {
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("could not find delimiter '{expected}' at offset {offset}")]
    NoMatch { expected: String, offset: usize },

    #[error("unresolved indirect key reference '&{0}'")]
    UnresolvedReference(String),

    #[error("field '{0}' not found")]
    MissingField(String),

    #[error("field '{field}' is not a string, found {found}")]
    TypeMismatch { field: String, found: String },

    #[error("cannot override existing key '{0}'")]
    KeyCollision(String),
}

impl DissectError {
    /// Per-event errors that `ignore_failure` is allowed to suppress.
    pub fn is_runtime(&self) -> bool {
        matches!(
            self,
            DissectError::NoMatch { .. }
                | DissectError::UnresolvedReference(_)
                | DissectError::MissingField(_)
                | DissectError::TypeMismatch { .. }
                | DissectError::KeyCollision(_)
        )
    }
}

impl From<std::io::Error> for DissectError {
    fn from(err: std::io::Error) -> Self {
        DissectError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for DissectError {
    fn from(err: serde_yaml::Error) -> Self {
        DissectError::Config(err.to_string())
    }
}
