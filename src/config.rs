//! Configuration for the dissect processor.
//!
//! A [`DissectConfig`] is an immutable, validated value: the tokenizer is
//! already compiled and the trim mode already parsed, so holding one means the
//! processor can start. Configurations are built either with
//! [`DissectConfig::new`] plus `with_*` setters or decoded from YAML.
//!
//! # Options
//!
//! | Option | Type | Default | Effect |
//! |--------|------|---------|--------|
//! | `tokenizer` | pattern | required | compiled into the [`Dissector`] |
//! | `field` | string | `message` | event field read as input |
//! | `target_prefix` | string | `dissect` | prefix for extracted keys |
//! | `ignore_failure` | bool | `false` | suppress per-event errors |
//! | `overwrite_keys` | bool | `false` | allow replacing existing fields |
//! | `trim_values` | `none`/`left`/`right`/`all` | `none` | trim policy |
//! | `trim_chars` | string | `" "` | characters to trim |
//!
//! # Examples
//!
//! ```rust
//! use dissect_engine::{DissectConfig, TrimMode};
//!
//! let config = DissectConfig::new("%{ts} %{level} %{msg}")?
//!     .with_field("log.original")
//!     .with_target_prefix("")
//!     .with_trim(TrimMode::All, " ");
//! assert_eq!(config.field(), "log.original");
//!
//! let from_yaml = DissectConfig::from_yaml(
//!     r#"
//! tokenizer: "%{ts} %{level} %{msg}"
//! trim_values: both
//! "#,
//! )?;
//! assert_eq!(from_yaml.target_prefix(), "dissect");
//! assert_eq!(from_yaml.trim_values(), TrimMode::All);
//! # Ok::<(), dissect_engine::DissectError>(())
//! ```

use crate::error::Result;
use crate::matcher::Dissector;
use crate::trim::{TrimMode, Trimmer};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_FIELD: &str = "message";
pub const DEFAULT_TARGET_PREFIX: &str = "dissect";
pub const DEFAULT_TRIM_CHARS: &str = " ";

/// Validated processor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DissectConfig {
    tokenizer: Dissector,
    field: String,
    target_prefix: String,
    ignore_failure: bool,
    overwrite_keys: bool,
    trim_values: TrimMode,
    trim_chars: String,
    trimmer: Trimmer,
}

impl DissectConfig {
    /// Compile `tokenizer` and fill every other option with its default.
    pub fn new(tokenizer: &str) -> Result<Self> {
        Ok(Self::with_dissector(Dissector::new(tokenizer)?))
    }

    /// Build a default configuration around an already compiled dissector.
    pub fn with_dissector(tokenizer: Dissector) -> Self {
        Self {
            tokenizer,
            field: DEFAULT_FIELD.to_string(),
            target_prefix: DEFAULT_TARGET_PREFIX.to_string(),
            ignore_failure: false,
            overwrite_keys: false,
            trim_values: TrimMode::None,
            trim_chars: DEFAULT_TRIM_CHARS.to_string(),
            trimmer: Trimmer::new(TrimMode::None, DEFAULT_TRIM_CHARS),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn with_target_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.target_prefix = prefix.into();
        self
    }

    pub fn with_ignore_failure(mut self, ignore_failure: bool) -> Self {
        self.ignore_failure = ignore_failure;
        self
    }

    pub fn with_overwrite_keys(mut self, overwrite_keys: bool) -> Self {
        self.overwrite_keys = overwrite_keys;
        self
    }

    pub fn with_trim(mut self, mode: TrimMode, chars: impl Into<String>) -> Self {
        self.trim_values = mode;
        self.trim_chars = chars.into();
        self.trimmer = Trimmer::new(mode, &self.trim_chars);
        self
    }

    /// Decode a YAML mapping of options and validate it.
    ///
    /// Unknown options are rejected, as are unrecognized `trim_values`.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(yaml)?;
        raw.validate()
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    pub fn tokenizer(&self) -> &Dissector {
        &self.tokenizer
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn target_prefix(&self) -> &str {
        &self.target_prefix
    }

    pub fn ignore_failure(&self) -> bool {
        self.ignore_failure
    }

    pub fn overwrite_keys(&self) -> bool {
        self.overwrite_keys
    }

    pub fn trim_values(&self) -> TrimMode {
        self.trim_values
    }

    pub fn trim_chars(&self) -> &str {
        &self.trim_chars
    }

    pub fn trimmer(&self) -> &Trimmer {
        &self.trimmer
    }
}

/// Options exactly as written in a configuration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    tokenizer: String,
    #[serde(default = "default_field")]
    field: String,
    #[serde(default = "default_target_prefix")]
    target_prefix: String,
    #[serde(default)]
    ignore_failure: bool,
    #[serde(default)]
    overwrite_keys: bool,
    #[serde(default)]
    trim_values: String,
    #[serde(default = "default_trim_chars")]
    trim_chars: String,
}

impl RawConfig {
    fn validate(self) -> Result<DissectConfig> {
        let trim_values: TrimMode = self.trim_values.parse()?;
        Ok(DissectConfig::new(&self.tokenizer)?
            .with_field(self.field)
            .with_target_prefix(self.target_prefix)
            .with_ignore_failure(self.ignore_failure)
            .with_overwrite_keys(self.overwrite_keys)
            .with_trim(trim_values, self.trim_chars))
    }
}

fn default_field() -> String {
    DEFAULT_FIELD.to_string()
}

fn default_target_prefix() -> String {
    DEFAULT_TARGET_PREFIX.to_string()
}

fn default_trim_chars() -> String {
    DEFAULT_TRIM_CHARS.to_string()
}
