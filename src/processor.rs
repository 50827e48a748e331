//! Per-event field adapter around a [`Dissector`].
//!
//! [`DissectProcessor::run`] reads the configured source field, dissects it,
//! trims the values and writes them back under the target prefix. Writes are
//! all-or-nothing: every destination is checked against the event and against
//! the other destinations of the same result before the first field is
//! written.
//!
//! # Examples
//!
//! ```rust
//! use dissect_engine::{DissectConfig, DissectProcessor};
//! use serde_json::json;
//!
//! let processor = DissectProcessor::new(DissectConfig::new("%{ts} %{level} %{msg}")?);
//! let mut event = json!({"message": "2024-01-01 ERROR boom"});
//!
//! processor.run(&mut event)?;
//! assert_eq!(event["dissect"]["level"], json!("ERROR"));
//! # Ok::<(), dissect_engine::DissectError>(())
//! ```

use crate::config::DissectConfig;
use crate::error::{DissectError, Result};
use crate::event::{type_name, Event};
use crate::matcher::ExtractionResult;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Applies a dissect configuration to events.
#[derive(Debug, Clone)]
pub struct DissectProcessor {
    config: DissectConfig,
}

impl DissectProcessor {
    pub fn new(config: DissectConfig) -> Self {
        debug!(
            tokenizer = config.tokenizer().raw(),
            field = config.field(),
            target_prefix = config.target_prefix(),
            "created dissect processor"
        );
        Self { config }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(Self::new(DissectConfig::from_yaml(yaml)?))
    }

    pub fn config(&self) -> &DissectConfig {
        &self.config
    }

    /// Dissect the source field of `event` and merge the result into it.
    ///
    /// With `ignore_failure` set, every per-event error leaves the event
    /// untouched and `Ok(())` is returned. Otherwise the first error is
    /// returned and the event is still untouched.
    pub fn run<E: Event + ?Sized>(&self, event: &mut E) -> Result<()> {
        match self.apply(event) {
            Err(err) if self.config.ignore_failure() && err.is_runtime() => Ok(()),
            other => other,
        }
    }

    /// Extract the trimmed fields from `event` without modifying it.
    pub fn extract<E: Event + ?Sized>(&self, event: &E) -> Result<ExtractionResult> {
        let field = self.config.field();
        let text = match event.get_field(field) {
            Some(Value::String(text)) => text,
            Some(other) => {
                return Err(DissectError::TypeMismatch {
                    field: field.to_string(),
                    found: type_name(other).to_string(),
                })
            }
            None => return Err(DissectError::MissingField(field.to_string())),
        };

        self.config
            .tokenizer()
            .dissect_trimmed(text, self.config.trimmer())
    }

    /// Destination event key for an extracted key.
    pub fn destination(&self, key: &str) -> String {
        let prefix = self.config.target_prefix();
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    }

    fn apply<E: Event + ?Sized>(&self, event: &mut E) -> Result<()> {
        let result = self.extract(event)?;
        let writes: Vec<(String, String)> = result
            .into_iter()
            .map(|(key, value)| (self.destination(&key), value))
            .collect();

        if !self.config.overwrite_keys() {
            for (i, (key, _)) in writes.iter().enumerate() {
                let clobbers_earlier = writes[..i]
                    .iter()
                    .any(|(earlier, _)| event.overlaps(earlier, key));
                if clobbers_earlier || event.collides(key) {
                    return Err(DissectError::KeyCollision(key.clone()));
                }
            }
        }

        for (key, value) in writes {
            event.put_field(&key, Value::String(value));
        }
        Ok(())
    }
}

impl fmt::Display for DissectProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dissect={},field={},target_prefix={}",
            self.config.tokenizer().raw(),
            self.config.field(),
            self.config.target_prefix()
        )
    }
}
