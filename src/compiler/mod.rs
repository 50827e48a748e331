//! Tokenizer pattern compiler.
//!
//! Compilation turns a pattern string into a [`Pattern`] of alternating
//! delimiter and key segments and then into an immutable [`Dissector`]. It is
//! the only stage that can fail for structural reasons; a compiled pattern can
//! fail to match an input, but never fails to run.
//!
//! The compiler is organized into:
//! - [`parser`] - splitting the pattern and parsing placeholder modifiers
//! - this module - structural validation and lowering into segments
//!
//! # Examples
//!
//! ```rust
//! use dissect_engine::Compiler;
//!
//! let dissector = Compiler::compile("%{ts} %{level} %{msg}")?;
//! assert_eq!(dissector.pattern().key_count(), 3);
//! # Ok::<(), dissect_engine::DissectError>(())
//! ```
//!
//! Ambiguous patterns are rejected:
//! ```rust
//! use dissect_engine::Compiler;
//!
//! assert!(Compiler::compile("%{a}%{b}").is_err());
//! ```

pub(crate) mod parser;

use crate::error::{PatternError, Result};
use crate::ir::{Key, KeyMode, Pattern, Segment};
use crate::matcher::Dissector;
use parser::Token;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Entry point for pattern compilation.
pub struct Compiler;

impl Compiler {
    /// Compile a pattern string into a ready-to-use [`Dissector`].
    pub fn compile(pattern: &str) -> Result<Dissector> {
        let segments = Self::lower(pattern)?;
        let dissector = Dissector::from_pattern(pattern.to_string(), Pattern { segments })?;
        debug!(
            pattern,
            keys = dissector.pattern().key_count(),
            "compiled dissect tokenizer"
        );
        Ok(dissector)
    }

    /// Parse and validate a pattern into segments without building searchers.
    pub fn lower(pattern: &str) -> std::result::Result<Vec<Segment>, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }

        let tokens = parser::tokenize(pattern)?;
        let mut segments: Vec<Segment> = Vec::with_capacity(tokens.len());
        let mut pending_elastic = false;

        for token in tokens {
            match token {
                Token::Literal(text) => {
                    segments.push(Segment::Delimiter {
                        text: text.to_string(),
                        elastic: pending_elastic,
                    });
                    pending_elastic = false;
                }
                Token::Placeholder { body, .. } => {
                    let key = parser::parse_placeholder(body)?;
                    if let Some(Segment::Key(previous)) = segments.last() {
                        return Err(PatternError::AdjacentKeys {
                            left: previous.to_string(),
                            right: key.to_string(),
                        });
                    }
                    pending_elastic = key.elastic;
                    segments.push(Segment::Key(key));
                }
            }
        }

        Self::validate_keys(&segments)?;
        Ok(segments)
    }

    fn validate_keys(segments: &[Segment]) -> std::result::Result<(), PatternError> {
        let keys: Vec<&Key> = segments.iter().filter_map(Segment::as_key).collect();
        if keys.is_empty() {
            return Err(PatternError::NoKeys);
        }

        let appended: HashSet<&str> = keys
            .iter()
            .filter(|key| key.mode == KeyMode::Append)
            .map(|key| key.name.as_str())
            .collect();

        let mut plain_seen: HashSet<&str> = HashSet::new();
        let mut indexes_seen: HashMap<&str, HashSet<u32>> = HashMap::new();

        for key in keys {
            match key.mode {
                KeyMode::Plain if !appended.contains(key.name.as_str()) => {
                    if !plain_seen.insert(key.name.as_str()) {
                        return Err(PatternError::DuplicateKey(key.name.clone()));
                    }
                }
                KeyMode::Append => {
                    if let Some(index) = key.append_index {
                        let seen = indexes_seen.entry(key.name.as_str()).or_default();
                        if !seen.insert(index) {
                            return Err(PatternError::DuplicateAppendIndex {
                                key: key.name.clone(),
                                index,
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}
