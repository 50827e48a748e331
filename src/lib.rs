//! # Dissect Engine
//!
//! Field extraction for event pipelines using a compact, non-regex pattern
//! language. A pattern such as `%{ts} %{level} %{msg}` is compiled once into an
//! immutable [`Dissector`], which then splits input strings into named fields
//! in a single linear, non-backtracking pass.
//!
//! ## Pattern Language
//!
//! | Placeholder | Meaning |
//! |-------------|---------|
//! | `%{name}` | capture into `name` |
//! | `%{}` | skip the value |
//! | `%{?name}` / `%{*name}` | capture into the side table only |
//! | `%{&name}` | capture under the key named by the value of `%{?name}` |
//! | `%{+name}` / `%{+name/N}` | append to `name`, optionally at position `N` |
//! | `%{name->}` | the following delimiter absorbs repeated occurrences |
//!
//! Ambiguous patterns (two placeholders with no delimiter between them, among
//! others) are rejected at compile time.
//!
//! ## Quick Start
//!
//! ```rust
//! use dissect_engine::Dissector;
//!
//! let dissector = Dissector::new("%{ts} %{level} %{msg}")?;
//! let result = dissector.dissect("2024-01-01 ERROR boom")?;
//! assert_eq!(result.get("msg"), Some("boom"));
//! # Ok::<(), dissect_engine::DissectError>(())
//! ```
//!
//! ## Processing Events
//!
//! ```rust
//! use dissect_engine::DissectProcessor;
//! use serde_json::json;
//!
//! let processor = DissectProcessor::from_yaml(
//!     r#"
//! tokenizer: "%{client} - %{?user_field}=%{&user_field}"
//! trim_values: all
//! "#,
//! )?;
//!
//! let mut event = json!({"message": "10.0.0.1 - user=alice"});
//! processor.run(&mut event)?;
//! assert_eq!(event["dissect"]["client"], json!("10.0.0.1"));
//! assert_eq!(event["dissect"]["user"], json!("alice"));
//! # Ok::<(), dissect_engine::DissectError>(())
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod event;
pub mod ir;
pub mod matcher;
pub mod processor;
pub mod trim;

pub use compiler::Compiler;
pub use config::DissectConfig;
pub use error::{DissectError, PatternError, Result};
pub use event::Event;
pub use ir::{Key, KeyMode, Pattern, Segment};
pub use matcher::{Dissector, ExtractionResult};
pub use processor::DissectProcessor;
pub use trim::{TrimMode, Trimmer};
