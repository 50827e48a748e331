//! Post-extraction trimming of captured values.

use crate::error::DissectError;
use std::fmt;
use std::str::FromStr;

/// Which side(s) of a value are trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrimMode {
    #[default]
    None,
    Left,
    Right,
    /// Both sides. Accepted as `all` or `both`.
    All,
}

impl TrimMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TrimMode::None => "none",
            TrimMode::Left => "left",
            TrimMode::Right => "right",
            TrimMode::All => "all",
        }
    }
}

impl FromStr for TrimMode {
    type Err = DissectError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "" | "none" => Ok(TrimMode::None),
            "left" => Ok(TrimMode::Left),
            "right" => Ok(TrimMode::Right),
            "all" | "both" => Ok(TrimMode::All),
            _ => Err(DissectError::Config(format!(
                "unsupported value {value}. Must be one of [none, left, right, all]"
            ))),
        }
    }
}

impl fmt::Display for TrimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trim policy: mode plus the set of characters to strip.
///
/// Trimming returns a subslice of its input, so applying it to captured
/// values costs no allocation. It is idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trimmer {
    mode: TrimMode,
    chars: Vec<char>,
}

impl Trimmer {
    pub fn new(mode: TrimMode, chars: &str) -> Self {
        let mut set: Vec<char> = chars.chars().collect();
        set.sort_unstable();
        set.dedup();
        Self { mode, chars: set }
    }

    /// A trimmer that leaves every value untouched.
    pub fn none() -> Self {
        Self::new(TrimMode::None, "")
    }

    pub fn mode(&self) -> TrimMode {
        self.mode
    }

    pub fn is_noop(&self) -> bool {
        self.mode == TrimMode::None || self.chars.is_empty()
    }

    pub fn trim<'a>(&self, value: &'a str) -> &'a str {
        let in_set = |c: char| self.chars.binary_search(&c).is_ok();
        match self.mode {
            TrimMode::None => value,
            TrimMode::Left => value.trim_start_matches(in_set),
            TrimMode::Right => value.trim_end_matches(in_set),
            TrimMode::All => value.trim_start_matches(in_set).trim_end_matches(in_set),
        }
    }
}

impl Default for Trimmer {
    fn default() -> Self {
        Self::none()
    }
}
