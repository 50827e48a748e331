//! Intermediate representation of a compiled tokenizer pattern.
//!
//! The compiler lowers a pattern string into a flat list of [`Segment`]s that
//! alternate between literal delimiters and keys. The matcher walks this list
//! once per input.

use std::fmt;

/// How a captured value is routed once a key segment has consumed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyMode {
    /// `%{name}`: emitted under its own name.
    Plain,
    /// `%{}`: consumed and discarded.
    AnonymousSkip,
    /// `%{?name}`: kept only in the per-call side table.
    NamedSkip,
    /// `%{+name}` / `%{+name/N}`: joined onto earlier values of the same key.
    Append,
    /// `%{&name}`: emitted under the side-table value captured by `?name`.
    Indirect,
}

impl KeyMode {
    /// Whether values captured in this mode end up in the extraction result.
    pub fn is_emitted(self) -> bool {
        matches!(self, KeyMode::Plain | KeyMode::Append | KeyMode::Indirect)
    }

    pub(crate) fn prefix(self) -> &'static str {
        match self {
            KeyMode::Plain | KeyMode::AnonymousSkip => "",
            KeyMode::NamedSkip => "?",
            KeyMode::Append => "+",
            KeyMode::Indirect => "&",
        }
    }
}

/// A key placeholder after modifier parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub name: String,
    pub mode: KeyMode,
    pub append_index: Option<u32>,
    /// Set by a trailing `->`: the delimiter after this key absorbs repeats.
    pub elastic: bool,
}

impl Key {
    pub fn new(name: impl Into<String>, mode: KeyMode) -> Self {
        Self {
            name: name.into(),
            mode,
            append_index: None,
            elastic: false,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{{{}{}", self.mode.prefix(), self.name)?;
        if let Some(index) = self.append_index {
            write!(f, "/{index}")?;
        }
        if self.elastic {
            f.write_str("->")?;
        }
        f.write_str("}")
    }
}

/// One unit of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Delimiter { text: String, elastic: bool },
    Key(Key),
}

impl Segment {
    pub fn delimiter(text: impl Into<String>) -> Self {
        Segment::Delimiter {
            text: text.into(),
            elastic: false,
        }
    }

    pub fn as_key(&self) -> Option<&Key> {
        match self {
            Segment::Key(key) => Some(key),
            Segment::Delimiter { .. } => None,
        }
    }

    pub fn delimiter_text(&self) -> Option<&str> {
        match self {
            Segment::Delimiter { text, .. } => Some(text),
            Segment::Key(_) => None,
        }
    }
}

/// Ordered segments produced by compilation. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub(crate) segments: Vec<Segment>,
}

impl Pattern {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.segments.iter().filter_map(Segment::as_key)
    }

    pub fn key_count(&self) -> usize {
        self.keys().count()
    }
}
