//! Non-backtracking dissect matcher.
//!
//! A [`Dissector`] is the compiled, immutable form of a tokenizer pattern.
//! Matching is a single left-to-right pass over the input:
//!
//! - a delimiter must appear at the current position (elastic delimiters also
//!   swallow any immediate repeats);
//! - a key captures everything up to the next occurrence of the delimiter
//!   that follows it, or the whole remainder when it is the last segment.
//!
//! Each delimiter gets a precompiled searcher at build time, so a match costs
//! one scan of the input. Captures are borrowed slices of the input; owned
//! strings are only built for the final [`ExtractionResult`].
//!
//! ## Example Usage
//!
//! ```rust
//! use dissect_engine::Dissector;
//!
//! let dissector = Dissector::new("%{ts} %{level} %{msg}")?;
//! let result = dissector.dissect("2024-01-01 ERROR boom")?;
//!
//! assert_eq!(result.get("ts"), Some("2024-01-01"));
//! assert_eq!(result.get("level"), Some("ERROR"));
//! assert_eq!(result.get("msg"), Some("boom"));
//! # Ok::<(), dissect_engine::DissectError>(())
//! ```

pub mod result;

pub use result::ExtractionResult;

use crate::compiler::Compiler;
use crate::error::{DissectError, PatternError, Result};
use crate::ir::{KeyMode, Pattern, Segment};
use crate::trim::Trimmer;
use aho_corasick::AhoCorasick;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

const END_OF_INPUT: &str = "<end of input>";

#[derive(Debug, Clone)]
struct CompiledDelimiter {
    text: String,
    elastic: bool,
    searcher: AhoCorasick,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    /// Consume a delimiter at the current position.
    Literal(usize),
    /// Capture key `key` up to delimiter `until`, or to the end of input.
    Capture { key: usize, until: Option<usize> },
}

#[derive(Debug, Clone)]
struct Member {
    key: usize,
    /// Delimiter joined in front of this value when it is not the first.
    separator: Option<usize>,
}

/// One output entry of the extraction result, in first-appearance order.
#[derive(Debug, Clone)]
enum Slot {
    Named { name: String, members: Vec<Member> },
    Indirect {
        reference: String,
        side: Option<usize>,
        key: usize,
    },
}

/// A compiled tokenizer pattern.
///
/// `Dissector` holds no interior mutability; it is `Send + Sync` and can be
/// shared by any number of threads matching different inputs.
#[derive(Debug, Clone)]
pub struct Dissector {
    raw: String,
    pattern: Pattern,
    delimiters: Vec<CompiledDelimiter>,
    steps: Vec<Step>,
    key_count: usize,
    /// (key, side table index) for every named skip.
    side_routes: Vec<(usize, usize)>,
    side_len: usize,
    slots: Vec<Slot>,
}

impl Dissector {
    /// Compile `pattern`. Shorthand for [`Compiler::compile`].
    pub fn new(pattern: &str) -> Result<Self> {
        Compiler::compile(pattern)
    }

    pub(crate) fn from_pattern(raw: String, pattern: Pattern) -> Result<Self> {
        let mut delimiters = Vec::new();
        let mut delimiter_ids = Vec::with_capacity(pattern.segments.len());

        for segment in &pattern.segments {
            match segment {
                Segment::Delimiter { text, elastic } => {
                    let searcher = AhoCorasick::new([text.as_str()])
                        .map_err(|e| PatternError::Searcher(e.to_string()))?;
                    delimiter_ids.push(Some(delimiters.len()));
                    delimiters.push(CompiledDelimiter {
                        text: text.clone(),
                        elastic: *elastic,
                        searcher,
                    });
                }
                Segment::Key(_) => delimiter_ids.push(None),
            }
        }

        let mut steps = Vec::with_capacity(pattern.segments.len());
        let mut side_names: HashMap<String, usize> = HashMap::new();
        let mut side_routes = Vec::new();
        let mut named_slots: HashMap<String, usize> = HashMap::new();
        let mut slots: Vec<Slot> =
            Vec::with_capacity(pattern.keys().filter(|key| key.mode.is_emitted()).count());
        let mut orders: Vec<Vec<u32>> = Vec::new();
        let mut key_count = 0;

        for (position, segment) in pattern.segments.iter().enumerate() {
            let key = match segment {
                Segment::Delimiter { .. } => {
                    if let Some(id) = delimiter_ids[position] {
                        steps.push(Step::Literal(id));
                    }
                    continue;
                }
                Segment::Key(key) => key,
            };

            let preceding = position
                .checked_sub(1)
                .and_then(|previous| delimiter_ids[previous]);
            let following = delimiter_ids.get(position + 1).copied().flatten();
            let id = key_count;
            key_count += 1;
            steps.push(Step::Capture {
                key: id,
                until: following,
            });

            match key.mode {
                KeyMode::AnonymousSkip => {}
                KeyMode::NamedSkip => {
                    let next = side_names.len();
                    let side = *side_names.entry(key.name.clone()).or_insert(next);
                    side_routes.push((id, side));
                }
                KeyMode::Plain | KeyMode::Append => {
                    let slot = *named_slots.entry(key.name.clone()).or_insert_with(|| {
                        slots.push(Slot::Named {
                            name: key.name.clone(),
                            members: Vec::new(),
                        });
                        orders.push(Vec::new());
                        slots.len() - 1
                    });
                    if let (Slot::Named { members, .. }, Some(order)) =
                        (&mut slots[slot], orders.get_mut(slot))
                    {
                        order.push(key.append_index.unwrap_or(members.len() as u32));
                        members.push(Member {
                            key: id,
                            separator: preceding.or(following),
                        });
                    }
                }
                KeyMode::Indirect => {
                    slots.push(Slot::Indirect {
                        reference: key.name.clone(),
                        side: None,
                        key: id,
                    });
                    orders.push(Vec::new());
                }
            }
        }

        for (slot, order) in slots.iter_mut().zip(&orders) {
            match slot {
                Slot::Named { members, .. } => {
                    let mut ranked: Vec<(u32, Member)> =
                        order.iter().copied().zip(members.drain(..)).collect();
                    ranked.sort_by_key(|(rank, _)| *rank);
                    members.extend(ranked.into_iter().map(|(_, member)| member));
                }
                Slot::Indirect {
                    reference, side, ..
                } => *side = side_names.get(reference.as_str()).copied(),
            }
        }

        let side_len = side_names.len();
        Ok(Self {
            raw,
            pattern,
            delimiters,
            steps,
            key_count,
            side_routes,
            side_len,
            slots,
        })
    }

    /// The pattern string this dissector was compiled from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Match `input` and extract its fields without trimming.
    pub fn dissect(&self, input: &str) -> Result<ExtractionResult> {
        self.dissect_trimmed(input, &Trimmer::none())
    }

    /// Match `input`, trim every captured value, then resolve indirect keys.
    ///
    /// Side-table values are trimmed before indirect names are looked up, so
    /// `%{&name}` resolves to the trimmed value of `%{?name}`.
    pub fn dissect_trimmed(&self, input: &str, trimmer: &Trimmer) -> Result<ExtractionResult> {
        let captures = self.capture(input)?;
        self.assemble(&captures, trimmer)
    }

    fn capture<'i>(&self, input: &'i str) -> Result<Vec<&'i str>> {
        let mut captures: Vec<&'i str> = vec![""; self.key_count];
        let mut position = 0;

        for step in &self.steps {
            match *step {
                Step::Literal(id) => {
                    let delimiter = &self.delimiters[id];
                    let text = delimiter.text.as_str();
                    if !input[position..].starts_with(text) {
                        return Err(DissectError::NoMatch {
                            expected: delimiter.text.clone(),
                            offset: position,
                        });
                    }
                    position += text.len();
                    if delimiter.elastic {
                        while input[position..].starts_with(text) {
                            position += text.len();
                        }
                    }
                }
                Step::Capture { key, until: Some(id) } => {
                    let delimiter = &self.delimiters[id];
                    let found = delimiter.searcher.find(&input[position..]).ok_or_else(|| {
                        DissectError::NoMatch {
                            expected: delimiter.text.clone(),
                            offset: position,
                        }
                    })?;
                    let end = position + found.start();
                    captures[key] = &input[position..end];
                    position = end;
                }
                Step::Capture { key, until: None } => {
                    captures[key] = &input[position..];
                    position = input.len();
                }
            }
        }

        if position != input.len() {
            return Err(DissectError::NoMatch {
                expected: END_OF_INPUT.to_string(),
                offset: position,
            });
        }

        Ok(captures)
    }

    fn assemble(&self, captures: &[&str], trimmer: &Trimmer) -> Result<ExtractionResult> {
        let mut side: Vec<Option<&str>> = vec![None; self.side_len];
        for &(key, index) in &self.side_routes {
            side[index] = Some(trimmer.trim(captures[key]));
        }

        let mut result = ExtractionResult::with_capacity(self.slots.len());
        for slot in &self.slots {
            match slot {
                Slot::Named { name, members } => {
                    let mut value = String::new();
                    for (i, member) in members.iter().enumerate() {
                        if i > 0 {
                            if let Some(separator) = member.separator {
                                value.push_str(&self.delimiters[separator].text);
                            }
                        }
                        value.push_str(trimmer.trim(captures[member.key]));
                    }
                    let trimmed = trimmer.trim(&value);
                    if trimmed.len() != value.len() {
                        value = trimmed.to_string();
                    }
                    insert_unique(&mut result, name.clone(), value)?;
                }
                Slot::Indirect {
                    reference,
                    side: index,
                    key,
                } => {
                    let name = (*index)
                        .and_then(|index| side[index])
                        .filter(|name| !name.is_empty())
                        .ok_or_else(|| DissectError::UnresolvedReference(reference.clone()))?;
                    let value = trimmer.trim(captures[*key]).to_string();
                    insert_unique(&mut result, name.to_string(), value)?;
                }
            }
        }

        Ok(result)
    }
}

/// Insert `name` unless another slot already produced it for this input.
fn insert_unique(result: &mut ExtractionResult, name: String, value: String) -> Result<()> {
    if result.contains_key(&name) {
        return Err(DissectError::KeyCollision(name));
    }
    result.insert(name, value);
    Ok(())
}

impl FromStr for Dissector {
    type Err = DissectError;

    fn from_str(pattern: &str) -> Result<Self> {
        Self::new(pattern)
    }
}

impl fmt::Display for Dissector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for Dissector {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}
