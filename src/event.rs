//! Event access used by the dissect processor.
//!
//! The processor only needs three things from an event: read a field, tell
//! whether writing a field would replace existing data, and write a field.
//! [`Event`] captures exactly that, so any pipeline event type can be plugged
//! in.
//!
//! Two implementations ship with the crate:
//!
//! - `serde_json::Map<String, Value>`: flat events; keys are used verbatim.
//! - `serde_json::Value`: nested events; dotted keys such as `dissect.level`
//!   address nested objects.
//!
//! ## Nested Fields (Dot Notation)
//! ```rust
//! use dissect_engine::Event;
//! use serde_json::json;
//!
//! let mut event = json!({"log": {"original": "a b"}});
//! assert_eq!(event.get_field("log.original"), Some(&json!("a b")));
//!
//! event.put_field("dissect.first", json!("a"));
//! assert_eq!(event["dissect"]["first"], json!("a"));
//! ```

use serde_json::{Map, Value};

/// String-keyed value store the processor reads from and writes to.
pub trait Event {
    fn get_field(&self, key: &str) -> Option<&Value>;

    fn has_field(&self, key: &str) -> bool {
        self.get_field(key).is_some()
    }

    /// Whether writing `key` would replace data already held by the event.
    fn collides(&self, key: &str) -> bool {
        self.has_field(key)
    }

    /// Whether writing both `a` and `b` would let one write replace the other.
    fn overlaps(&self, a: &str, b: &str) -> bool {
        a == b
    }

    fn put_field(&mut self, key: &str, value: Value);
}

impl Event for Map<String, Value> {
    fn get_field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn put_field(&mut self, key: &str, value: Value) {
        self.insert(key.to_string(), value);
    }
}

impl Event for Value {
    fn get_field(&self, key: &str) -> Option<&Value> {
        let map = self.as_object()?;
        if let Some(value) = map.get(key) {
            return Some(value);
        }
        if !key.contains('.') {
            return None;
        }

        let mut current = self;
        for part in key.split('.') {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    fn collides(&self, key: &str) -> bool {
        let map = match self.as_object() {
            Some(map) => map,
            None => return true,
        };
        if map.contains_key(key) {
            return true;
        }

        // A scalar anywhere along the path would have to be replaced.
        let mut current = self;
        for part in key.split('.') {
            match current {
                Value::Object(map) => match map.get(part) {
                    Some(child) => current = child,
                    None => return false,
                },
                _ => return true,
            }
        }
        true
    }

    fn overlaps(&self, a: &str, b: &str) -> bool {
        is_path_prefix(a, b) || is_path_prefix(b, a)
    }

    fn put_field(&mut self, key: &str, value: Value) {
        if !self.is_object() {
            *self = Value::Object(Map::new());
        }
        if let Value::Object(map) = self {
            put_path(map, key, value);
        }
    }
}

/// `prefix` equals `path` or names one of its ancestors.
fn is_path_prefix(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

fn put_path(map: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child_map) = child {
                put_path(child_map, rest, value);
            }
        }
    }
}

/// Short type name of a JSON value, used in type mismatch errors.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_event() -> Value {
        serde_json::from_str(
            r#"
{
  "message": "hello",
  "count": 2,
  "nested": {
    "field": "value",
    "deep": {
      "value": "deep_value"
    }
  },
  "dotted.key": "literal"
}
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_simple_field_access() {
        let event = create_test_event();
        assert_eq!(event.get_field("message"), Some(&json!("hello")));
        assert_eq!(event.get_field("count"), Some(&json!(2)));
        assert_eq!(event.get_field("missing"), None);
    }

    #[test]
    fn test_nested_field_access() {
        let event = create_test_event();
        assert_eq!(event.get_field("nested.field"), Some(&json!("value")));
        assert_eq!(
            event.get_field("nested.deep.value"),
            Some(&json!("deep_value"))
        );
        assert_eq!(event.get_field("nested.nonexistent"), None);
        assert_eq!(event.get_field("message.inner"), None);
    }

    #[test]
    fn test_exact_dotted_key_wins() {
        let event = create_test_event();
        assert_eq!(event.get_field("dotted.key"), Some(&json!("literal")));
    }

    #[test]
    fn test_put_creates_intermediate_objects() {
        let mut event = json!({});
        event.put_field("dissect.a", json!("1"));
        event.put_field("dissect.b", json!("2"));
        assert_eq!(event, json!({"dissect": {"a": "1", "b": "2"}}));
    }

    #[test]
    fn test_put_replaces_scalar_parent() {
        let mut event = json!({"dissect": "scalar"});
        event.put_field("dissect.a", json!("1"));
        assert_eq!(event, json!({"dissect": {"a": "1"}}));
    }

    #[test]
    fn test_collides() {
        let event = json!({"dissect": {"a": "1"}, "flat": "x"});
        assert!(event.collides("dissect.a"));
        assert!(event.collides("dissect"));
        assert!(!event.collides("dissect.b"));
        assert!(event.collides("flat.child"));
        assert!(!event.collides("other.child"));
    }

    #[test]
    fn test_nested_paths_overlap() {
        let event = json!({});
        assert!(event.overlaps("d.a", "d.a"));
        assert!(event.overlaps("d.a", "d.a.b"));
        assert!(event.overlaps("d.a.b", "d.a"));
        assert!(!event.overlaps("d.a", "d.ab"));
        assert!(!event.overlaps("d.a", "d.b"));
    }

    #[test]
    fn test_flat_keys_overlap_only_when_equal() {
        let event = Map::new();
        assert!(event.overlaps("d.a", "d.a"));
        assert!(!event.overlaps("d.a", "d.a.b"));
    }

    #[test]
    fn test_flat_map_event() {
        let mut event = Map::new();
        event.insert("message".to_string(), json!("hi"));
        event.put_field("dissect.a", json!("1"));

        assert!(event.has_field("dissect.a"));
        assert!(event.collides("message"));
        assert!(!event.collides("dissect.b"));
        assert_eq!(event.get_field("dissect.a"), Some(&json!("1")));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(type_name(&json!(1)), "number");
        assert_eq!(type_name(&json!([1])), "array");
        assert_eq!(type_name(&json!(null)), "null");
    }
}
