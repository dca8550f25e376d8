//! Forgiving field coercion for model-produced JSON.
//!
//! The model has no schema enforcement, so a score may come back as `87`,
//! `"87"` or `"87%"`, and a list may come back as a bare string. Records are
//! built from the raw object through `LenientFields`: each known key is
//! coerced into its typed field, and a value that cannot be coerced stays in
//! the leftover map under its original key. Records keep that map as
//! `extra`, so serializing a record reproduces every key the model sent.

use serde_json::{Map, Value};

/// Scalar as text. Blank strings, `null`, arrays and objects yield `None`.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn value_to_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Whole, non-negative numbers only.
pub fn value_to_rank(value: &Value) -> Option<u32> {
    value_to_number(value)
        .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64 && n.fract() == 0.0)
        .map(|n| n as u32)
}

/// A bare string becomes a one-item list. An array coerces only when every
/// item is a scalar.
pub fn value_to_strings(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(_) | Value::Bool(_) => value_to_text(item),
                _ => None,
            })
            .collect(),
        other => value_to_text(other).map(|s| vec![s]),
    }
}

/// Arrays as-is; any other non-null value is wrapped in a one-item list.
pub fn value_to_values(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(items.clone()),
        other => Some(vec![other.clone()]),
    }
}

/// A raw JSON object being taken apart into a typed record.
#[derive(Debug, Default)]
pub struct LenientFields {
    map: Map<String, Value>,
}

impl LenientFields {
    pub fn new(map: Map<String, Value>) -> Self {
        Self { map }
    }

    /// Coerces `key` and removes it on success. On failure the raw value
    /// stays behind for `into_extra`.
    pub fn take<T>(&mut self, key: &str, coerce: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
        let typed = coerce(self.map.get(key)?)?;
        self.map.remove(key);
        Some(typed)
    }

    pub fn text(&mut self, key: &str) -> Option<String> {
        self.take(key, value_to_text)
    }

    pub fn number(&mut self, key: &str) -> Option<f64> {
        self.take(key, value_to_number)
    }

    pub fn rank(&mut self, key: &str) -> Option<u32> {
        self.take(key, value_to_rank)
    }

    pub fn strings(&mut self, key: &str) -> Option<Vec<String>> {
        self.take(key, value_to_strings)
    }

    pub fn values(&mut self, key: &str) -> Option<Vec<Value>> {
        self.take(key, value_to_values)
    }

    /// Nested record; only JSON objects coerce.
    pub fn object<T>(&mut self, key: &str) -> Option<T>
    where
        T: From<Map<String, Value>>,
    {
        self.take(key, |value| value.as_object().cloned().map(T::from))
    }

    /// Array of nested records; coerces only when every item is an object.
    pub fn objects<T>(&mut self, key: &str) -> Option<Vec<T>>
    where
        T: From<Map<String, Value>>,
    {
        self.take(key, |value| match value {
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_object().cloned().map(T::from))
                .collect(),
            Value::Object(map) => Some(vec![T::from(map.clone())]),
            _ => None,
        })
    }

    /// Unknown keys plus every known key that failed to coerce.
    pub fn into_extra(self) -> Map<String, Value> {
        self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> LenientFields {
        match value {
            Value::Object(map) => LenientFields::new(map),
            _ => panic!("test input must be an object"),
        }
    }

    #[test]
    fn test_number_from_string_with_percent() {
        assert_eq!(value_to_number(&json!("87%")), Some(87.0));
        assert_eq!(value_to_number(&json!(" 72.5 ")), Some(72.5));
        assert_eq!(value_to_number(&json!(90)), Some(90.0));
        assert_eq!(value_to_number(&json!("high")), None);
        assert_eq!(value_to_number(&json!(null)), None);
    }

    #[test]
    fn test_rank_requires_whole_non_negative_number() {
        assert_eq!(value_to_rank(&json!("2")), Some(2));
        assert_eq!(value_to_rank(&json!(3)), Some(3));
        assert_eq!(value_to_rank(&json!(-1)), None);
        assert_eq!(value_to_rank(&json!(1.5)), None);
    }

    #[test]
    fn test_strings_from_mixed_shapes() {
        assert_eq!(
            value_to_strings(&json!(["Rust", 3, true])),
            Some(vec!["Rust".to_string(), "3".to_string(), "true".to_string()])
        );
        assert_eq!(value_to_strings(&json!("Rust")), Some(vec!["Rust".to_string()]));
        assert_eq!(value_to_strings(&json!([])), Some(Vec::new()));
        assert_eq!(value_to_strings(&json!(["Rust", {"lang": "Go"}])), None);
        assert_eq!(value_to_strings(&json!(null)), None);
        assert_eq!(value_to_strings(&json!("  ")), None);
    }

    #[test]
    fn test_text_rejects_structured_values() {
        assert_eq!(value_to_text(&json!(42)).as_deref(), Some("42"));
        assert_eq!(value_to_text(&json!({"a": 1})), None);
        assert_eq!(value_to_text(&json!(["a"])), None);
    }

    #[test]
    fn test_coerced_keys_are_removed_and_failures_stay_in_extra() {
        let mut f = fields(json!({
            "score": "81%",
            "years": "5+ years",
            "tags": "Rust",
            "contact": "Ada | ada@example.com",
            "unknown": {"kept": true}
        }));

        assert_eq!(f.number("score"), Some(81.0));
        assert_eq!(f.number("years"), None);
        assert_eq!(f.strings("tags"), Some(vec!["Rust".to_string()]));
        assert_eq!(f.object::<Map<String, Value>>("contact"), None);
        assert_eq!(f.text("absent"), None);

        let extra = f.into_extra();
        assert_eq!(
            Value::Object(extra),
            json!({
                "years": "5+ years",
                "contact": "Ada | ada@example.com",
                "unknown": {"kept": true}
            })
        );
    }

    #[test]
    fn test_objects_needs_every_item_to_be_an_object() {
        let mut f = fields(json!({
            "good": [{"a": 1}, {"b": 2}],
            "single": {"c": 3},
            "mixed": [{"a": 1}, "garbage"]
        }));
        assert_eq!(f.objects::<Map<String, Value>>("good").map(|v| v.len()), Some(2));
        assert_eq!(f.objects::<Map<String, Value>>("single").map(|v| v.len()), Some(1));
        assert!(f.objects::<Map<String, Value>>("mixed").is_none());
        assert!(f.into_extra().contains_key("mixed"));
    }
}
