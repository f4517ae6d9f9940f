// Attribute set extracted from a preset's program node
//
// Source attributes may be absent, numeric, or free text. Consumers resolve
// them through `number_or`/`text_or`, which is the single place where
// defaults are applied.

use serde::Serialize;
use std::collections::BTreeMap;

/// One attribute value as it appeared in the program node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Parse opportunistically as a float, fall back to the raw string
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) => AttributeValue::Number(value),
            Err(_) => AttributeValue::Text(raw.to_string()),
        }
    }

    /// Finite numeric value, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(value) if value.is_finite() => Some(*value),
            AttributeValue::Number(_) => None,
            AttributeValue::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

/// Flat name → value dump of a program node
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttributeSet {
    values: BTreeMap<String, AttributeValue>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Numeric value of `key`, or `default` when absent, textual or non-finite
    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.get(key)
            .and_then(AttributeValue::as_number)
            .unwrap_or(default)
    }

    /// Numeric value with the 0.0 default
    pub fn number(&self, key: &str) -> f64 {
        self.number_or(key, 0.0)
    }

    /// String form of `key`, or `default` when absent
    pub fn text_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(AttributeValue::Text(text)) => text.clone(),
            Some(AttributeValue::Number(value)) => value.to_string(),
            None => default.to_string(),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, AttributeValue)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, AttributeValue)>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(key, value)| (key, AttributeValue::Number(value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_prefers_numbers() {
        assert_eq!(AttributeValue::parse("0.25"), AttributeValue::Number(0.25));
        assert_eq!(AttributeValue::parse(" 1 "), AttributeValue::Number(1.0));
        assert_eq!(
            AttributeValue::parse("Acid Bass"),
            AttributeValue::Text("Acid Bass".to_string())
        );
    }

    #[test]
    fn defaults_apply_on_lookup_only() {
        let set: AttributeSet = [
            ("cutoff", AttributeValue::Number(0.4)),
            ("name", AttributeValue::Text("Bass".into())),
            ("broken", AttributeValue::Number(f64::NAN)),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 3);
        assert_eq!(set.number("cutoff"), 0.4);
        assert_eq!(set.number("missing"), 0.0);
        assert_eq!(set.number_or("missing", 1.0), 1.0);
        assert_eq!(set.number_or("name", 0.3), 0.3);
        assert_eq!(set.number_or("broken", 0.7), 0.7);
        assert_eq!(set.text_or("name", "x"), "Bass");
        assert_eq!(set.text_or("absent", "fallback"), "fallback");
    }

    #[test]
    fn serializes_as_flat_map() {
        let set: AttributeSet = [("a", 0.5_f64), ("b", 1.0_f64)].into_iter().collect();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["a"], 0.5);
        assert_eq!(json["b"], 1.0);
    }
}
