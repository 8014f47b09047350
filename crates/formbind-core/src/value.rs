//! Value model shared by the binder, the accessors and the error model
//!
//! Incoming field values, rejected values and error arguments are all plain
//! [`serde_json::Value`]s, so downstream formatting code can match on a closed
//! set of shapes. [`FieldType`] describes the shape a target field expects, and
//! [`PropertyValues`] is the ordered bag of named inputs handed to a bind.
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;

pub use serde_json::Value;

/// Shape of a field on the target object graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Boolean,
    Integer,
    Float,
    String,
    /// Ordered container; the element type is known once it holds an element
    Array(Option<Box<FieldType>>),
    Object,
}

impl FieldType {
    /// Infer the type from a live value. `null` carries no type information.
    pub fn of(value: &Value) -> Option<FieldType> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(FieldType::Boolean),
            Value::Number(n) if n.is_f64() => Some(FieldType::Float),
            Value::Number(_) => Some(FieldType::Integer),
            Value::String(_) => Some(FieldType::String),
            Value::Array(items) => Some(FieldType::Array(
                items.iter().find_map(FieldType::of).map(Box::new),
            )),
            Value::Object(_) => Some(FieldType::Object),
        }
    }

    /// Name used as the type segment of message codes
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Boolean => "Boolean",
            FieldType::Integer => "Integer",
            FieldType::Float => "Float",
            FieldType::String => "String",
            FieldType::Array(_) => "Array",
            FieldType::Object => "Object",
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, FieldType::Array(_) | FieldType::Object)
    }

    /// The neutral value of this type, used to fill grown collection slots
    pub fn zero(&self) -> Value {
        match self {
            FieldType::Boolean => Value::Bool(false),
            FieldType::Integer => Value::from(0),
            FieldType::Float => Value::from(0.0),
            FieldType::String => Value::String(String::new()),
            FieldType::Array(_) => Value::Array(Vec::new()),
            FieldType::Object => Value::Object(serde_json::Map::new()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Array(Some(elem)) => write!(f, "Array<{}>", elem),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// `true` for null, `""`, `[]` and `{}`
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// `true` when the rendered value contains at least one non-whitespace character
pub fn has_text(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => s.chars().any(|c| !c.is_whitespace()),
        other => display_value(other).chars().any(|c| !c.is_whitespace()),
    }
}

/// Render a value for messages and rejected-value display.
///
/// Strings are unquoted and sequences are comma-delimited, so a multi-valued
/// form field shows up as `a,b,c` rather than as a JSON array.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// A single named input value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub name: String,
    pub value: Value,
}

impl PropertyValue {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered collection of named input values
///
/// Insertion order is preserved. Adding a name that is already present
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyValues {
    values: Vec<PropertyValue>,
}

impl PropertyValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs, merging repeated names into an array value.
    ///
    /// This is the shape produced by multi-valued form fields such as
    /// checkbox groups: `tags=a&tags=b` becomes `tags: ["a", "b"]`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut values = Self::new();
        for (name, value) in pairs {
            let name = name.into();
            let value = value.into();
            match values.get_mut(&name) {
                Some(Value::Array(existing)) => existing.push(value),
                Some(existing) => {
                    let first = std::mem::take(existing);
                    *existing = Value::Array(vec![first, value]);
                }
                None => values.values.push(PropertyValue { name, value }),
            }
        }
        values
    }

    /// Build from a JSON object, keeping its key order
    pub fn from_json_object(object: &serde_json::Map<String, Value>) -> Self {
        object
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Add or replace a value
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.get_mut(&name) {
            Some(existing) => *existing = value,
            None => self.values.push(PropertyValue { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|pv| pv.name == name).map(|pv| &pv.value)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values
            .iter_mut()
            .find(|pv| pv.name == name)
            .map(|pv| &mut pv.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.values.iter().position(|pv| pv.name == name)?;
        Some(self.values.remove(index).value)
    }

    /// Keep only the values whose name satisfies the predicate
    pub fn retain(&mut self, mut keep: impl FnMut(&PropertyValue) -> bool) {
        self.values.retain(|pv| keep(pv));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|pv| pv.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertyValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PropertyValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (name, value) in iter {
            values.add(name, value);
        }
        values
    }
}

impl<'a> IntoIterator for &'a PropertyValues {
    type Item = &'a PropertyValue;
    type IntoIter = std::slice::Iter<'a, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for PropertyValues {
    type Item = PropertyValue;
    type IntoIter = std::vec::IntoIter<PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_inference() {
        assert_eq!(FieldType::of(&json!(null)), None);
        assert_eq!(FieldType::of(&json!(3)), Some(FieldType::Integer));
        assert_eq!(FieldType::of(&json!(3.5)), Some(FieldType::Float));
        assert_eq!(FieldType::of(&json!("x")), Some(FieldType::String));
        assert_eq!(
            FieldType::of(&json!(["a"])),
            Some(FieldType::Array(Some(Box::new(FieldType::String))))
        );
        assert_eq!(FieldType::of(&json!([])), Some(FieldType::Array(None)));
    }

    #[test]
    fn test_display_value_joins_sequences() {
        assert_eq!(display_value(&json!(["a", 1, true])), "a,1,true");
        assert_eq!(display_value(&json!("plain")), "plain");
        assert_eq!(display_value(&json!(null)), "");
    }

    #[test]
    fn test_emptiness_helpers() {
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!([])));
        assert!(!is_empty_value(&json!(" ")));
        assert!(!has_text(&json!("   ")));
        assert!(has_text(&json!(0)));
    }

    #[test]
    fn test_property_values_replace_in_place() {
        let mut values = PropertyValues::new();
        values.add("a", "1");
        values.add("b", "2");
        values.add("a", "3");

        assert_eq!(values.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(values.get("a"), Some(&json!("3")));
    }

    #[test]
    fn test_from_pairs_merges_repeated_names() {
        let values = PropertyValues::from_pairs([("tags", "a"), ("name", "x"), ("tags", "b"), ("tags", "c")]);

        assert_eq!(values.len(), 2);
        assert_eq!(values.get("tags"), Some(&json!(["a", "b", "c"])));
    }
}
