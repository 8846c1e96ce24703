//! The generic value model generated codecs operate on.
//!
//! Struct fields are keyed by name, mirroring the arguments objects of the
//! generated contracts. Map entries keep insertion order so encoded output
//! is deterministic.

use std::collections::BTreeMap;

/// A value of any wire-encodable shape.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Struct(StructValue),
    /// The result of a void method.
    Void,
}

impl Value {
    pub fn string(value: impl Into<String>) -> Value {
        Value::String(value.into())
    }

    /// The inner struct value, if this is one.
    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<StructValue> for Value {
    fn from(value: StructValue) -> Value {
        Value::Struct(value)
    }
}

/// A struct's field values, keyed by field name.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct StructValue {
    fields: BTreeMap<String, Value>,
}

impl StructValue {
    pub fn new() -> StructValue {
        StructValue::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> StructValue {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_struct_value_builder() {
        let value = StructValue::new()
            .with("id", Value::I32(7))
            .with("name", Value::string("seven"));
        assert_eq!(value.len(), 2);
        assert_eq!(value.get("id"), Some(&Value::I32(7)));
        assert!(!value.contains("missing"));
    }
}
