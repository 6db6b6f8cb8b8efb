//! Ordered document model shared by the translator and the embedder.
//!
//! Field order is preserved because consumers render documents as text, so
//! the map type is insertion ordered. Equality is plain map equality and
//! ignores insertion order.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single value inside a document or a row.
///
/// SQL literals only produce `Null`, `Int` and `Text`; the nested variants
/// appear in translator output (operator bodies, pipelines) and in embedded
/// documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
    Document(Document),
    Array(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Document> for Value {
    fn from(v: Document) -> Self {
        Value::Document(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

/// An insertion-ordered mapping from field names to values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document(IndexMap<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, keeping insertion order. Returns self so stage
    /// documents can be built in one expression.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut doc = Document::new();
        doc.insert("z", 1);
        doc.insert("a", 2);
        doc.insert("m", 3);

        let keys: Vec<&String> = doc.keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: Document = [("x", 1), ("y", 2)].into_iter().collect();
        let b: Document = [("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_renders_json() {
        let mut inner = Document::new();
        inner.insert("$gt", 1000);
        let mut doc = Document::new();
        doc.insert("POP", inner);
        assert_eq!(doc.to_string(), r#"{"POP":{"$gt":1000}}"#);
    }

    #[test]
    fn test_display_null_and_array() {
        let mut doc = Document::new();
        doc.insert("a", Value::Null);
        doc.insert("b", vec![Value::Int(1), Value::Text("x".into())]);
        assert_eq!(doc.to_string(), r#"{"a":null,"b":[1,"x"]}"#);
    }
}
