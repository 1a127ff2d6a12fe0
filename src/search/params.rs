//! Outgoing search parameters
//!
//! Parameters are held as a JSON object. Every adjustment returns a new
//! `SearchParams`; the caller's copy is never touched.

use super::CmrError;
use heck::ToSnakeCase;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams(Map<String, Value>);

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Result<Self, CmrError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(CmrError::InvalidParams(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Add a value, turning an existing key into an array of values.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.0.get_mut(&key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.0.insert(key, value);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Copy with top-level keys converted from camelCase to snake_case
    pub fn snake_cased(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(key, value)| (to_snake_case(key), value.clone()))
                .collect(),
        )
    }

    /// Copy keeping only the listed keys
    pub fn permitted(&self, keys: &[&str]) -> Self {
        let mut kept = Map::new();
        for (key, value) in &self.0 {
            if keys.contains(&key.as_str()) {
                kept.insert(key.clone(), value.clone());
            } else {
                tracing::trace!(key = %key, "dropping parameter not accepted by the CMR");
            }
        }
        Self(kept)
    }

    /// Copy with `nested` removed from the object stored under `key`
    pub fn without_nested(&self, key: &str, nested: &str) -> Self {
        let mut copy = self.clone();
        if let Some(Value::Object(inner)) = copy.0.get_mut(key) {
            inner.remove(nested);
        }
        copy
    }

    /// Encode as a form body.
    ///
    /// Indexed keys come first (`key[0]=a`), then the non-indexed ones
    /// (`key[]=a`). Nested objects use `key[sub]=v`; nulls are skipped.
    pub fn encode_form(&self, non_indexed_keys: &[&str]) -> String {
        let mut indexed = Vec::new();
        let mut non_indexed = Vec::new();

        for (key, value) in &self.0 {
            if non_indexed_keys.contains(&key.as_str()) {
                flatten(key, value, ArrayFormat::Brackets, &mut non_indexed);
            } else {
                flatten(key, value, ArrayFormat::Indices, &mut indexed);
            }
        }

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in indexed.iter().chain(non_indexed.iter()) {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

impl From<Map<String, Value>> for SearchParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[derive(Clone, Copy)]
enum ArrayFormat {
    Indices,
    Brackets,
}

fn flatten(prefix: &str, value: &Value, format: ArrayFormat, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((prefix.to_string(), b.to_string())),
        Value::Number(n) => out.push((prefix.to_string(), n.to_string())),
        Value::String(s) => out.push((prefix.to_string(), s.clone())),
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                let key = match format {
                    ArrayFormat::Indices => format!("{prefix}[{idx}]"),
                    ArrayFormat::Brackets => format!("{prefix}[]"),
                };
                flatten(&key, item, format, out);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                flatten(&format!("{prefix}[{sub}]"), item, format, out);
            }
        }
    }
}

/// `twoDCoordinateSystem` -> `two_d_coordinate_system`
pub fn to_snake_case(key: &str) -> String {
    key.to_snake_case()
}
