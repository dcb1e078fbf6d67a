//! Caller-built request maps
//!
//! A [`RequestMap`] is a flat set of gateway field names to scalar values.
//! It is serialized as a JSON object for POST/PUT and as a query string for
//! GET/DELETE.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestMap {
    fields: BTreeMap<String, Value>,
}

impl RequestMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`RequestMap::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|value| !value.is_null())
    }

    /// A field set to `null` is treated as absent.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn len(&self) -> usize {
        self.fields.values().filter(|value| !value.is_null()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON object body, absent fields dropped.
    pub fn to_json(&self) -> Value {
        let body: Map<String, Value> = self
            .fields
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Value::Object(body)
    }

    /// Key/value pairs with stringified values, sorted by key.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), stringify(value)))
            .collect()
    }

    /// `application/x-www-form-urlencoded` query string. Key order is sorted
    /// so the same map always encodes to the same string.
    pub fn to_query_string(&self) -> String {
        // Encoding a sequence of string pairs cannot fail.
        serde_urlencoded::to_string(self.to_pairs()).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RequestMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = RequestMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
