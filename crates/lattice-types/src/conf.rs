//! The flat configuration mapping consumed by the resolver.
//!
//! A [`Conf`] maps dotted string keys to [`ConfigValue`]s. Keys without a
//! dot target fields of the instance being configured; dotted keys are
//! scoped to nested sub-components (`child.field`, `child.grandchild.x`).
//!
//! # Example
//!
//! ```
//! use lattice_types::Conf;
//!
//! let conf = Conf::new()
//!     .with("y", "baz")
//!     .with("a.x", 15)
//!     .with("a.z", 2.71);
//!
//! assert_eq!(conf.len(), 3);
//! let scoped = conf.scoped("a");
//! assert_eq!(scoped.len(), 2);
//! assert!(scoped.contains("x"));
//! ```

use crate::value::{ConfigValue, ConvertError};
use std::collections::BTreeMap;

/// Flat dotted-key configuration map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conf {
    entries: BTreeMap<String, ConfigValue>,
}

impl Conf {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Chaining form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the value for an exact key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// Removes and returns the value for an exact key.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.entries.remove(key)
    }

    /// Returns `true` if an exact key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the configuration is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Extracts the subset of entries scoped under `prefix.`, with the
    /// prefix stripped.
    ///
    /// Used by the resolver to build the local configuration of a nested
    /// sub-component.
    #[must_use]
    pub fn scoped(&self, prefix: &str) -> Conf {
        let dotted = format!("{prefix}.");
        let entries = self
            .entries
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(&dotted)
                    .map(|rest| (rest.to_owned(), v.clone()))
            })
            .collect();
        Self { entries }
    }

    /// Builds a configuration from a flat JSON object.
    pub fn from_json(json: serde_json::Value) -> Result<Self, ConvertError> {
        match json {
            serde_json::Value::Object(map) => {
                let mut conf = Self::new();
                for (k, v) in map {
                    conf.insert(k, ConfigValue::from_json(v)?);
                }
                Ok(conf)
            }
            other => Err(ConvertError::UnsupportedJson(other.to_string())),
        }
    }

    /// Exports the configuration as a flat JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, ConfigValue)> for Conf {
    fn from_iter<T: IntoIterator<Item = (String, ConfigValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Conf {
    type Item = (String, ConfigValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_get_remove() {
        let mut conf = Conf::new();
        conf.insert("x", 5);
        assert_eq!(conf.get("x"), Some(&ConfigValue::Int(5)));
        assert_eq!(conf.remove("x"), Some(ConfigValue::Int(5)));
        assert!(conf.is_empty());
    }

    #[test]
    fn scoped_strips_prefix() {
        let conf = Conf::new()
            .with("x", 5)
            .with("b.x", 10)
            .with("b.a.x", 15)
            .with("b.y", "baz");

        let b = conf.scoped("b");
        assert_eq!(b.len(), 3);
        assert_eq!(b.get("x"), Some(&ConfigValue::Int(10)));
        assert_eq!(b.get("a.x"), Some(&ConfigValue::Int(15)));

        let a = b.scoped("a");
        assert_eq!(a.len(), 1);
        assert_eq!(a.get("x"), Some(&ConfigValue::Int(15)));
    }

    #[test]
    fn scoped_requires_full_segment() {
        let conf = Conf::new().with("bb.x", 1).with("b.y", 2);
        let b = conf.scoped("b");
        assert_eq!(b.len(), 1);
        assert!(b.contains("y"));
    }

    #[test]
    fn json_round_trip() {
        let conf = Conf::from_json(json!({"a.x": 15, "y": "baz", "flag": true})).unwrap();
        assert_eq!(conf.get("a.x"), Some(&ConfigValue::Int(15)));
        assert_eq!(Conf::from_json(conf.to_json()).unwrap(), conf);
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(Conf::from_json(json!([1, 2])).is_err());
        assert!(Conf::from_json(json!({"nested": {"x": 1}})).is_err());
    }
}
