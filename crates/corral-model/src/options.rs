use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// String-keyed option map with typed accessors.
///
/// Used both for per-role options and for the cluster-wide option set.
/// Values are stored as strings; numeric accessors parse on demand and
/// report unparseable values as [`ModelError::BadArgument`] naming the key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionMap(BTreeMap<String, String>);

impl OptionMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Lookup with a fallback default.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Parse an option as `u32`, falling back to `default` when absent.
    ///
    /// Present-but-unparseable is an error, never a silent fallback.
    pub fn get_u32(&self, key: &str, default: u32) -> Result<u32, ModelError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| {
                ModelError::BadArgument(format!("option {key} is not a number: {raw}"))
            }),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` into `self`, last write wins per key.
    pub fn extend(&mut self, other: &OptionMap) {
        for (k, v) in other.iter() {
            self.insert(k, v);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OptionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_falls_back() {
        let mut opts = OptionMap::new();
        opts.insert("a", "1");

        assert_eq!(opts.get_or("a", "x"), "1");
        assert_eq!(opts.get_or("b", "x"), "x");
    }

    #[test]
    fn get_u32_absent_uses_default() {
        let opts = OptionMap::new();
        assert_eq!(opts.get_u32("mem", 256).unwrap(), 256);
    }

    #[test]
    fn get_u32_present_parses() {
        let mut opts = OptionMap::new();
        opts.insert("mem", "512");
        assert_eq!(opts.get_u32("mem", 256).unwrap(), 512);
    }

    #[test]
    fn get_u32_unparseable_is_bad_argument() {
        let mut opts = OptionMap::new();
        opts.insert("mem", "lots");

        let err = opts.get_u32("mem", 256).unwrap_err();
        assert!(matches!(err, ModelError::BadArgument(_)));
        assert!(err.to_string().contains("mem"));
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn extend_last_write_wins() {
        let mut a: OptionMap = [("k", "old"), ("only-a", "1")].into_iter().collect();
        let b: OptionMap = [("k", "new")].into_iter().collect();

        a.extend(&b);
        assert_eq!(a.get("k"), Some("new"));
        assert_eq!(a.get("only-a"), Some("1"));
    }

    #[test]
    fn serde_is_transparent() {
        let opts: OptionMap = [("jvm.heapsize", "256M")].into_iter().collect();
        let json = serde_json::to_string(&opts).unwrap();
        assert_eq!(json, r#"{"jvm.heapsize":"256M"}"#);
    }
}
