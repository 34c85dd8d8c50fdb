use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Resource shape requested from the resource manager for one container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceShape {
    pub memory_mb: u32,
    pub virtual_cores: u32,
}

impl ResourceShape {
    pub fn new(memory_mb: u32, virtual_cores: u32) -> Self {
        Self {
            memory_mb,
            virtual_cores,
        }
    }
}

/// How a staged resource is materialized inside the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    /// Plain file, copied as-is.
    File,
    /// Archive, expanded on localization.
    Archive,
}

/// Reference to a staged local resource: a path plus the metadata the
/// resource manager needs to localize it.
///
/// Produced by a [`crate::StagingFs`] collaborator; this crate never
/// inspects the path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalResource {
    pub path: String,
    pub kind: ResourceKind,
    pub size: u64,
    pub timestamp: u64,
}

impl LocalResource {
    pub fn file(path: impl Into<String>, size: u64, timestamp: u64) -> Self {
        Self {
            path: path.into(),
            kind: ResourceKind::File,
            size,
            timestamp,
        }
    }

    pub fn archive(path: impl Into<String>, size: u64, timestamp: u64) -> Self {
        Self {
            path: path.into(),
            kind: ResourceKind::Archive,
            size,
            timestamp,
        }
    }
}

/// Opaque service-data payloads, passed through to the launched service
/// untouched; the launcher never interprets the bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceData(BTreeMap<String, Vec<u8>>);

impl ServiceData {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, payload: Vec<u8>) {
        self.0.insert(key.into(), payload);
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_data_is_passed_through_untouched() {
        let mut data = ServiceData::new();
        let payload = vec![0u8, 159, 146, 150];
        data.insert("hbase", payload.clone());

        assert_eq!(data.get("hbase"), Some(payload.as_slice()));
    }

    #[test]
    fn resource_shape_serde() {
        let shape = ResourceShape::new(256, 2);
        let json = serde_json::to_string(&shape).unwrap();
        assert_eq!(json, r#"{"memoryMb":256,"virtualCores":2}"#);
    }
}
