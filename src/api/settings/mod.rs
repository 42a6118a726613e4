use super::owned;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const REFRESH_INTERVAL: &str = "refresh_interval";
pub const NUMBER_OF_REPLICAS: &str = "number_of_replicas";
pub const INDEX_REFRESH_INTERVAL: &str = "index.refresh_interval";
pub const INDEX_NUMBER_OF_REPLICAS: &str = "index.number_of_replicas";

/// `refresh_interval` value that turns periodic refresh off.
pub const REFRESH_DISABLED: &str = "-1";

/// Body of a settings update: a key/value map, or a document serialized by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Settings {
    Map(BTreeMap<String, String>),
    Source(Bytes),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSettingsRequest {
    pub indices: Vec<String>,
    pub settings: Settings,
}

impl UpdateSettingsRequest {
    pub fn new(indices: &[&str], settings: BTreeMap<String, String>) -> Self {
        Self {
            indices: owned(indices),
            settings: Settings::Map(settings),
        }
    }

    pub fn single(key: impl ToString, value: impl ToString, indices: &[&str]) -> Self {
        Self::new(
            indices,
            BTreeMap::from([(key.to_string(), value.to_string())]),
        )
    }

    pub fn source(index: &str, source: impl Into<Bytes>) -> Self {
        Self {
            indices: vec![index.to_owned()],
            settings: Settings::Source(source.into()),
        }
    }
}

/// Settings per index, as returned with `flat_settings=true`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetSettingsResponse(pub BTreeMap<String, IndexSettings>);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSettings {
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,
}

impl GetSettingsResponse {
    pub fn index(&self, index: &str) -> Option<&IndexSettings> {
        self.0.get(index)
    }

    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Looks up a dotted key such as `index.refresh_interval`.
    ///
    /// Both flat and nested responses are understood. Non-string values yield `None`.
    pub fn setting(&self, index: &str, key: &str) -> Option<&str> {
        let settings = &self.index(index)?.settings;

        if let Some(value) = settings.get(key) {
            return value.as_str();
        }

        let mut parts = key.split('.');
        let head = settings.get(parts.next()?)?;
        parts.try_fold(head, |v, part| v.get(part))?.as_str()
    }
}
