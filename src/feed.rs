//! Update feed data model.

use serde::{Deserialize, Serialize};

/// One release note card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEntry {
    pub version: String,
    pub date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: Vec<String>,
}

impl UpdateEntry {
    #[allow(unused)]
    pub fn new(version: impl Into<String>, date: impl Into<String>, notes: Vec<String>) -> Self {
        Self {
            version: version.into(),
            date: date.into(),
            notes,
        }
    }

    /// Card heading, `version — date`.
    pub fn heading(&self) -> String {
        format!("{} — {}", self.version, self.date)
    }
}

/// Ordered list of entries; insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFeed {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub updates: Vec<UpdateEntry>,
}

impl UpdateFeed {
    #[allow(unused)]
    pub fn new(updates: Vec<UpdateEntry>) -> Self {
        Self { updates }
    }

    #[allow(unused)]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Decodes a `{ "updates": [...] }` body. Primary and fallback sources share this shape.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// A feed together with the location that supplied it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedFeed {
    pub feed: UpdateFeed,
    /// `None` when every source failed or was empty.
    pub origin: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
