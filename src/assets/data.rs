use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Asset, AssetKind};
use crate::error::{GalleryError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    #[default]
    Json,
    Gltf,
}

impl DataKind {
    pub fn asset_kind(self) -> AssetKind {
        match self {
            DataKind::Json => AssetKind::Json,
            DataKind::Gltf => AssetKind::Model,
        }
    }
}

/// Data source named by a draw function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceRef {
    pub id: String,
    pub kind: DataKind,
}

impl DataSourceRef {
    pub fn json(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: DataKind::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataEntry {
    /// Relative to the asset root; derived from the id when absent
    pub path: Option<String>,
    pub kind: DataKind,
    /// Layered layout direction for graph data, e.g. "td"
    pub dag_mode: Option<String>,
    pub dag_level_distance: Option<f32>,
}

/// Resolved data handed to a draw function
#[derive(Debug, Clone)]
pub struct DataPayload {
    pub id: String,
    pub path: String,
    pub entry: DataEntry,
    pub asset: Asset,
}

impl DataPayload {
    pub fn json(&self) -> Option<&serde_json::Value> {
        match &self.asset {
            Asset::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Known data sources by id
#[derive(Debug, Clone)]
pub struct DataTable {
    entries: HashMap<String, DataEntry>,
}

impl DataTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// `home_<x>` lives under `threejs/data`, everything else under `data`
    pub fn default_path(id: &str) -> String {
        match id.strip_prefix("home_") {
            Some(rest) => format!("threejs/data/{}.json", rest),
            None => format!("data/{}.json", id),
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, entry: DataEntry) {
        self.entries.insert(id.into(), entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = (String, DataEntry)>) {
        self.entries.extend(entries);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entry and effective path for an id
    pub fn resolve(&self, id: &str) -> Result<(String, &DataEntry)> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| GalleryError::UnknownDataSource(id.to_string()))?;
        let path = entry.path.clone().unwrap_or_else(|| Self::default_path(id));
        Ok((path, entry))
    }
}

impl Default for DataTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for id in ["periodic", "force3d", "chart", "home_force3d"] {
            table.insert(id, DataEntry::default());
        }
        table.insert(
            "math",
            DataEntry {
                dag_mode: Some("td".to_string()),
                dag_level_distance: Some(40.0),
                ..DataEntry::default()
            },
        );
        table
    }
}
