use thiserror::Error;

use crate::graph::NodeId;

/// Errors surfaced by the gallery library
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("unknown scene '{0}'")]
    UnknownScene(String),

    #[error("data source '{0}' is not in the data table")]
    UnknownDataSource(String),

    #[error("node {0:?} is not in the scene graph")]
    NodeNotFound(NodeId),

    #[error("failed to read asset '{path}'")]
    AssetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode asset '{path}': {reason}")]
    AssetDecode { path: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GalleryError {
    pub fn decode(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::AssetDecode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
