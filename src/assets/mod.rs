mod data;
mod decode;
mod loader;
mod model;
mod source;

pub use data::{DataEntry, DataKind, DataPayload, DataSourceRef, DataTable};
pub use decode::decode;
pub use loader::{AssetLoader, Completion, LoadTicket};
pub use model::{ModelAsset, ModelNode};
pub use source::{AssetSource, FsSource, MemorySource};

use crate::texture::TextureData;

/// Sample rate assumed for raw PCM clips
pub const DEFAULT_SAMPLE_RATE: u32 = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Json,
    Texture,
    Model,
    Audio,
    Font,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRequest {
    pub path: String,
    pub kind: AssetKind,
}

impl AssetRequest {
    pub fn new(path: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn json(path: impl Into<String>) -> Self {
        Self::new(path, AssetKind::Json)
    }

    pub fn texture(path: impl Into<String>) -> Self {
        Self::new(path, AssetKind::Texture)
    }

    pub fn model(path: impl Into<String>) -> Self {
        Self::new(path, AssetKind::Model)
    }

    pub fn audio(path: impl Into<String>) -> Self {
        Self::new(path, AssetKind::Audio)
    }

    pub fn font(path: impl Into<String>) -> Self {
        Self::new(path, AssetKind::Font)
    }
}

/// Unsigned 8-bit mono PCM
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub samples: Vec<u8>,
}

impl AudioClip {
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples.len() as f64 / self.sample_rate as f64
        }
    }
}

/// Typeface description: glyph coverage and nominal resolution
#[derive(Debug, Clone, PartialEq)]
pub struct FontAsset {
    pub family: String,
    pub resolution: f32,
    pub glyphs: Vec<char>,
}

impl FontAsset {
    pub fn covers(&self, text: &str) -> bool {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .all(|c| self.glyphs.contains(&c))
    }
}

/// Decoded payload of a completed load
#[derive(Debug, Clone)]
pub enum Asset {
    Json(serde_json::Value),
    Texture(TextureData),
    Model(ModelAsset),
    Audio(AudioClip),
    Font(FontAsset),
}

impl Asset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Json(_) => AssetKind::Json,
            Asset::Texture(_) => AssetKind::Texture,
            Asset::Model(_) => AssetKind::Model,
            Asset::Audio(_) => AssetKind::Audio,
            Asset::Font(_) => AssetKind::Font,
        }
    }

    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Asset::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_texture(self) -> Option<TextureData> {
        match self {
            Asset::Texture(texture) => Some(texture),
            _ => None,
        }
    }

    pub fn into_model(self) -> Option<ModelAsset> {
        match self {
            Asset::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn into_audio(self) -> Option<AudioClip> {
        match self {
            Asset::Audio(clip) => Some(clip),
            _ => None,
        }
    }

    pub fn into_font(self) -> Option<FontAsset> {
        match self {
            Asset::Font(font) => Some(font),
            _ => None,
        }
    }
}
