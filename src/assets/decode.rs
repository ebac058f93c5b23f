use serde::Deserialize;

use super::{Asset, AssetKind, AudioClip, FontAsset, ModelAsset, DEFAULT_SAMPLE_RATE};
use crate::error::{GalleryError, Result};
use crate::texture::TextureData;

/// Turns raw bytes into a typed asset
pub fn decode(kind: AssetKind, path: &str, bytes: Vec<u8>) -> Result<Asset> {
    match kind {
        AssetKind::Json => Ok(Asset::Json(serde_json::from_slice(&bytes)?)),
        AssetKind::Texture => decode_texture(path, &bytes).map(Asset::Texture),
        AssetKind::Model => ModelAsset::decode(path, &bytes).map(Asset::Model),
        AssetKind::Audio => Ok(Asset::Audio(AudioClip {
            sample_rate: DEFAULT_SAMPLE_RATE,
            samples: bytes,
        })),
        AssetKind::Font => decode_font(path, &bytes).map(Asset::Font),
    }
}

fn decode_texture(path: &str, bytes: &[u8]) -> Result<TextureData> {
    let image = image::load_from_memory(bytes).map_err(|e| GalleryError::decode(path, e))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    TextureData::new(width, height, rgba.into_raw())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Typeface {
    #[serde(default)]
    family_name: String,
    #[serde(default = "default_resolution")]
    resolution: f32,
    glyphs: serde_json::Map<String, serde_json::Value>,
}

fn default_resolution() -> f32 {
    1000.0
}

fn decode_font(path: &str, bytes: &[u8]) -> Result<FontAsset> {
    let face: Typeface = serde_json::from_slice(bytes)
        .map_err(|e| GalleryError::decode(path, format!("not a typeface: {}", e)))?;
    let mut glyphs: Vec<char> = face
        .glyphs
        .keys()
        .filter_map(|key| {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        })
        .collect();
    glyphs.sort_unstable();
    Ok(FontAsset {
        family: face.family_name,
        resolution: face.resolution,
        glyphs,
    })
}
