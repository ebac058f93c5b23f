use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assets::DataEntry;
use crate::error::{GalleryError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Position> for Vec3 {
    fn from(p: Position) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

impl From<Vec3> for Position {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// How the host moves the camera for a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerKind {
    None,
    #[default]
    Orbital,
    Trackball,
    Walking,
    Pointerlock,
}

impl ControllerKind {
    /// Kinds where dragging and the wheel move the camera around its target
    pub fn orbits(self) -> bool {
        matches!(self, ControllerKind::Orbital | ControllerKind::Trackball)
    }
}

/// Which overlay layer a scene expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlayMode {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "2D")]
    Flat,
    #[serde(rename = "3D")]
    Spatial,
    #[serde(rename = "DUAL")]
    Dual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    pub start_position: Position,
    pub look_at: Position,
    pub clipping_plane: f32,
    pub background: u32,
    pub controller: ControllerKind,
    pub overlay: OverlayMode,
    pub stats_enabled: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            start_position: Position::new(0.0, 2.0, 5.0),
            look_at: Position::new(0.0, 0.0, 0.0),
            clipping_plane: 1000.0,
            background: 0x000000,
            controller: ControllerKind::Orbital,
            overlay: OverlayMode::None,
            stats_enabled: false,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.clipping_plane > crate::camera::DEFAULT_NEAR) {
            return Err(GalleryError::Config(format!(
                "clipping plane {} must exceed the near plane",
                self.clipping_plane
            )));
        }
        if self.background > 0xffffff {
            return Err(GalleryError::Config(format!(
                "background {:#x} is not a 24-bit colour",
                self.background
            )));
        }
        Ok(())
    }
}

/// Gallery-wide settings, optionally read from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryConfig {
    pub asset_root: PathBuf,
    pub width: u32,
    pub height: u32,
    pub default_scene: String,
    pub log_level: String,
    /// Extra or overriding data table entries
    pub data_sources: HashMap<String, DataEntry>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("./assets"),
            width: 1280,
            height: 720,
            default_scene: "audioviz".to_string(),
            log_level: "info".to_string(),
            data_sources: HashMap::new(),
        }
    }
}

impl GalleryConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: GalleryConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GalleryError::AssetIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GalleryError::Config(format!(
                "window size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_defaults() {
        let config = SceneConfig::default();
        assert_eq!(Vec3::from(config.start_position), Vec3::new(0.0, 2.0, 5.0));
        assert_eq!(config.clipping_plane, 1000.0);
        assert_eq!(config.controller, ControllerKind::Orbital);
        assert_eq!(config.overlay, OverlayMode::None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scene_config_partial_json() {
        let config: SceneConfig =
            serde_json::from_str(r#"{"controller":"trackball","overlay":"3D","clippingPlane":10000}"#)
                .unwrap();
        assert_eq!(config.controller, ControllerKind::Trackball);
        assert_eq!(config.overlay, OverlayMode::Spatial);
        assert_eq!(config.clipping_plane, 10000.0);
        assert_eq!(config.background, 0);
    }

    #[test]
    fn test_invalid_clipping_plane() {
        let config = SceneConfig {
            clipping_plane: 0.0,
            ..SceneConfig::default()
        };
        assert!(matches!(config.validate(), Err(GalleryError::Config(_))));
    }

    #[test]
    fn test_gallery_config_from_json() {
        let config = GalleryConfig::from_json(
            r#"{"assetRoot":"/srv/assets","defaultScene":"farm","dataSources":{"extra":{"path":"data/extra.json"}}}"#,
        )
        .unwrap();
        assert_eq!(config.asset_root, PathBuf::from("/srv/assets"));
        assert_eq!(config.default_scene, "farm");
        assert_eq!(config.width, 1280);
        assert!(config.data_sources.contains_key("extra"));
    }

    #[test]
    fn test_gallery_config_rejects_zero_size() {
        assert!(GalleryConfig::from_json(r#"{"width":0}"#).is_err());
    }

    #[test]
    fn test_orbiting_controllers() {
        assert!(ControllerKind::Orbital.orbits());
        assert!(ControllerKind::Trackball.orbits());
        assert!(!ControllerKind::Walking.orbits());
        assert!(!ControllerKind::None.orbits());
    }
}
