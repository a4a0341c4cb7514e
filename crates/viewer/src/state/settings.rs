//! Application settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::i18n::Lang;

/// Viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Show world axes at the origin
    pub axes_visible: bool,
    /// Axis arrow length
    pub axes_length: f32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [30, 30, 35],
            axes_visible: false,
            axes_length: 1.5,
        }
    }
}

/// Annotation display colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSettings {
    /// Marker sphere color RGB
    pub marker_color: [u8; 3],
    /// Leader line color RGB
    pub leader_color: [u8; 3],
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            marker_color: [0xff, 0x44, 0x44],
            leader_color: [255, 255, 255],
        }
    }
}

impl AnnotationSettings {
    pub fn marker_rgb(&self) -> [f32; 3] {
        self.marker_color.map(|c| c as f32 / 255.0)
    }

    pub fn leader_rgba(&self) -> [f32; 4] {
        let [r, g, b] = self.leader_color.map(|c| c as f32 / 255.0);
        [r, g, b, 1.0]
    }
}

/// Orbit camera limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            min_distance: 2.0,
            max_distance: 20.0,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    #[serde(default)]
    pub language: Lang,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: Lang::Ru,
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub viewport: ViewportSettings,
    #[serde(default)]
    pub annotations: AnnotationSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

impl AppSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "anatomy", "anatomy-viewer")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Read settings from `path`; a missing or invalid file gives defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring invalid settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                warn!("Failed to save settings: {e}");
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings::load_from(&dir.path().join("settings.json"));
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.camera.min_distance, 2.0);
        assert_eq!(settings.ui.language, Lang::Ru);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = AppSettings::default();
        settings.ui.language = Lang::En;
        settings.annotations.marker_color = [0, 255, 0];
        settings.save_to(&path).unwrap();

        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn test_partial_and_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        std::fs::write(&path, r#"{"ui": {"font_size": 18.0}}"#).unwrap();
        let settings = AppSettings::load_from(&path);
        assert_eq!(settings.ui.font_size, 18.0);
        assert_eq!(settings.viewport, ViewportSettings::default());

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }

    #[test]
    fn test_color_conversion() {
        let a = AnnotationSettings::default();
        assert_eq!(a.marker_rgb()[0], 1.0);
        assert_eq!(a.leader_rgba(), [1.0, 1.0, 1.0, 1.0]);
    }
}
