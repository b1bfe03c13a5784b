use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::canvas::Scene;
use crate::error::ConfigError;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PLACE_GUESS_CONFIG";

/// Config file picked up from the working directory when no override is set
pub const DEFAULT_CONFIG_FILE: &str = "place_guess.json";

/// Which canvas skin the drawing step uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasKind {
    /// Full sketching surface with shape tools and undo
    #[default]
    Sketch,
    /// Minimal freehand surface
    FreeDraw,
}

impl CanvasKind {
    pub const ALL: [CanvasKind; 2] = [CanvasKind::Sketch, CanvasKind::FreeDraw];

    pub fn label(self) -> &'static str {
        match self {
            Self::Sketch => "Sketchbook",
            Self::FreeDraw => "Free draw",
        }
    }
}

/// Starting values for the whiteboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasDefaults {
    pub width: u32,
    pub height: u32,
    pub background_color: Color32,
    pub stroke_color: Color32,
    pub stroke_width: f32,
    pub point_radius: f32,
}

impl Default for CanvasDefaults {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            background_color: Color32::WHITE,
            stroke_color: Color32::BLACK,
            stroke_width: 4.0,
            point_radius: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // missing keys fall back to the defaults below
pub struct GameConfig {
    /// Flat directory holding uploaded photos
    pub upload_dir: PathBuf,
    pub gallery_columns: usize,
    /// Longest edge of gallery thumbnails, in pixels
    pub thumbnail_size: u32,
    pub canvas_kind: CanvasKind,
    pub canvas: CanvasDefaults,
    /// JSON scene loaded into the canvas the first time it is shown
    pub initial_scene: Option<PathBuf>,
    /// Show drawings without accepting input
    pub view_only: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            gallery_columns: 3,
            thumbnail_size: 256,
            canvas_kind: CanvasKind::default(),
            canvas: CanvasDefaults::default(),
            initial_scene: None,
            view_only: false,
        }
    }
}

impl GameConfig {
    /// Parse a config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        Ok(config.sanitized())
    }

    /// Load the config from `PLACE_GUESS_CONFIG`, then `place_guess.json`,
    /// then fall back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            log::info!("Loading config from {}", path.display());
            return Self::from_file(&path);
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            log::info!("Loading config from {}", local.display());
            return Self::from_file(local);
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read the scene named by `initial_scene`, if any
    pub fn load_initial_scene(&self) -> Result<Option<Scene>, ConfigError> {
        let Some(path) = &self.initial_scene else {
            return Ok(None);
        };
        let json = std::fs::read_to_string(path)?;
        let scene = Scene::from_json(&json)?;
        log::info!("Loaded {} shapes from {}", scene.len(), path.display());
        Ok(Some(scene))
    }

    fn sanitized(mut self) -> Self {
        self.gallery_columns = self.gallery_columns.max(1);
        self.thumbnail_size = self.thumbnail_size.max(16);
        self.canvas.width = self.canvas.width.max(1);
        self.canvas.height = self.canvas.height.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "upload_dir": "photos", "canvas": { "width": 640 } }"#)
                .unwrap();

        assert_eq!(config.upload_dir, PathBuf::from("photos"));
        assert_eq!(config.gallery_columns, 3);
        assert_eq!(config.canvas.width, 640);
        assert_eq!(config.canvas.height, 600);
        assert_eq!(config.canvas_kind, CanvasKind::Sketch);
    }

    #[test]
    fn test_canvas_kind_names() {
        let config: GameConfig = serde_json::from_str(r#"{ "canvas_kind": "free_draw" }"#).unwrap();
        assert_eq!(config.canvas_kind, CanvasKind::FreeDraw);
    }

    #[test]
    fn test_from_file_clamps_zero_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "gallery_columns": 0 }"#).unwrap();

        let config = GameConfig::from_file(&path).unwrap();
        assert_eq!(config.gallery_columns, 1);
    }

    #[test]
    fn test_initial_scene_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let line = crate::canvas::Shape::new(
            crate::canvas::ShapeKind::Line {
                start: egui::Pos2::new(1.0, 1.0),
                end: egui::Pos2::new(9.0, 9.0),
            },
            Color32::BLACK,
            2.0,
            Color32::TRANSPARENT,
        );
        std::fs::write(&path, Scene::from_shapes(vec![line]).to_json().unwrap()).unwrap();

        let config = GameConfig {
            initial_scene: Some(path),
            ..GameConfig::default()
        };
        let scene = config.load_initial_scene().unwrap().unwrap();
        assert_eq!(scene.len(), 1);

        assert!(GameConfig::default().load_initial_scene().unwrap().is_none());
    }

    #[test]
    fn test_missing_initial_scene_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig {
            initial_scene: Some(dir.path().join("nope.json")),
            ..GameConfig::default()
        };
        assert!(matches!(config.load_initial_scene(), Err(ConfigError::Read(_))));
    }

    #[test]
    fn test_from_file_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(GameConfig::from_file(&path), Err(ConfigError::Parse(_))));
    }
}
