use egui::Color32;

use crate::canvas::{CanvasConfig, CanvasTool, CanvasWidget, FreeDrawCanvas, SketchCanvas, Theme};
use crate::config::{CanvasKind, GameConfig};
use crate::controller::{NoticeLevel, PageController, UploadReport};
use crate::file_handler::FileHandler;
use crate::panels;
use crate::photo_store::PhotoStore;
use crate::thumbnail::ThumbnailCache;

pub const APP_TITLE: &str = "Couple's Place Guess: Drawing Game";

/// Longest edge of the full-size peek image
const PEEK_MAX_EDGE: u32 = 1024;

/// Drawing preferences remembered between runs. Canvas size and game state
/// are never persisted; they come from the config on every start.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Preferences {
    pub canvas_kind: CanvasKind,
    pub tool: CanvasTool,
    pub theme: Theme,
    pub stroke_color: Color32,
    pub background_color: Color32,
    pub fill_color: Color32,
    pub stroke_width: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::capture(CanvasKind::default(), &CanvasConfig::default())
    }
}

impl Preferences {
    pub fn from_config(config: &GameConfig) -> Self {
        Self::capture(config.canvas_kind, &CanvasConfig::from_defaults(&config.canvas))
    }

    pub fn capture(canvas_kind: CanvasKind, canvas: &CanvasConfig) -> Self {
        Self {
            canvas_kind,
            tool: canvas.tool,
            theme: canvas.theme,
            stroke_color: canvas.stroke_color,
            background_color: canvas.background_color,
            fill_color: canvas.fill_color,
            stroke_width: canvas.stroke_width,
        }
    }

    pub fn apply_to(&self, canvas: &mut CanvasConfig) {
        canvas.tool = self.tool;
        canvas.theme = self.theme;
        canvas.stroke_color = self.stroke_color;
        canvas.background_color = self.background_color;
        canvas.fill_color = self.fill_color;
        canvas.stroke_width = self.stroke_width;
    }
}

pub fn make_canvas(kind: CanvasKind) -> Box<dyn CanvasWidget> {
    match kind {
        CanvasKind::Sketch => Box::new(SketchCanvas::new()),
        CanvasKind::FreeDraw => Box::new(FreeDrawCanvas::new()),
    }
}

pub struct PlaceGuessApp {
    pub(crate) config: GameConfig,
    pub(crate) controller: PageController<Box<dyn CanvasWidget>>,
    pub(crate) file_handler: FileHandler,
    pub(crate) thumbnails: ThumbnailCache,
    pub(crate) peek_images: ThumbnailCache,
    pub(crate) canvas_kind: CanvasKind,
    pub(crate) last_upload: Option<UploadReport>,
}

impl PlaceGuessApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: GameConfig) -> Self {
        let preferences = cc
            .storage
            .and_then(|storage| eframe::get_value::<Preferences>(storage, eframe::APP_KEY));
        Self::with_preferences(config, preferences)
    }

    pub fn with_preferences(config: GameConfig, preferences: Option<Preferences>) -> Self {
        let preferences = preferences.unwrap_or_else(|| Preferences::from_config(&config));
        let store = PhotoStore::new(&config.upload_dir);
        log::info!(
            "Using photo store at {} with the {} canvas",
            store.dir().display(),
            preferences.canvas_kind.label()
        );

        let mut canvas_config = CanvasConfig::from_defaults(&config.canvas);
        preferences.apply_to(&mut canvas_config);
        canvas_config.read_only = config.view_only;

        let initial_scene = config.load_initial_scene();
        if let Ok(scene) = &initial_scene {
            canvas_config.initial_data = scene.clone();
        }

        let mut controller = PageController::new(store, make_canvas(preferences.canvas_kind), canvas_config);
        if let Err(err) = initial_scene {
            log::error!("Failed to load initial scene: {}", err);
            controller.notify(NoticeLevel::Error, format!("Could not load the starting drawing: {err}"));
        }

        Self {
            thumbnails: ThumbnailCache::new(config.thumbnail_size, 64),
            peek_images: ThumbnailCache::new(PEEK_MAX_EDGE, 4),
            canvas_kind: preferences.canvas_kind,
            controller,
            file_handler: FileHandler::new(),
            last_upload: None,
            config,
        }
    }

    pub fn controller(&self) -> &PageController<Box<dyn CanvasWidget>> {
        &self.controller
    }

    pub fn preferences(&self) -> Preferences {
        Preferences::capture(self.canvas_kind, self.controller.canvas_config())
    }

    /// Switch canvas skin. The current drawing is discarded.
    pub fn set_canvas_kind(&mut self, kind: CanvasKind) {
        if kind == self.canvas_kind {
            return;
        }
        self.canvas_kind = kind;
        self.controller.replace_canvas(make_canvas(kind));
    }

    /// Save staged uploads when the upload selection changed, or retry
    /// writes that failed last time
    pub(crate) fn sync_staged_uploads(&mut self) {
        if self.file_handler.take_changed() {
            self.controller.upload_selection_changed();
        } else if !self.last_upload.as_ref().is_some_and(UploadReport::needs_retry) {
            return;
        }
        self.save_staged_uploads();
    }

    /// Write staged files not yet saved in the current batch
    fn save_staged_uploads(&mut self) {
        let report = self.controller.sync_uploads(self.file_handler.files());
        if !report.saved.is_empty() {
            self.thumbnails.retain(self.controller.photos());
        }
        self.last_upload = Some(report);
    }

    pub(crate) fn report_rejected(&mut self, rejected: Vec<String>) {
        for name in rejected {
            self.controller.notify(
                NoticeLevel::Warning,
                format!("{name} was not added: only JPG and PNG images can be uploaded"),
            );
        }
    }

    /// Ask where to save the exported drawing and write it there
    pub(crate) fn save_download(&mut self) {
        let Some((file_name, bytes)) = self
            .controller
            .pending_download()
            .map(|download| (download.file_name, download.bytes.clone()))
        else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .set_title("Download drawing")
            .set_file_name(file_name)
            .add_filter("PNG image", &["png"])
            .save_file()
        else {
            return;
        };

        match std::fs::write(&path, &bytes) {
            Ok(()) => {
                log::info!("Saved drawing to {}", path.display());
                self.controller
                    .notify(NoticeLevel::Info, format!("Saved drawing to {}", path.display()));
            }
            Err(err) => {
                log::error!("Failed to save drawing to {}: {}", path.display(), err);
                self.controller
                    .notify(NoticeLevel::Error, format!("Could not save {}: {err}", path.display()));
            }
        }
    }
}

impl eframe::App for PlaceGuessApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.preferences());
    }

    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.thumbnails.begin_frame();
        self.peek_images.begin_frame();

        let rejected = self.file_handler.check_for_dropped_files(ctx);
        self.report_rejected(rejected);
        self.sync_staged_uploads();

        panels::sidebar(self, ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
                ui.heading(APP_TITLE);
                panels::notices(self, ui);

                panels::upload_panel(self, ui);
                ui.separator();
                panels::gallery_panel(self, ui);
                ui.separator();
                panels::drawing_panel(self, ui);

                ui.add_space(12.0);
                ui.weak("Tip: Invite friends to guess the place over a video call or in person!");
            });
        });

        self.file_handler.preview_files_being_dropped(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &std::path::Path) -> GameConfig {
        GameConfig {
            upload_dir: dir.to_path_buf(),
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_preferences_default_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.canvas_kind = CanvasKind::FreeDraw;
        config.canvas.stroke_width = 9.0;

        let app = PlaceGuessApp::with_preferences(config, None);
        let prefs = app.preferences();
        assert_eq!(prefs.canvas_kind, CanvasKind::FreeDraw);
        assert_eq!(prefs.stroke_width, 9.0);
        assert_eq!(app.controller().canvas().name(), "freedraw");
    }

    #[test]
    fn test_stored_preferences_win() {
        let dir = tempfile::tempdir().unwrap();
        let stored = Preferences {
            tool: CanvasTool::Circle,
            theme: Theme::Dark,
            stroke_color: Color32::RED,
            ..Preferences::default()
        };

        let app = PlaceGuessApp::with_preferences(config(dir.path()), Some(stored.clone()));
        assert_eq!(app.preferences(), stored);
        assert_eq!(app.controller().canvas_config().tool, CanvasTool::Circle);
    }

    #[test]
    fn test_canvas_size_always_comes_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.canvas.width = 640;
        config.canvas.height = 480;

        let stored = Preferences {
            stroke_width: 12.0,
            ..Preferences::default()
        };
        let app = PlaceGuessApp::with_preferences(config, Some(stored));

        let canvas = app.controller().canvas_config();
        assert_eq!((canvas.width, canvas.height), (640, 480));
        assert_eq!(canvas.stroke_width, 12.0);
    }

    #[test]
    fn test_stored_json_without_size_keys() {
        let prefs: Preferences = serde_json::from_str(r#"{ "canvas_kind": "free_draw", "stroke_width": 7.0 }"#).unwrap();
        assert_eq!(prefs.canvas_kind, CanvasKind::FreeDraw);
        assert_eq!(prefs.stroke_width, 7.0);
        assert_eq!(prefs.tool, CanvasTool::FreeDraw);
    }

    #[test]
    fn test_view_only_and_initial_scene_reach_the_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("scene.json");
        let dot = crate::canvas::Shape::new(
            crate::canvas::ShapeKind::Point { center: egui::Pos2::new(5.0, 5.0), radius: 3.0 },
            Color32::BLACK,
            1.0,
            Color32::BLACK,
        );
        std::fs::write(&scene_path, crate::canvas::Scene::from_shapes(vec![dot]).to_json().unwrap()).unwrap();

        let mut config = config(&dir.path().join("uploads"));
        config.view_only = true;
        config.initial_scene = Some(scene_path);

        let app = PlaceGuessApp::with_preferences(config, None);
        let canvas = app.controller().canvas_config();
        assert!(canvas.read_only);
        assert_eq!(canvas.initial_data.as_ref().map(|scene| scene.len()), Some(1));
        assert!(app.controller().notices().is_empty());
    }

    #[test]
    fn test_broken_initial_scene_becomes_a_notice() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("scene.json");
        std::fs::write(&scene_path, "{ not a scene").unwrap();

        let mut config = config(&dir.path().join("uploads"));
        config.initial_scene = Some(scene_path);

        let app = PlaceGuessApp::with_preferences(config, None);
        assert!(app.controller().canvas_config().initial_data.is_none());
        assert_eq!(app.controller().notices()[0].level, NoticeLevel::Error);
    }

    #[test]
    fn test_preferences_survive_json() {
        let prefs = Preferences::default();
        let json = serde_json::to_string(&prefs).unwrap();
        assert_eq!(serde_json::from_str::<Preferences>(&json).unwrap(), prefs);
    }

    #[test]
    fn test_switching_canvas_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = PlaceGuessApp::with_preferences(config(dir.path()), None);
        assert_eq!(app.controller().canvas().name(), "sketch");

        app.set_canvas_kind(CanvasKind::FreeDraw);
        assert_eq!(app.controller().canvas().name(), "freedraw");
        assert_eq!(app.preferences().canvas_kind, CanvasKind::FreeDraw);
    }

    #[test]
    fn test_staged_uploads_saved_on_change_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = PlaceGuessApp::with_preferences(config(dir.path()), None);

        app.file_handler
            .stage(crate::file_handler::IncomingFile::new("beach.jpg", vec![1u8, 2, 3]));
        app.sync_staged_uploads();
        assert_eq!(app.controller().photos(), ["beach.jpg"]);
        assert_eq!(app.last_upload.as_ref().unwrap().saved, vec!["beach.jpg".to_owned()]);

        std::fs::remove_file(dir.path().join("beach.jpg")).unwrap();
        app.sync_staged_uploads();
        assert!(!dir.path().join("beach.jpg").exists());
    }

    #[test]
    fn test_failed_uploads_retry_on_next_sync() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("uploads");
        std::fs::write(&blocker, b"in the way").unwrap();
        let mut app = PlaceGuessApp::with_preferences(config(&blocker), None);

        app.file_handler
            .stage(crate::file_handler::IncomingFile::new("park.png", vec![1u8]));
        app.sync_staged_uploads();
        assert!(app.last_upload.as_ref().unwrap().needs_retry());

        std::fs::remove_file(&blocker).unwrap();
        app.sync_staged_uploads();
        assert!(!app.last_upload.as_ref().unwrap().has_failures());
        assert_eq!(app.controller().photos(), ["park.png"]);
    }
}
