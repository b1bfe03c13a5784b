//! The drawing surface.
//!
//! The page controller only talks to [`CanvasWidget`]: it hands over a
//! [`CanvasConfig`] every frame and asks for a [`CanvasExport`] when the
//! player wants to download the drawing. Two skins implement it:
//! [`SketchCanvas`] (shape tools, undo, initial scene) and
//! [`FreeDrawCanvas`] (freehand only).

use egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::CanvasDefaults;
use crate::error::ExportError;

pub mod command;
mod freedraw;
pub mod output;
pub mod raster;
pub mod scene;
pub mod shape;
mod sketch;
mod surface;
pub mod tool;

pub use command::{Command, CommandHistory};
pub use freedraw::FreeDrawCanvas;
pub use output::{DrawingOutput, PendingDownload};
pub use scene::Scene;
pub use shape::{Shape, ShapeId, ShapeKind};
pub use sketch::SketchCanvas;
pub use tool::ToolState;

/// Drawing tools offered by the canvas toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasTool {
    #[default]
    FreeDraw,
    Line,
    Rect,
    Circle,
    Point,
    /// Pick a shape and drag it around
    Transform,
}

impl CanvasTool {
    pub const ALL: [CanvasTool; 6] = [
        CanvasTool::FreeDraw,
        CanvasTool::Line,
        CanvasTool::Rect,
        CanvasTool::Circle,
        CanvasTool::Point,
        CanvasTool::Transform,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::FreeDraw => "Free draw",
            Self::Line => "Line",
            Self::Rect => "Rectangle",
            Self::Circle => "Circle",
            Self::Point => "Point",
            Self::Transform => "Move",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::FreeDraw => "✏",
            Self::Line => "╱",
            Self::Rect => "▭",
            Self::Circle => "○",
            Self::Point => "•",
            Self::Transform => "✋",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Color of the frame drawn around the drawing area
    pub fn frame_color(self) -> Color32 {
        match self {
            Self::Light => Color32::from_gray(160),
            Self::Dark => Color32::from_gray(70),
        }
    }

    pub fn backdrop_color(self) -> Color32 {
        match self {
            Self::Light => Color32::from_gray(235),
            Self::Dark => Color32::from_gray(30),
        }
    }
}

/// Everything a canvas needs to render one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background_color: Color32,
    pub stroke_color: Color32,
    pub stroke_width: f32,
    /// Interior of rectangles and circles
    pub fill_color: Color32,
    pub point_radius: f32,
    pub tool: CanvasTool,
    pub theme: Theme,
    pub read_only: bool,
    /// Scene loaded into the canvas the first time it is shown
    #[serde(skip)]
    pub initial_data: Option<Scene>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self::from_defaults(&CanvasDefaults::default())
    }
}

impl CanvasConfig {
    pub fn from_defaults(defaults: &CanvasDefaults) -> Self {
        Self {
            width: defaults.width,
            height: defaults.height,
            background_color: defaults.background_color,
            stroke_color: defaults.stroke_color,
            stroke_width: defaults.stroke_width,
            fill_color: Color32::from_rgba_unmultiplied(255, 165, 0, 77),
            point_radius: defaults.point_radius,
            tool: CanvasTool::default(),
            theme: Theme::default(),
            read_only: false,
            initial_data: None,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Image data handed back by a canvas on export
#[derive(Debug, Clone, PartialEq)]
pub enum ExportPayload {
    Png(Vec<u8>),
    /// `data:image/png;base64,...`
    DataUrl(String),
}

/// Result of asking a canvas to export
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanvasExport {
    /// `None` when the canvas has nothing to offer yet
    pub payload: Option<ExportPayload>,
    pub stroke_count: usize,
}

/// What happened on the canvas during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasResponse {
    /// The drawing changed this frame
    pub changed: bool,
    pub stroke_count: usize,
}

/// A drawing surface the page controller can render and export
pub trait CanvasWidget {
    /// Short name of this canvas skin, for logs
    fn name(&self) -> &'static str;

    /// Render the canvas and process this frame's pointer input
    fn show(&mut self, ui: &mut egui::Ui, config: &CanvasConfig) -> CanvasResponse;

    /// Produce an image of the current drawing. Called once per export request.
    fn export(&mut self, config: &CanvasConfig) -> Result<CanvasExport, ExportError>;

    /// Wipe the drawing
    fn clear(&mut self);

    /// Number of finished strokes and shapes
    fn stroke_count(&self) -> usize;

    /// Tools this canvas understands; the toolbar only offers these
    fn supported_tools(&self) -> &'static [CanvasTool] {
        &CanvasTool::ALL
    }
}

impl<C: CanvasWidget + ?Sized> CanvasWidget for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn show(&mut self, ui: &mut egui::Ui, config: &CanvasConfig) -> CanvasResponse {
        (**self).show(ui, config)
    }

    fn export(&mut self, config: &CanvasConfig) -> Result<CanvasExport, ExportError> {
        (**self).export(config)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn stroke_count(&self) -> usize {
        (**self).stroke_count()
    }

    fn supported_tools(&self) -> &'static [CanvasTool] {
        (**self).supported_tools()
    }
}
