use super::command::Command;
use super::output::encode_data_url;
use super::raster;
use super::scene::Scene;
use super::surface::{PointerEvent, Surface};
use super::tool::ToolState;
use super::{CanvasConfig, CanvasExport, CanvasResponse, CanvasTool, CanvasWidget, ExportPayload};
use crate::error::ExportError;

/// Minimal freehand canvas: lines in the current color and width, nothing else.
///
/// Exports a PNG data URL together with the number of lines drawn.
#[derive(Debug, Default)]
pub struct FreeDrawCanvas {
    lines: Scene,
    tools: ToolState,
}

impl FreeDrawCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &Scene {
        &self.lines
    }

    /// Add a finished line directly
    pub fn push_line(&mut self, points: Vec<egui::Pos2>, config: &CanvasConfig) {
        self.lines.add(super::Shape::freehand(points, config.stroke_color, config.stroke_width));
    }
}

impl CanvasWidget for FreeDrawCanvas {
    fn name(&self) -> &'static str {
        "freedraw"
    }

    fn show(&mut self, ui: &mut egui::Ui, config: &CanvasConfig) -> CanvasResponse {
        ui.label(format!("Lines: {}", self.lines.len()));

        let surface = Surface::allocate(ui, config);
        let mut changed = false;

        if !config.read_only {
            let pen = CanvasConfig {
                tool: CanvasTool::FreeDraw,
                initial_data: None,
                ..config.clone()
            };

            for event in surface.pointer_events(ui, self.tools.is_active()) {
                let finished = match event {
                    PointerEvent::Down(pos) => self.tools.pointer_down(pos, &self.lines, &pen),
                    PointerEvent::Move(pos) => {
                        self.tools.pointer_move(pos, &mut self.lines);
                        None
                    }
                    PointerEvent::Up(pos) => self.tools.pointer_up(pos, &mut self.lines),
                };
                if let Some(Command::AddShape(line)) = finished {
                    self.lines.add(line);
                    changed = true;
                }
            }
        }

        surface.paint_scene(self.lines.shapes(), self.tools.draft());

        CanvasResponse {
            changed,
            stroke_count: self.lines.len(),
        }
    }

    fn export(&mut self, config: &CanvasConfig) -> Result<CanvasExport, ExportError> {
        let png = raster::render_png(&self.lines, config.width, config.height, config.background_color)?;
        Ok(CanvasExport {
            payload: Some(ExportPayload::DataUrl(encode_data_url(&png))),
            stroke_count: self.lines.len(),
        })
    }

    fn clear(&mut self) {
        self.lines = Scene::new();
        self.tools = ToolState::new();
    }

    fn stroke_count(&self) -> usize {
        self.lines.len()
    }

    fn supported_tools(&self) -> &'static [CanvasTool] {
        &[CanvasTool::FreeDraw]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::output::decode_data_url;
    use egui::Pos2;

    #[test]
    fn test_export_is_data_url_with_line_count() {
        let config = CanvasConfig { width: 40, height: 30, ..CanvasConfig::default() };
        let mut canvas = FreeDrawCanvas::new();
        canvas.push_line(vec![Pos2::new(2.0, 2.0), Pos2::new(30.0, 20.0)], &config);

        let export = canvas.export(&config).unwrap();
        assert_eq!(export.stroke_count, 1);

        let Some(ExportPayload::DataUrl(url)) = export.payload else {
            panic!("expected a data URL");
        };
        let png = decode_data_url(&url).unwrap();
        let image = image::load_from_memory(&png).unwrap();
        assert_eq!((image.width(), image.height()), (40, 30));
    }

    #[test]
    fn test_clear_forgets_lines() {
        let config = CanvasConfig::default();
        let mut canvas = FreeDrawCanvas::new();
        canvas.push_line(vec![Pos2::new(1.0, 1.0)], &config);
        canvas.clear();
        assert_eq!(canvas.stroke_count(), 0);
        assert_eq!(canvas.supported_tools(), &[CanvasTool::FreeDraw]);
    }
}
