use egui::{Button, Key, KeyboardShortcut, Modifiers};

use super::command::{Command, CommandHistory};
use super::raster;
use super::scene::Scene;
use super::surface::{PointerEvent, Surface};
use super::tool::ToolState;
use super::{CanvasConfig, CanvasExport, CanvasResponse, CanvasTool, CanvasWidget, ExportPayload};
use crate::error::ExportError;

const UNDO_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
const REDO_SHORTCUT: KeyboardShortcut =
    KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::Z);

/// Sketching canvas with shape tools, undo/redo and optional initial content
#[derive(Debug, Default)]
pub struct SketchCanvas {
    scene: Scene,
    history: CommandHistory,
    tools: ToolState,
    initial_applied: bool,
    last_tool: CanvasTool,
}

impl SketchCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Apply an edit as if it had been drawn by hand
    pub fn execute(&mut self, command: Command) {
        self.history.execute(command, &mut self.scene);
    }

    pub fn undo(&mut self) -> bool {
        self.tools.cancel(&mut self.scene);
        self.history.undo(&mut self.scene)
    }

    pub fn redo(&mut self) -> bool {
        self.tools.cancel(&mut self.scene);
        self.history.redo(&mut self.scene)
    }

    fn apply_initial_data(&mut self, config: &CanvasConfig) {
        if self.initial_applied {
            return;
        }
        self.initial_applied = true;

        if let Some(initial) = &config.initial_data {
            log::info!("Loading {} shapes into the sketch canvas", initial.len());
            self.scene = initial.clone();
            self.history.clear();
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui, config: &CanvasConfig) -> bool {
        let editable = !config.read_only;
        let mut changed = false;

        ui.horizontal(|ui| {
            if ui
                .add_enabled(editable && self.history.can_undo(), Button::new("↶ Undo"))
                .on_hover_text("Ctrl+Z")
                .clicked()
            {
                changed |= self.undo();
            }
            if ui
                .add_enabled(editable && self.history.can_redo(), Button::new("↷ Redo"))
                .on_hover_text("Ctrl+Shift+Z")
                .clicked()
            {
                changed |= self.redo();
            }
            if ui
                .add_enabled(editable && !self.scene.is_empty(), Button::new("🗑 Erase all"))
                .clicked()
            {
                self.tools.cancel(&mut self.scene);
                self.execute(Command::Clear { removed: Vec::new() });
                changed = true;
            }

            ui.separator();
            ui.label(format!("{} shapes", self.scene.len()));
            if config.read_only {
                ui.weak("(view only)");
            }
        });

        if editable {
            // Redo first: Ctrl+Z would also match Ctrl+Shift+Z
            let (redo, undo) = ui.input_mut(|i| {
                (i.consume_shortcut(&REDO_SHORTCUT), i.consume_shortcut(&UNDO_SHORTCUT))
            });
            if redo {
                changed |= self.redo();
            } else if undo {
                changed |= self.undo();
            }
        }

        changed
    }
}

impl CanvasWidget for SketchCanvas {
    fn name(&self) -> &'static str {
        "sketch"
    }

    fn show(&mut self, ui: &mut egui::Ui, config: &CanvasConfig) -> CanvasResponse {
        self.apply_initial_data(config);

        if config.tool != self.last_tool {
            self.tools.cancel(&mut self.scene);
            self.last_tool = config.tool;
        }

        let mut changed = self.toolbar(ui, config);
        let surface = Surface::allocate(ui, config);

        if !config.read_only {
            for event in surface.pointer_events(ui, self.tools.is_active()) {
                let command = match event {
                    PointerEvent::Down(pos) => self.tools.pointer_down(pos, &self.scene, config),
                    PointerEvent::Move(pos) => {
                        self.tools.pointer_move(pos, &mut self.scene);
                        None
                    }
                    PointerEvent::Up(pos) => self.tools.pointer_up(pos, &mut self.scene),
                };
                if let Some(command) = command {
                    self.execute(command);
                    changed = true;
                }
            }
        }

        surface.paint_scene(self.scene.shapes(), self.tools.draft());

        CanvasResponse {
            changed,
            stroke_count: self.scene.len(),
        }
    }

    fn export(&mut self, config: &CanvasConfig) -> Result<CanvasExport, ExportError> {
        let png = raster::render_png(&self.scene, config.width, config.height, config.background_color)?;
        Ok(CanvasExport {
            payload: Some(ExportPayload::Png(png)),
            stroke_count: self.scene.len(),
        })
    }

    fn clear(&mut self) {
        self.scene = Scene::new();
        self.history.clear();
        self.tools = ToolState::new();
    }

    fn stroke_count(&self) -> usize {
        self.scene.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::shape::Shape;
    use egui::{Color32, Pos2};

    fn stroke() -> Shape {
        Shape::freehand(vec![Pos2::new(1.0, 1.0), Pos2::new(9.0, 9.0)], Color32::BLACK, 3.0)
    }

    #[test]
    fn test_initial_data_applied_once() {
        let mut canvas = SketchCanvas::new();
        let config = CanvasConfig {
            initial_data: Some(Scene::from_shapes(vec![stroke()])),
            ..CanvasConfig::default()
        };

        canvas.apply_initial_data(&config);
        assert_eq!(canvas.stroke_count(), 1);

        canvas.clear();
        canvas.apply_initial_data(&config);
        assert_eq!(canvas.stroke_count(), 0);
    }

    #[test]
    fn test_export_returns_png_bytes() {
        let mut canvas = SketchCanvas::new();
        canvas.execute(Command::AddShape(stroke()));

        let config = CanvasConfig { width: 32, height: 16, ..CanvasConfig::default() };
        let export = canvas.export(&config).unwrap();
        assert_eq!(export.stroke_count, 1);

        match export.payload {
            Some(ExportPayload::Png(bytes)) => {
                let image = image::load_from_memory(&bytes).unwrap();
                assert_eq!((image.width(), image.height()), (32, 16));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_undo_after_clear_restores() {
        let mut canvas = SketchCanvas::new();
        canvas.execute(Command::AddShape(stroke()));
        canvas.execute(Command::Clear { removed: Vec::new() });
        assert_eq!(canvas.stroke_count(), 0);

        assert!(canvas.undo());
        assert_eq!(canvas.stroke_count(), 1);
        assert!(canvas.redo());
        assert_eq!(canvas.stroke_count(), 0);
    }

    #[test]
    fn test_show_renders_headless() {
        let ctx = egui::Context::default();
        let mut canvas = SketchCanvas::new();
        canvas.execute(Command::AddShape(stroke()));
        let config = CanvasConfig { width: 100, height: 80, ..CanvasConfig::default() };

        let mut response = CanvasResponse::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                response = canvas.show(ui, &config);
            });
        });

        assert!(!response.changed);
        assert_eq!(response.stroke_count, 1);
    }
}
