use egui::{Painter, Pos2, Rect, Response, Sense, Stroke, Vec2};

use super::CanvasConfig;
use super::shape::Shape;

/// Pointer input translated into canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
}

/// The allocated drawing area for one frame
pub(super) struct Surface {
    pub response: Response,
    pub painter: Painter,
}

impl Surface {
    /// Allocate the drawing area and paint its background and frame
    pub fn allocate(ui: &mut egui::Ui, config: &CanvasConfig) -> Self {
        let sense = if config.read_only { Sense::hover() } else { Sense::click_and_drag() };
        let (response, painter) = ui.allocate_painter(config.size(), sense);

        let rect = response.rect;
        painter.rect_filled(rect, 0.0, config.background_color);
        painter.rect_stroke(rect, 0.0, Stroke::new(1.0, config.theme.frame_color()));

        if !config.read_only && response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        Self { response, painter }
    }

    pub fn origin(&self) -> Pos2 {
        self.response.rect.min
    }

    /// Collect this frame's pointer events. `active` tells whether a gesture is in progress.
    pub fn pointer_events(&self, ui: &egui::Ui, active: bool) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        let (pressed, down, released, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });

        let Some(screen_pos) = pos else {
            return events;
        };
        let local = to_canvas(screen_pos, self.response.rect);

        let mut active = active;
        if pressed && self.response.hovered() {
            events.push(PointerEvent::Down(local));
            active = true;
        } else if active && down {
            events.push(PointerEvent::Move(local));
        }

        if released && active {
            events.push(PointerEvent::Up(local));
        }

        events
    }

    /// Paint finished shapes and the in-progress draft
    pub fn paint_scene(&self, shapes: &[Shape], draft: Option<&Shape>) {
        let origin = self.origin();
        for shape in shapes.iter().chain(draft) {
            shape.draw(&self.painter, origin);
        }
    }
}

/// Screen position → canvas position, clamped to the drawing area
fn to_canvas(screen_pos: Pos2, rect: Rect) -> Pos2 {
    let local = screen_pos - rect.min;
    let size: Vec2 = rect.size();
    Pos2::new(local.x.clamp(0.0, size.x), local.y.clamp(0.0, size.y))
}
