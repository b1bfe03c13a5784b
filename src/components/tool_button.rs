use egui::{Align2, Color32, FontId, Response, Sense, Stroke, Ui, vec2};

use crate::canvas::CanvasTool;

/// Square icon button for one canvas tool
pub struct ToolButton {
    pub tool: CanvasTool,
    pub selected: bool,
}

impl ToolButton {
    pub fn new(tool: CanvasTool, selected: bool) -> Self {
        Self { tool, selected }
    }

    pub fn show(&self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(vec2(32.0, 32.0), Sense::click());

        if ui.is_rect_visible(rect) {
            let dark = ui.visuals().dark_mode;
            let bg_color = match (self.selected, response.hovered(), dark) {
                (true, _, _) => Color32::from_rgb(100, 181, 246),
                (false, true, true) => Color32::from_gray(60),
                (false, false, true) => Color32::from_gray(40),
                (false, true, false) => Color32::from_gray(215),
                (false, false, false) => Color32::from_gray(230),
            };
            let text_color = if self.selected || !dark {
                Color32::BLACK
            } else {
                Color32::WHITE
            };

            ui.painter().rect_filled(rect, 4.0, bg_color);
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.tool.icon(),
                FontId::proportional(20.0),
                text_color,
            );

            if self.selected {
                ui.painter()
                    .rect_stroke(rect, 4.0, Stroke::new(2.0, Color32::from_rgb(33, 150, 243)));
            }
        }

        response.on_hover_text(self.tool.label())
    }
}
