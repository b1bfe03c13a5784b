use crate::PlaceGuessApp;
use crate::canvas::{CanvasTool, CanvasWidget};
use crate::components::ToolButton;
use crate::controller::PageState;

pub fn drawing_panel(app: &mut PlaceGuessApp, ui: &mut egui::Ui) {
    ui.heading("Step 3: Draw while your partner guesses");

    let PageState::Drawing { photo } = app.controller.state() else {
        ui.label("Select a photo above to start drawing.");
        return;
    };

    egui::CollapsingHeader::new("Optional: Peek the selected photo (cheat mode)")
        .id_salt(("peek", app.controller.session().round()))
        .default_open(false)
        .show(ui, |ui| {
            ui.label(&photo);
            match app.peek_images.get_or_load(ui.ctx(), app.controller.store(), &photo) {
                Some(texture) => {
                    ui.add(egui::Image::new(&texture).max_width(600.0));
                }
                None => {
                    ui.colored_label(ui.visuals().warn_fg_color, "Could not load this photo");
                }
            }
        });

    ui.add_space(6.0);
    canvas_toolbar(app, ui);
    ui.add_space(6.0);

    let backdrop = app.controller.canvas_config().theme.backdrop_color();
    egui::Frame::none()
        .fill(backdrop)
        .inner_margin(8.0)
        .rounding(4.0)
        .show(ui, |ui| {
            let response = app.controller.show_canvas(ui);
            if response.changed {
                log::debug!("Canvas now has {} strokes", response.stroke_count);
            }
        });

    ui.add_space(6.0);
    drawing_actions(app, ui);
}

fn canvas_toolbar(app: &mut PlaceGuessApp, ui: &mut egui::Ui) {
    let supported = app.controller.canvas().supported_tools();
    let config = app.controller.canvas_config_mut();
    let active = if supported.contains(&config.tool) {
        config.tool
    } else {
        supported.first().copied().unwrap_or_default()
    };

    ui.horizontal_wrapped(|ui| {
        for &tool in supported {
            if ToolButton::new(tool, tool == active).show(ui).clicked() {
                log::info!("Tool selected from UI: {}", tool.label());
                config.tool = tool;
            }
        }

        ui.separator();
        ui.label("Color");
        ui.color_edit_button_srgba(&mut config.stroke_color);
        ui.label("Background");
        ui.color_edit_button_srgba(&mut config.background_color);

        if supported.contains(&CanvasTool::Rect) {
            ui.label("Fill");
            ui.color_edit_button_srgba(&mut config.fill_color);
        }

        ui.separator();
        ui.add(egui::Slider::new(&mut config.stroke_width, 1.0..=30.0).text("Width"));

        if config.tool == CanvasTool::Point {
            ui.add(egui::Slider::new(&mut config.point_radius, 1.0..=25.0).text("Point size"));
        }
    });
}

fn drawing_actions(app: &mut PlaceGuessApp, ui: &mut egui::Ui) {
    ui.horizontal_wrapped(|ui| {
        if ui.button("🧹 Clear drawing").clicked() {
            app.controller.clear_drawing();
        }

        if ui.button("📤 Export drawing").clicked() {
            app.controller.request_export();
            // the canvas answers on its next render
            ui.ctx().request_repaint();
        }

        match app.controller.pending_download() {
            Some(download) => {
                let label = format!("⬇ Download {}", download.file_name);
                let hover = format!("{} strokes, {} bytes", download.stroke_count, download.bytes.len());
                if ui.button(label).on_hover_text(hover).clicked() {
                    app.save_download();
                }
            }
            None => {
                ui.weak("Draw something, then export it to enable the download.");
            }
        }

        ui.separator();
        if ui.button("↩ Reset selection and start over").clicked() {
            app.controller.reset();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::file_handler::IncomingFile;
    use crate::panels::rendered_text;

    #[test]
    fn test_selected_photo_stays_hidden_until_peek() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig {
            upload_dir: dir.path().to_path_buf(),
            ..GameConfig::default()
        };
        let mut app = PlaceGuessApp::with_preferences(config, None);
        app.controller.sync_uploads(&[IncomingFile::new("eiffel.jpg", vec![1u8])]);
        app.controller.select("eiffel.jpg").unwrap();

        let text = rendered_text(&mut app, drawing_panel);
        assert!(text.contains("Peek the selected photo"));
        assert!(!text.contains("eiffel"));
    }
}
