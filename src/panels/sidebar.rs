use crate::PlaceGuessApp;
use crate::canvas::Theme;
use crate::config::CanvasKind;

pub fn sidebar(app: &mut PlaceGuessApp, ctx: &egui::Context) {
    egui::SidePanel::left("instructions_panel")
        .resizable(true)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("How to play");
            ui.label("1. Upload photos of places you've been together.");
            ui.label("2. Pick one without showing it to your partner.");
            ui.label("3. Draw it while they try to guess where it is.");
            ui.label("4. Export the drawing to keep it.");

            ui.separator();
            ui.strong("Canvas");

            let mut kind = app.canvas_kind;
            for option in CanvasKind::ALL {
                ui.radio_value(&mut kind, option, option.label());
            }
            if kind != app.canvas_kind {
                log::info!("Canvas selected from UI: {}", kind.label());
                app.set_canvas_kind(kind);
            }

            ui.separator();
            ui.strong("Theme");

            let theme = &mut app.controller.canvas_config_mut().theme;
            ui.horizontal(|ui| {
                ui.selectable_value(theme, Theme::Light, "☀ Light");
                ui.selectable_value(theme, Theme::Dark, "🌙 Dark");
            });

            ui.separator();
            ui.weak(format!("Photos are kept in {}", app.controller.store().dir().display()));
            ui.weak(format!("{} photo(s) uploaded", app.controller.photos().len()));
        });
}
