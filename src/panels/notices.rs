use crate::PlaceGuessApp;
use crate::controller::NoticeLevel;

fn level_color(level: NoticeLevel, ui: &egui::Ui) -> egui::Color32 {
    match level {
        NoticeLevel::Info => ui.visuals().text_color(),
        NoticeLevel::Warning => ui.visuals().warn_fg_color,
        NoticeLevel::Error => ui.visuals().error_fg_color,
    }
}

/// Messages from the controller, each dismissable
pub fn notices(app: &mut PlaceGuessApp, ui: &mut egui::Ui) {
    if app.controller.notices().is_empty() {
        return;
    }

    let mut dismiss = None;
    for (index, notice) in app.controller.notices().iter().enumerate() {
        ui.horizontal(|ui| {
            if ui.small_button("✖").on_hover_text("Dismiss").clicked() {
                dismiss = Some(index);
            }
            ui.colored_label(level_color(notice.level, ui), &notice.message);
        });
    }

    if app.controller.notices().len() > 1 && ui.small_button("Dismiss all").clicked() {
        app.controller.dismiss_notices();
    } else if let Some(index) = dismiss {
        app.controller.dismiss_notice(index);
    }
    ui.separator();
}
