use crate::PlaceGuessApp;

enum UploadAction {
    Unstage(usize),
    ClearAll,
}

fn format_size(bytes: usize) -> String {
    match bytes {
        b if b >= 1024 * 1024 => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
        b if b >= 1024 => format!("{:.0} KB", b as f64 / 1024.0),
        b => format!("{b} B"),
    }
}

pub fn upload_panel(app: &mut PlaceGuessApp, ui: &mut egui::Ui) {
    ui.heading("Step 1: Upload your photos");

    ui.horizontal(|ui| {
        if ui.button("📂 Browse…").clicked() {
            let rejected = app.file_handler.pick_files();
            app.report_rejected(rejected);
        }
        ui.weak("or drag JPG/PNG files onto the window");
    });

    let mut action = None;

    if !app.file_handler.is_empty() {
        ui.add_space(4.0);
        for (index, file) in app.file_handler.files().iter().enumerate() {
            ui.horizontal(|ui| {
                if ui.small_button("✖").on_hover_text("Remove from selection").clicked() {
                    action = Some(UploadAction::Unstage(index));
                }
                ui.label(&file.name);
                ui.weak(format_size(file.bytes.len()));
            });
        }

        ui.horizontal(|ui| {
            if ui.button("Clear selection").clicked() {
                action = Some(UploadAction::ClearAll);
            }
        });
    }

    if let Some(report) = &app.last_upload {
        if !report.saved.is_empty() {
            ui.weak(format!("Saved: {}", report.saved.join(", ")));
        }
        for (name, _) in &report.failed {
            ui.colored_label(ui.visuals().error_fg_color, format!("{name} not saved yet, retrying"));
        }
        for (name, reason) in &report.rejected {
            ui.colored_label(ui.visuals().warn_fg_color, format!("{name} skipped: {reason}"));
        }
    }

    match action {
        Some(UploadAction::Unstage(index)) => {
            app.file_handler.unstage(index);
        }
        Some(UploadAction::ClearAll) => app.file_handler.clear(),
        None => {}
    }

    app.sync_staged_uploads();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
