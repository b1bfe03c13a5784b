use crate::PlaceGuessApp;
use crate::controller::PageState;
use crate::photo_store::PhotoId;

enum GalleryAction {
    Select(PhotoId),
    Remove(PhotoId),
}

pub fn gallery_panel(app: &mut PlaceGuessApp, ui: &mut egui::Ui) {
    ui.heading("Step 2: Preview and choose a photo to draw");

    if app.controller.state() == PageState::AwaitingPhotos {
        ui.label("No images found yet. Upload some to get started!");
        return;
    }

    let columns = app.config.gallery_columns.max(1);
    let spacing = 12.0;
    let tile = ((ui.available_width() - spacing * (columns - 1) as f32) / columns as f32).clamp(80.0, 320.0);

    let photos = app.controller.photos().to_vec();
    let mut action = None;

    egui::Grid::new("photo_gallery")
        .num_columns(columns)
        .spacing([spacing, spacing])
        .show(ui, |ui| {
            // Tiles never mark the photo being drawn
            for (index, photo) in photos.iter().enumerate() {
                ui.vertical(|ui| {
                    ui.set_width(tile);

                    match app.thumbnails.get_or_load(ui.ctx(), app.controller.store(), photo) {
                        Some(texture) => {
                            ui.add(egui::Image::new(&texture).max_width(tile).max_height(tile));
                        }
                        None => {
                            let (rect, _) = ui.allocate_exact_size(egui::vec2(tile, tile * 0.66), egui::Sense::hover());
                            ui.painter().rect_filled(rect, 4.0, ui.visuals().faint_bg_color);
                            ui.painter().text(
                                rect.center(),
                                egui::Align2::CENTER_CENTER,
                                "⚠ preview unavailable",
                                egui::FontId::proportional(14.0),
                                ui.visuals().weak_text_color(),
                            );
                        }
                    }

                    ui.label(photo);

                    ui.horizontal(|ui| {
                        if ui.button("Select this photo").clicked() {
                            action = Some(GalleryAction::Select(photo.clone()));
                        }
                        if ui.button("🗑 Remove").clicked() {
                            action = Some(GalleryAction::Remove(photo.clone()));
                        }
                    });
                });

                if (index + 1) % columns == 0 {
                    ui.end_row();
                }
            }
        });

    match action {
        Some(GalleryAction::Select(photo)) => {
            // failures are reported as notices
            let _ = app.controller.select(&photo);
        }
        Some(GalleryAction::Remove(photo)) => {
            let _ = app.controller.remove(&photo);
            app.thumbnails.retain(app.controller.photos());
            app.peek_images.retain(app.controller.photos());
        }
        None => {}
    }
}
