mod drawing_panel;
mod gallery_panel;
mod notices;
mod sidebar;
mod upload_panel;

pub use drawing_panel::drawing_panel;
pub use gallery_panel::gallery_panel;
pub use notices::notices;
pub use sidebar::sidebar;
pub use upload_panel::upload_panel;

/// Render `panel` headlessly for two frames and return the text it drew
#[cfg(test)]
pub(crate) fn rendered_text(
    app: &mut crate::PlaceGuessApp,
    panel: impl Fn(&mut crate::PlaceGuessApp, &mut egui::Ui),
) -> String {
    fn collect(shape: &egui::Shape, text: &mut String) {
        match shape {
            egui::Shape::Text(shape) => {
                text.push_str(shape.galley.text());
                text.push('\n');
            }
            egui::Shape::Vec(shapes) => shapes.iter().for_each(|shape| collect(shape, text)),
            _ => {}
        }
    }

    let ctx = egui::Context::default();
    let mut text = String::new();
    // the first frame only sizes grids
    for _ in 0..2 {
        text.clear();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| panel(app, ui));
        });
        for clipped in &output.shapes {
            collect(&clipped.shape, &mut text);
        }
    }
    text
}
