//! Rasterize a scene into PNG bytes using tiny-skia

use egui::Color32;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use super::scene::Scene;
use super::shape::{Shape, ShapeKind};
use crate::error::ExportError;

/// Render `scene` onto a `width`x`height` image filled with `background`
pub fn render_pixmap(
    scene: &Scene,
    width: u32,
    height: u32,
    background: Color32,
) -> Result<Pixmap, ExportError> {
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::EmptySurface { width, height })?;

    let [r, g, b, a] = background.to_srgba_unmultiplied();
    pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));

    for shape in scene.shapes() {
        draw_shape(&mut pixmap, shape);
    }

    Ok(pixmap)
}

/// Render `scene` and encode it as PNG
pub fn render_png(
    scene: &Scene,
    width: u32,
    height: u32,
    background: Color32,
) -> Result<Vec<u8>, ExportError> {
    let pixmap = render_pixmap(scene, width, height, background)?;
    let png = pixmap.encode_png().map_err(|err| ExportError::Encode(err.to_string()))?;
    log::debug!("Rendered {} shapes into a {}x{} PNG ({} bytes)", scene.len(), width, height, png.len());
    Ok(png)
}

fn paint_for(color: Color32) -> Paint<'static> {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

fn draw_shape(pixmap: &mut Pixmap, shape: &Shape) {
    let stroke_paint = paint_for(shape.stroke_color);
    let stroke = round_stroke(shape.stroke_width.max(0.1));

    match &shape.kind {
        ShapeKind::Freehand { points } => match points.as_slice() {
            [] => {}
            [only] => fill_circle(pixmap, only.x, only.y, shape.stroke_width / 2.0, &stroke_paint),
            [first, rest @ ..] => {
                let mut pb = PathBuilder::new();
                pb.move_to(first.x, first.y);
                for point in rest {
                    pb.line_to(point.x, point.y);
                }
                if let Some(path) = pb.finish() {
                    pixmap.stroke_path(&path, &stroke_paint, &stroke, Transform::identity(), None);
                }
            }
        },
        ShapeKind::Line { start, end } => {
            let mut pb = PathBuilder::new();
            pb.move_to(start.x, start.y);
            pb.line_to(end.x, end.y);
            if let Some(path) = pb.finish() {
                pixmap.stroke_path(&path, &stroke_paint, &stroke, Transform::identity(), None);
            }
        }
        ShapeKind::Rect { min, max } => {
            let rect = egui::Rect::from_two_pos(*min, *max);
            if let Some(rect) = tiny_skia::Rect::from_ltrb(rect.min.x, rect.min.y, rect.max.x, rect.max.y) {
                let path = PathBuilder::from_rect(rect);
                fill_and_stroke(pixmap, &path, shape, &stroke_paint, &stroke);
            }
        }
        ShapeKind::Circle { center, radius } => {
            if let Some(path) = PathBuilder::from_circle(center.x, center.y, *radius) {
                fill_and_stroke(pixmap, &path, shape, &stroke_paint, &stroke);
            }
        }
        ShapeKind::Point { center, radius } => {
            fill_circle(pixmap, center.x, center.y, *radius, &stroke_paint);
        }
    }
}

fn fill_and_stroke(pixmap: &mut Pixmap, path: &Path, shape: &Shape, stroke_paint: &Paint<'_>, stroke: &Stroke) {
    if shape.fill_color.a() > 0 {
        let fill = paint_for(shape.fill_color);
        pixmap.fill_path(path, &fill, FillRule::Winding, Transform::identity(), None);
    }
    if shape.stroke_width > 0.0 {
        pixmap.stroke_path(path, stroke_paint, stroke, Transform::identity(), None);
    }
}

fn fill_circle(pixmap: &mut Pixmap, x: f32, y: f32, radius: f32, paint: &Paint<'_>) {
    if let Some(path) = PathBuilder::from_circle(x, y, radius.max(0.5)) {
        pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Pos2;

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let p = pixmap.pixel(x, y).unwrap();
        [p.red(), p.green(), p.blue(), p.alpha()]
    }

    #[test]
    fn test_blank_scene_is_background() {
        let pixmap = render_pixmap(&Scene::new(), 8, 4, Color32::WHITE).unwrap();
        assert_eq!(pixmap.width(), 8);
        assert_eq!(pixel(&pixmap, 3, 2), [255, 255, 255, 255]);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(
            render_png(&Scene::new(), 0, 10, Color32::WHITE),
            Err(ExportError::EmptySurface { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_thick_line_covers_its_path() {
        let mut scene = Scene::new();
        scene.add(Shape::new(
            ShapeKind::Line { start: Pos2::new(0.0, 10.0), end: Pos2::new(20.0, 10.0) },
            Color32::BLACK,
            6.0,
            Color32::TRANSPARENT,
        ));

        let pixmap = render_pixmap(&scene, 20, 20, Color32::WHITE).unwrap();
        assert_eq!(pixel(&pixmap, 10, 10), [0, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 10, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn test_filled_rect_interior() {
        let mut scene = Scene::new();
        scene.add(Shape::new(
            ShapeKind::Rect { min: Pos2::new(18.0, 18.0), max: Pos2::new(2.0, 2.0) },
            Color32::BLACK,
            1.0,
            Color32::from_rgb(255, 0, 0),
        ));

        let pixmap = render_pixmap(&scene, 20, 20, Color32::WHITE).unwrap();
        assert_eq!(pixel(&pixmap, 10, 10), [255, 0, 0, 255]);
    }
}
