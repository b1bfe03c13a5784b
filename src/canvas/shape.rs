use egui::{Color32, Painter, Pos2, Rect, Shape as EguiShape, Stroke as EguiStroke, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Extra slack around thin shapes when picking them with the pointer
pub const HIT_TOLERANCE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Geometry of a drawn shape, in canvas coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    Freehand { points: Vec<Pos2> },
    Line { start: Pos2, end: Pos2 },
    Rect { min: Pos2, max: Pos2 },
    Circle { center: Pos2, radius: f32 },
    Point { center: Pos2, radius: f32 },
}

/// A finished mark on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(default)]
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub stroke_color: Color32,
    pub stroke_width: f32,
    /// Interior color of rectangles and circles
    #[serde(default = "transparent")]
    pub fill_color: Color32,
}

fn transparent() -> Color32 {
    Color32::TRANSPARENT
}

impl Shape {
    pub fn new(kind: ShapeKind, stroke_color: Color32, stroke_width: f32, fill_color: Color32) -> Self {
        Self {
            id: ShapeId::new(),
            kind,
            stroke_color,
            stroke_width,
            fill_color,
        }
    }

    pub fn freehand(points: Vec<Pos2>, color: Color32, width: f32) -> Self {
        Self::new(ShapeKind::Freehand { points }, color, width, Color32::TRANSPARENT)
    }

    /// Bounding box including half the stroke width
    pub fn bounds(&self) -> Rect {
        let pad = self.stroke_width / 2.0;
        match &self.kind {
            ShapeKind::Freehand { points } => calculate_bounds(points, pad),
            ShapeKind::Line { start, end } => calculate_bounds(&[*start, *end], pad),
            ShapeKind::Rect { min, max } => Rect::from_two_pos(*min, *max).expand(pad),
            ShapeKind::Circle { center, radius } => {
                Rect::from_center_size(*center, Vec2::splat(radius * 2.0)).expand(pad)
            }
            ShapeKind::Point { center, radius } => {
                Rect::from_center_size(*center, Vec2::splat(radius * 2.0))
            }
        }
    }

    /// Whether `pos` lands on this shape
    pub fn hit_test(&self, pos: Pos2) -> bool {
        let reach = self.stroke_width / 2.0 + HIT_TOLERANCE;
        match &self.kind {
            ShapeKind::Freehand { points } => match points.as_slice() {
                [] => false,
                [only] => only.distance(pos) <= reach,
                _ => points
                    .windows(2)
                    .any(|pair| distance_to_line_segment(pos, pair[0], pair[1]) <= reach),
            },
            ShapeKind::Line { start, end } => distance_to_line_segment(pos, *start, *end) <= reach,
            ShapeKind::Rect { min, max } => Rect::from_two_pos(*min, *max).expand(reach).contains(pos),
            ShapeKind::Circle { center, radius } => center.distance(pos) <= radius + reach,
            ShapeKind::Point { center, radius } => center.distance(pos) <= radius + HIT_TOLERANCE,
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match &mut self.kind {
            ShapeKind::Freehand { points } => {
                for point in points.iter_mut() {
                    *point += delta;
                }
            }
            ShapeKind::Line { start, end } | ShapeKind::Rect { min: start, max: end } => {
                *start += delta;
                *end += delta;
            }
            ShapeKind::Circle { center, .. } | ShapeKind::Point { center, .. } => {
                *center += delta;
            }
        }
    }

    /// A shape too small to be worth keeping, e.g. a click with the rectangle tool
    pub fn is_degenerate(&self) -> bool {
        match &self.kind {
            ShapeKind::Freehand { points } => points.is_empty(),
            ShapeKind::Line { start, end } => start == end,
            ShapeKind::Rect { min, max } => min.x == max.x || min.y == max.y,
            ShapeKind::Circle { radius, .. } => *radius <= 0.0,
            ShapeKind::Point { .. } => false,
        }
    }

    /// Paint on screen; `origin` is where canvas (0, 0) sits
    pub fn draw(&self, painter: &Painter, origin: Pos2) {
        let offset = origin.to_vec2();
        let stroke = EguiStroke::new(self.stroke_width, self.stroke_color);

        match &self.kind {
            ShapeKind::Freehand { points } => match points.as_slice() {
                [] => {}
                [only] => {
                    painter.circle_filled(*only + offset, self.stroke_width / 2.0, self.stroke_color);
                }
                _ => {
                    let points = points.iter().map(|p| *p + offset).collect();
                    painter.add(EguiShape::line(points, stroke));
                }
            },
            ShapeKind::Line { start, end } => {
                painter.line_segment([*start + offset, *end + offset], stroke);
            }
            ShapeKind::Rect { min, max } => {
                let rect = Rect::from_two_pos(*min, *max).translate(offset);
                painter.rect_filled(rect, 0.0, self.fill_color);
                painter.rect_stroke(rect, 0.0, stroke);
            }
            ShapeKind::Circle { center, radius } => {
                painter.circle(*center + offset, *radius, self.fill_color, stroke);
            }
            ShapeKind::Point { center, radius } => {
                painter.circle_filled(*center + offset, *radius, self.stroke_color);
            }
        }
    }
}

/// Distance from a point to a line segment
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = (point_vec.dot(line_vec) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Bounding box of a set of points, grown by `padding`
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut rect = Rect::from_min_max(points[0], points[0]);
    for point in &points[1..] {
        rect.extend_with(*point);
    }
    rect.expand(padding)
}
