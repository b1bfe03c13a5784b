use egui::{Pos2, Vec2};

use super::command::Command;
use super::scene::Scene;
use super::shape::{Shape, ShapeId, ShapeKind};
use super::{CanvasConfig, CanvasTool};

/// What the active tool is doing between pointer down and pointer up
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    /// A shape being dragged out
    Drawing { draft: Shape, start: Pos2 },
    /// An existing shape being moved. The scene already shows it at `origin + moved`.
    Dragging { id: ShapeId, last: Pos2, moved: Vec2 },
}

/// Turns pointer input into scene commands for the selected tool
#[derive(Debug, Clone, Default)]
pub struct ToolState {
    gesture: Gesture,
}

impl ToolState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// The shape under construction, for preview
    pub fn draft(&self) -> Option<&Shape> {
        match &self.gesture {
            Gesture::Drawing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Handle a press. Returns a command for tools that finish on press.
    pub fn pointer_down(&mut self, pos: Pos2, scene: &Scene, config: &CanvasConfig) -> Option<Command> {
        let shape = |kind| Shape::new(kind, config.stroke_color, config.stroke_width, config.fill_color);

        self.gesture = Gesture::Idle;
        let gesture = match config.tool {
            CanvasTool::FreeDraw => Gesture::Drawing {
                draft: shape(ShapeKind::Freehand { points: vec![pos] }),
                start: pos,
            },
            CanvasTool::Line => Gesture::Drawing {
                draft: shape(ShapeKind::Line { start: pos, end: pos }),
                start: pos,
            },
            CanvasTool::Rect => Gesture::Drawing {
                draft: shape(ShapeKind::Rect { min: pos, max: pos }),
                start: pos,
            },
            CanvasTool::Circle => Gesture::Drawing {
                draft: shape(ShapeKind::Circle { center: pos, radius: 0.0 }),
                start: pos,
            },
            CanvasTool::Point => {
                return Some(Command::AddShape(shape(ShapeKind::Point {
                    center: pos,
                    radius: config.point_radius,
                })));
            }
            CanvasTool::Transform => match scene.hit(pos) {
                Some(id) => Gesture::Dragging { id, last: pos, moved: Vec2::ZERO },
                None => Gesture::Idle,
            },
        };
        self.gesture = gesture;
        None
    }

    /// Handle pointer motion while pressed
    pub fn pointer_move(&mut self, pos: Pos2, scene: &mut Scene) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Drawing { draft, start } => match &mut draft.kind {
                ShapeKind::Freehand { points } => {
                    if points.last() != Some(&pos) {
                        points.push(pos);
                    }
                }
                ShapeKind::Line { end, .. } => *end = pos,
                ShapeKind::Rect { max, .. } => *max = pos,
                ShapeKind::Circle { radius, .. } => *radius = start.distance(pos),
                ShapeKind::Point { .. } => {}
            },
            Gesture::Dragging { id, last, moved } => {
                let delta = pos - *last;
                if delta != Vec2::ZERO {
                    scene.translate(*id, delta);
                    *moved += delta;
                    *last = pos;
                }
            }
        }
    }

    /// Handle release. Returns the command that makes the gesture undoable.
    pub fn pointer_up(&mut self, pos: Pos2, scene: &mut Scene) -> Option<Command> {
        self.pointer_move(pos, scene);

        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => None,
            Gesture::Drawing { draft, .. } => {
                if draft.is_degenerate() {
                    None
                } else {
                    Some(Command::AddShape(draft))
                }
            }
            Gesture::Dragging { id, moved, .. } => {
                if moved == Vec2::ZERO {
                    return None;
                }
                // Undo the live preview; the command re-applies it through history
                scene.translate(id, -moved);
                Some(Command::MoveShape { id, delta: moved })
            }
        }
    }

    /// Abandon the current gesture, e.g. when the tool changes mid-drag
    pub fn cancel(&mut self, scene: &mut Scene) {
        if let Gesture::Dragging { id, moved, .. } = std::mem::take(&mut self.gesture) {
            scene.translate(id, -moved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CommandHistory;

    fn config(tool: CanvasTool) -> CanvasConfig {
        CanvasConfig { tool, ..CanvasConfig::default() }
    }

    #[test]
    fn test_freehand_collects_points() {
        let mut scene = Scene::new();
        let mut tools = ToolState::new();
        let cfg = config(CanvasTool::FreeDraw);

        assert!(tools.pointer_down(Pos2::new(1.0, 1.0), &scene, &cfg).is_none());
        tools.pointer_move(Pos2::new(2.0, 2.0), &mut scene);
        tools.pointer_move(Pos2::new(2.0, 2.0), &mut scene);
        let command = tools.pointer_up(Pos2::new(3.0, 3.0), &mut scene);

        match command {
            Some(Command::AddShape(Shape { kind: ShapeKind::Freehand { points }, .. })) => {
                assert_eq!(points.len(), 3);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!tools.is_active());
    }

    #[test]
    fn test_circle_radius_follows_drag() {
        let mut scene = Scene::new();
        let mut tools = ToolState::new();
        let cfg = config(CanvasTool::Circle);

        tools.pointer_down(Pos2::new(10.0, 10.0), &scene, &cfg);
        match tools.pointer_up(Pos2::new(13.0, 14.0), &mut scene) {
            Some(Command::AddShape(shape)) => {
                assert_eq!(shape.kind, ShapeKind::Circle { center: Pos2::new(10.0, 10.0), radius: 5.0 });
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_click_with_rect_tool_adds_nothing() {
        let mut scene = Scene::new();
        let mut tools = ToolState::new();
        let cfg = config(CanvasTool::Rect);

        tools.pointer_down(Pos2::new(10.0, 10.0), &scene, &cfg);
        assert!(tools.pointer_up(Pos2::new(10.0, 10.0), &mut scene).is_none());
    }

    #[test]
    fn test_point_finishes_on_press() {
        let scene = Scene::new();
        let mut tools = ToolState::new();
        let cfg = CanvasConfig { point_radius: 9.0, ..config(CanvasTool::Point) };

        match tools.pointer_down(Pos2::new(4.0, 4.0), &scene, &cfg) {
            Some(Command::AddShape(shape)) => {
                assert_eq!(shape.kind, ShapeKind::Point { center: Pos2::new(4.0, 4.0), radius: 9.0 });
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!tools.is_active());
    }

    #[test]
    fn test_transform_drag_is_one_undoable_move() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let dot = Shape::new(
            ShapeKind::Point { center: Pos2::new(50.0, 50.0), radius: 5.0 },
            egui::Color32::BLACK,
            1.0,
            egui::Color32::TRANSPARENT,
        );
        let id = dot.id;
        history.execute(Command::AddShape(dot), &mut scene);

        let mut tools = ToolState::new();
        let cfg = config(CanvasTool::Transform);
        tools.pointer_down(Pos2::new(50.0, 50.0), &scene, &cfg);
        tools.pointer_move(Pos2::new(60.0, 50.0), &mut scene);
        assert_eq!(scene.get(id).unwrap().bounds().center(), Pos2::new(60.0, 50.0));

        let command = tools.pointer_up(Pos2::new(70.0, 55.0), &mut scene).unwrap();
        assert_eq!(scene.get(id).unwrap().bounds().center(), Pos2::new(50.0, 50.0));

        history.execute(command, &mut scene);
        assert_eq!(scene.get(id).unwrap().bounds().center(), Pos2::new(70.0, 55.0));

        history.undo(&mut scene);
        assert_eq!(scene.get(id).unwrap().bounds().center(), Pos2::new(50.0, 50.0));
    }

    #[test]
    fn test_cancel_restores_dragged_shape() {
        let mut scene = Scene::new();
        let dot = Shape::new(
            ShapeKind::Point { center: Pos2::new(5.0, 5.0), radius: 3.0 },
            egui::Color32::BLACK,
            1.0,
            egui::Color32::TRANSPARENT,
        );
        let id = dot.id;
        scene.add(dot);

        let mut tools = ToolState::new();
        tools.pointer_down(Pos2::new(5.0, 5.0), &scene, &config(CanvasTool::Transform));
        tools.pointer_move(Pos2::new(25.0, 5.0), &mut scene);
        tools.cancel(&mut scene);

        assert_eq!(scene.get(id).unwrap().bounds().center(), Pos2::new(5.0, 5.0));
        assert!(!tools.is_active());
    }
}
