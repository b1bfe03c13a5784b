use egui::Vec2;

use super::scene::Scene;
use super::shape::{Shape, ShapeId};

/// Undoable edits to a scene
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddShape(Shape),
    MoveShape { id: ShapeId, delta: Vec2 },
    /// Wipe the canvas. Holds the removed shapes once executed.
    Clear { removed: Vec<Shape> },
}

impl Command {
    pub fn execute(&mut self, scene: &mut Scene) {
        match self {
            Command::AddShape(shape) => scene.add(shape.clone()),
            Command::MoveShape { id, delta } => {
                if !scene.translate(*id, *delta) {
                    log::warn!("Move of unknown shape {:?} ignored", id);
                }
            }
            Command::Clear { removed } => *removed = scene.take_all(),
        }
    }

    pub fn undo(&self, scene: &mut Scene) {
        match self {
            Command::AddShape(shape) => {
                scene.remove(shape.id);
            }
            Command::MoveShape { id, delta } => {
                scene.translate(*id, -*delta);
            }
            Command::Clear { removed } => scene.restore(removed.clone()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Command::AddShape(_) => "Add shape",
            Command::MoveShape { .. } => "Move shape",
            Command::Clear { .. } => "Clear",
        }
    }
}

/// Undo/redo stacks for one canvas
#[derive(Debug, Default, Clone)]
pub struct CommandHistory {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a command and record it for undo
    pub fn execute(&mut self, mut command: Command, scene: &mut Scene) {
        command.execute(scene);
        log::debug!("Executed {}", command.label());
        self.undo_stack.push(command);
        self.redo_stack.clear();
    }

    /// Returns false when there is nothing to undo
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        match self.undo_stack.pop() {
            Some(command) => {
                command.undo(scene);
                self.redo_stack.push(command);
                true
            }
            None => false,
        }
    }

    /// Returns false when there is nothing to redo
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        match self.redo_stack.pop() {
            Some(mut command) => {
                command.execute(scene);
                self.undo_stack.push(command);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
