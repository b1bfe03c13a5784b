use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::shape::{Shape, ShapeId};

/// Everything drawn on one canvas, bottom to top
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    shapes: Vec<Shape>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    /// Parse scene data handed to the canvas as initial content
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn add(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|shape| shape.id == id)?;
        Some(self.shapes.remove(index))
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id == id)
    }

    /// Move a shape, returning false if it no longer exists
    pub fn translate(&mut self, id: ShapeId, delta: Vec2) -> bool {
        match self.shapes.iter_mut().find(|shape| shape.id == id) {
            Some(shape) => {
                shape.translate(delta);
                true
            }
            None => false,
        }
    }

    /// The topmost shape under `pos`
    pub fn hit(&self, pos: Pos2) -> Option<ShapeId> {
        self.shapes.iter().rev().find(|shape| shape.hit_test(pos)).map(|shape| shape.id)
    }

    /// Remove every shape, handing them back so the clear can be undone
    pub fn take_all(&mut self) -> Vec<Shape> {
        std::mem::take(&mut self.shapes)
    }

    pub fn restore(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }
}
