//! Polyhedral reference solid

use std::collections::HashMap;

use glam::{DAffine3, DVec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shape::{Shape, ShapeKind};

/// A solid represented by its triangulated boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshSolid {
    pub id: Uuid,
    /// Vertex positions
    pub vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle)
    pub indices: Vec<u32>,
}

impl MeshSolid {
    /// Create a solid from raw triangle data
    pub fn new(vertices: Vec<DVec3>, indices: Vec<u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vertices,
            indices,
        }
    }

    /// Create an axis-aligned box spanning `[0, x] × [0, y] × [0, z]`
    pub fn cuboid(x: f64, y: f64, z: f64) -> Self {
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(x, 0.0, 0.0),
            DVec3::new(x, y, 0.0),
            DVec3::new(0.0, y, 0.0),
            DVec3::new(0.0, 0.0, z),
            DVec3::new(x, 0.0, z),
            DVec3::new(x, y, z),
            DVec3::new(0.0, y, z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1,  0, 3, 2, // bottom
            4, 5, 6,  4, 6, 7, // top
            0, 1, 5,  0, 5, 4, // front
            3, 7, 6,  3, 6, 2, // back
            0, 4, 7,  0, 7, 3, // left
            1, 2, 6,  1, 6, 5, // right
        ];
        Self::new(vertices, indices)
    }

    /// Check if the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounding box as `(min, max)`
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v))),
        )
    }

    /// Get the center of the bounding box
    pub fn center(&self) -> Option<DVec3> {
        self.bounding_box().map(|(min, max)| (min + max) / 2.0)
    }

    /// Check that every edge is shared by exactly two triangles
    pub fn is_closed(&self) -> bool {
        if self.is_empty() {
            return false;
        }

        let mut edges: HashMap<(u32, u32), usize> = HashMap::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                *edges.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }
        edges.values().all(|&count| count == 2)
    }
}

impl Shape for MeshSolid {
    fn kind(&self) -> ShapeKind {
        if self.is_closed() {
            ShapeKind::Solid
        } else {
            ShapeKind::Shell
        }
    }

    fn is_valid(&self) -> bool {
        let vertex_count = self.vertices.len();
        !self.is_empty()
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < vertex_count)
    }

    fn transformed(&self, transform: &DAffine3) -> Self {
        Self {
            id: self.id,
            vertices: self
                .vertices
                .iter()
                .map(|v| transform.transform_point3(*v))
                .collect(),
            indices: self.indices.clone(),
        }
    }
}
