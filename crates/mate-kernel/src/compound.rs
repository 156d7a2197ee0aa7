//! Aggregation of shapes into a single compound handle

use glam::{DAffine3, DVec3};
use uuid::Uuid;

use crate::mesh::MeshSolid;
use crate::shape::{KernelError, KernelResult, Shape, ShapeKind};

/// Several shapes held together as one handle
#[derive(Debug, Clone)]
pub struct Compound<S> {
    id: Uuid,
    children: Vec<S>,
}

impl<S: Shape> Compound<S> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Shapes making up this compound, in input order
    pub fn children(&self) -> &[S] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Compound<MeshSolid> {
    /// Bounding box enclosing every child
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        self.children
            .iter()
            .filter_map(MeshSolid::bounding_box)
            .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
    }
}

impl<S: Shape> Shape for Compound<S> {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Compound
    }

    fn is_valid(&self) -> bool {
        self.children.iter().all(Shape::is_valid)
    }

    fn transformed(&self, transform: &DAffine3) -> Self {
        Self {
            id: self.id,
            children: self.children.iter().map(|c| c.transformed(transform)).collect(),
        }
    }
}

/// Combine solids into a single compound
///
/// Every input must be a valid solid (or compound of solids). The inputs are
/// cloned into the result and left untouched.
pub fn compound<S: Shape>(shapes: &[S]) -> KernelResult<Compound<S>> {
    for (index, shape) in shapes.iter().enumerate() {
        let kind = shape.kind();
        if !kind.is_solid_like() {
            tracing::error!(index, %kind, "Refusing to compound a non-solid shape");
            return Err(KernelError::InvalidShape { index, kind });
        }
        if !shape.is_valid() {
            tracing::error!(index, "Refusing to compound an invalid shape");
            return Err(KernelError::EmptyShape { index });
        }
    }

    tracing::debug!(count = shapes.len(), "Building compound");
    Ok(Compound {
        id: Uuid::new_v4(),
        children: shapes.to_vec(),
    })
}
