//! Geometry kernel boundary for mate
//!
//! This crate defines what the assembly engine needs from a geometry kernel:
//! - Shape: opaque solid handle that can be transformed
//! - MeshSolid: polyhedral reference implementation with primitives
//! - Compound: aggregation of many shapes into a single handle

mod compound;
mod mesh;
mod shape;

pub use compound::{Compound, compound};
pub use mesh::MeshSolid;
pub use shape::{KernelError, KernelResult, Shape, ShapeKind};
