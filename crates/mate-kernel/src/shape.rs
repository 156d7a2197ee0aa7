//! Shape trait definitions
//!
//! Kernels expose their solids to the assembly engine through [`Shape`].
//! The engine never looks inside a shape: it only asks what kind of shape it
//! is and hands it rigid transforms.

use std::fmt;

use glam::{DAffine3, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for kernel operations
#[derive(Debug, Clone, Error)]
pub enum KernelError {
    #[error("Invalid shape at index {index}: expected a solid, got {kind}")]
    InvalidShape { index: usize, kind: ShapeKind },

    #[error("Invalid shape at index {index}: handle has no usable geometry")]
    EmptyShape { index: usize },

    #[error("Degenerate rotation axis: {0}")]
    DegenerateAxis(DVec3),
}

/// Result type for kernel operations
pub type KernelResult<T> = Result<T, KernelError>;

/// Topological kind of a shape handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Solid,
    Compound,
    Shell,
    Face,
    Edge,
    Vertex,
}

impl ShapeKind {
    /// Whether shapes of this kind can be aggregated as solids
    pub fn is_solid_like(&self) -> bool {
        matches!(self, ShapeKind::Solid | ShapeKind::Compound)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeKind::Solid => "Solid",
            ShapeKind::Compound => "Compound",
            ShapeKind::Shell => "Shell",
            ShapeKind::Face => "Face",
            ShapeKind::Edge => "Edge",
            ShapeKind::Vertex => "Vertex",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An opaque geometry handle supplied by a kernel
///
/// Implementations must treat transforms as pure: the receiver is left
/// untouched and a moved copy is returned.
pub trait Shape: Clone + fmt::Debug {
    /// Topological kind of this handle
    fn kind(&self) -> ShapeKind;

    /// Whether the handle carries usable geometry
    fn is_valid(&self) -> bool {
        true
    }

    /// Apply an affine transform, returning the moved shape
    fn transformed(&self, transform: &DAffine3) -> Self;

    /// Translate by `delta`
    fn translated(&self, delta: DVec3) -> Self {
        self.transformed(&DAffine3::from_translation(delta))
    }

    /// Rotate by `angle` radians about the axis through `origin`
    ///
    /// The axis may have any non-zero length.
    fn rotated(&self, angle: f64, axis: DVec3, origin: DVec3) -> KernelResult<Self> {
        let axis = axis
            .try_normalize()
            .ok_or(KernelError::DegenerateAxis(axis))?;
        let rotation = DAffine3::from_translation(origin)
            * DAffine3::from_axis_angle(axis, angle)
            * DAffine3::from_translation(-origin);
        Ok(self.transformed(&rotation))
    }
}
