//! Anchor definition and propagation

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::math::{GeometryError, GeometryResult, Transform};

/// Mating reference on a part: a position and the direction its face points to
///
/// The direction need not be unit length, but it is always finite and
/// non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnchorDef", into = "AnchorDef")]
pub struct Anchor {
    position: DVec3,
    direction: DVec3,
}

/// Unvalidated wire form of [`Anchor`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct AnchorDef {
    position: DVec3,
    direction: DVec3,
}

impl Anchor {
    /// Create an anchor, rejecting non-finite values and a zero direction
    pub fn new(position: DVec3, direction: DVec3) -> GeometryResult<Self> {
        if !position.is_finite() {
            return Err(GeometryError::DegenerateInput(format!(
                "anchor position is not finite: {position}"
            )));
        }
        if !direction.is_finite() || direction == DVec3::ZERO {
            return Err(GeometryError::DegenerateInput(format!(
                "anchor direction must be finite and non-zero: {direction}"
            )));
        }
        Ok(Self {
            position,
            direction,
        })
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Move the anchor by `transform`
    ///
    /// The position goes through the full affine map, the direction through
    /// the linear block only.
    pub fn transformed(&self, transform: &Transform) -> Anchor {
        Anchor {
            position: transform.transform_point(self.position),
            direction: transform.transform_vector(self.direction),
        }
    }
}

impl TryFrom<AnchorDef> for Anchor {
    type Error = GeometryError;

    fn try_from(def: AnchorDef) -> Result<Self, Self::Error> {
        Anchor::new(def.position, def.direction)
    }
}

impl From<Anchor> for AnchorDef {
    fn from(anchor: Anchor) -> Self {
        Self {
            position: anchor.position,
            direction: anchor.direction,
        }
    }
}

/// Apply `transform` to `anchor`, returning the moved anchor
pub fn apply_to_anchor(anchor: &Anchor, transform: &Transform) -> Anchor {
    anchor.transformed(transform)
}
