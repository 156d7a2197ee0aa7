//! Anchor constraint linking two parts

use serde::{Deserialize, Serialize};

/// How a slave part's anchor meets a master part's anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Anchor name on the master part
    pub master_anchor: String,
    /// Anchor name on the slave part
    pub slave_anchor: String,
    /// Standoff along the master anchor direction
    #[serde(default)]
    pub distance: f64,
    /// Spin about the master anchor direction, in degrees
    #[serde(default)]
    pub angle: f64,
}

impl Constraint {
    /// Create a flush, unrotated constraint between two anchors
    pub fn new(master_anchor: impl Into<String>, slave_anchor: impl Into<String>) -> Self {
        Self {
            master_anchor: master_anchor.into(),
            slave_anchor: slave_anchor.into(),
            distance: 0.0,
            angle: 0.0,
        }
    }

    /// Set the standoff distance
    pub fn distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Set the spin angle in degrees
    pub fn angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }
}

/// A directed edge of the assembly graph
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub master: uuid::Uuid,
    pub slave: uuid::Uuid,
    pub constraint: Constraint,
}
