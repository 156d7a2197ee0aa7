//! Part definition
//!
//! A part is a geometry handle plus named anchors. Every transform returns a
//! new part with the same identity, so placements can be chained freely.

use std::collections::HashMap;

use glam::DVec3;
use mate_kernel::Shape;
use thiserror::Error;
use uuid::Uuid;

use crate::anchor::Anchor;
use crate::config::SolverConfig;
use crate::math::{GeometryError, GeometryResult, Transform};
use crate::observer::SolveObserver;
use crate::solver::Solver;

/// Part-related errors
#[derive(Debug, Clone, Error)]
pub enum PartError {
    #[error("Anchor '{anchor}' not found on part '{part}'")]
    UnknownAnchor { part: String, anchor: String },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// A rigid body with named mating anchors
#[derive(Debug, Clone)]
pub struct Part<S> {
    id: Uuid,
    name: String,
    geometry: S,
    anchors: HashMap<String, Anchor>,
}

impl<S: Shape> Part<S> {
    /// Create a new part from geometry and its anchors
    pub fn new<N: Into<String>>(
        name: impl Into<String>,
        geometry: S,
        anchors: impl IntoIterator<Item = (N, Anchor)>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            geometry,
            anchors: anchors
                .into_iter()
                .map(|(name, anchor)| (name.into(), anchor))
                .collect(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &S {
        &self.geometry
    }

    pub fn anchors(&self) -> &HashMap<String, Anchor> {
        &self.anchors
    }

    /// Anchor names in sorted order
    pub fn anchor_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.anchors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn has_anchor(&self, name: &str) -> bool {
        self.anchors.contains_key(name)
    }

    /// Look up an anchor by name
    pub fn anchor(&self, name: &str) -> Result<&Anchor, PartError> {
        self.anchors.get(name).ok_or_else(|| PartError::UnknownAnchor {
            part: self.name.clone(),
            anchor: name.to_string(),
        })
    }

    /// Apply `transform` to the geometry and every anchor
    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            geometry: self.geometry.transformed(transform.as_affine()),
            anchors: self
                .anchors
                .iter()
                .map(|(name, anchor)| (name.clone(), anchor.transformed(transform)))
                .collect(),
        }
    }

    /// Translate by `delta`
    pub fn translate(&self, delta: DVec3) -> Self {
        self.transformed(&Transform::translation(delta))
    }

    /// Rotate by `angle` degrees about `axis` through `origin`
    pub fn rotate(&self, angle: f64, axis: DVec3, origin: DVec3) -> GeometryResult<Self> {
        let rotation = Transform::rotation_about(angle.to_radians(), axis, origin)?;
        Ok(self.transformed(&rotation))
    }

    /// Move this part so that `self_anchor` mates with `other_anchor` on `other`
    ///
    /// `other` is the master and stays put; the returned part is `self` moved
    /// by the solver transform. `angle` is in degrees.
    pub fn place<T: Shape>(
        &self,
        self_anchor: &str,
        other: &Part<T>,
        other_anchor: &str,
        angle: f64,
        distance: f64,
    ) -> Result<Self, PartError> {
        let solver = Solver::new(SolverConfig::default());
        self.place_with(&solver, self_anchor, other, other_anchor, angle, distance)
    }

    /// Same as [`Part::place`] with an explicit solver
    pub fn place_with<T: Shape, O: SolveObserver>(
        &self,
        solver: &Solver<O>,
        self_anchor: &str,
        other: &Part<T>,
        other_anchor: &str,
        angle: f64,
        distance: f64,
    ) -> Result<Self, PartError> {
        let slave = self.anchor(self_anchor)?;
        let master = other.anchor(other_anchor)?;

        let transform = solver.solve(master, slave, angle, distance)?;
        tracing::debug!(
            part = %self.name,
            self_anchor,
            other = %other.name,
            other_anchor,
            "Placed part"
        );
        Ok(self.transformed(&transform))
    }
}
