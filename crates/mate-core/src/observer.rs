//! Observation hooks for the solver and assembly resolution
//!
//! The solver and resolver report what they computed to a [`SolveObserver`]
//! handed to them. [`TracingObserver`] turns those reports into `tracing`
//! events; [`NullObserver`] drops them.

use uuid::Uuid;

use crate::anchor::Anchor;
use crate::assembly::Constraint;
use crate::math::Transform;

/// How two parallel anchor directions relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Directions point the same way; a half turn is needed to oppose them
    Same,
    /// Directions already oppose each other
    Opposite,
}

impl Alignment {
    /// Extra rotation (radians) added to the opposition angle
    pub fn correction(&self) -> f64 {
        match self {
            Alignment::Same => std::f64::consts::PI,
            Alignment::Opposite => 0.0,
        }
    }
}

/// Everything the solver computed for one anchor pair
#[derive(Debug, Clone, Copy)]
pub struct SolveEvent {
    pub master: Anchor,
    pub slave: Anchor,
    /// Free rotation about the master axis, in degrees
    pub angle: f64,
    pub distance: f64,
    /// Angle between the two anchor directions, in radians
    pub anchors_angle: f64,
    /// Rotation axis used to oppose the anchors
    pub axis: glam::DVec3,
    /// Rotation applied about `axis`, in radians
    pub opposition_angle: f64,
    /// Set when the directions were parallel and the axis was picked arbitrarily
    pub alignment: Option<Alignment>,
    pub transform: Transform,
}

/// One resolved assembly edge
#[derive(Debug, Clone, Copy)]
pub struct LinkEvent<'a> {
    pub master: Uuid,
    pub slave: Uuid,
    pub constraint: &'a Constraint,
    /// World transform of the slave part
    pub world: Transform,
}

/// Receives solver and resolver reports
pub trait SolveObserver {
    fn solved(&self, _event: &SolveEvent) {}

    fn link_resolved(&self, _event: &LinkEvent<'_>) {}
}

/// Reports to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SolveObserver for TracingObserver {
    fn solved(&self, event: &SolveEvent) {
        tracing::debug!(
            master.position = %event.master.position(),
            master.direction = %event.master.direction(),
            slave.position = %event.slave.position(),
            slave.direction = %event.slave.direction(),
            angle = event.angle,
            distance = event.distance,
            anchors_angle_deg = event.anchors_angle.to_degrees(),
            alignment = ?event.alignment,
            opposition_angle = event.opposition_angle,
            "Computed transformation from 2 anchors"
        );
    }

    fn link_resolved(&self, event: &LinkEvent<'_>) {
        tracing::trace!(
            master = %event.master,
            slave = %event.slave,
            master_anchor = %event.constraint.master_anchor,
            slave_anchor = %event.constraint.slave_anchor,
            origin = %event.world.translation_part(),
            "Resolved link"
        );
    }
}

/// Discards every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SolveObserver for NullObserver {}

impl<O: SolveObserver + ?Sized> SolveObserver for &O {
    fn solved(&self, event: &SolveEvent) {
        (**self).solved(event);
    }

    fn link_resolved(&self, event: &LinkEvent<'_>) {
        (**self).link_resolved(event);
    }
}
