//! Anchor transform solver
//!
//! Computes the rigid transform that mates a slave anchor onto a master
//! anchor. Mating leaves one rotational degree of freedom about the master
//! axis, resolved by an explicit angle, and allows a standoff distance along
//! the master direction.

use std::f64::consts::PI;

use crate::anchor::Anchor;
use crate::config::SolverConfig;
use crate::math::{
    GeometryError, GeometryResult, Transform, angle_between, cross, normalize,
    perpendicular_axis, rotation_matrix, translation_matrix,
};
use crate::observer::{Alignment, SolveEvent, SolveObserver, TracingObserver};

/// Anchor solver with its tolerances and observer
#[derive(Debug, Clone)]
pub struct Solver<O = TracingObserver> {
    config: SolverConfig,
    observer: O,
}

impl Solver {
    /// Create a solver reporting to `tracing`
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            observer: TracingObserver,
        }
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl<O: SolveObserver> Solver<O> {
    /// Replace the observer
    pub fn with_observer<P: SolveObserver>(self, observer: P) -> Solver<P> {
        Solver {
            config: self.config,
            observer,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Transform bringing `slave` into opposition with `master`
    ///
    /// The slave origin lands on `master.position + normalize(master.direction) * distance`,
    /// the slave direction ends up pointing along `-master.direction`, and the
    /// body is spun by `angle` degrees about the master direction.
    pub fn solve(
        &self,
        master: &Anchor,
        slave: &Anchor,
        angle: f64,
        distance: f64,
    ) -> GeometryResult<Transform> {
        if !angle.is_finite() || !distance.is_finite() {
            return Err(invalid(format!(
                "angle and distance must be finite (angle: {angle}, distance: {distance})"
            )));
        }

        let master_dir = normalize(master.direction())
            .inspect_err(|e| tracing::error!("Master anchor direction: {}", e))?;
        let slave_dir = normalize(slave.direction())
            .inspect_err(|e| tracing::error!("Slave anchor direction: {}", e))?;

        if (master_dir.length() - 1.0).abs() > self.config.unit_tolerance {
            return Err(invalid(format!(
                "Unit anchor direction norm should be 1 +- {}, got {}",
                self.config.unit_tolerance,
                master_dir.length()
            )));
        }

        let anchors_angle = angle_between(master_dir, slave_dir)
            .inspect_err(|e| tracing::error!("Angle between anchors: {}", e))?;

        // `angle_between` uses this same cross product: a non-zero axis
        // always comes with a non-zero angle.
        let axis = cross(master_dir, slave_dir);
        let (axis, opposition_angle, alignment) =
            if axis.length() <= self.config.parallel_tolerance {
                // Parallel directions: any perpendicular axis works, but same-way
                // directions need a half turn and opposite ones need none.
                let alignment = if (master_dir + slave_dir).length() > master_dir.length() {
                    Alignment::Same
                } else {
                    Alignment::Opposite
                };
                let exact_angle = match alignment {
                    Alignment::Same => 0.0,
                    Alignment::Opposite => PI,
                };
                (
                    perpendicular_axis(master_dir, self.config.parallel_tolerance),
                    opposing_angle(exact_angle) + alignment.correction(),
                    Some(alignment),
                )
            } else {
                // Keep the axis exactly normal to the master direction
                let axis = axis - master_dir * axis.dot(master_dir);
                (axis, opposing_angle(anchors_angle), None)
            };

        let opposition = translation_matrix(master.position())
            * rotation_matrix(opposition_angle, axis)?
            * translation_matrix(-slave.position());

        let target = master.position() + master_dir * distance;
        let around_master = translation_matrix(target)
            * rotation_matrix(angle.to_radians(), master_dir)?
            * translation_matrix(-master.position());

        let transform = opposition.then(&around_master);

        self.observer.solved(&SolveEvent {
            master: *master,
            slave: *slave,
            angle,
            distance,
            anchors_angle,
            axis,
            opposition_angle,
            alignment,
            transform,
        });

        Ok(transform)
    }
}

/// Rotation that turns an angle between directions into a half turn
fn opposing_angle(anchors_angle: f64) -> f64 {
    (-anchors_angle).rem_euclid(PI)
}

fn invalid(message: String) -> GeometryError {
    tracing::error!("{}", message);
    GeometryError::DegenerateInput(message)
}

/// Solve with default tolerances, reporting to `tracing`
pub fn solve(
    master: &Anchor,
    slave: &Anchor,
    angle: f64,
    distance: f64,
) -> GeometryResult<Transform> {
    Solver::new(SolverConfig::default()).solve(master, slave, angle, distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::apply_to_anchor;
    use crate::observer::NullObserver;
    use approx::assert_relative_eq;
    use glam::DVec3;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<SolveEvent>>,
    }

    impl SolveObserver for Recorder {
        fn solved(&self, event: &SolveEvent) {
            self.events.borrow_mut().push(*event);
        }
    }

    fn anchor(position: [f64; 3], direction: [f64; 3]) -> Anchor {
        Anchor::new(DVec3::from(position), DVec3::from(direction)).unwrap()
    }

    #[test]
    fn test_mates_general_anchors() {
        let master = anchor([1.0, 2.0, 3.0], [0.0, 0.0, 1.0]);
        let slave = anchor([5.0, 5.0, 5.0], [1.0, 0.0, 0.0]);

        let t = solve(&master, &slave, 30.0, 2.0).unwrap();
        let moved = apply_to_anchor(&slave, &t);

        assert!(t.is_rigid(1e-12));
        assert!(moved.position().abs_diff_eq(DVec3::new(1.0, 2.0, 5.0), 1e-12));
        assert!(moved.direction().abs_diff_eq(-DVec3::Z, 1e-12));
    }

    #[test]
    fn test_distance_uses_unit_master_direction() {
        let master = anchor([0.0, 0.0, 0.0], [0.0, 0.0, 5.0]);
        let slave = anchor([0.0, 0.0, 0.0], [0.0, 3.0, 0.0]);

        let t = solve(&master, &slave, 0.0, 2.0).unwrap();
        let moved = slave.transformed(&t);
        assert!(moved.position().abs_diff_eq(DVec3::new(0.0, 0.0, 2.0), 1e-12));
        // Direction length is preserved, only its orientation changes
        assert!(moved.direction().abs_diff_eq(DVec3::new(0.0, 0.0, -3.0), 1e-12));
    }

    #[test]
    fn test_parallel_same_direction() {
        let master = anchor([1.0, 1.0, 1.0], [0.0, 0.0, 1.0]);
        let slave = anchor([4.0, -2.0, 0.5], [0.0, 0.0, 1.0]);
        let recorder = Recorder::default();
        let solver = Solver::new(SolverConfig::default()).with_observer(&recorder);

        let t = solver.solve(&master, &slave, 0.0, 0.0).unwrap();
        let moved = slave.transformed(&t);

        assert!(t.is_finite());
        assert!(t.is_rigid(1e-12));
        assert!(moved.position().abs_diff_eq(master.position(), 1e-12));
        assert!(moved.direction().abs_diff_eq(-DVec3::Z, 1e-12));

        let events = recorder.events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].alignment, Some(Alignment::Same));
        assert_relative_eq!(events[0].opposition_angle, PI);
    }

    #[test]
    fn test_parallel_opposite_direction() {
        let master = anchor([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let slave = anchor([0.0, 0.0, 3.0], [0.0, 0.0, -2.0]);
        let recorder = Recorder::default();
        let solver = Solver::new(SolverConfig::default()).with_observer(&recorder);

        let t = solver.solve(&master, &slave, 0.0, 0.0).unwrap();
        assert!(t.abs_diff_eq(&Transform::translation(DVec3::new(0.0, 0.0, -3.0)), 1e-12));

        let events = recorder.events.borrow();
        assert_eq!(events[0].alignment, Some(Alignment::Opposite));
        assert_eq!(Alignment::Opposite.correction(), 0.0);
        assert_ne!(Alignment::Same.correction(), Alignment::Opposite.correction());
        assert_relative_eq!(events[0].opposition_angle, 0.0);
    }

    #[test]
    fn test_parallel_to_x_uses_y_tie_break() {
        let master = anchor([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let slave = anchor([0.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        let recorder = Recorder::default();
        let solver = Solver::new(SolverConfig::default()).with_observer(&recorder);

        let t = solver.solve(&master, &slave, 0.0, 0.0).unwrap();
        assert!(
            slave
                .transformed(&t)
                .direction()
                .abs_diff_eq(DVec3::new(-2.0, 0.0, 0.0), 1e-12)
        );
        assert_eq!(recorder.events.borrow()[0].axis, -DVec3::Z);
    }

    #[test]
    fn test_already_mated_gives_identity() {
        let master = anchor([3.0, -1.0, 2.0], [1.0, 2.0, -0.5]);
        let slave = anchor([-4.0, 0.0, 7.0], [0.3, -0.2, 0.9]);

        let first = solve(&master, &slave, 47.0, 0.0).unwrap();
        let mated = slave.transformed(&first);

        let second = solve(&master, &mated, 0.0, 0.0).unwrap();
        assert!(second.abs_diff_eq(&Transform::IDENTITY, 1e-9));
    }

    #[test]
    fn test_angle_spins_about_master_axis() {
        let master = anchor([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let slave = anchor([0.0, 0.0, 0.0], [0.0, 0.0, -1.0]);

        let t = solve(&master, &slave, 90.0, 0.0).unwrap();
        assert!(t.transform_point(DVec3::X).abs_diff_eq(DVec3::Y, 1e-12));
        assert!(t.transform_vector(-DVec3::Z).abs_diff_eq(-DVec3::Z, 1e-12));
    }

    #[test]
    fn test_nearly_parallel_same_direction() {
        let master = anchor([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let slave = anchor([3.0, 0.0, 0.0], [1e-10, 0.0, 1.0]);
        let recorder = Recorder::default();
        let solver = Solver::new(SolverConfig::default()).with_observer(&recorder);

        let t = solver.solve(&master, &slave, 0.0, 0.0).unwrap();
        let moved = slave.transformed(&t);

        assert!(t.is_rigid(1e-12));
        assert!(moved.position().abs_diff_eq(DVec3::ZERO, 1e-12));
        assert!(
            moved.direction().normalize().abs_diff_eq(-DVec3::Z, 1e-12),
            "got {}",
            moved.direction()
        );

        let events = recorder.events.borrow();
        assert_eq!(events[0].alignment, None);
        assert!(events[0].anchors_angle > 0.0);
        assert_relative_eq!(events[0].opposition_angle, PI - 1e-10, max_relative = 1e-15);
    }

    #[test]
    fn test_nearly_parallel_skewed_anchors() {
        let position = DVec3::new(1.0, 2.0, 3.0);
        let master = Anchor::new(position, position).unwrap();
        let slave = Anchor::new(
            DVec3::new(-5.0, 4.0, 0.5),
            position + DVec3::new(3e-9, -1e-9, 2e-9),
        )
        .unwrap();

        let t = solve(&master, &slave, 0.0, 0.0).unwrap();
        let moved = slave.transformed(&t);

        let expected = -position.normalize();
        assert!(moved.position().abs_diff_eq(position, 1e-12));
        assert!(
            moved.direction().normalize().abs_diff_eq(expected, 1e-12),
            "expected {expected}, got {}",
            moved.direction().normalize()
        );

        // Nearly opposite directions need only a small turn
        let flipped = Anchor::new(slave.position(), -slave.direction()).unwrap();
        let t = solve(&master, &flipped, 0.0, 0.0).unwrap();
        assert!(
            flipped
                .transformed(&t)
                .direction()
                .normalize()
                .abs_diff_eq(expected, 1e-12)
        );
    }

    #[test]
    fn test_rejects_non_finite_parameters() {
        let master = anchor([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let slave = anchor([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let solver = Solver::new(SolverConfig::default()).with_observer(NullObserver);

        assert!(matches!(
            solver.solve(&master, &slave, f64::NAN, 0.0),
            Err(GeometryError::DegenerateInput(_))
        ));
        assert!(solver.solve(&master, &slave, 0.0, f64::INFINITY).is_err());
    }
}
