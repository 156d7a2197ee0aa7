//! Vector and matrix utilities
//!
//! Elementary 3-D algebra used by the solver: angles between vectors,
//! translation and axis-angle rotation transforms, and the [`Transform`]
//! type itself.

use std::ops::Mul;

use glam::{DAffine3, DMat3, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geometry-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
}

/// Result type for geometry operations
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Largest deviation from a proper rotation accepted for an external affine map
pub const RIGID_TOLERANCE: f64 = 1e-9;

/// A rigid 4x3 affine transform: 3x3 rotation block plus translation
///
/// Every constructor yields a proper rotation, so mapped directions never
/// collapse to zero. Arbitrary affine maps come in through
/// `Transform::try_from(DAffine3)`, which checks rigidity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "DAffine3", into = "DAffine3")]
pub struct Transform(DAffine3);

impl Transform {
    pub const IDENTITY: Self = Self(DAffine3::IDENTITY);

    pub fn as_affine(&self) -> &DAffine3 {
        &self.0
    }

    /// Translation by `t`
    pub fn translation(t: DVec3) -> Self {
        Self(DAffine3::from_translation(t))
    }

    /// Rotation by `angle` radians about `axis` through the origin
    pub fn rotation(angle: f64, axis: DVec3) -> GeometryResult<Self> {
        rotation_matrix(angle, axis)
    }

    /// Rotation by `angle` radians about `axis` through `origin`
    pub fn rotation_about(angle: f64, axis: DVec3, origin: DVec3) -> GeometryResult<Self> {
        Ok(Self::translation(origin) * rotation_matrix(angle, axis)? * Self::translation(-origin))
    }

    /// Compose so that `self` is applied first and `next` second
    pub fn then(&self, next: &Transform) -> Self {
        *next * *self
    }

    /// Linear (rotation) block
    pub fn linear(&self) -> DMat3 {
        self.0.matrix3
    }

    /// Translation column
    pub fn translation_part(&self) -> DVec3 {
        self.0.translation
    }

    /// Transform a point (linear block and translation)
    pub fn transform_point(&self, p: DVec3) -> DVec3 {
        self.0.transform_point3(p)
    }

    /// Transform a direction vector (linear block only)
    pub fn transform_vector(&self, v: DVec3) -> DVec3 {
        self.0.transform_vector3(v)
    }

    pub fn inverse(&self) -> Self {
        Self(self.0.inverse())
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Whether the linear block is a proper rotation (orthonormal, det +1)
    pub fn is_rigid(&self, tolerance: f64) -> bool {
        let m = self.linear();
        (m.transpose() * m).abs_diff_eq(DMat3::IDENTITY, tolerance)
            && (m.determinant() - 1.0).abs() <= tolerance
    }

    /// Compare element-wise within `tolerance`
    pub fn abs_diff_eq(&self, other: &Transform, tolerance: f64) -> bool {
        self.0.abs_diff_eq(other.0, tolerance)
    }

    /// Row-major 3x4 layout: `[R | t]`
    pub fn to_rows(&self) -> [[f64; 4]; 3] {
        let m = self.linear();
        let t = self.translation_part();
        [
            [m.x_axis.x, m.y_axis.x, m.z_axis.x, t.x],
            [m.x_axis.y, m.y_axis.y, m.z_axis.y, t.y],
            [m.x_axis.z, m.y_axis.z, m.z_axis.z, t.z],
        ]
    }
}

impl Mul for Transform {
    type Output = Transform;

    /// `a * b` applies `b` first, then `a`
    fn mul(self, rhs: Transform) -> Transform {
        Transform(self.0 * rhs.0)
    }
}

impl TryFrom<DAffine3> for Transform {
    type Error = GeometryError;

    fn try_from(affine: DAffine3) -> Result<Self, Self::Error> {
        let transform = Self(affine);
        if !transform.is_finite() || !transform.is_rigid(RIGID_TOLERANCE) {
            return Err(GeometryError::DegenerateInput(format!(
                "affine map is not a rigid motion: {affine:?}"
            )));
        }
        Ok(transform)
    }
}

impl From<Transform> for DAffine3 {
    fn from(transform: Transform) -> Self {
        transform.0
    }
}

fn check_vector(v: DVec3, what: &str) -> GeometryResult<()> {
    if !v.is_finite() {
        return Err(GeometryError::DegenerateInput(format!(
            "{what} is not finite: {v}"
        )));
    }
    if v == DVec3::ZERO {
        return Err(GeometryError::DegenerateInput(format!("{what} is the zero vector")));
    }
    Ok(())
}

/// Unit vector along `v`
pub fn normalize(v: DVec3) -> GeometryResult<DVec3> {
    check_vector(v, "vector")?;
    v.try_normalize().ok_or_else(|| {
        GeometryError::DegenerateInput(format!("vector cannot be normalized: {v}"))
    })
}

/// Angle between `u` and `v` in radians, in `[0, π]`
///
/// Computed as `atan2(|u × v|, u · v)`, which stays accurate for nearly
/// parallel and nearly opposite vectors. The result is non-zero whenever
/// `u × v` is.
pub fn angle_between(u: DVec3, v: DVec3) -> GeometryResult<f64> {
    check_vector(u, "first vector")?;
    check_vector(v, "second vector")?;

    let angle = u.cross(v).length().atan2(u.dot(v));
    if angle.is_nan() {
        return Err(GeometryError::DegenerateInput(format!(
            "angle between {u} and {v} is NaN"
        )));
    }
    Ok(angle)
}

/// Cross product `u × v`
pub fn cross(u: DVec3, v: DVec3) -> DVec3 {
    u.cross(v)
}

/// Translation transform by `t`
pub fn translation_matrix(t: DVec3) -> Transform {
    Transform::translation(t)
}

/// Right-handed rotation by `angle` radians about `axis`
///
/// `axis` may have any non-zero length.
pub fn rotation_matrix(angle: f64, axis: DVec3) -> GeometryResult<Transform> {
    if !angle.is_finite() {
        return Err(GeometryError::DegenerateInput(format!(
            "rotation angle is not finite: {angle}"
        )));
    }
    let axis = normalize(axis)?;
    Ok(Transform(DAffine3::from_axis_angle(axis, angle)))
}

/// An axis perpendicular to `dir`
///
/// Uses `X × dir`, or `Y × dir` when `dir` is parallel to X. `dir` should be
/// unit length; `tolerance` bounds the length under which `X × dir` counts as
/// zero.
pub fn perpendicular_axis(dir: DVec3, tolerance: f64) -> DVec3 {
    let k = if DVec3::X.cross(dir).length() <= tolerance {
        DVec3::Y
    } else {
        DVec3::X
    };
    k.cross(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_angle_between() {
        assert_relative_eq!(angle_between(DVec3::X, DVec3::Y).unwrap(), FRAC_PI_2);
        assert_relative_eq!(angle_between(DVec3::X, DVec3::X * 3.0).unwrap(), 0.0);
        assert_relative_eq!(angle_between(DVec3::Z, -DVec3::Z).unwrap(), PI);
        assert_relative_eq!(
            angle_between(DVec3::new(1.0, 1.0, 0.0), DVec3::X).unwrap(),
            PI / 4.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_angle_between_tiny_angles() {
        // cos(1e-10) rounds to 1.0, the sine does not
        let tilted = DVec3::new(1e-10, 0.0, 1.0);
        assert_relative_eq!(
            angle_between(DVec3::Z, tilted).unwrap(),
            1e-10,
            max_relative = 1e-6
        );
        assert_relative_eq!(
            angle_between(-DVec3::Z, tilted).unwrap(),
            PI - 1e-10,
            max_relative = 1e-15
        );
        assert!(angle_between(DVec3::Z, tilted).unwrap() > 0.0);

        let u = DVec3::new(1.0, 2.0, 3.0);
        let v = u + DVec3::new(3e-9, -1e-9, 2e-9);
        let angle = angle_between(u, v).unwrap();
        assert_relative_eq!(angle, u.cross(v).length() / u.length_squared(), max_relative = 1e-6);
    }

    #[test]
    fn test_angle_between_zero_vector() {
        assert!(matches!(
            angle_between(DVec3::ZERO, DVec3::X),
            Err(GeometryError::DegenerateInput(_))
        ));
        assert!(angle_between(DVec3::X, DVec3::ZERO).is_err());
        assert!(angle_between(DVec3::new(f64::NAN, 0.0, 0.0), DVec3::X).is_err());
    }

    #[test]
    fn test_cross() {
        assert_eq!(cross(DVec3::X, DVec3::Y), DVec3::Z);
        assert_eq!(cross(DVec3::Z, DVec3::Z * 2.0), DVec3::ZERO);
    }

    #[test]
    fn test_rotation_matrix_right_hand_rule() {
        let r = rotation_matrix(FRAC_PI_2, DVec3::new(0.0, 0.0, 5.0)).unwrap();
        assert!(r.transform_vector(DVec3::X).abs_diff_eq(DVec3::Y, 1e-12));
        assert!(r.is_rigid(1e-12));
    }

    #[test]
    fn test_rotation_matrix_zero_axis() {
        assert!(rotation_matrix(1.0, DVec3::ZERO).is_err());
        assert!(rotation_matrix(f64::INFINITY, DVec3::Z).is_err());
    }

    #[test]
    fn test_translation_does_not_move_vectors() {
        let t = translation_matrix(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_point(DVec3::ZERO), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_vector(DVec3::X), DVec3::X);
    }

    #[test]
    fn test_then_order() {
        let rotate = Transform::rotation(FRAC_PI_2, DVec3::Z).unwrap();
        let shift = Transform::translation(DVec3::X);
        // rotate first, then shift
        let composed = rotate.then(&shift);
        assert!(
            composed
                .transform_point(DVec3::X)
                .abs_diff_eq(DVec3::new(1.0, 1.0, 0.0), 1e-12)
        );
        assert_eq!(composed, shift * rotate);
    }

    #[test]
    fn test_rotation_about_point() {
        let r = Transform::rotation_about(PI, DVec3::Z, DVec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(
            r.transform_point(DVec3::ZERO)
                .abs_diff_eq(DVec3::new(2.0, 0.0, 0.0), 1e-12)
        );
    }

    #[test]
    fn test_to_rows_layout() {
        let t = Transform::rotation(FRAC_PI_2, DVec3::Z).unwrap()
            * Transform::translation(DVec3::new(1.0, 2.0, 3.0));
        let rows = t.to_rows();
        // R * (1, 2, 3) = (-2, 1, 3)
        assert_relative_eq!(rows[0][3], -2.0, epsilon = 1e-12);
        assert_relative_eq!(rows[1][3], 1.0, epsilon = 1e-12);
        assert_relative_eq!(rows[2][3], 3.0, epsilon = 1e-12);
        assert_relative_eq!(rows[0][1], -1.0, epsilon = 1e-12);
        assert_relative_eq!(rows[1][0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_is_rigid_rejects_scale() {
        let scale = Transform(DAffine3::from_scale(DVec3::splat(2.0)));
        assert!(!scale.is_rigid(1e-9));
        let mirror = Transform(DAffine3::from_scale(DVec3::new(-1.0, 1.0, 1.0)));
        assert!(!mirror.is_rigid(1e-9));
    }

    #[test]
    fn test_affine_conversion_requires_rigid_map() {
        let flatten = DAffine3::from_scale(DVec3::new(1.0, 1.0, 0.0));
        assert!(matches!(
            Transform::try_from(flatten),
            Err(GeometryError::DegenerateInput(_))
        ));
        assert!(Transform::try_from(DAffine3::from_scale(DVec3::splat(2.0))).is_err());

        let rigid = DAffine3::from_rotation_translation(
            glam::DQuat::from_axis_angle(DVec3::Y, 0.3),
            DVec3::new(1.0, -2.0, 4.0),
        );
        let transform = Transform::try_from(rigid).unwrap();
        assert_eq!(DAffine3::from(transform), rigid);
    }

    #[test]
    fn test_deserialize_rejects_singular_map() {
        let rigid = Transform::rotation_about(0.7, DVec3::ONE, DVec3::X).unwrap();
        let text = ron::to_string(&rigid).unwrap();
        assert_eq!(ron::from_str::<Transform>(&text).unwrap(), rigid);

        let singular = ron::to_string(&DAffine3::from_scale(DVec3::new(1.0, 0.0, 1.0))).unwrap();
        assert!(ron::from_str::<Transform>(&singular).is_err());
    }

    #[test]
    fn test_perpendicular_axis() {
        assert_eq!(perpendicular_axis(DVec3::Z, 1e-12), -DVec3::Y);
        // Parallel to X falls back to Y
        assert_eq!(perpendicular_axis(DVec3::X, 1e-12), -DVec3::Z);
        assert_relative_eq!(perpendicular_axis(-DVec3::X, 1e-12).dot(DVec3::X), 0.0);
    }
}
