use super::*;
use crate::axis_angle::AxisAngle;
use crate::quaternion::Quaternion;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::Mul;
use thiserror::Error;

/// Below this angle the Rodrigues coefficients switch to their Taylor expansions.
const SMALL_ANGLE: f64 = 1e-6;

/// A struct representing a 3x3 rotation matrix.
/// Maps coordinates of a child frame into its parent: x_parent = R x_child
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationMatrix(pub Matrix3<f64>);

/// Errors that can occur when creating a `RotationMatrix`.
#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum RotationMatrixErrors {
    #[error("rotation matrix column has zero magnitude")]
    ZeroMagnitudeColumn,
}

impl RotationMatrix {
    /// Creates a new `RotationMatrix` ensuring columns are normalized.
    ///
    /// # Arguments
    ///
    /// * `e11`, `e12`, `e13` - Elements of the first row.
    /// * `e21`, `e22`, `e23` - Elements of the second row.
    /// * `e31`, `e32`, `e33` - Elements of the third row.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok` containing a new `RotationMatrix` if columns are valid,
    /// or an `Err` containing a `RotationMatrixErrors`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        e11: f64,
        e12: f64,
        e13: f64,
        e21: f64,
        e22: f64,
        e23: f64,
        e31: f64,
        e32: f64,
        e33: f64,
    ) -> Result<Self, RotationMatrixErrors> {
        let mut m = Matrix3::new(e11, e12, e13, e21, e22, e23, e31, e32, e33);
        for mut column in m.column_iter_mut() {
            let mag = column.norm();
            if mag < f64::EPSILON {
                return Err(RotationMatrixErrors::ZeroMagnitudeColumn);
            }
            column /= mag;
        }
        Ok(Self(m))
    }

    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Elementary rotation about the x axis.
    pub fn rot_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self(Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c))
    }

    /// Elementary rotation about the y axis.
    pub fn rot_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self(Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c))
    }

    /// Elementary rotation about the z axis.
    pub fn rot_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self(Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0))
    }

    /// Intrinsic ZYX Euler sequence, R = Rz(z) Ry(y) Rx(x).
    pub fn from_euler_zyx(z: f64, y: f64, x: f64) -> Self {
        let (s0, c0) = z.sin_cos();
        let (s1, c1) = y.sin_cos();
        let (s2, c2) = x.sin_cos();
        Self(Matrix3::new(
            c0 * c1,
            c0 * s1 * s2 - s0 * c2,
            c0 * s1 * c2 + s0 * s2,
            s0 * c1,
            s0 * s1 * s2 + c0 * c2,
            s0 * s1 * c2 - c0 * s2,
            -s1,
            c1 * s2,
            c1 * c2,
        ))
    }

    /// Exponential map on SO(3) (Rodrigues' formula).
    ///
    /// # Arguments
    ///
    /// * `w` - Rotation vector, axis times angle in radians.
    ///
    /// # Returns
    ///
    /// The rotation matrix of angle |w| about w.
    pub fn exp(w: &Vector3<f64>) -> Self {
        let theta2 = w.norm_squared();
        let theta = theta2.sqrt();
        let (a, b) = if theta < SMALL_ANGLE {
            (1.0 - theta2 / 6.0, 0.5 - theta2 / 24.0)
        } else {
            let (s, c) = theta.sin_cos();
            (s / theta, (1.0 - c) / theta2)
        };
        let wx = w.cross_matrix();
        Self(Matrix3::identity() + wx * a + wx * wx * b)
    }

    /// Logarithm map on SO(3). Returns the rotation vector with angle in [0, pi].
    /// Goes through the quaternion so that angles near pi stay well conditioned.
    pub fn log(&self) -> Vector3<f64> {
        Quaternion::from(self).to_rotation_vector()
    }
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Matrix3<f64>> for RotationMatrix {
    fn from(value: Matrix3<f64>) -> Self {
        Self(value)
    }
}

impl From<&Quaternion> for RotationMatrix {
    /// Converts a `Quaternion` to a `RotationMatrix`.
    /// The quaternion does not need to be normalized, only nonzero.
    ///
    /// # Arguments
    ///
    /// * `q` - The quaternion to be converted.
    ///
    /// # Returns
    ///
    /// The corresponding `RotationMatrix`.
    fn from(q: &Quaternion) -> Self {
        let s = 2.0 / q.dot(q);
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);

        Self(Matrix3::new(
            1.0 - s * (y * y + z * z),
            s * (x * y - w * z),
            s * (x * z + w * y),
            s * (x * y + w * z),
            1.0 - s * (x * x + z * z),
            s * (y * z - w * x),
            s * (x * z - w * y),
            s * (y * z + w * x),
            1.0 - s * (x * x + y * y),
        ))
    }
}

impl From<&AxisAngle> for RotationMatrix {
    fn from(axis_angle: &AxisAngle) -> Self {
        RotationMatrix::exp(&(axis_angle.axis * axis_angle.angle))
    }
}

impl RotationTrait for RotationMatrix {
    /// Rotates a vector by the rotation matrix.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be rotated.
    ///
    /// # Returns
    ///
    /// The rotated vector.
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.0 * v
    }

    /// Transforms a vector by the rotation matrix.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be transformed.
    ///
    /// # Returns
    ///
    /// The transformed vector.
    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.0.transpose() * v
    }

    fn inv(&self) -> Self {
        self.transpose()
    }

    fn identity() -> Self {
        RotationMatrix::identity()
    }
}

impl Mul<RotationMatrix> for RotationMatrix {
    type Output = RotationMatrix;

    fn mul(self, rhs: RotationMatrix) -> RotationMatrix {
        RotationMatrix(self.0 * rhs.0)
    }
}

impl Mul<Vector3<f64>> for RotationMatrix {
    type Output = Vector3<f64>;

    fn mul(self, rhs: Vector3<f64>) -> Vector3<f64> {
        self.0 * rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;
    const TOL: f64 = 1e-12;

    #[test]
    fn test_rotation_matrix_new_normalizes_columns() {
        let m = RotationMatrix::new(2.0, 0.0, 0.0, 0.0, 0.0, -3.0, 0.0, 0.5, 0.0).unwrap();
        let expected = Matrix3::new(1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0);
        assert_abs_diff_eq!(m.0, expected, epsilon = TOL);

        let m = RotationMatrix::new(0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(m, Err(RotationMatrixErrors::ZeroMagnitudeColumn));
    }

    #[test]
    fn test_rotation_matrix_exp_elementary() {
        let angle = 0.7;
        assert_abs_diff_eq!(
            RotationMatrix::exp(&(Vector3::x() * angle)).0,
            RotationMatrix::rot_x(angle).0,
            epsilon = TOL
        );
        assert_abs_diff_eq!(
            RotationMatrix::exp(&(Vector3::y() * angle)).0,
            RotationMatrix::rot_y(angle).0,
            epsilon = TOL
        );
        assert_abs_diff_eq!(
            RotationMatrix::exp(&(Vector3::z() * angle)).0,
            RotationMatrix::rot_z(angle).0,
            epsilon = TOL
        );
    }

    #[test]
    fn test_rotation_matrix_exp_log_round_trip() {
        let vectors = [
            Vector3::new(0.3, -0.5, 0.8),
            Vector3::new(1e-9, 2e-9, -1e-9),
            Vector3::new(0.0, 0.0, PI - 1e-6),
        ];
        for w in vectors {
            let r = RotationMatrix::exp(&w);
            assert_abs_diff_eq!(r.log(), w, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rotation_matrix_is_orthonormal() {
        let r = RotationMatrix::exp(&Vector3::new(1.2, -0.4, 2.2));
        assert_abs_diff_eq!(r.0 * r.0.transpose(), Matrix3::identity(), epsilon = TOL);
        assert_abs_diff_eq!(r.0.determinant(), 1.0, epsilon = TOL);
    }

    #[test]
    fn test_rotation_matrix_euler_zyx() {
        let (z, y, x) = (0.4, -0.3, 1.1);
        let expected = RotationMatrix::rot_z(z) * RotationMatrix::rot_y(y) * RotationMatrix::rot_x(x);
        assert_abs_diff_eq!(
            RotationMatrix::from_euler_zyx(z, y, x).0,
            expected.0,
            epsilon = TOL
        );
    }

    #[test]
    fn test_rotation_matrix_from_quaternion_z() {
        let q = Quaternion::new(0.0, 0.0, (PI / 4.0).sin(), (PI / 4.0).cos());
        let r = RotationMatrix::from(&q);
        let expected = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(r.0, expected, epsilon = TOL);

        // non unit quaternions give the same rotation
        let r = RotationMatrix::from(&(q * 3.0));
        assert_abs_diff_eq!(r.0, expected, epsilon = TOL);
    }

    #[test]
    fn test_rotation_matrix_rotate_transform() {
        let r = RotationMatrix::rot_z(PI / 2.0);
        let v = Vector3::new(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(r.rotate(&v), Vector3::new(0.0, 1.0, 0.0), epsilon = TOL);
        assert_abs_diff_eq!(r.transform(&v), Vector3::new(0.0, -1.0, 0.0), epsilon = TOL);
        assert_abs_diff_eq!((r * r.inv()).0, Matrix3::identity(), epsilon = TOL);
    }
}
