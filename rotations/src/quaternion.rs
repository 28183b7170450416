use super::*;
use crate::axis_angle::AxisAngle;
use crate::rotation_matrix::RotationMatrix;
use nalgebra::{Vector3, Vector4};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use std::ops::{Mul, Neg};
use thiserror::Error;

/// Inner products of unit quaternions may drift past +/-1 by rounding.
/// Anything further out than this is not a pair of unit quaternions.
pub const INNER_PRODUCT_TOLERANCE: f64 = 1e-9;

/// Below this rotation angle the exponential and logarithm use their series expansions.
const SMALL_ANGLE: f64 = 1e-8;

/// A struct representing a quaternion for 3D rotations.
/// Coefficients are laid out as (x, y, z, w) wherever a quaternion is stored in a vector.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// Errors that can occur when operating on a `Quaternion`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuaternionErrors {
    #[error("got zero magnitude quaternion")]
    ZeroMagnitude,
    #[error("quaternion inner product {0} is outside [-1, 1]")]
    InnerProductOutOfRange(f64),
}

impl Quaternion {
    /// Creates an identity quaternion.
    ///
    /// # Returns
    ///
    /// A `Quaternion` representing no rotation.
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Creates a new `Quaternion` without normalizing it.
    ///
    /// # Arguments
    ///
    /// * `x` - The x component of the quaternion.
    /// * `y` - The y component of the quaternion.
    /// * `z` - The z component of the quaternion.
    /// * `w` - The scalar component of the quaternion.
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    // Dot product of two quaternions
    pub fn dot(&self, other: &Quaternion) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn mag(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Conjugate of the quaternion, which is its inverse when it has unit magnitude.
    pub fn inv(&self) -> Quaternion {
        Quaternion::new(-self.x, -self.y, -self.z, self.w)
    }

    pub fn normalize(&self) -> Result<Self, QuaternionErrors> {
        let mag = self.mag();
        if mag < f64::EPSILON || !mag.is_finite() {
            return Err(QuaternionErrors::ZeroMagnitude);
        }
        Ok(Quaternion::new(
            self.x / mag,
            self.y / mag,
            self.z / mag,
            self.w / mag,
        ))
    }

    /// The vector part (x, y, z).
    pub fn imag(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Coefficients in (x, y, z, w) order.
    pub fn coeffs(&self) -> Vector4<f64> {
        Vector4::new(self.x, self.y, self.z, self.w)
    }

    /// Builds a quaternion from coefficients in (x, y, z, w) order.
    pub fn from_coeffs(coeffs: &Vector4<f64>) -> Self {
        Self::new(coeffs[0], coeffs[1], coeffs[2], coeffs[3])
    }

    /// Exponential map from a rotation vector to a unit quaternion.
    ///
    /// # Arguments
    ///
    /// * `w` - Rotation vector, axis times angle in radians.
    ///
    /// # Returns
    ///
    /// The unit quaternion rotating by |w| about w.
    pub fn from_rotation_vector(w: &Vector3<f64>) -> Self {
        let theta = w.norm();
        let half = 0.5 * theta;
        let k = if theta < SMALL_ANGLE {
            0.5 - theta * theta / 48.0
        } else {
            half.sin() / theta
        };
        Quaternion::new(k * w[0], k * w[1], k * w[2], half.cos())
    }

    /// Logarithm map to a rotation vector along the shortest path.
    /// q and -q give the same result, with an angle in [0, pi].
    /// The result does not depend on the magnitude of the quaternion.
    pub fn to_rotation_vector(&self) -> Vector3<f64> {
        let q = if self.w < 0.0 { -*self } else { *self };
        let v = q.imag();
        let n = v.norm();
        if n < SMALL_ANGLE * q.w.abs() {
            return v * (2.0 / q.w);
        }
        let theta = 2.0 * n.atan2(q.w);
        v * (theta / n)
    }

    /// Minimal angle between two unit quaternions.
    ///
    /// This is acos of their inner product taken on the acute side, so q and -q,
    /// which encode the same rotation, are at an angle of zero.
    ///
    /// # Arguments
    ///
    /// * `q1` - The first unit quaternion.
    /// * `q2` - The second unit quaternion.
    ///
    /// # Returns
    ///
    /// The angle in [0, pi/2], or `InnerProductOutOfRange` if the inner product is not
    /// finite or lies further than `INNER_PRODUCT_TOLERANCE` outside [-1, 1].
    pub fn angle_between(q1: &Quaternion, q2: &Quaternion) -> Result<f64, QuaternionErrors> {
        let inner = q1.dot(q2);
        if !inner.is_finite() || inner.abs() > 1.0 + INNER_PRODUCT_TOLERANCE {
            return Err(QuaternionErrors::InnerProductOutOfRange(inner));
        }
        // imaginary part of conj(q1) * q2, whose norm is sin of the same angle
        let sin = (q2.imag() * q1.w - q1.imag() * q2.w - q1.imag().cross(&q2.imag())).norm();
        Ok(sin.atan2(inner.abs().min(1.0)))
    }

    /// True when both quaternions encode the same rotation, either as q1 = q2 or q1 = -q2.
    pub fn define_same_rotation(q1: &Quaternion, q2: &Quaternion, tol: f64) -> bool {
        let same = (q1.coeffs() - q2.coeffs()).amax() <= tol;
        let opposite = (q1.coeffs() + q2.coeffs()).amax() <= tol;
        same || opposite
    }

    /// Spherical linear interpolation along the shortest path.
    /// t is 0 - 1, where result is q1 when t is 0 and q2 (or -q2) when t is 1
    pub fn slerp(q1: &Quaternion, q2: &Quaternion, t: f64) -> Result<Self, QuaternionErrors> {
        let q1 = q1.normalize()?;
        let q2 = q2.normalize()?;
        let delta = (q1.inv() * q2).to_rotation_vector();
        Ok(q1 * Quaternion::from_rotation_vector(&(delta * t)))
    }

    /// Samples a quaternion uniformly over the rotation group (Shoemake's method).
    ///
    /// # Arguments
    ///
    /// * `rng` - The random number generator to draw from.
    ///
    /// # Returns
    ///
    /// A random unit `Quaternion`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Quaternion {
        let u1: f64 = rng.random();
        let u2: f64 = rng.random::<f64>() * TAU;
        let u3: f64 = rng.random::<f64>() * TAU;
        let a = (1.0 - u1).sqrt();
        let b = u1.sqrt();
        Quaternion::new(a * u2.sin(), a * u2.cos(), b * u3.sin(), b * u3.cos())
    }
}

impl Default for Quaternion {
    /// Provides the default value for a quaternion.
    ///
    /// # Returns
    ///
    /// The identity quaternion.
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RotationTrait for Quaternion {
    /// Rotates a vector by the quaternion.
    /// Follows the logic from Markley/Crassidis
    /// aka Active Rotation or "Alibi"
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        RotationMatrix::from(self).rotate(v)
    }

    /// Transforms a vector by the quaternion.
    /// aka Passive Rotation or "Alias"
    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64> {
        RotationMatrix::from(self).transform(v)
    }

    fn identity() -> Self {
        Self::IDENTITY
    }

    fn inv(&self) -> Self {
        Quaternion::inv(self)
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Self;

    /// Hamilton product of two quaternions.
    /// Composes like rotation matrices: R(q1 * q2) = R(q1) R(q2)
    ///
    /// # Arguments
    ///
    /// * `rhs` - The right-hand side quaternion.
    ///
    /// # Returns
    ///
    /// The product of the two quaternions.
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

impl Mul<f64> for Quaternion {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl Neg for Quaternion {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl From<&RotationMatrix> for Quaternion {
    /// Converts a `RotationMatrix` to a unit `Quaternion` with Shepperd's method.
    /// The branch is picked on the largest of the trace and diagonal to keep the division well conditioned.
    fn from(matrix: &RotationMatrix) -> Self {
        let m = &matrix.0;
        let trace = m[(0, 0)] + m[(1, 1)] + m[(2, 2)];

        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Quaternion::new(
                (m[(2, 1)] - m[(1, 2)]) / s,
                (m[(0, 2)] - m[(2, 0)]) / s,
                (m[(1, 0)] - m[(0, 1)]) / s,
                0.25 * s,
            )
        } else if m[(0, 0)] > m[(1, 1)] && m[(0, 0)] > m[(2, 2)] {
            let s = (1.0 + m[(0, 0)] - m[(1, 1)] - m[(2, 2)]).sqrt() * 2.0;
            Quaternion::new(
                0.25 * s,
                (m[(0, 1)] + m[(1, 0)]) / s,
                (m[(0, 2)] + m[(2, 0)]) / s,
                (m[(2, 1)] - m[(1, 2)]) / s,
            )
        } else if m[(1, 1)] > m[(2, 2)] {
            let s = (1.0 + m[(1, 1)] - m[(0, 0)] - m[(2, 2)]).sqrt() * 2.0;
            Quaternion::new(
                (m[(0, 1)] + m[(1, 0)]) / s,
                0.25 * s,
                (m[(1, 2)] + m[(2, 1)]) / s,
                (m[(0, 2)] - m[(2, 0)]) / s,
            )
        } else {
            let s = (1.0 + m[(2, 2)] - m[(0, 0)] - m[(1, 1)]).sqrt() * 2.0;
            Quaternion::new(
                (m[(0, 2)] + m[(2, 0)]) / s,
                (m[(1, 2)] + m[(2, 1)]) / s,
                0.25 * s,
                (m[(1, 0)] - m[(0, 1)]) / s,
            )
        }
    }
}

impl From<&AxisAngle> for Quaternion {
    fn from(axis_angle: &AxisAngle) -> Self {
        Quaternion::from_rotation_vector(&(axis_angle.axis * axis_angle.angle))
    }
}

impl fmt::Debug for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quaternion ")?;
        writeln!(f, "   x: {: >10.6}", self.x)?;
        writeln!(f, "   y: {: >10.6}", self.y)?;
        writeln!(f, "   z: {: >10.6}", self.z)?;
        writeln!(f, "   w: {: >10.6}", self.w)?;
        Ok(())
    }
}
