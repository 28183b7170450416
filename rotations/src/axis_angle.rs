use super::*;
use crate::quaternion::Quaternion;
use crate::rotation_matrix::RotationMatrix;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Copy, Clone, PartialEq)]
pub enum AxisAngleErrors {
    #[error("magnitude of the axis is too small, should be normalizable to a magnitude of 1.0")]
    ZeroMagnitudeAxis,
}

/// A rotation of `angle` radians about a unit `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAngle {
    pub angle: f64,
    pub axis: Vector3<f64>,
}

impl AxisAngle {
    pub const IDENTITY: Self = Self { angle: 0.0, axis: Vector3::new(1.0, 0.0, 0.0) };

    pub fn new(angle: f64, axis: Vector3<f64>) -> Result<Self, AxisAngleErrors> {
        let axis = Self::unit_axis(&axis)?;
        Ok(Self { angle, axis })
    }

    /// Normalizes a candidate rotation axis.
    pub fn unit_axis(axis: &Vector3<f64>) -> Result<Vector3<f64>, AxisAngleErrors> {
        let mag = axis.norm();
        if mag < 1e-12 || !mag.is_finite() {
            return Err(AxisAngleErrors::ZeroMagnitudeAxis);
        }
        Ok(axis / mag)
    }
}

impl RotationTrait for AxisAngle {
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        RotationMatrix::from(self).rotate(v)
    }

    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64> {
        RotationMatrix::from(self).transform(v)
    }

    fn inv(&self) -> Self {
        Self { angle: -self.angle, axis: self.axis }
    }

    fn identity() -> Self {
        Self::IDENTITY
    }
}

impl From<&Quaternion> for AxisAngle {
    fn from(q: &Quaternion) -> Self {
        let w = q.to_rotation_vector();
        let angle = w.norm();
        if angle < f64::EPSILON {
            return Self::IDENTITY;
        }
        Self { angle, axis: w / angle }
    }
}
