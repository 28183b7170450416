use nalgebra::{Matrix3, Vector3};
use rotations::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Rigid transform of a child frame relative to its parent.
/// A point expressed in the child frame maps to the parent as x_parent = R x_child + p
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub rotation: RotationMatrix,
    pub translation: Vector3<f64>,
}

impl Transform {
    pub fn new(rotation: RotationMatrix, translation: Vector3<f64>) -> Self {
        Self { rotation, translation }
    }

    pub fn identity() -> Self {
        Self { rotation: RotationMatrix::identity(), translation: Vector3::zeros() }
    }

    pub fn from_parts(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self { rotation: RotationMatrix(rotation), translation }
    }

    /// Inverse transform, mapping the parent frame back into the child.
    pub fn inv(&self) -> Self {
        let rotation = self.rotation.transpose();
        let translation = -(rotation.0 * self.translation);
        Self { rotation, translation }
    }

    /// Maps a point from the child frame into the parent frame.
    pub fn act_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.0 * point + self.translation
    }

    /// Maps a point from the parent frame into the child frame.
    pub fn act_inv_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.0.transpose() * (point - self.translation)
    }

    pub fn is_approx(&self, other: &Transform, tol: f64) -> bool {
        (self.rotation.0 - other.rotation.0).amax() <= tol
            && (self.translation - other.translation).amax() <= tol
    }
}

impl Mul<Transform> for Transform {
    type Output = Transform;

    /// Composition: (a * b) maps b's child frame into a's parent frame.
    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            rotation: self.rotation * rhs.rotation,
            translation: self.rotation.0 * rhs.translation + self.translation,
        }
    }
}
