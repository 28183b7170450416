mod spatial_inertia;
mod spatial_transform;

pub use spatial_inertia::SpatialInertia;
pub use spatial_transform::SpatialTransform;

use nalgebra::{Vector3, Vector6};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Pair of 3-vectors making up a spatial quantity.
/// Flattened to 6 entries the linear part comes first, then the angular part.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpatialVector {
    pub linear: Vector3<f64>,
    pub angular: Vector3<f64>,
}

impl SpatialVector {
    pub fn new(linear: Vector3<f64>, angular: Vector3<f64>) -> Self {
        Self { linear, angular }
    }

    pub fn zeros() -> Self {
        Self::default()
    }

    pub fn vector(&self) -> Vector6<f64> {
        Vector6::new(
            self.linear[0],
            self.linear[1],
            self.linear[2],
            self.angular[0],
            self.angular[1],
            self.angular[2],
        )
    }

    /// Featherstone 2.33, reordered linear first
    pub fn cross_motion(self, rhs: SpatialVector) -> SpatialVector {
        let linear = self.angular.cross(&rhs.linear) + self.linear.cross(&rhs.angular);
        let angular = self.angular.cross(&rhs.angular);
        SpatialVector::new(linear, angular)
    }

    /// Featherstone 2.34, reordered linear first
    pub fn cross_force(self, rhs: SpatialVector) -> SpatialVector {
        let linear = self.angular.cross(&rhs.linear);
        let angular = self.angular.cross(&rhs.angular) + self.linear.cross(&rhs.linear);
        SpatialVector::new(linear, angular)
    }

    pub fn is_approx(&self, other: &SpatialVector, tol: f64) -> bool {
        (self.vector() - other.vector()).amax() <= tol
    }
}

impl From<Vector6<f64>> for SpatialVector {
    fn from(v: Vector6<f64>) -> SpatialVector {
        let linear = Vector3::new(v[0], v[1], v[2]);
        let angular = Vector3::new(v[3], v[4], v[5]);
        SpatialVector::new(linear, angular)
    }
}

impl Add<SpatialVector> for SpatialVector {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.linear + rhs.linear, self.angular + rhs.angular)
    }
}

impl Sub<SpatialVector> for SpatialVector {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.linear - rhs.linear, self.angular - rhs.angular)
    }
}

impl Neg for SpatialVector {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.linear, -self.angular)
    }
}

impl Mul<f64> for SpatialVector {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.linear * rhs, self.angular * rhs)
    }
}

/// Spatial motion (twist): linear velocity and angular velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Motion(SpatialVector);

impl Motion {
    pub fn new(linear: Vector3<f64>, angular: Vector3<f64>) -> Self {
        Self(SpatialVector::new(linear, angular))
    }

    pub fn zeros() -> Self {
        Self::default()
    }

    #[inline]
    pub fn linear(&self) -> &Vector3<f64> {
        &self.0.linear
    }

    #[inline]
    pub fn angular(&self) -> &Vector3<f64> {
        &self.0.angular
    }

    pub fn vector(&self) -> Vector6<f64> {
        self.0.vector()
    }

    /// self x rhs
    pub fn cross_motion(self, rhs: Motion) -> Motion {
        Motion(self.0.cross_motion(rhs.0))
    }

    /// self x* rhs
    pub fn cross_force(self, rhs: Force) -> Force {
        Force(self.0.cross_force(rhs.0))
    }

    /// Power delivered by `force` along this motion.
    pub fn dot(&self, force: &Force) -> f64 {
        self.linear().dot(force.linear()) + self.angular().dot(force.angular())
    }

    pub fn is_approx(&self, other: &Motion, tol: f64) -> bool {
        self.0.is_approx(&other.0, tol)
    }
}

impl From<Vector6<f64>> for Motion {
    fn from(v: Vector6<f64>) -> Self {
        Self(SpatialVector::from(v))
    }
}

impl From<SpatialVector> for Motion {
    fn from(v: SpatialVector) -> Self {
        Self(v)
    }
}

impl Add<Motion> for Motion {
    type Output = Motion;
    #[inline]
    fn add(self, rhs: Motion) -> Motion {
        Motion(self.0 + rhs.0)
    }
}

impl AddAssign<Motion> for Motion {
    #[inline]
    fn add_assign(&mut self, rhs: Motion) {
        self.0 = self.0 + rhs.0;
    }
}

impl Sub<Motion> for Motion {
    type Output = Motion;
    #[inline]
    fn sub(self, rhs: Motion) -> Motion {
        Motion(self.0 - rhs.0)
    }
}

impl Neg for Motion {
    type Output = Motion;
    #[inline]
    fn neg(self) -> Motion {
        Motion(-self.0)
    }
}

impl Mul<f64> for Motion {
    type Output = Motion;
    #[inline]
    fn mul(self, rhs: f64) -> Motion {
        Motion(self.0 * rhs)
    }
}

/// Spatial force (wrench): linear force and torque.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Force(SpatialVector);

impl Force {
    pub fn new(linear: Vector3<f64>, angular: Vector3<f64>) -> Self {
        Self(SpatialVector::new(linear, angular))
    }

    pub fn zeros() -> Self {
        Self::default()
    }

    #[inline]
    pub fn linear(&self) -> &Vector3<f64> {
        &self.0.linear
    }

    #[inline]
    pub fn angular(&self) -> &Vector3<f64> {
        &self.0.angular
    }

    pub fn vector(&self) -> Vector6<f64> {
        self.0.vector()
    }

    pub fn is_approx(&self, other: &Force, tol: f64) -> bool {
        self.0.is_approx(&other.0, tol)
    }
}

impl From<Vector6<f64>> for Force {
    fn from(v: Vector6<f64>) -> Self {
        Self(SpatialVector::from(v))
    }
}

impl From<SpatialVector> for Force {
    fn from(v: SpatialVector) -> Self {
        Self(v)
    }
}

impl Add<Force> for Force {
    type Output = Force;
    #[inline]
    fn add(self, rhs: Force) -> Force {
        Force(self.0 + rhs.0)
    }
}

impl Sub<Force> for Force {
    type Output = Force;
    #[inline]
    fn sub(self, rhs: Force) -> Force {
        Force(self.0 - rhs.0)
    }
}

impl Neg for Force {
    type Output = Force;
    #[inline]
    fn neg(self) -> Force {
        Force(-self.0)
    }
}

impl Mul<f64> for Force {
    type Output = Force;
    #[inline]
    fn mul(self, rhs: f64) -> Force {
        Force(self.0 * rhs)
    }
}
