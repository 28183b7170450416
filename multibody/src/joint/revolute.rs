use super::{
    Axis, JointErrors, JointIndexes, JointModelTrait,
    axis::{AxisX, AxisY, AxisZ},
    data::JointDataBase,
    sample_bounded,
    subspace::{JointMotion, MotionSubspace},
};
use nalgebra::{Matrix6, SMatrix, Vector1, Vector3};
use rand::Rng;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};
use spatial_algebra::{Force, Motion, SpatialTransform};
use std::{f64::consts::PI, marker::PhantomData};

/// Rotation about a frame axis, the single column of S is angular.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AngularAxisSubspace<A: Axis>(PhantomData<A>);

impl<A: Axis> MotionSubspace<1> for AngularAxisSubspace<A> {
    fn motion(&self, v: &Vector1<f64>) -> Motion {
        Motion::new(Vector3::zeros(), A::unit() * v[0])
    }

    fn transpose_mul(&self, f: &Force) -> Vector1<f64> {
        Vector1::new(f.angular()[A::INDEX])
    }

    fn matrix(&self) -> SMatrix<f64, 6, 1> {
        let mut s = SMatrix::<f64, 6, 1>::zeros();
        s[3 + A::INDEX] = 1.0;
        s
    }

    fn inertia_mul(&self, inertia: &Matrix6<f64>) -> SMatrix<f64, 6, 1> {
        inertia.column(3 + A::INDEX).into_owned()
    }

    fn project(&self, u: &SMatrix<f64, 6, 1>) -> SMatrix<f64, 1, 1> {
        Vector1::new(u[3 + A::INDEX])
    }

    fn se3_action(&self, transform: &SpatialTransform) -> SMatrix<f64, 6, 1> {
        let w = transform.rotation().column(A::INDEX).into_owned();
        Motion::new(transform.translation().cross(&w), w).vector()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RevoluteMotion<A: Axis> {
    pub w: f64,
    axis: PhantomData<A>,
}

impl<A: Axis> RevoluteMotion<A> {
    pub fn new(w: f64) -> Self {
        Self { w, axis: PhantomData }
    }
}

impl<A: Axis> From<RevoluteMotion<A>> for Motion {
    fn from(m: RevoluteMotion<A>) -> Motion {
        Motion::new(Vector3::zeros(), A::unit() * m.w)
    }
}

impl<A: Axis> JointMotion for RevoluteMotion<A> {
    fn cross_from(&self, m: &Motion) -> Motion {
        Motion::new(A::cross(m.linear()) * self.w, A::cross(m.angular()) * self.w)
    }
}

pub type JointDataRevolute<A> = JointDataBase<AngularAxisSubspace<A>, RevoluteMotion<A>, 1>;

/// Revolute joint about the x, y or z axis of the joint frame.
/// The configuration is the angle in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Revolute<A: Axis> {
    #[serde(default)]
    pub indexes: JointIndexes,
    #[serde(skip)]
    axis: PhantomData<A>,
}

impl<A: Axis> Revolute<A> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: Axis> JointModelTrait for Revolute<A> {
    const NQ: usize = 1;
    const NV: usize = 1;
    type ConfigVector = Vector1<f64>;
    type TangentVector = Vector1<f64>;
    type Data = JointDataRevolute<A>;

    fn shortname(&self) -> &'static str {
        match A::INDEX {
            0 => "JointModelRX",
            1 => "JointModelRY",
            _ => "JointModelRZ",
        }
    }

    fn indexes(&self) -> &JointIndexes {
        &self.indexes
    }

    fn indexes_mut(&mut self) -> &mut JointIndexes {
        &mut self.indexes
    }

    fn create_data(&self) -> Self::Data {
        JointDataRevolute::default()
    }

    fn calc(&self, data: &mut Self::Data, q: &Vector1<f64>) {
        let (s, c) = q[0].sin_cos();
        data.transform = SpatialTransform::new(A::rotation(c, s), Vector3::zeros());
    }

    fn calc_velocity(&self, data: &mut Self::Data, q: &Vector1<f64>, v: &Vector1<f64>) {
        self.calc(data, q);
        data.motion = RevoluteMotion::new(v[0]);
    }

    fn calc_aba(
        &self,
        data: &mut Self::Data,
        inertia: &mut Matrix6<f64>,
        update_inertia: bool,
    ) -> Result<(), JointErrors> {
        data.update_aba(self.indexes.id, inertia, update_inertia)
    }

    fn integrate(&self, q: &Vector1<f64>, v: &Vector1<f64>) -> Vector1<f64> {
        q + v
    }

    fn interpolate(&self, q0: &Vector1<f64>, q1: &Vector1<f64>, u: f64) -> Vector1<f64> {
        q0 + (q1 - q0) * u
    }

    fn difference(&self, q0: &Vector1<f64>, q1: &Vector1<f64>) -> Vector1<f64> {
        q1 - q0
    }

    fn distance(&self, q0: &Vector1<f64>, q1: &Vector1<f64>) -> Result<f64, JointErrors> {
        Ok((q1[0] - q0[0]).abs())
    }

    fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector1<f64> {
        Vector1::new(rng.random_range(-PI..=PI))
    }

    fn random_configuration<R: Rng + ?Sized>(
        &self,
        lower: &Vector1<f64>,
        upper: &Vector1<f64>,
        rng: &mut R,
    ) -> Result<Vector1<f64>, JointErrors> {
        sample_bounded(self.indexes.id, lower, upper, rng)
    }
}

pub type RevoluteX = Revolute<AxisX>;
pub type RevoluteY = Revolute<AxisY>;
pub type RevoluteZ = Revolute<AxisZ>;

/// Rotation about an arbitrary unit axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngularUnalignedSubspace {
    pub axis: Vector3<f64>,
}

impl Default for AngularUnalignedSubspace {
    fn default() -> Self {
        Self { axis: Vector3::z() }
    }
}

impl MotionSubspace<1> for AngularUnalignedSubspace {
    fn motion(&self, v: &Vector1<f64>) -> Motion {
        Motion::new(Vector3::zeros(), self.axis * v[0])
    }

    fn transpose_mul(&self, f: &Force) -> Vector1<f64> {
        Vector1::new(self.axis.dot(f.angular()))
    }

    fn matrix(&self) -> SMatrix<f64, 6, 1> {
        Motion::new(Vector3::zeros(), self.axis).vector()
    }

    fn inertia_mul(&self, inertia: &Matrix6<f64>) -> SMatrix<f64, 6, 1> {
        inertia.fixed_columns::<3>(3) * self.axis
    }

    fn project(&self, u: &SMatrix<f64, 6, 1>) -> SMatrix<f64, 1, 1> {
        Vector1::new(self.axis.dot(&u.fixed_rows::<3>(3)))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RevoluteUnalignedMotion {
    pub axis: Vector3<f64>,
    pub w: f64,
}

impl From<RevoluteUnalignedMotion> for Motion {
    fn from(m: RevoluteUnalignedMotion) -> Motion {
        Motion::new(Vector3::zeros(), m.axis * m.w)
    }
}

impl JointMotion for RevoluteUnalignedMotion {
    fn cross_from(&self, m: &Motion) -> Motion {
        let w = self.axis * self.w;
        Motion::new(m.linear().cross(&w), m.angular().cross(&w))
    }
}

pub type JointDataRevoluteUnaligned =
    JointDataBase<AngularUnalignedSubspace, RevoluteUnalignedMotion, 1>;

/// Revolute joint about a fixed unit axis of the joint frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UnalignedAxisRecord")]
pub struct RevoluteUnaligned {
    #[serde(default)]
    pub indexes: JointIndexes,
    axis: Vector3<f64>,
}

impl RevoluteUnaligned {
    /// The axis is normalized, a zero or non finite axis is rejected.
    pub fn new(axis: Vector3<f64>) -> Result<Self, JointErrors> {
        let axis = unit_axis(&axis)?;
        Ok(Self { indexes: JointIndexes::default(), axis })
    }

    pub fn axis(&self) -> &Vector3<f64> {
        &self.axis
    }
}

impl Default for RevoluteUnaligned {
    fn default() -> Self {
        Self { indexes: JointIndexes::default(), axis: Vector3::z() }
    }
}

pub(crate) fn unit_axis(axis: &Vector3<f64>) -> Result<Vector3<f64>, JointErrors> {
    let norm = axis.norm();
    if !norm.is_finite() || norm < f64::EPSILON {
        return Err(JointErrors::NumericDomain { quantity: "joint axis norm", value: norm });
    }
    // already unit, kept bit for bit
    if (norm - 1.0).abs() <= 1e-12 {
        return Ok(*axis);
    }
    Ok(axis / norm)
}

/// Stored form of an unaligned joint, the axis goes through `unit_axis` on load.
#[derive(Deserialize)]
pub struct UnalignedAxisRecord {
    #[serde(default)]
    pub(crate) indexes: JointIndexes,
    pub(crate) axis: Vector3<f64>,
}

impl TryFrom<UnalignedAxisRecord> for RevoluteUnaligned {
    type Error = JointErrors;

    fn try_from(record: UnalignedAxisRecord) -> Result<Self, JointErrors> {
        let axis = unit_axis(&record.axis)?;
        Ok(Self { indexes: record.indexes, axis })
    }
}

impl JointModelTrait for RevoluteUnaligned {
    const NQ: usize = 1;
    const NV: usize = 1;
    type ConfigVector = Vector1<f64>;
    type TangentVector = Vector1<f64>;
    type Data = JointDataRevoluteUnaligned;

    fn shortname(&self) -> &'static str {
        "JointModelRevoluteUnaligned"
    }

    fn indexes(&self) -> &JointIndexes {
        &self.indexes
    }

    fn indexes_mut(&mut self) -> &mut JointIndexes {
        &mut self.indexes
    }

    fn create_data(&self) -> Self::Data {
        JointDataBase {
            subspace: AngularUnalignedSubspace { axis: self.axis },
            motion: RevoluteUnalignedMotion { axis: self.axis, w: 0.0 },
            ..Default::default()
        }
    }

    fn calc(&self, data: &mut Self::Data, q: &Vector1<f64>) {
        let rotation = RotationMatrix::exp(&(self.axis * q[0]));
        data.transform = SpatialTransform::new(rotation.0, Vector3::zeros());
        data.subspace.axis = self.axis;
    }

    fn calc_velocity(&self, data: &mut Self::Data, q: &Vector1<f64>, v: &Vector1<f64>) {
        self.calc(data, q);
        data.motion = RevoluteUnalignedMotion { axis: self.axis, w: v[0] };
    }

    fn calc_aba(
        &self,
        data: &mut Self::Data,
        inertia: &mut Matrix6<f64>,
        update_inertia: bool,
    ) -> Result<(), JointErrors> {
        data.update_aba(self.indexes.id, inertia, update_inertia)
    }

    fn integrate(&self, q: &Vector1<f64>, v: &Vector1<f64>) -> Vector1<f64> {
        q + v
    }

    fn interpolate(&self, q0: &Vector1<f64>, q1: &Vector1<f64>, u: f64) -> Vector1<f64> {
        q0 + (q1 - q0) * u
    }

    fn difference(&self, q0: &Vector1<f64>, q1: &Vector1<f64>) -> Vector1<f64> {
        q1 - q0
    }

    fn distance(&self, q0: &Vector1<f64>, q1: &Vector1<f64>) -> Result<f64, JointErrors> {
        Ok((q1[0] - q0[0]).abs())
    }

    fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector1<f64> {
        Vector1::new(rng.random_range(-PI..=PI))
    }

    fn random_configuration<R: Rng + ?Sized>(
        &self,
        lower: &Vector1<f64>,
        upper: &Vector1<f64>,
        rng: &mut R,
    ) -> Result<Vector1<f64>, JointErrors> {
        sample_bounded(self.indexes.id, lower, upper, rng)
    }
}
