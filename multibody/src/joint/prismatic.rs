use super::{
    Axis, JointErrors, JointIndexes, JointModelTrait,
    axis::{AxisX, AxisY, AxisZ},
    data::JointDataBase,
    revolute::{UnalignedAxisRecord, unit_axis},
    sample_bounded,
    subspace::{JointMotion, MotionSubspace},
};
use nalgebra::{Matrix3, Matrix6, SMatrix, Vector1, Vector3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use spatial_algebra::{Force, Motion, SpatialTransform};
use std::marker::PhantomData;

/// Translation along a frame axis, the single column of S is linear.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinearAxisSubspace<A: Axis>(PhantomData<A>);

impl<A: Axis> MotionSubspace<1> for LinearAxisSubspace<A> {
    fn motion(&self, v: &Vector1<f64>) -> Motion {
        Motion::new(A::unit() * v[0], Vector3::zeros())
    }

    fn transpose_mul(&self, f: &Force) -> Vector1<f64> {
        Vector1::new(f.linear()[A::INDEX])
    }

    fn matrix(&self) -> SMatrix<f64, 6, 1> {
        let mut s = SMatrix::<f64, 6, 1>::zeros();
        s[A::INDEX] = 1.0;
        s
    }

    fn inertia_mul(&self, inertia: &Matrix6<f64>) -> SMatrix<f64, 6, 1> {
        inertia.column(A::INDEX).into_owned()
    }

    fn project(&self, u: &SMatrix<f64, 6, 1>) -> SMatrix<f64, 1, 1> {
        Vector1::new(u[A::INDEX])
    }

    fn se3_action(&self, transform: &SpatialTransform) -> SMatrix<f64, 6, 1> {
        let v = transform.rotation().column(A::INDEX).into_owned();
        Motion::new(v, Vector3::zeros()).vector()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PrismaticMotion<A: Axis> {
    pub v: f64,
    axis: PhantomData<A>,
}

impl<A: Axis> PrismaticMotion<A> {
    pub fn new(v: f64) -> Self {
        Self { v, axis: PhantomData }
    }
}

impl<A: Axis> From<PrismaticMotion<A>> for Motion {
    fn from(m: PrismaticMotion<A>) -> Motion {
        Motion::new(A::unit() * m.v, Vector3::zeros())
    }
}

impl<A: Axis> JointMotion for PrismaticMotion<A> {
    fn cross_from(&self, m: &Motion) -> Motion {
        Motion::new(A::cross(m.angular()) * self.v, Vector3::zeros())
    }
}

pub type JointDataPrismatic<A> = JointDataBase<LinearAxisSubspace<A>, PrismaticMotion<A>, 1>;

/// Prismatic joint along the x, y or z axis of the joint frame.
/// The configuration is the displacement along the axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Prismatic<A: Axis> {
    #[serde(default)]
    pub indexes: JointIndexes,
    #[serde(skip)]
    axis: PhantomData<A>,
}

impl<A: Axis> Prismatic<A> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: Axis> JointModelTrait for Prismatic<A> {
    const NQ: usize = 1;
    const NV: usize = 1;
    type ConfigVector = Vector1<f64>;
    type TangentVector = Vector1<f64>;
    type Data = JointDataPrismatic<A>;

    fn shortname(&self) -> &'static str {
        match A::INDEX {
            0 => "JointModelPX",
            1 => "JointModelPY",
            _ => "JointModelPZ",
        }
    }

    fn indexes(&self) -> &JointIndexes {
        &self.indexes
    }

    fn indexes_mut(&mut self) -> &mut JointIndexes {
        &mut self.indexes
    }

    fn create_data(&self) -> Self::Data {
        JointDataPrismatic::default()
    }

    fn calc(&self, data: &mut Self::Data, q: &Vector1<f64>) {
        data.transform = SpatialTransform::new(Matrix3::identity(), A::unit() * q[0]);
    }

    fn calc_velocity(&self, data: &mut Self::Data, q: &Vector1<f64>, v: &Vector1<f64>) {
        self.calc(data, q);
        data.motion = PrismaticMotion::new(v[0]);
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
        Vector1::new(rng.random_range(-1.0..=1.0))
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

pub type PrismaticX = Prismatic<AxisX>;
pub type PrismaticY = Prismatic<AxisY>;
pub type PrismaticZ = Prismatic<AxisZ>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearUnalignedSubspace {
    pub axis: Vector3<f64>,
}

impl Default for LinearUnalignedSubspace {
    fn default() -> Self {
        Self { axis: Vector3::z() }
    }
}

impl MotionSubspace<1> for LinearUnalignedSubspace {
    fn motion(&self, v: &Vector1<f64>) -> Motion {
        Motion::new(self.axis * v[0], Vector3::zeros())
    }

    fn transpose_mul(&self, f: &Force) -> Vector1<f64> {
        Vector1::new(self.axis.dot(f.linear()))
    }

    fn matrix(&self) -> SMatrix<f64, 6, 1> {
        Motion::new(self.axis, Vector3::zeros()).vector()
    }

    fn inertia_mul(&self, inertia: &Matrix6<f64>) -> SMatrix<f64, 6, 1> {
        inertia.fixed_columns::<3>(0) * self.axis
    }

    fn project(&self, u: &SMatrix<f64, 6, 1>) -> SMatrix<f64, 1, 1> {
        Vector1::new(self.axis.dot(&u.fixed_rows::<3>(0)))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PrismaticUnalignedMotion {
    pub axis: Vector3<f64>,
    pub v: f64,
}

impl From<PrismaticUnalignedMotion> for Motion {
    fn from(m: PrismaticUnalignedMotion) -> Motion {
        Motion::new(m.axis * m.v, Vector3::zeros())
    }
}

impl JointMotion for PrismaticUnalignedMotion {
    fn cross_from(&self, m: &Motion) -> Motion {
        Motion::new(m.angular().cross(&(self.axis * self.v)), Vector3::zeros())
    }
}

pub type JointDataPrismaticUnaligned =
    JointDataBase<LinearUnalignedSubspace, PrismaticUnalignedMotion, 1>;

/// Prismatic joint along a fixed unit axis of the joint frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UnalignedAxisRecord")]
pub struct PrismaticUnaligned {
    #[serde(default)]
    pub indexes: JointIndexes,
    axis: Vector3<f64>,
}

impl PrismaticUnaligned {
    pub fn new(axis: Vector3<f64>) -> Result<Self, JointErrors> {
        let axis = unit_axis(&axis)?;
        Ok(Self { indexes: JointIndexes::default(), axis })
    }

    pub fn axis(&self) -> &Vector3<f64> {
        &self.axis
    }
}

impl Default for PrismaticUnaligned {
    fn default() -> Self {
        Self { indexes: JointIndexes::default(), axis: Vector3::z() }
    }
}

impl TryFrom<UnalignedAxisRecord> for PrismaticUnaligned {
    type Error = JointErrors;

    fn try_from(record: UnalignedAxisRecord) -> Result<Self, JointErrors> {
        let axis = unit_axis(&record.axis)?;
        Ok(Self { indexes: record.indexes, axis })
    }
}

impl JointModelTrait for PrismaticUnaligned {
    const NQ: usize = 1;
    const NV: usize = 1;
    type ConfigVector = Vector1<f64>;
    type TangentVector = Vector1<f64>;
    type Data = JointDataPrismaticUnaligned;

    fn shortname(&self) -> &'static str {
        "JointModelPrismaticUnaligned"
    }

    fn indexes(&self) -> &JointIndexes {
        &self.indexes
    }

    fn indexes_mut(&mut self) -> &mut JointIndexes {
        &mut self.indexes
    }

    fn create_data(&self) -> Self::Data {
        JointDataBase {
            subspace: LinearUnalignedSubspace { axis: self.axis },
            motion: PrismaticUnalignedMotion { axis: self.axis, v: 0.0 },
            ..Default::default()
        }
    }

    fn calc(&self, data: &mut Self::Data, q: &Vector1<f64>) {
        data.transform = SpatialTransform::new(Matrix3::identity(), self.axis * q[0]);
        data.subspace.axis = self.axis;
    }

    fn calc_velocity(&self, data: &mut Self::Data, q: &Vector1<f64>, v: &Vector1<f64>) {
        self.calc(data, q);
        data.motion = PrismaticUnalignedMotion { axis: self.axis, v: v[0] };
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
        Vector1::new(rng.random_range(-1.0..=1.0))
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
