use super::{
    JointErrors, JointIndexes, JointModelTrait,
    data::JointDataBase,
    sample_bounded,
    subspace::{MotionSubspace, SphericalMotion},
};
use nalgebra::{Matrix3, Matrix6, SMatrix, Vector3};
use rand::Rng;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};
use spatial_algebra::{Force, Motion, SpatialTransform};
use std::f64::consts::PI;

/// Angular only subspace whose 3x3 block depends on the configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphericalZyxSubspace {
    pub s_w: Matrix3<f64>,
}

impl Default for SphericalZyxSubspace {
    fn default() -> Self {
        // S at q = 0
        Self { s_w: Matrix3::new(0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0) }
    }
}

impl MotionSubspace<3> for SphericalZyxSubspace {
    fn motion(&self, v: &Vector3<f64>) -> Motion {
        Motion::new(Vector3::zeros(), self.s_w * v)
    }

    fn transpose_mul(&self, f: &Force) -> Vector3<f64> {
        self.s_w.tr_mul(f.angular())
    }

    fn matrix(&self) -> SMatrix<f64, 6, 3> {
        let mut s = SMatrix::<f64, 6, 3>::zeros();
        s.fixed_view_mut::<3, 3>(3, 0).copy_from(&self.s_w);
        s
    }

    fn inertia_mul(&self, inertia: &Matrix6<f64>) -> SMatrix<f64, 6, 3> {
        inertia.fixed_columns::<3>(3) * self.s_w
    }

    fn project(&self, u: &SMatrix<f64, 6, 3>) -> Matrix3<f64> {
        self.s_w.tr_mul(&u.fixed_rows::<3>(3))
    }
}

pub type JointDataSphericalZyx = JointDataBase<SphericalZyxSubspace, SphericalMotion, 3>;

/// Ball joint parametrized by intrinsic ZYX Euler angles (z, y, x),
/// so the rotation is Rz Ry Rx. Singular at y = +/- pi/2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SphericalZyx {
    #[serde(default)]
    pub indexes: JointIndexes,
}

impl SphericalZyx {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JointModelTrait for SphericalZyx {
    const NQ: usize = 3;
    const NV: usize = 3;
    type ConfigVector = Vector3<f64>;
    type TangentVector = Vector3<f64>;
    type Data = JointDataSphericalZyx;

    fn shortname(&self) -> &'static str {
        "JointModelSphericalZYX"
    }

    fn indexes(&self) -> &JointIndexes {
        &self.indexes
    }

    fn indexes_mut(&mut self) -> &mut JointIndexes {
        &mut self.indexes
    }

    fn create_data(&self) -> Self::Data {
        JointDataSphericalZyx::default()
    }

    fn calc(&self, data: &mut Self::Data, q: &Vector3<f64>) {
        let rotation = RotationMatrix::from_euler_zyx(q[0], q[1], q[2]);
        data.transform = SpatialTransform::new(rotation.0, Vector3::zeros());

        let (s1, c1) = q[1].sin_cos();
        let (s2, c2) = q[2].sin_cos();
        data.subspace.s_w = Matrix3::new(-s1, 0.0, 1.0, c1 * s2, c2, 0.0, c1 * c2, -s2, 0.0);
    }

    fn calc_velocity(&self, data: &mut Self::Data, q: &Vector3<f64>, v: &Vector3<f64>) {
        self.calc(data, q);
        data.motion = SphericalMotion(data.subspace.s_w * v);

        let (s1, c1) = q[1].sin_cos();
        let (s2, c2) = q[2].sin_cos();
        let (dq0, dq1, dq2) = (v[0], v[1], v[2]);
        let bias = Vector3::new(
            -c1 * dq0 * dq1,
            -s1 * s2 * dq0 * dq1 + c1 * c2 * dq0 * dq2 - s2 * dq1 * dq2,
            -s1 * c2 * dq0 * dq1 - c1 * s2 * dq0 * dq2 - c2 * dq1 * dq2,
        );
        data.bias = Motion::new(Vector3::zeros(), bias);
    }

    fn calc_aba(
        &self,
        data: &mut Self::Data,
        inertia: &mut Matrix6<f64>,
        update_inertia: bool,
    ) -> Result<(), JointErrors> {
        data.update_aba(self.indexes.id, inertia, update_inertia)
    }

    fn integrate(&self, q: &Vector3<f64>, v: &Vector3<f64>) -> Vector3<f64> {
        q + v
    }

    fn interpolate(&self, q0: &Vector3<f64>, q1: &Vector3<f64>, u: f64) -> Vector3<f64> {
        q0 + (q1 - q0) * u
    }

    fn difference(&self, q0: &Vector3<f64>, q1: &Vector3<f64>) -> Vector3<f64> {
        q1 - q0
    }

    fn distance(&self, q0: &Vector3<f64>, q1: &Vector3<f64>) -> Result<f64, JointErrors> {
        Ok((q1 - q0).norm())
    }

    fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector3<f64> {
        Vector3::from_fn(|_, _| rng.random_range(-PI..=PI))
    }

    fn random_configuration<R: Rng + ?Sized>(
        &self,
        lower: &Vector3<f64>,
        upper: &Vector3<f64>,
        rng: &mut R,
    ) -> Result<Vector3<f64>, JointErrors> {
        sample_bounded(self.indexes.id, lower, upper, rng)
    }
}
