use super::{
    JointErrors, JointIndexes, JointModelTrait,
    data::JointDataBase,
    sample_bounded,
    subspace::{JointMotion, MotionSubspace},
};
use nalgebra::{Matrix3, Matrix6, SMatrix, Vector3};
use rand::Rng;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};
use spatial_algebra::{Force, Motion, SpatialInertia, SpatialTransform};
use std::f64::consts::PI;

/// S of the planar joint: linear x, linear y and angular z, i.e. columns 0, 1 and 5 of the identity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlanarSubspace;

const PLANAR_ROWS: [usize; 3] = [0, 1, 5];

impl MotionSubspace<3> for PlanarSubspace {
    fn motion(&self, v: &Vector3<f64>) -> Motion {
        Motion::new(Vector3::new(v[0], v[1], 0.0), Vector3::new(0.0, 0.0, v[2]))
    }

    fn transpose_mul(&self, f: &Force) -> Vector3<f64> {
        Vector3::new(f.linear()[0], f.linear()[1], f.angular()[2])
    }

    fn matrix(&self) -> SMatrix<f64, 6, 3> {
        let mut s = SMatrix::<f64, 6, 3>::zeros();
        for (col, &row) in PLANAR_ROWS.iter().enumerate() {
            s[(row, col)] = 1.0;
        }
        s
    }

    fn inertia_mul(&self, inertia: &Matrix6<f64>) -> SMatrix<f64, 6, 3> {
        SMatrix::<f64, 6, 3>::from_columns(&[
            inertia.column(0).into_owned(),
            inertia.column(1).into_owned(),
            inertia.column(5).into_owned(),
        ])
    }

    fn project(&self, u: &SMatrix<f64, 6, 3>) -> Matrix3<f64> {
        Matrix3::from_rows(&[
            u.row(0).into_owned(),
            u.row(1).into_owned(),
            u.row(5).into_owned(),
        ])
    }

    /// Y S without building the 6x6 inertia.
    fn spatial_inertia_mul(&self, inertia: &SpatialInertia) -> SMatrix<f64, 6, 3> {
        let m = inertia.mass();
        let c = inertia.center_of_mass();
        let ic = inertia.inertia_matrix();
        let mut out = SMatrix::<f64, 6, 3>::zeros();

        // linear x
        out[(0, 0)] = m;
        out[(4, 0)] = m * c[2];
        out[(5, 0)] = -m * c[1];

        // linear y
        out[(1, 1)] = m;
        out[(3, 1)] = -m * c[2];
        out[(5, 1)] = m * c[0];

        // angular z
        out[(0, 2)] = -m * c[1];
        out[(1, 2)] = m * c[0];
        out[(3, 2)] = ic[(0, 2)] - m * c[0] * c[2];
        out[(4, 2)] = ic[(1, 2)] - m * c[1] * c[2];
        out[(5, 2)] = ic[(2, 2)] + m * (c[0] * c[0] + c[1] * c[1]);
        out
    }

    fn se3_action(&self, transform: &SpatialTransform) -> SMatrix<f64, 6, 3> {
        let r = transform.rotation();
        let p = transform.translation();
        let rz = r.column(2).into_owned();
        let mut out = SMatrix::<f64, 6, 3>::zeros();
        out.fixed_view_mut::<3, 1>(0, 0).copy_from(&r.column(0));
        out.fixed_view_mut::<3, 1>(0, 1).copy_from(&r.column(1));
        out.fixed_view_mut::<3, 1>(0, 2).copy_from(&p.cross(&rz));
        out.fixed_view_mut::<3, 1>(3, 2).copy_from(&rz);
        out
    }
}

/// Joint motion (x_dot, y_dot, theta_dot) in the joint frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlanarMotion {
    pub x_dot: f64,
    pub y_dot: f64,
    pub theta_dot: f64,
}

impl PlanarMotion {
    pub fn new(x_dot: f64, y_dot: f64, theta_dot: f64) -> Self {
        Self { x_dot, y_dot, theta_dot }
    }
}

impl From<PlanarMotion> for Motion {
    fn from(m: PlanarMotion) -> Motion {
        Motion::new(Vector3::new(m.x_dot, m.y_dot, 0.0), Vector3::new(0.0, 0.0, m.theta_dot))
    }
}

impl JointMotion for PlanarMotion {
    fn cross_from(&self, m: &Motion) -> Motion {
        let t = m.linear();
        let w = m.angular();
        let linear = Vector3::new(
            t[1] * self.theta_dot - w[2] * self.y_dot,
            -t[0] * self.theta_dot + w[2] * self.x_dot,
            w[0] * self.y_dot - w[1] * self.x_dot,
        );
        let angular = Vector3::new(w[1] * self.theta_dot, -w[0] * self.theta_dot, 0.0);
        Motion::new(linear, angular)
    }
}

pub type JointDataPlanar = JointDataBase<PlanarSubspace, PlanarMotion, 3>;

/// Planar joint: translation in the xy plane of the joint frame plus rotation about z.
/// The configuration is (x, y, theta).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Planar {
    #[serde(default)]
    pub indexes: JointIndexes,
}

impl Planar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JointModelTrait for Planar {
    const NQ: usize = 3;
    const NV: usize = 3;
    type ConfigVector = Vector3<f64>;
    type TangentVector = Vector3<f64>;
    type Data = JointDataPlanar;

    fn shortname(&self) -> &'static str {
        "JointModelPlanar"
    }

    fn indexes(&self) -> &JointIndexes {
        &self.indexes
    }

    fn indexes_mut(&mut self) -> &mut JointIndexes {
        &mut self.indexes
    }

    fn create_data(&self) -> Self::Data {
        JointDataPlanar::default()
    }

    fn calc(&self, data: &mut Self::Data, q: &Vector3<f64>) {
        data.transform = SpatialTransform::new(
            RotationMatrix::rot_z(q[2]).0,
            Vector3::new(q[0], q[1], 0.0),
        );
    }

    fn calc_velocity(&self, data: &mut Self::Data, q: &Vector3<f64>, v: &Vector3<f64>) {
        self.calc(data, q);
        data.motion = PlanarMotion::new(v[0], v[1], v[2]);
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
        Vector3::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-PI..=PI),
        )
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
