use super::{
    JointErrors, JointIndexes, JointModelTrait, check_norm,
    data::JointDataBase,
    subspace::{SphericalMotion, SphericalSubspace},
};
use nalgebra::{Matrix6, Vector3, Vector4};
use rand::Rng;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};
use spatial_algebra::SpatialTransform;

pub type JointDataSpherical = JointDataBase<SphericalSubspace, SphericalMotion, 3>;

/// Ball joint. The configuration is a unit quaternion stored as (x, y, z, w),
/// the velocity is the angular velocity in the joint frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Spherical {
    #[serde(default)]
    pub indexes: JointIndexes,
}

impl Spherical {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JointModelTrait for Spherical {
    const NQ: usize = 4;
    const NV: usize = 3;
    type ConfigVector = Vector4<f64>;
    type TangentVector = Vector3<f64>;
    type Data = JointDataSpherical;

    fn shortname(&self) -> &'static str {
        "JointModelSpherical"
    }

    fn indexes(&self) -> &JointIndexes {
        &self.indexes
    }

    fn indexes_mut(&mut self) -> &mut JointIndexes {
        &mut self.indexes
    }

    fn create_data(&self) -> Self::Data {
        JointDataSpherical::default()
    }

    fn calc(&self, data: &mut Self::Data, q: &Vector4<f64>) {
        let rotation = RotationMatrix::from(&Quaternion::from_coeffs(q));
        data.transform = SpatialTransform::new(rotation.0, Vector3::zeros());
    }

    fn calc_velocity(&self, data: &mut Self::Data, q: &Vector4<f64>, v: &Vector3<f64>) {
        self.calc(data, q);
        data.motion = SphericalMotion(*v);
    }

    fn calc_aba(
        &self,
        data: &mut Self::Data,
        inertia: &mut Matrix6<f64>,
        update_inertia: bool,
    ) -> Result<(), JointErrors> {
        data.update_aba(self.indexes.id, inertia, update_inertia)
    }

    /// q * exp(v), the angular velocity is expressed in the rotated frame.
    fn integrate(&self, q: &Vector4<f64>, v: &Vector3<f64>) -> Vector4<f64> {
        (Quaternion::from_coeffs(q) * Quaternion::from_rotation_vector(v)).coeffs()
    }

    fn interpolate(&self, q0: &Vector4<f64>, q1: &Vector4<f64>, u: f64) -> Vector4<f64> {
        let v = self.difference(q0, q1) * u;
        self.integrate(q0, &v)
    }

    /// log(q0^-1 * q1) along the shortest path.
    fn difference(&self, q0: &Vector4<f64>, q1: &Vector4<f64>) -> Vector3<f64> {
        let q0 = Quaternion::from_coeffs(q0);
        let q1 = Quaternion::from_coeffs(q1);
        // the conjugate only inverts q0 up to its squared norm, which the log ignores
        (q0.inv() * q1).to_rotation_vector()
    }

    /// Minimal angle between the two orientations, so q and -q are at distance 0.
    fn distance(&self, q0: &Vector4<f64>, q1: &Vector4<f64>) -> Result<f64, JointErrors> {
        let q0 = Quaternion::from_coeffs(q0).normalize()?;
        let q1 = Quaternion::from_coeffs(q1).normalize()?;
        Ok(Quaternion::angle_between(&q0, &q1)?)
    }

    fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector4<f64> {
        Quaternion::random(rng).coeffs()
    }

    /// SO(3) is compact, the limits are not used.
    fn random_configuration<R: Rng + ?Sized>(
        &self,
        _lower: &Vector4<f64>,
        _upper: &Vector4<f64>,
        rng: &mut R,
    ) -> Result<Vector4<f64>, JointErrors> {
        Ok(self.random(rng))
    }

    fn check_configuration(&self, q: &Vector4<f64>) -> Result<(), JointErrors> {
        check_norm("quaternion norm", q.norm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::basic;
    use approx::assert_abs_diff_eq;
    use nalgebra::DVector;
    use rand::{SeedableRng, rngs::SmallRng};
    use std::f64::consts::FRAC_PI_2;
    const TOL: f64 = 1e-12;

    fn same_rotation(a: &Vector4<f64>, b: &Vector4<f64>, tol: f64) -> bool {
        Quaternion::define_same_rotation(&Quaternion::from_coeffs(a), &Quaternion::from_coeffs(b), tol)
    }

    #[test]
    fn test_calc_quarter_turn_about_z() {
        let joint = Spherical::new();
        let mut data = joint.create_data();
        let q = Quaternion::from_rotation_vector(&Vector3::new(0.0, 0.0, FRAC_PI_2)).coeffs();
        joint.calc_velocity(&mut data, &q, &Vector3::new(0.1, 0.2, 0.3));
        assert_abs_diff_eq!(*data.transform.rotation(), RotationMatrix::rot_z(FRAC_PI_2).0, epsilon = TOL);
        assert_eq!(*data.motion().angular(), Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(*data.motion().linear(), Vector3::zeros());
    }

    #[test]
    fn test_integrate_zero_is_exact() {
        let joint = Spherical::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let q = joint.random(&mut rng);
        assert_eq!(joint.integrate(&q, &Vector3::zeros()), q);
    }

    #[test]
    fn test_difference_round_trip() {
        let joint = Spherical::new();
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..20 {
            let q0 = joint.random(&mut rng);
            let q1 = joint.random(&mut rng);
            let v = joint.difference(&q0, &q1);
            assert!(v.norm() <= std::f64::consts::PI + TOL);
            assert!(same_rotation(&joint.integrate(&q0, &v), &q1, 1e-10));
            assert!(same_rotation(&joint.interpolate(&q0, &q1, 1.0), &q1, 1e-10));
            assert_eq!(joint.interpolate(&q0, &q1, 0.0), q0);
        }
    }

    #[test]
    fn test_distance_double_cover() {
        let joint = Spherical::new();
        let mut rng = SmallRng::seed_from_u64(3);
        let q = joint.random(&mut rng);
        assert_eq!(joint.distance(&q, &q).unwrap(), 0.0);
        assert_eq!(joint.distance(&q, &(-q)).unwrap(), 0.0);
        // the sign of q1 does not change the difference either
        assert_abs_diff_eq!(joint.difference(&q, &(-q)), Vector3::zeros(), epsilon = TOL);
    }

    #[test]
    fn test_distance_is_minimal_angle() {
        let joint = Spherical::new();
        let q0 = Quaternion::IDENTITY.coeffs();
        let q1 = Quaternion::from_rotation_vector(&Vector3::new(0.0, 1.0, 0.0)).coeffs();
        // a one radian rotation is half a radian apart on the sphere of quaternions
        assert_abs_diff_eq!(joint.distance(&q0, &q1).unwrap(), 0.5, epsilon = TOL);
    }

    #[test]
    fn test_scaled_quaternion_rejected() {
        let mut joint = Spherical::new();
        joint.set_indexes(0, 0, 0);
        let q0 = DVector::from_column_slice(&[0.0, 0.0, 0.0, 2.0]);
        let q1 = Quaternion::from_rotation_vector(&Vector3::new(0.3, 0.0, -0.2)).coeffs();
        let q1 = DVector::from_column_slice(q1.as_slice());
        let mut q_out = DVector::zeros(4);
        assert_eq!(
            basic::interpolate(&joint, &q0, &q1, 1.0, &mut q_out),
            Err(JointErrors::NumericDomain { quantity: "quaternion norm", value: 2.0 })
        );
    }

    #[test]
    fn test_zero_quaternion() {
        let joint = Spherical::new();
        assert!(joint.check_configuration(&Vector4::zeros()).is_err());
        assert!(matches!(
            joint.distance(&Vector4::zeros(), &Quaternion::IDENTITY.coeffs()),
            Err(JointErrors::NumericDomain { .. })
        ));
    }

    #[test]
    fn test_random_ignores_limits() {
        let joint = Spherical::new();
        let mut rng = SmallRng::seed_from_u64(4);
        let inf = Vector4::repeat(f64::INFINITY);
        let q = joint.random_configuration(&(-inf), &inf, &mut rng).unwrap();
        assert_abs_diff_eq!(q.norm(), 1.0, epsilon = TOL);
    }
}
