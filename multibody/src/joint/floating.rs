use super::{
    JointErrors, JointIndexes, JointModelTrait, check_norm,
    data::JointDataBase,
    sample_bounded,
    subspace::MotionSubspace,
};
use nalgebra::{Matrix6, SMatrix, SVector, Vector3, Vector6};
use rand::Rng;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};
use spatial_algebra::{Force, Motion, SpatialInertia, SpatialTransform};

pub type Vector7<T> = SVector<T, 7>;

/// S of the free joint, the 6x6 identity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FloatingSubspace;

impl MotionSubspace<6> for FloatingSubspace {
    fn motion(&self, v: &Vector6<f64>) -> Motion {
        Motion::from(*v)
    }

    fn transpose_mul(&self, f: &Force) -> Vector6<f64> {
        f.vector()
    }

    fn matrix(&self) -> Matrix6<f64> {
        Matrix6::identity()
    }

    fn inertia_mul(&self, inertia: &Matrix6<f64>) -> Matrix6<f64> {
        *inertia
    }

    fn project(&self, u: &Matrix6<f64>) -> Matrix6<f64> {
        *u
    }

    fn spatial_inertia_mul(&self, inertia: &SpatialInertia) -> Matrix6<f64> {
        inertia.matrix()
    }

    fn se3_action(&self, transform: &SpatialTransform) -> SMatrix<f64, 6, 6> {
        transform.action_matrix()
    }
}

pub type JointDataFloating = JointDataBase<FloatingSubspace, Motion, 6>;

/// Free joint between two bodies.
///
/// The configuration is (position, attitude): the position of the child frame
/// in the parent frame followed by the attitude quaternion (x, y, z, w).
/// The velocity is the spatial motion (linear, angular) in the child frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Floating {
    #[serde(default)]
    pub indexes: JointIndexes,
}

impl Floating {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configuration(position: &Vector3<f64>, attitude: &Quaternion) -> Vector7<f64> {
        let mut q = Vector7::zeros();
        q.fixed_rows_mut::<3>(0).copy_from(position);
        q.fixed_rows_mut::<4>(3).copy_from(&attitude.coeffs());
        q
    }

    pub fn position(q: &Vector7<f64>) -> Vector3<f64> {
        q.fixed_rows::<3>(0).into_owned()
    }

    pub fn attitude(q: &Vector7<f64>) -> Quaternion {
        Quaternion::from_coeffs(&q.fixed_rows::<4>(3).into_owned())
    }

    fn placement(q: &Vector7<f64>) -> SpatialTransform {
        let rotation = RotationMatrix::from(&Self::attitude(q));
        SpatialTransform::new(rotation.0, Self::position(q))
    }
}

impl JointModelTrait for Floating {
    const NQ: usize = 7;
    const NV: usize = 6;
    type ConfigVector = Vector7<f64>;
    type TangentVector = Vector6<f64>;
    type Data = JointDataFloating;

    fn shortname(&self) -> &'static str {
        "JointModelFreeFlyer"
    }

    fn indexes(&self) -> &JointIndexes {
        &self.indexes
    }

    fn indexes_mut(&mut self) -> &mut JointIndexes {
        &mut self.indexes
    }

    fn create_data(&self) -> Self::Data {
        JointDataFloating::default()
    }

    fn calc(&self, data: &mut Self::Data, q: &Vector7<f64>) {
        data.transform = Self::placement(q);
    }

    fn calc_velocity(&self, data: &mut Self::Data, q: &Vector7<f64>, v: &Vector6<f64>) {
        self.calc(data, q);
        data.motion = Motion::from(*v);
    }

    fn calc_aba(
        &self,
        data: &mut Self::Data,
        inertia: &mut Matrix6<f64>,
        update_inertia: bool,
    ) -> Result<(), JointErrors> {
        data.update_aba(self.indexes.id, inertia, update_inertia)
    }

    /// M * exp(v), the attitude is advanced on the quaternion directly.
    fn integrate(&self, q: &Vector7<f64>, v: &Vector6<f64>) -> Vector7<f64> {
        let motion = Motion::from(*v);
        let step = SpatialTransform::exp(&motion);
        let attitude = Self::attitude(q);
        let position =
            Self::position(q) + RotationMatrix::from(&attitude).0 * step.translation();
        let attitude = attitude * Quaternion::from_rotation_vector(motion.angular());
        Self::configuration(&position, &attitude)
    }

    fn interpolate(&self, q0: &Vector7<f64>, q1: &Vector7<f64>, u: f64) -> Vector7<f64> {
        let v = self.difference(q0, q1) * u;
        self.integrate(q0, &v)
    }

    /// log(M0^-1 M1)
    fn difference(&self, q0: &Vector7<f64>, q1: &Vector7<f64>) -> Vector6<f64> {
        let m0 = Self::placement(q0);
        let m1 = Self::placement(q1);
        (m0.inv() * m1).log().vector()
    }

    fn distance(&self, q0: &Vector7<f64>, q1: &Vector7<f64>) -> Result<f64, JointErrors> {
        Ok(self.difference(q0, q1).norm())
    }

    fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector7<f64> {
        let position = Vector3::from_fn(|_, _| rng.random_range(-1.0..=1.0));
        Self::configuration(&position, &Quaternion::random(rng))
    }

    /// The position is sampled inside its limits, which must be finite.
    /// The attitude limits are not used.
    fn random_configuration<R: Rng + ?Sized>(
        &self,
        lower: &Vector7<f64>,
        upper: &Vector7<f64>,
        rng: &mut R,
    ) -> Result<Vector7<f64>, JointErrors> {
        let position = sample_bounded(
            self.indexes.id,
            &Self::position(lower),
            &Self::position(upper),
            rng,
        )?;
        Ok(Self::configuration(&position, &Quaternion::random(rng)))
    }

    fn check_configuration(&self, q: &Vector7<f64>) -> Result<(), JointErrors> {
        check_norm("quaternion norm", q.fixed_rows::<4>(3).norm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{SeedableRng, rngs::SmallRng};
    const TOL: f64 = 1e-12;

    fn same_configuration(a: &Vector7<f64>, b: &Vector7<f64>, tol: f64) -> bool {
        (Floating::position(a) - Floating::position(b)).amax() <= tol
            && Quaternion::define_same_rotation(&Floating::attitude(a), &Floating::attitude(b), tol)
    }

    #[test]
    fn test_calc() {
        let joint = Floating::new();
        let mut data = joint.create_data();
        let attitude = Quaternion::from_rotation_vector(&Vector3::new(0.2, -0.1, 0.4));
        let q = Floating::configuration(&Vector3::new(1.0, 2.0, 3.0), &attitude);
        let v = Vector6::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        joint.calc_velocity(&mut data, &q, &v);
        assert_eq!(*data.transform.translation(), Vector3::new(1.0, 2.0, 3.0));
        assert_abs_diff_eq!(*data.transform.rotation(), RotationMatrix::from(&attitude).0, epsilon = TOL);
        assert_eq!(data.motion().vector(), v);
        assert_eq!(data.subspace_matrix(), Matrix6::identity());
    }

    #[test]
    fn test_integrate_matches_se3_exp() {
        let joint = Floating::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let q = joint.random(&mut rng);
        let v = Vector6::new(0.3, -0.2, 0.5, 0.9, 0.1, -0.4);
        let q1 = joint.integrate(&q, &v);
        let expected = Floating::placement(&q) * SpatialTransform::exp(&Motion::from(v));
        assert!(Floating::placement(&q1).is_approx(&expected, 1e-10));
    }

    #[test]
    fn test_integrate_zero_is_exact() {
        let joint = Floating::new();
        let mut rng = SmallRng::seed_from_u64(2);
        let q = joint.random(&mut rng);
        assert_eq!(joint.integrate(&q, &Vector6::zeros()), q);
    }

    #[test]
    fn test_difference_round_trip() {
        let joint = Floating::new();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            let q0 = joint.random(&mut rng);
            let q1 = joint.random(&mut rng);
            let v = joint.difference(&q0, &q1);
            assert!(same_configuration(&joint.integrate(&q0, &v), &q1, 1e-9));
            assert!(same_configuration(&joint.interpolate(&q0, &q1, 1.0), &q1, 1e-9));
            assert_eq!(joint.interpolate(&q0, &q1, 0.0), q0);
        }
    }

    #[test]
    fn test_distance_double_cover() {
        let joint = Floating::new();
        let mut rng = SmallRng::seed_from_u64(4);
        let q = joint.random(&mut rng);
        let flipped = Floating::configuration(&Floating::position(&q), &(-Floating::attitude(&q)));
        assert_abs_diff_eq!(joint.distance(&q, &q).unwrap(), 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(joint.distance(&q, &flipped).unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_scaled_attitude_rejected() {
        let joint = Floating::new();
        let mut q = Floating::configuration(&Vector3::new(1.0, 0.0, -1.0), &Quaternion::IDENTITY);
        q[6] = 2.0;
        assert_eq!(
            joint.check_configuration(&q),
            Err(JointErrors::NumericDomain { quantity: "quaternion norm", value: 2.0 })
        );
        q[6] = 1.0;
        assert!(joint.check_configuration(&q).is_ok());
    }

    #[test]
    fn test_random_configuration_needs_bounded_position() {
        let joint = Floating::new();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut lower = Vector7::repeat(f64::NEG_INFINITY);
        let mut upper = Vector7::repeat(f64::INFINITY);
        assert_eq!(
            joint.random_configuration(&lower, &upper, &mut rng),
            Err(JointErrors::UnboundedSampling { id: 0, index: 0 })
        );
        lower.fixed_rows_mut::<3>(0).fill(-1.0);
        upper.fixed_rows_mut::<3>(0).fill(2.0);
        let q = joint.random_configuration(&lower, &upper, &mut rng).unwrap();
        assert!((0..3).all(|i| q[i] >= -1.0 && q[i] <= 2.0));
        assert_abs_diff_eq!(q.fixed_rows::<4>(3).norm(), 1.0, epsilon = TOL);
    }
}
