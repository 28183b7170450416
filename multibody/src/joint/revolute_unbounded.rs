use super::{
    Axis, JointErrors, JointIndexes, JointModelTrait,
    axis::{AxisX, AxisY, AxisZ},
    check_norm,
    revolute::{JointDataRevolute, RevoluteMotion},
};
use nalgebra::{Matrix6, Vector1, Vector2, Vector3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use spatial_algebra::SpatialTransform;
use std::{f64::consts::PI, marker::PhantomData};

/// Continuous revolute joint. The angle is stored as the unit complex
/// number (cos, sin) so the configuration never wraps.
///
/// Shares its data, and therefore its motion subspace, with [`super::Revolute`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RevoluteUnbounded<A: Axis> {
    #[serde(default)]
    pub indexes: JointIndexes,
    #[serde(skip)]
    axis: PhantomData<A>,
}

impl<A: Axis> RevoluteUnbounded<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration of the angle `theta`.
    pub fn from_angle(theta: f64) -> Vector2<f64> {
        let (s, c) = theta.sin_cos();
        Vector2::new(c, s)
    }
}

impl<A: Axis> JointModelTrait for RevoluteUnbounded<A> {
    const NQ: usize = 2;
    const NV: usize = 1;
    type ConfigVector = Vector2<f64>;
    type TangentVector = Vector1<f64>;
    type Data = JointDataRevolute<A>;

    fn shortname(&self) -> &'static str {
        match A::INDEX {
            0 => "JointModelRUBX",
            1 => "JointModelRUBY",
            _ => "JointModelRUBZ",
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

    fn calc(&self, data: &mut Self::Data, q: &Vector2<f64>) {
        let n = q.norm();
        data.transform = SpatialTransform::new(A::rotation(q[0] / n, q[1] / n), Vector3::zeros());
    }

    fn calc_velocity(&self, data: &mut Self::Data, q: &Vector2<f64>, v: &Vector1<f64>) {
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

    fn integrate(&self, q: &Vector2<f64>, v: &Vector1<f64>) -> Vector2<f64> {
        let (sa, ca) = v[0].sin_cos();
        let c = q[0] * ca - q[1] * sa;
        let s = q[1] * ca + q[0] * sa;
        Vector2::new(c, s) / c.hypot(s)
    }

    fn interpolate(&self, q0: &Vector2<f64>, q1: &Vector2<f64>, u: f64) -> Vector2<f64> {
        let v = self.difference(q0, q1) * u;
        self.integrate(q0, &v)
    }

    fn difference(&self, q0: &Vector2<f64>, q1: &Vector2<f64>) -> Vector1<f64> {
        let (c0, s0) = (q0[0], q0[1]);
        let (c1, s1) = (q1[0], q1[1]);
        Vector1::new((c0 * s1 - s0 * c1).atan2(c0 * c1 + s0 * s1))
    }

    fn distance(&self, q0: &Vector2<f64>, q1: &Vector2<f64>) -> Result<f64, JointErrors> {
        Ok(self.difference(q0, q1)[0].abs())
    }

    fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector2<f64> {
        Self::from_angle(rng.random_range(-PI..=PI))
    }

    /// The circle is compact, the limits are not used.
    fn random_configuration<R: Rng + ?Sized>(
        &self,
        _lower: &Vector2<f64>,
        _upper: &Vector2<f64>,
        rng: &mut R,
    ) -> Result<Vector2<f64>, JointErrors> {
        Ok(self.random(rng))
    }

    fn check_configuration(&self, q: &Vector2<f64>) -> Result<(), JointErrors> {
        check_norm("unit complex norm", q.norm())
    }
}

pub type RevoluteUnboundedX = RevoluteUnbounded<AxisX>;
pub type RevoluteUnboundedY = RevoluteUnbounded<AxisY>;
pub type RevoluteUnboundedZ = RevoluteUnbounded<AxisZ>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::{Revolute, basic};
    use approx::assert_abs_diff_eq;
    use nalgebra::DVector;
    use rand::{SeedableRng, rngs::SmallRng};
    const TOL: f64 = 1e-12;

    #[test]
    fn test_matches_bounded_revolute() {
        let bounded = Revolute::<AxisY>::new();
        let unbounded = RevoluteUnboundedY::new();
        let mut a = bounded.create_data();
        let mut b = unbounded.create_data();
        bounded.calc_velocity(&mut a, &Vector1::new(2.0), &Vector1::new(0.5));
        unbounded.calc_velocity(&mut b, &RevoluteUnboundedY::from_angle(2.0), &Vector1::new(0.5));
        assert!(a.transform.is_approx(&b.transform, TOL));
        assert_eq!(a.motion, b.motion);
    }

    #[test]
    fn test_integrate_wraps() {
        let joint = RevoluteUnboundedZ::new();
        let q = RevoluteUnboundedZ::from_angle(3.0);
        let q1 = joint.integrate(&q, &Vector1::new(0.5));
        assert_abs_diff_eq!(q1, RevoluteUnboundedZ::from_angle(3.5), epsilon = TOL);
        // the difference goes the short way across pi
        assert_abs_diff_eq!(joint.difference(&q, &q1)[0], 0.5, epsilon = TOL);
        assert_abs_diff_eq!(joint.distance(&q1, &q).unwrap(), 0.5, epsilon = TOL);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let joint = RevoluteUnboundedX::new();
        let q0 = RevoluteUnboundedX::from_angle(-0.4);
        let q1 = RevoluteUnboundedX::from_angle(1.0);
        let mid = joint.interpolate(&q0, &q1, 0.5);
        assert_abs_diff_eq!(mid, RevoluteUnboundedX::from_angle(0.3), epsilon = TOL);
    }

    #[test]
    fn test_random_on_circle() {
        let joint = RevoluteUnboundedX::new();
        let mut rng = SmallRng::seed_from_u64(8);
        let lower = Vector2::repeat(f64::NEG_INFINITY);
        let upper = Vector2::repeat(f64::INFINITY);
        for _ in 0..20 {
            let q = joint.random_configuration(&lower, &upper, &mut rng).unwrap();
            assert_abs_diff_eq!(q.norm(), 1.0, epsilon = TOL);
        }
    }

    #[test]
    fn test_off_circle_configuration_rejected() {
        let joint = RevoluteUnboundedX::new();
        assert!(joint.check_configuration(&Vector2::zeros()).is_err());
        assert!(joint.check_configuration(&Vector2::new(0.0, 2.0)).is_err());
        assert!(joint.check_configuration(&Vector2::new(0.0, 1.0)).is_ok());

        let joint = RevoluteUnboundedZ::new();
        let q = DVector::from_vec(vec![0.0, 2.0]);
        let mut q_out = DVector::zeros(2);
        assert_eq!(
            basic::integrate(&joint, &q, &DVector::zeros(1), &mut q_out),
            Err(JointErrors::NumericDomain { quantity: "unit complex norm", value: 2.0 })
        );
    }
}
