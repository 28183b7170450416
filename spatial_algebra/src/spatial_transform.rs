use crate::{Force, Motion};
use nalgebra::{Matrix3, Matrix6, Vector3};
use rotations::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Mul;
use transforms::Transform;

/// Below this angle the SE3 exp/log coefficients use their Taylor expansions.
const SMALL_ANGLE: f64 = 1e-6;

// we only need this as wrapper on Transform, other wise we cant impl Mul<Motion> for Transform since it's not in this crate
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpatialTransform(pub Transform);

impl SpatialTransform {
    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self(Transform::from_parts(rotation, translation))
    }

    pub fn identity() -> Self {
        Self(Transform::identity())
    }

    #[inline]
    pub fn rotation(&self) -> &Matrix3<f64> {
        &self.0.rotation.0
    }

    #[inline]
    pub fn translation(&self) -> &Vector3<f64> {
        &self.0.translation
    }

    #[inline]
    pub fn inv(&self) -> SpatialTransform {
        SpatialTransform::from(self.0.inv())
    }

    /// Moves a motion from the child frame to the parent frame.
    pub fn act_motion(&self, motion: &Motion) -> Motion {
        let angular = self.rotation() * motion.angular();
        let linear = self.rotation() * motion.linear() + self.translation().cross(&angular);
        Motion::new(linear, angular)
    }

    /// Moves a motion from the parent frame to the child frame.
    pub fn act_inv_motion(&self, motion: &Motion) -> Motion {
        let rt = self.rotation().transpose();
        let angular = rt * motion.angular();
        let linear = rt * (motion.linear() - self.translation().cross(motion.angular()));
        Motion::new(linear, angular)
    }

    /// Moves a force from the child frame to the parent frame.
    pub fn act_force(&self, force: &Force) -> Force {
        let linear = self.rotation() * force.linear();
        let angular = self.rotation() * force.angular() + self.translation().cross(&linear);
        Force::new(linear, angular)
    }

    /// Moves a force from the parent frame to the child frame.
    pub fn act_inv_force(&self, force: &Force) -> Force {
        let rt = self.rotation().transpose();
        let linear = rt * force.linear();
        let angular = rt * (force.angular() - self.translation().cross(force.linear()));
        Force::new(linear, angular)
    }

    /// 6x6 matrix of the action on motions, [[R, p^R], [0, R]].
    pub fn action_matrix(&self) -> Matrix6<f64> {
        let r = self.rotation();
        let pr = self.translation().cross_matrix() * r;
        let mut m = Matrix6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(r);
        m.fixed_view_mut::<3, 3>(0, 3).copy_from(&pr);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(r);
        m
    }

    /// 6x6 matrix of the action on forces, [[R, 0], [p^R, R]].
    pub fn dual_action_matrix(&self) -> Matrix6<f64> {
        let r = self.rotation();
        let pr = self.translation().cross_matrix() * r;
        let mut m = Matrix6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(r);
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&pr);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(r);
        m
    }

    /// Exponential map on SE3 of a twist integrated over unit time.
    ///
    /// # Arguments
    ///
    /// * `motion` - Twist expressed in the starting frame.
    ///
    /// # Returns
    ///
    /// The displacement reached after following `motion` for one unit of time.
    pub fn exp(motion: &Motion) -> SpatialTransform {
        let w = motion.angular();
        let theta2 = w.norm_squared();
        let theta = theta2.sqrt();
        let (a, b) = if theta < SMALL_ANGLE {
            (0.5 - theta2 / 24.0, 1.0 / 6.0 - theta2 / 120.0)
        } else {
            let (s, c) = theta.sin_cos();
            ((1.0 - c) / theta2, (theta - s) / (theta2 * theta))
        };
        let wx = w.cross_matrix();
        let v = Matrix3::identity() + wx * a + wx * wx * b;
        SpatialTransform(Transform::new(RotationMatrix::exp(w), v * motion.linear()))
    }

    /// Logarithm map on SE3, the inverse of `exp` for rotation angles below pi.
    pub fn log(&self) -> Motion {
        let w = self.0.rotation.log();
        let theta2 = w.norm_squared();
        let theta = theta2.sqrt();
        let k = if theta < SMALL_ANGLE {
            1.0 / 12.0 + theta2 / 720.0
        } else {
            let (s, c) = theta.sin_cos();
            (1.0 - theta * s / (2.0 * (1.0 - c))) / theta2
        };
        let wx = w.cross_matrix();
        let v_inv = Matrix3::identity() - wx * 0.5 + wx * wx * k;
        Motion::new(v_inv * self.translation(), w)
    }

    pub fn is_approx(&self, other: &SpatialTransform, tol: f64) -> bool {
        self.0.is_approx(&other.0, tol)
    }
}

impl From<Transform> for SpatialTransform {
    #[inline]
    fn from(value: Transform) -> Self {
        Self(value)
    }
}

impl Mul<Motion> for SpatialTransform {
    type Output = Motion;
    #[inline]
    fn mul(self, motion: Motion) -> Motion {
        self.act_motion(&motion)
    }
}

impl Mul<Force> for SpatialTransform {
    type Output = Force;
    #[inline]
    fn mul(self, force: Force) -> Force {
        self.act_force(&force)
    }
}

impl Mul<SpatialTransform> for SpatialTransform {
    type Output = SpatialTransform;
    #[inline]
    fn mul(self, rhs: SpatialTransform) -> SpatialTransform {
        SpatialTransform::from(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    const TOL: f64 = 1e-12;

    fn sample_transform() -> SpatialTransform {
        SpatialTransform::new(
            RotationMatrix::exp(&Vector3::new(0.2, 1.1, -0.4)).0,
            Vector3::new(0.3, -1.5, 2.0),
        )
    }

    fn sample_motion() -> Motion {
        Motion::new(Vector3::new(1.0, 2.0, -0.5), Vector3::new(-0.3, 0.8, 0.1))
    }

    fn sample_force() -> Force {
        Force::new(Vector3::new(-2.0, 0.5, 1.0), Vector3::new(0.4, -0.6, 0.9))
    }

    #[test]
    fn test_action_matches_matrix() {
        let x = sample_transform();
        let m = sample_motion();
        let f = sample_force();
        assert_abs_diff_eq!(
            (x * m).vector(),
            x.action_matrix() * m.vector(),
            epsilon = TOL
        );
        assert_abs_diff_eq!(
            (x * f).vector(),
            x.dual_action_matrix() * f.vector(),
            epsilon = TOL
        );
    }

    #[test]
    fn test_inverse_actions() {
        let x = sample_transform();
        let m = sample_motion();
        let f = sample_force();
        assert!(x.act_inv_motion(&x.act_motion(&m)).is_approx(&m, TOL));
        assert!(x.act_inv_force(&x.act_force(&f)).is_approx(&f, TOL));
        assert!(x.inv().act_motion(&m).is_approx(&x.act_inv_motion(&m), TOL));
    }

    #[test]
    fn test_action_preserves_power() {
        let x = sample_transform();
        let m = sample_motion();
        let f = sample_force();
        assert_abs_diff_eq!((x * m).dot(&(x * f)), m.dot(&f), epsilon = TOL);
    }

    #[test]
    fn test_composition_acts_in_order() {
        let a = sample_transform();
        let b = SpatialTransform::new(RotationMatrix::rot_y(0.9).0, Vector3::new(1.0, 0.0, -1.0));
        let m = sample_motion();
        assert!(((a * b) * m).is_approx(&(a * (b * m)), TOL));
        assert!((a * a.inv()).is_approx(&SpatialTransform::identity(), TOL));
    }

    #[test]
    fn test_exp_pure_translation() {
        let m = Motion::new(Vector3::new(1.0, -2.0, 3.0), Vector3::zeros());
        let x = SpatialTransform::exp(&m);
        assert!(x.is_approx(
            &SpatialTransform::new(Matrix3::identity(), Vector3::new(1.0, -2.0, 3.0)),
            TOL
        ));
    }

    #[test]
    fn test_exp_log_round_trip() {
        let motions = [
            sample_motion(),
            Motion::new(Vector3::new(0.1, 0.0, 0.2), Vector3::new(1e-9, 0.0, -2e-9)),
            Motion::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, 3.0)),
        ];
        for m in motions {
            let x = SpatialTransform::exp(&m);
            assert!(x.log().is_approx(&m, 1e-9));
        }
        assert!(SpatialTransform::identity().log().is_approx(&Motion::zeros(), TOL));
    }

    #[test]
    fn test_exp_screw_motion() {
        // rotate a quarter turn about z while moving along z
        let m = Motion::new(Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2));
        let x = SpatialTransform::exp(&m);
        assert_abs_diff_eq!(*x.translation(), Vector3::new(0.0, 0.0, 1.0), epsilon = TOL);
        assert_abs_diff_eq!(*x.rotation(), RotationMatrix::rot_z(std::f64::consts::FRAC_PI_2).0, epsilon = TOL);
    }
}
