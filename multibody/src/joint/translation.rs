use super::{
    JointErrors, JointIndexes, JointModelTrait,
    data::JointDataBase,
    sample_bounded,
    subspace::{TranslationMotion, TranslationSubspace},
};
use nalgebra::{Matrix3, Matrix6, Vector3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use spatial_algebra::SpatialTransform;

pub type JointDataTranslation = JointDataBase<TranslationSubspace, TranslationMotion, 3>;

/// Three dof translation, the configuration is the position of the child frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub indexes: JointIndexes,
}

impl Translation {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JointModelTrait for Translation {
    const NQ: usize = 3;
    const NV: usize = 3;
    type ConfigVector = Vector3<f64>;
    type TangentVector = Vector3<f64>;
    type Data = JointDataTranslation;

    fn shortname(&self) -> &'static str {
        "JointModelTranslation"
    }

    fn indexes(&self) -> &JointIndexes {
        &self.indexes
    }

    fn indexes_mut(&mut self) -> &mut JointIndexes {
        &mut self.indexes
    }

    fn create_data(&self) -> Self::Data {
        JointDataTranslation::default()
    }

    fn calc(&self, data: &mut Self::Data, q: &Vector3<f64>) {
        data.transform = SpatialTransform::new(Matrix3::identity(), *q);
    }

    fn calc_velocity(&self, data: &mut Self::Data, q: &Vector3<f64>, v: &Vector3<f64>) {
        self.calc(data, q);
        data.motion = TranslationMotion(*v);
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
        Vector3::from_fn(|_, _| rng.random_range(-1.0..=1.0))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::subspace::{JointMotion, MotionSubspace};
    use approx::assert_abs_diff_eq;
    use rand::{SeedableRng, rngs::SmallRng};
    use spatial_algebra::SpatialInertia;

    #[test]
    fn test_calc_velocity() {
        let joint = Translation::new();
        let mut data = joint.create_data();
        joint.calc_velocity(&mut data, &Vector3::new(1.0, 2.0, 3.0), &Vector3::new(-1.0, 0.0, 0.5));
        assert_eq!(*data.transform.translation(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(*data.transform.rotation(), Matrix3::identity());
        assert_eq!(*data.motion.motion().linear(), Vector3::new(-1.0, 0.0, 0.5));
        assert_eq!(joint.shortname(), "JointModelTranslation");
    }

    #[test]
    fn test_calc_aba_point_mass() {
        // a point mass on a free translation leaves no translational inertia behind
        let joint = Translation::new();
        let mut data = joint.create_data();
        let y = SpatialInertia::new(2.0, Vector3::new(0.0, 0.0, 1.0), &Matrix3::identity()).unwrap();
        let mut inertia = y.matrix();
        joint.calc_aba(&mut data, &mut inertia, true).unwrap();
        assert_abs_diff_eq!(data.aba.big_d_inv, Matrix3::identity() * 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(inertia.fixed_columns::<3>(0).norm(), 0.0, epsilon = 1e-12);
        assert_eq!(data.subspace.matrix(), data.subspace_matrix());
    }

    #[test]
    fn test_random_configuration_bounds() {
        let joint = Translation::new();
        let mut rng = SmallRng::seed_from_u64(4);
        let lower = Vector3::new(-2.0, 0.0, 5.0);
        let upper = Vector3::new(-1.0, 0.1, 6.0);
        for _ in 0..20 {
            let q = joint.random_configuration(&lower, &upper, &mut rng).unwrap();
            assert!((0..3).all(|i| q[i] >= lower[i] && q[i] <= upper[i]));
        }
    }
}
