use super::{
    JointErrors, JointIndex,
    dense::JointDataDense,
    subspace::{JointMotion, MotionSubspace},
};
use nalgebra::{DMatrix, Matrix6, SMatrix};
use spatial_algebra::{Motion, SpatialTransform};

/// Scratch written by the articulated body step of a joint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbaCache<const NV: usize> {
    /// U = I S
    pub big_u: SMatrix<f64, 6, NV>,
    /// D^-1 = (S^T U)^-1
    pub big_d_inv: SMatrix<f64, NV, NV>,
    pub big_u_d_inv: SMatrix<f64, 6, NV>,
}

impl<const NV: usize> Default for AbaCache<NV> {
    fn default() -> Self {
        Self {
            big_u: SMatrix::zeros(),
            big_d_inv: SMatrix::zeros(),
            big_u_d_inv: SMatrix::zeros(),
        }
    }
}

/// Per-joint computed state, shared by every kind.
/// `S` is the kind's motion subspace and `V` its joint motion.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JointDataBase<S, V, const NV: usize> {
    pub subspace: S,
    pub transform: SpatialTransform,
    pub motion: V,
    pub bias: Motion,
    pub aba: AbaCache<NV>,
}

impl<S, V, const NV: usize> JointDataBase<S, V, NV>
where
    S: MotionSubspace<NV>,
    V: JointMotion,
{
    /// Joint motion as a plain spatial motion.
    pub fn motion(&self) -> Motion {
        self.motion.motion()
    }

    pub fn subspace_matrix(&self) -> SMatrix<f64, 6, NV> {
        self.subspace.matrix()
    }

    /// Articulated body step: U = I S, D = S^T U and its inverse, U D^-1.
    /// When `update_inertia` is set, I is reduced to I - U D^-1 U^T.
    /// A singular D leaves both the cache and I untouched.
    pub fn update_aba(
        &mut self,
        id: JointIndex,
        inertia: &mut Matrix6<f64>,
        update_inertia: bool,
    ) -> Result<(), JointErrors> {
        let big_u = self.subspace.inertia_mul(inertia);
        let big_d = self.subspace.project(&big_u);
        let big_d_inv = match big_d.try_inverse() {
            Some(inv) if inv.iter().all(|x| x.is_finite()) => inv,
            _ => {
                tracing::debug!(id, "projected joint inertia has no inverse");
                return Err(JointErrors::SingularJointInertia { id });
            }
        };
        let big_u_d_inv = big_u * big_d_inv;
        if update_inertia {
            *inertia -= big_u_d_inv * big_u.transpose();
        }
        self.aba = AbaCache { big_u, big_d_inv, big_u_d_inv };
        Ok(())
    }

    pub fn to_dense(&self) -> JointDataDense {
        let dense = |m: &[f64], rows: usize| DMatrix::from_column_slice(rows, NV, m);
        JointDataDense {
            subspace: dense(self.subspace_matrix().as_slice(), 6),
            transform: self.transform,
            motion: self.motion(),
            bias: self.bias,
            big_u: dense(self.aba.big_u.as_slice(), 6),
            big_d_inv: dense(self.aba.big_d_inv.as_slice(), NV),
            big_u_d_inv: dense(self.aba.big_u_d_inv.as_slice(), 6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::subspace::{SphericalMotion, SphericalSubspace};
    use approx::assert_abs_diff_eq;
    use rand::{SeedableRng, rngs::SmallRng};
    use spatial_algebra::SpatialInertia;
    const TOL: f64 = 1e-12;

    type Data = JointDataBase<SphericalSubspace, SphericalMotion, 3>;

    #[test]
    fn test_update_aba_reduces_inertia() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut data = Data::default();
        let original = SpatialInertia::random(&mut rng).matrix();
        let mut inertia = original;
        data.update_aba(0, &mut inertia, true).unwrap();

        let s = data.subspace_matrix();
        assert_abs_diff_eq!(data.aba.big_u, original * s, epsilon = TOL);
        let d = s.transpose() * original * s;
        assert_abs_diff_eq!(data.aba.big_d_inv * d, SMatrix::<f64, 3, 3>::identity(), epsilon = 1e-10);
        // the reduced inertia has no stiffness along the joint motion
        assert_abs_diff_eq!(inertia * s, SMatrix::<f64, 6, 3>::zeros(), epsilon = 1e-10);
    }

    #[test]
    fn test_update_aba_without_update_keeps_inertia() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut data = Data::default();
        let original = SpatialInertia::random(&mut rng).matrix();
        let mut inertia = original;
        data.update_aba(0, &mut inertia, false).unwrap();
        assert_eq!(inertia, original);
        assert_abs_diff_eq!(
            data.aba.big_u_d_inv,
            data.aba.big_u * data.aba.big_d_inv,
            epsilon = TOL
        );
    }

    #[test]
    fn test_update_aba_singular() {
        let mut data = Data::default();
        let mut inertia = Matrix6::zeros();
        inertia[(0, 0)] = 1.0;
        assert_eq!(
            data.update_aba(4, &mut inertia, true),
            Err(JointErrors::SingularJointInertia { id: 4 })
        );
        let mut expected = Matrix6::zeros();
        expected[(0, 0)] = 1.0;
        assert_eq!(inertia, expected);
        assert_eq!(data.aba, AbaCache::default());
    }

    #[test]
    fn test_to_dense() {
        let mut data = Data::default();
        data.motion = SphericalMotion(nalgebra::Vector3::new(1.0, 2.0, 3.0));
        let dense = data.to_dense();
        assert_eq!(dense.subspace.shape(), (6, 3));
        assert_eq!(dense.big_d_inv.shape(), (3, 3));
        assert_eq!(dense.motion, data.motion());
        assert_eq!(dense.subspace[(3, 0)], 1.0);
    }
}
