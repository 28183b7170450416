use nalgebra::{Matrix3, Matrix6, SMatrix, SVector, Vector3};
use spatial_algebra::{Force, Motion, SpatialInertia, SpatialTransform};
use std::fmt::Debug;

/// Motion produced by a joint, stored in whatever compact form the kind allows.
pub trait JointMotion:
    Copy + Clone + Debug + Default + PartialEq + Into<Motion> + Send + Sync
{
    fn motion(&self) -> Motion {
        (*self).into()
    }

    /// m x self
    fn cross_from(&self, m: &Motion) -> Motion {
        m.cross_motion(self.motion())
    }
}

impl JointMotion for Motion {}

/// Motion subspace S of a joint, the 6 x NV map from joint velocity to spatial motion.
///
/// Only `motion`, `transpose_mul` and `matrix` are required. Kinds whose S is made of
/// unit columns override the products so they become column copies and row picks.
pub trait MotionSubspace<const NV: usize>:
    Copy + Clone + Debug + Default + PartialEq + Send + Sync
{
    /// S v
    fn motion(&self, v: &SVector<f64, NV>) -> Motion;

    /// S^T f
    fn transpose_mul(&self, f: &Force) -> SVector<f64, NV>;

    fn matrix(&self) -> SMatrix<f64, 6, NV>;

    /// I S, with I a dense (articulated) inertia
    fn inertia_mul(&self, inertia: &Matrix6<f64>) -> SMatrix<f64, 6, NV> {
        inertia * self.matrix()
    }

    /// S^T U
    fn project(&self, u: &SMatrix<f64, 6, NV>) -> SMatrix<f64, NV, NV> {
        self.matrix().transpose() * u
    }

    /// Y S, with Y a rigid body inertia
    fn spatial_inertia_mul(&self, inertia: &SpatialInertia) -> SMatrix<f64, 6, NV> {
        self.inertia_mul(&inertia.matrix())
    }

    /// Each column of S moved through `transform`.
    fn se3_action(&self, transform: &SpatialTransform) -> SMatrix<f64, 6, NV> {
        transform.action_matrix() * self.matrix()
    }
}

/// Three unit columns, the linear block when `OFFSET` is 0, the angular block when 3.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlockSubspace<const OFFSET: usize>;

pub type TranslationSubspace = BlockSubspace<0>;
pub type SphericalSubspace = BlockSubspace<3>;

impl<const OFFSET: usize> MotionSubspace<3> for BlockSubspace<OFFSET> {
    fn motion(&self, v: &Vector3<f64>) -> Motion {
        if OFFSET == 0 {
            Motion::new(*v, Vector3::zeros())
        } else {
            Motion::new(Vector3::zeros(), *v)
        }
    }

    fn transpose_mul(&self, f: &Force) -> Vector3<f64> {
        if OFFSET == 0 { *f.linear() } else { *f.angular() }
    }

    fn matrix(&self) -> SMatrix<f64, 6, 3> {
        let mut s = SMatrix::<f64, 6, 3>::zeros();
        s.fixed_view_mut::<3, 3>(OFFSET, 0).copy_from(&Matrix3::identity());
        s
    }

    fn inertia_mul(&self, inertia: &Matrix6<f64>) -> SMatrix<f64, 6, 3> {
        inertia.fixed_columns::<3>(OFFSET).into_owned()
    }

    fn project(&self, u: &SMatrix<f64, 6, 3>) -> Matrix3<f64> {
        u.fixed_rows::<3>(OFFSET).into_owned()
    }

    fn se3_action(&self, transform: &SpatialTransform) -> SMatrix<f64, 6, 3> {
        let r = transform.rotation();
        let mut s = SMatrix::<f64, 6, 3>::zeros();
        if OFFSET == 0 {
            s.fixed_view_mut::<3, 3>(0, 0).copy_from(r);
        } else {
            s.fixed_view_mut::<3, 3>(0, 0)
                .copy_from(&(transform.translation().cross_matrix() * r));
            s.fixed_view_mut::<3, 3>(3, 0).copy_from(r);
        }
        s
    }
}

/// Pure translation with a velocity expressed in the joint frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TranslationMotion(pub Vector3<f64>);

impl From<TranslationMotion> for Motion {
    fn from(m: TranslationMotion) -> Motion {
        Motion::new(m.0, Vector3::zeros())
    }
}

impl JointMotion for TranslationMotion {
    fn cross_from(&self, m: &Motion) -> Motion {
        Motion::new(m.angular().cross(&self.0), Vector3::zeros())
    }
}

/// Pure rotation with an angular velocity expressed in the joint frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SphericalMotion(pub Vector3<f64>);

impl From<SphericalMotion> for Motion {
    fn from(m: SphericalMotion) -> Motion {
        Motion::new(Vector3::zeros(), m.0)
    }
}

impl JointMotion for SphericalMotion {
    fn cross_from(&self, m: &Motion) -> Motion {
        Motion::new(m.linear().cross(&self.0), m.angular().cross(&self.0))
    }
}
