pub mod axis;
pub mod basic;
pub mod data;
pub mod dense;
pub mod errors;
pub mod floating;
pub mod joint_set;
pub mod planar;
pub mod prismatic;
pub mod revolute;
pub mod revolute_unbounded;
pub mod segment;
pub mod spherical;
pub mod spherical_zyx;
pub mod subspace;
pub mod translation;
pub mod variant;

pub use axis::{Axis, AxisX, AxisY, AxisZ};
pub use dense::{JointDataDense, JointModelDense};
pub use errors::JointErrors;
pub use floating::Floating;
pub use joint_set::{JointSet, JointSetErrors};
pub use planar::Planar;
pub use prismatic::{Prismatic, PrismaticUnaligned};
pub use revolute::{Revolute, RevoluteUnaligned};
pub use revolute_unbounded::RevoluteUnbounded;
pub use segment::FixedVector;
pub use spherical::Spherical;
pub use spherical_zyx::SphericalZyx;
pub use translation::Translation;
pub use variant::{JointData, JointKind, JointModel};

use nalgebra::{Matrix6, SVector};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub type JointIndex = usize;

/// Where a joint sits in the mechanism: its id and the offsets of its
/// configuration and velocity segments in the whole-mechanism vectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JointIndexes {
    pub id: JointIndex,
    pub idx_q: usize,
    pub idx_v: usize,
}

impl JointIndexes {
    pub fn new(id: JointIndex, idx_q: usize, idx_v: usize) -> Self {
        Self { id, idx_q, idx_v }
    }
}

/// Operations every joint kind provides.
///
/// Configurations live on the joint's manifold (NQ numbers), velocities and
/// differences in its tangent space (NV numbers). All methods here act on the
/// joint's own fixed size segments. See [`basic`] for the versions that read
/// whole-mechanism vectors.
pub trait JointModelTrait: Clone + Debug + PartialEq + Send + Sync {
    const NQ: usize;
    const NV: usize;
    type ConfigVector: FixedVector;
    type TangentVector: FixedVector;
    type Data: Clone + Debug + PartialEq + Send + Sync;

    fn shortname(&self) -> &'static str;
    fn indexes(&self) -> &JointIndexes;
    fn indexes_mut(&mut self) -> &mut JointIndexes;

    fn create_data(&self) -> Self::Data;

    /// Sets the joint transform and motion subspace for configuration `q`.
    fn calc(&self, data: &mut Self::Data, q: &Self::ConfigVector);

    /// Same as `calc`, also sets the joint motion and the bias for velocity `v`.
    fn calc_velocity(&self, data: &mut Self::Data, q: &Self::ConfigVector, v: &Self::TangentVector);

    /// Articulated body step against the inertia `inertia`.
    fn calc_aba(
        &self,
        data: &mut Self::Data,
        inertia: &mut Matrix6<f64>,
        update_inertia: bool,
    ) -> Result<(), JointErrors>;

    /// Configuration reached by following `v` from `q` for one unit of time.
    fn integrate(&self, q: &Self::ConfigVector, v: &Self::TangentVector) -> Self::ConfigVector;

    fn interpolate(
        &self,
        q0: &Self::ConfigVector,
        q1: &Self::ConfigVector,
        u: f64,
    ) -> Self::ConfigVector;

    /// Tangent vector v such that integrate(q0, v) = q1.
    fn difference(&self, q0: &Self::ConfigVector, q1: &Self::ConfigVector) -> Self::TangentVector;

    fn distance(&self, q0: &Self::ConfigVector, q1: &Self::ConfigVector) -> Result<f64, JointErrors>;

    fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::ConfigVector;

    fn random_configuration<R: Rng + ?Sized>(
        &self,
        lower: &Self::ConfigVector,
        upper: &Self::ConfigVector,
        rng: &mut R,
    ) -> Result<Self::ConfigVector, JointErrors>;

    /// Rejects configurations that are not points of the manifold.
    fn check_configuration(&self, _q: &Self::ConfigVector) -> Result<(), JointErrors> {
        Ok(())
    }

    #[inline]
    fn nq(&self) -> usize {
        Self::NQ
    }

    #[inline]
    fn nv(&self) -> usize {
        Self::NV
    }

    #[inline]
    fn id(&self) -> JointIndex {
        self.indexes().id
    }

    #[inline]
    fn idx_q(&self) -> usize {
        self.indexes().idx_q
    }

    #[inline]
    fn idx_v(&self) -> usize {
        self.indexes().idx_v
    }

    fn set_indexes(&mut self, id: JointIndex, idx_q: usize, idx_v: usize) {
        *self.indexes_mut() = JointIndexes::new(id, idx_q, idx_v);
    }

    fn to_dense(&self) -> JointModelDense {
        JointModelDense::new(Self::NQ, Self::NV, *self.indexes())
    }
}

/// Uniform sample in the box [lower, upper]. Every limit has to be finite.
pub(crate) fn sample_bounded<R: Rng + ?Sized, const N: usize>(
    id: JointIndex,
    lower: &SVector<f64, N>,
    upper: &SVector<f64, N>,
    rng: &mut R,
) -> Result<SVector<f64, N>, JointErrors> {
    if let Some(index) = (0..N).find(|&i| !lower[i].is_finite() || !upper[i].is_finite()) {
        tracing::debug!(id, index, "refusing to sample an unbounded configuration");
        return Err(JointErrors::UnboundedSampling { id, index });
    }
    Ok(SVector::from_fn(|i, _| {
        lower[i] + (upper[i] - lower[i]) * rng.random::<f64>()
    }))
}

/// Largest departure from a unit norm accepted for quaternion and unit complex coefficients.
pub const UNIT_NORM_TOL: f64 = 1e-6;

/// Rejects unit quaternion or unit complex coefficients that are off the unit sphere.
pub(crate) fn check_norm(quantity: &'static str, norm: f64) -> Result<(), JointErrors> {
    if (norm - 1.0).abs() <= UNIT_NORM_TOL {
        Ok(())
    } else {
        Err(JointErrors::NumericDomain { quantity, value: norm })
    }
}
