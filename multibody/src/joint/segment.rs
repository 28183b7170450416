use super::JointErrors;
use nalgebra::{DVector, SVector};
use std::fmt::Debug;

/// Statically sized configuration or tangent vector of a single joint.
///
/// Joints only ever see their own segment of the whole-mechanism vectors,
/// these helpers do the slicing and the size checks.
pub trait FixedVector: Copy + Clone + Debug + PartialEq + Send + Sync + 'static {
    const DIM: usize;

    /// Reads `DIM` entries of `v` starting at `start`.
    fn from_segment(v: &DVector<f64>, start: usize) -> Result<Self, JointErrors>;

    /// Converts `v`, which must hold exactly `DIM` entries.
    fn from_exact(v: &DVector<f64>) -> Result<Self, JointErrors> {
        if v.len() != Self::DIM {
            return Err(JointErrors::ShapeMismatch { expected: Self::DIM, actual: v.len() });
        }
        Self::from_segment(v, 0)
    }

    /// Writes the entries into `out` starting at `start`.
    fn write_segment(&self, out: &mut DVector<f64>, start: usize) -> Result<(), JointErrors>;

    fn as_slice(&self) -> &[f64];

    fn to_dvector(&self) -> DVector<f64> {
        DVector::from_column_slice(self.as_slice())
    }

    fn ensure_finite(&self, quantity: &'static str) -> Result<(), JointErrors> {
        match self.as_slice().iter().find(|x| !x.is_finite()) {
            Some(&value) => Err(JointErrors::NumericDomain { quantity, value }),
            None => Ok(()),
        }
    }
}

impl<const N: usize> FixedVector for SVector<f64, N> {
    const DIM: usize = N;

    fn from_segment(v: &DVector<f64>, start: usize) -> Result<Self, JointErrors> {
        let end = start + N;
        if end > v.len() {
            return Err(JointErrors::ShapeMismatch { expected: end, actual: v.len() });
        }
        Ok(SVector::from_column_slice(&v.as_slice()[start..end]))
    }

    fn write_segment(&self, out: &mut DVector<f64>, start: usize) -> Result<(), JointErrors> {
        let end = start + N;
        if end > out.len() {
            return Err(JointErrors::ShapeMismatch { expected: end, actual: out.len() });
        }
        out.as_mut_slice()[start..end].copy_from_slice(self.as_slice());
        Ok(())
    }

    fn as_slice(&self) -> &[f64] {
        nalgebra::Matrix::as_slice(self)
    }
}
