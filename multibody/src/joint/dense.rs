use super::{JointErrors, JointIndexes};
use nalgebra::{DMatrix, DVector, Vector6};
use serde::{Deserialize, Serialize};
use spatial_algebra::{Force, Motion, SpatialTransform};

/// Kind-erased joint model with runtime sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointModelDense {
    pub nq: usize,
    pub nv: usize,
    pub indexes: JointIndexes,
}

impl JointModelDense {
    pub fn new(nq: usize, nv: usize, indexes: JointIndexes) -> Self {
        Self { nq, nv, indexes }
    }

    pub fn config_segment(&self, q: &DVector<f64>) -> Result<DVector<f64>, JointErrors> {
        segment(q, self.indexes.idx_q, self.nq)
    }

    pub fn velocity_segment(&self, v: &DVector<f64>) -> Result<DVector<f64>, JointErrors> {
        segment(v, self.indexes.idx_v, self.nv)
    }

    /// The nv columns of a whole-mechanism matrix owned by this joint.
    pub fn joint_cols(&self, m: &DMatrix<f64>) -> Result<DMatrix<f64>, JointErrors> {
        let end = self.indexes.idx_v + self.nv;
        if end > m.ncols() {
            return Err(JointErrors::ShapeMismatch { expected: end, actual: m.ncols() });
        }
        Ok(m.columns(self.indexes.idx_v, self.nv).into_owned())
    }
}

fn segment(v: &DVector<f64>, start: usize, len: usize) -> Result<DVector<f64>, JointErrors> {
    let end = start + len;
    if end > v.len() {
        return Err(JointErrors::ShapeMismatch { expected: end, actual: v.len() });
    }
    Ok(v.rows(start, len).into_owned())
}

/// Kind-erased joint data, S and the ABA scratch stored as dynamic matrices.
#[derive(Clone, Debug, PartialEq)]
pub struct JointDataDense {
    pub subspace: DMatrix<f64>,
    pub transform: SpatialTransform,
    pub motion: Motion,
    pub bias: Motion,
    pub big_u: DMatrix<f64>,
    pub big_d_inv: DMatrix<f64>,
    pub big_u_d_inv: DMatrix<f64>,
}

impl JointDataDense {
    pub fn nv(&self) -> usize {
        self.subspace.ncols()
    }

    /// S v
    pub fn subspace_motion(&self, v: &DVector<f64>) -> Result<Motion, JointErrors> {
        if v.len() != self.nv() {
            return Err(JointErrors::ShapeMismatch { expected: self.nv(), actual: v.len() });
        }
        let m = &self.subspace * v;
        Ok(Motion::from(Vector6::from_column_slice(m.as_slice())))
    }

    /// S^T f
    pub fn project_force(&self, f: &Force) -> DVector<f64> {
        self.subspace.tr_mul(&DVector::from_column_slice(f.vector().as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn planar_like() -> JointDataDense {
        let mut subspace = DMatrix::zeros(6, 3);
        subspace[(0, 0)] = 1.0;
        subspace[(1, 1)] = 1.0;
        subspace[(5, 2)] = 1.0;
        JointDataDense {
            subspace,
            transform: SpatialTransform::identity(),
            motion: Motion::zeros(),
            bias: Motion::zeros(),
            big_u: DMatrix::zeros(6, 3),
            big_d_inv: DMatrix::zeros(3, 3),
            big_u_d_inv: DMatrix::zeros(6, 3),
        }
    }

    #[test]
    fn test_segments() {
        let model = JointModelDense::new(2, 1, JointIndexes { id: 1, idx_q: 1, idx_v: 2 });
        let q = DVector::from_vec(vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(model.config_segment(&q).unwrap(), DVector::from_vec(vec![1.0, 2.0]));
        assert_eq!(model.velocity_segment(&q).unwrap(), DVector::from_vec(vec![2.0]));

        let short = DVector::from_vec(vec![0.0, 1.0]);
        assert_eq!(
            model.config_segment(&short),
            Err(JointErrors::ShapeMismatch { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_joint_cols() {
        let model = JointModelDense::new(1, 1, JointIndexes { id: 0, idx_q: 0, idx_v: 1 });
        let m = DMatrix::from_fn(6, 3, |r, c| (r * 10 + c) as f64);
        let cols = model.joint_cols(&m).unwrap();
        assert_eq!(cols.shape(), (6, 1));
        assert_eq!(cols[(2, 0)], 21.0);
        let narrow = DMatrix::zeros(6, 1);
        assert!(model.joint_cols(&narrow).is_err());
    }

    #[test]
    fn test_subspace_products() {
        let data = planar_like();
        let v = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let m = data.subspace_motion(&v).unwrap();
        assert_eq!(*m.linear(), Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(*m.angular(), Vector3::new(0.0, 0.0, 3.0));
        assert!(data.subspace_motion(&DVector::zeros(2)).is_err());

        let f = Force::new(Vector3::new(4.0, 5.0, 6.0), Vector3::new(7.0, 8.0, 9.0));
        assert_eq!(data.project_force(&f), DVector::from_vec(vec![4.0, 5.0, 9.0]));
    }
}
