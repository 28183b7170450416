use super::{JointData, JointErrors, JointIndex, JointModel};
use nalgebra::DVector;
use rand::Rng;
use ron::{
    from_str,
    ser::{PrettyConfig, to_string_pretty},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JointSetErrors {
    #[error("could not parse joint set: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not write joint set: {0}")]
    Write(#[from] ron::Error),
    #[error("{0}")]
    Joint(#[from] JointErrors),
}

/// Ordered chain of joints sharing one configuration vector and one velocity vector.
///
/// Joints are laid out in insertion order, so every joint's offsets follow
/// from the sizes of the joints before it. Offsets stored in a serialized set
/// are ignored and derived again on load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<JointModel>", into = "Vec<JointModel>")]
pub struct JointSet {
    joints: Vec<JointModel>,
    nq: usize,
    nv: usize,
}

impl JointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a joint at the end of the configuration and velocity vectors.
    pub fn push(&mut self, joint: impl Into<JointModel>) -> JointIndex {
        let mut joint = joint.into();
        let id = self.joints.len();
        joint.set_indexes(id, self.nq, self.nv);
        tracing::trace!(id, idx_q = self.nq, idx_v = self.nv, kind = %joint.kind(), "added joint");
        self.nq += joint.nq();
        self.nv += joint.nv();
        self.joints.push(joint);
        id
    }

    pub fn nq(&self) -> usize {
        self.nq
    }

    pub fn nv(&self) -> usize {
        self.nv
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn get(&self, id: JointIndex) -> Option<&JointModel> {
        self.joints.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &JointModel> {
        self.joints.iter()
    }

    pub fn create_data(&self) -> Vec<JointData> {
        self.joints.iter().map(JointModel::create_data).collect()
    }

    pub fn calc(&self, data: &mut [JointData], q: &DVector<f64>) -> Result<(), JointErrors> {
        check_len(self.joints.len(), data.len())?;
        check_len(self.nq, q.len())?;
        self.joints
            .iter()
            .zip(data.iter_mut())
            .try_for_each(|(joint, data)| joint.calc(data, q))
    }

    pub fn calc_velocity(
        &self,
        data: &mut [JointData],
        q: &DVector<f64>,
        v: &DVector<f64>,
    ) -> Result<(), JointErrors> {
        check_len(self.joints.len(), data.len())?;
        check_len(self.nq, q.len())?;
        check_len(self.nv, v.len())?;
        self.joints
            .iter()
            .zip(data.iter_mut())
            .try_for_each(|(joint, data)| joint.calc_velocity(data, q, v))
    }

    pub fn integrate(&self, q: &DVector<f64>, v: &DVector<f64>) -> Result<DVector<f64>, JointErrors> {
        check_len(self.nq, q.len())?;
        check_len(self.nv, v.len())?;
        let mut q_out = q.clone();
        for joint in &self.joints {
            joint.integrate(q, v, &mut q_out)?;
        }
        Ok(q_out)
    }

    pub fn interpolate(
        &self,
        q0: &DVector<f64>,
        q1: &DVector<f64>,
        u: f64,
    ) -> Result<DVector<f64>, JointErrors> {
        check_len(self.nq, q0.len())?;
        check_len(self.nq, q1.len())?;
        let mut q_out = q0.clone();
        for joint in &self.joints {
            joint.interpolate(q0, q1, u, &mut q_out)?;
        }
        Ok(q_out)
    }

    pub fn difference(
        &self,
        q0: &DVector<f64>,
        q1: &DVector<f64>,
    ) -> Result<DVector<f64>, JointErrors> {
        check_len(self.nq, q0.len())?;
        check_len(self.nq, q1.len())?;
        let mut v_out = DVector::zeros(self.nv);
        for joint in &self.joints {
            joint.difference(q0, q1, &mut v_out)?;
        }
        Ok(v_out)
    }

    /// Euclidean norm of the per-joint distances.
    pub fn distance(&self, q0: &DVector<f64>, q1: &DVector<f64>) -> Result<f64, JointErrors> {
        check_len(self.nq, q0.len())?;
        check_len(self.nq, q1.len())?;
        let mut squared = 0.0;
        for joint in &self.joints {
            squared += joint.distance(q0, q1)?.powi(2);
        }
        Ok(squared.sqrt())
    }

    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<DVector<f64>, JointErrors> {
        let mut q_out = DVector::zeros(self.nq);
        for joint in &self.joints {
            joint.random(&mut q_out, rng)?;
        }
        Ok(q_out)
    }

    /// Samples each joint inside its own slice of `lower` and `upper`.
    pub fn random_configuration<R: Rng + ?Sized>(
        &self,
        lower: &DVector<f64>,
        upper: &DVector<f64>,
        rng: &mut R,
    ) -> Result<DVector<f64>, JointErrors> {
        check_len(self.nq, lower.len())?;
        check_len(self.nq, upper.len())?;
        let mut q_out = DVector::zeros(self.nq);
        for joint in &self.joints {
            let lower = lower.rows(joint.idx_q(), joint.nq()).into_owned();
            let upper = upper.rows(joint.idx_q(), joint.nq()).into_owned();
            joint.random_configuration(&lower, &upper, &mut q_out, rng)?;
        }
        Ok(q_out)
    }

    pub fn from_ron(s: &str) -> Result<Self, JointSetErrors> {
        Ok(from_str(s)?)
    }

    pub fn to_ron(&self) -> Result<String, JointSetErrors> {
        Ok(to_string_pretty(self, PrettyConfig::new())?)
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), JointErrors> {
    if expected != actual {
        return Err(JointErrors::ShapeMismatch { expected, actual });
    }
    Ok(())
}

impl From<Vec<JointModel>> for JointSet {
    fn from(joints: Vec<JointModel>) -> Self {
        let mut set = JointSet::new();
        for joint in joints {
            set.push(joint);
        }
        set
    }
}

impl From<JointSet> for Vec<JointModel> {
    fn from(set: JointSet) -> Self {
        set.joints
    }
}

impl<J: Into<JointModel>> FromIterator<J> for JointSet {
    fn from_iter<I: IntoIterator<Item = J>>(iter: I) -> Self {
        let mut set = JointSet::new();
        for joint in iter {
            set.push(joint);
        }
        set
    }
}
