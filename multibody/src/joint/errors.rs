use super::{JointIndex, variant::JointKind};
use rotations::prelude::QuaternionErrors;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum JointErrors {
    #[error("expected {expected} entries but got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("joint model of kind {model} cannot operate on joint data of kind {data}")]
    KindMismatch { model: JointKind, data: JointKind },
    #[error("projected inertia of joint {id} is singular")]
    SingularJointInertia { id: JointIndex },
    #[error("joint {id} cannot sample configuration entry {index} with an unbounded limit")]
    UnboundedSampling { id: JointIndex, index: usize },
    #[error("{quantity} is outside its numeric domain (got {value})")]
    NumericDomain { quantity: &'static str, value: f64 },
}

impl From<QuaternionErrors> for JointErrors {
    fn from(value: QuaternionErrors) -> Self {
        match value {
            QuaternionErrors::ZeroMagnitude => JointErrors::NumericDomain {
                quantity: "quaternion magnitude",
                value: 0.0,
            },
            QuaternionErrors::InnerProductOutOfRange(value) => JointErrors::NumericDomain {
                quantity: "quaternion inner product",
                value,
            },
        }
    }
}
