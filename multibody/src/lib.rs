//! Joint models for rigid multibody dynamics.
//!
//! Each joint kind knows its configuration manifold (integrate, difference,
//! interpolate, distance, sampling), its placement and motion subspace, and its
//! step of the articulated body algorithm. [`joint::JointModel`] gathers the
//! kinds into one closed set and [`joint::JointSet`] chains them over shared
//! configuration and velocity vectors.

pub mod joint;

pub use joint::{JointData, JointErrors, JointKind, JointModel, JointSet, JointSetErrors};
