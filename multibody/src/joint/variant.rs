//! Closed set of joint kinds behind one model type and one data type.
//!
//! A `JointModel` only operates on the `JointData` it created. Pairing a model
//! with data of another kind is reported as `KindMismatch` and leaves the data
//! untouched.

use super::{
    JointErrors, JointIndex, JointModelTrait,
    axis::{AxisX, AxisY, AxisZ},
    basic,
    dense::{JointDataDense, JointModelDense},
    floating::{Floating, JointDataFloating},
    planar::{JointDataPlanar, Planar},
    prismatic::{
        JointDataPrismatic, JointDataPrismaticUnaligned, PrismaticUnaligned, PrismaticX,
        PrismaticY, PrismaticZ,
    },
    revolute::{
        JointDataRevolute, JointDataRevoluteUnaligned, RevoluteUnaligned, RevoluteX, RevoluteY,
        RevoluteZ,
    },
    revolute_unbounded::{RevoluteUnboundedX, RevoluteUnboundedY, RevoluteUnboundedZ},
    spherical::{JointDataSpherical, Spherical},
    spherical_zyx::{JointDataSphericalZyx, SphericalZyx},
    translation::{JointDataTranslation, Translation},
};
use nalgebra::{DMatrix, DVector, Matrix6};
use rand::Rng;
use serde::{Deserialize, Serialize};
use spatial_algebra::{Motion, SpatialTransform};
use std::fmt;

/// Tag naming a joint kind, carried by `KindMismatch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointKind {
    RevoluteX,
    RevoluteY,
    RevoluteZ,
    RevoluteUnaligned,
    RevoluteUnboundedX,
    RevoluteUnboundedY,
    RevoluteUnboundedZ,
    PrismaticX,
    PrismaticY,
    PrismaticZ,
    PrismaticUnaligned,
    Planar,
    Translation,
    Spherical,
    SphericalZyx,
    Floating,
}

impl fmt::Display for JointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum JointModel {
    RevoluteX(RevoluteX),
    RevoluteY(RevoluteY),
    RevoluteZ(RevoluteZ),
    RevoluteUnaligned(RevoluteUnaligned),
    RevoluteUnboundedX(RevoluteUnboundedX),
    RevoluteUnboundedY(RevoluteUnboundedY),
    RevoluteUnboundedZ(RevoluteUnboundedZ),
    PrismaticX(PrismaticX),
    PrismaticY(PrismaticY),
    PrismaticZ(PrismaticZ),
    PrismaticUnaligned(PrismaticUnaligned),
    Planar(Planar),
    Translation(Translation),
    Spherical(Spherical),
    SphericalZyx(SphericalZyx),
    Floating(Floating),
}

/// Computed state of one joint. Revolute and unbounded revolute joints about
/// the same axis share a data type but keep distinct variants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JointData {
    RevoluteX(JointDataRevolute<AxisX>),
    RevoluteY(JointDataRevolute<AxisY>),
    RevoluteZ(JointDataRevolute<AxisZ>),
    RevoluteUnaligned(JointDataRevoluteUnaligned),
    RevoluteUnboundedX(JointDataRevolute<AxisX>),
    RevoluteUnboundedY(JointDataRevolute<AxisY>),
    RevoluteUnboundedZ(JointDataRevolute<AxisZ>),
    PrismaticX(JointDataPrismatic<AxisX>),
    PrismaticY(JointDataPrismatic<AxisY>),
    PrismaticZ(JointDataPrismatic<AxisZ>),
    PrismaticUnaligned(JointDataPrismaticUnaligned),
    Planar(JointDataPlanar),
    Translation(JointDataTranslation),
    Spherical(JointDataSpherical),
    SphericalZyx(JointDataSphericalZyx),
    Floating(JointDataFloating),
}

macro_rules! dispatch_model {
    ($model:expr, $j:ident => $body:expr) => {
        match $model {
            JointModel::RevoluteX($j) => $body,
            JointModel::RevoluteY($j) => $body,
            JointModel::RevoluteZ($j) => $body,
            JointModel::RevoluteUnaligned($j) => $body,
            JointModel::RevoluteUnboundedX($j) => $body,
            JointModel::RevoluteUnboundedY($j) => $body,
            JointModel::RevoluteUnboundedZ($j) => $body,
            JointModel::PrismaticX($j) => $body,
            JointModel::PrismaticY($j) => $body,
            JointModel::PrismaticZ($j) => $body,
            JointModel::PrismaticUnaligned($j) => $body,
            JointModel::Planar($j) => $body,
            JointModel::Translation($j) => $body,
            JointModel::Spherical($j) => $body,
            JointModel::SphericalZyx($j) => $body,
            JointModel::Floating($j) => $body,
        }
    };
}

macro_rules! dispatch_data {
    ($data:expr, $d:ident => $body:expr) => {
        match $data {
            JointData::RevoluteX($d) => $body,
            JointData::RevoluteY($d) => $body,
            JointData::RevoluteZ($d) => $body,
            JointData::RevoluteUnaligned($d) => $body,
            JointData::RevoluteUnboundedX($d) => $body,
            JointData::RevoluteUnboundedY($d) => $body,
            JointData::RevoluteUnboundedZ($d) => $body,
            JointData::PrismaticX($d) => $body,
            JointData::PrismaticY($d) => $body,
            JointData::PrismaticZ($d) => $body,
            JointData::PrismaticUnaligned($d) => $body,
            JointData::Planar($d) => $body,
            JointData::Translation($d) => $body,
            JointData::Spherical($d) => $body,
            JointData::SphericalZyx($d) => $body,
            JointData::Floating($d) => $body,
        }
    };
}

/// Matches a model with data of the same kind, anything else is a mismatch.
macro_rules! dispatch_pair {
    ($model:expr, $data:expr, $j:ident, $d:ident => $body:expr) => {
        match ($model, $data) {
            (JointModel::RevoluteX($j), JointData::RevoluteX($d)) => $body,
            (JointModel::RevoluteY($j), JointData::RevoluteY($d)) => $body,
            (JointModel::RevoluteZ($j), JointData::RevoluteZ($d)) => $body,
            (JointModel::RevoluteUnaligned($j), JointData::RevoluteUnaligned($d)) => $body,
            (JointModel::RevoluteUnboundedX($j), JointData::RevoluteUnboundedX($d)) => $body,
            (JointModel::RevoluteUnboundedY($j), JointData::RevoluteUnboundedY($d)) => $body,
            (JointModel::RevoluteUnboundedZ($j), JointData::RevoluteUnboundedZ($d)) => $body,
            (JointModel::PrismaticX($j), JointData::PrismaticX($d)) => $body,
            (JointModel::PrismaticY($j), JointData::PrismaticY($d)) => $body,
            (JointModel::PrismaticZ($j), JointData::PrismaticZ($d)) => $body,
            (JointModel::PrismaticUnaligned($j), JointData::PrismaticUnaligned($d)) => $body,
            (JointModel::Planar($j), JointData::Planar($d)) => $body,
            (JointModel::Translation($j), JointData::Translation($d)) => $body,
            (JointModel::Spherical($j), JointData::Spherical($d)) => $body,
            (JointModel::SphericalZyx($j), JointData::SphericalZyx($d)) => $body,
            (JointModel::Floating($j), JointData::Floating($d)) => $body,
            (model, data) => Err(kind_mismatch(model.kind(), data.kind())),
        }
    };
}

fn kind_mismatch(model: JointKind, data: JointKind) -> JointErrors {
    tracing::warn!(%model, %data, "joint model paired with data of another kind");
    JointErrors::KindMismatch { model, data }
}

impl JointModel {
    pub fn kind(&self) -> JointKind {
        match self {
            JointModel::RevoluteX(_) => JointKind::RevoluteX,
            JointModel::RevoluteY(_) => JointKind::RevoluteY,
            JointModel::RevoluteZ(_) => JointKind::RevoluteZ,
            JointModel::RevoluteUnaligned(_) => JointKind::RevoluteUnaligned,
            JointModel::RevoluteUnboundedX(_) => JointKind::RevoluteUnboundedX,
            JointModel::RevoluteUnboundedY(_) => JointKind::RevoluteUnboundedY,
            JointModel::RevoluteUnboundedZ(_) => JointKind::RevoluteUnboundedZ,
            JointModel::PrismaticX(_) => JointKind::PrismaticX,
            JointModel::PrismaticY(_) => JointKind::PrismaticY,
            JointModel::PrismaticZ(_) => JointKind::PrismaticZ,
            JointModel::PrismaticUnaligned(_) => JointKind::PrismaticUnaligned,
            JointModel::Planar(_) => JointKind::Planar,
            JointModel::Translation(_) => JointKind::Translation,
            JointModel::Spherical(_) => JointKind::Spherical,
            JointModel::SphericalZyx(_) => JointKind::SphericalZyx,
            JointModel::Floating(_) => JointKind::Floating,
        }
    }

    pub fn create_data(&self) -> JointData {
        match self {
            JointModel::RevoluteX(j) => JointData::RevoluteX(j.create_data()),
            JointModel::RevoluteY(j) => JointData::RevoluteY(j.create_data()),
            JointModel::RevoluteZ(j) => JointData::RevoluteZ(j.create_data()),
            JointModel::RevoluteUnaligned(j) => JointData::RevoluteUnaligned(j.create_data()),
            JointModel::RevoluteUnboundedX(j) => JointData::RevoluteUnboundedX(j.create_data()),
            JointModel::RevoluteUnboundedY(j) => JointData::RevoluteUnboundedY(j.create_data()),
            JointModel::RevoluteUnboundedZ(j) => JointData::RevoluteUnboundedZ(j.create_data()),
            JointModel::PrismaticX(j) => JointData::PrismaticX(j.create_data()),
            JointModel::PrismaticY(j) => JointData::PrismaticY(j.create_data()),
            JointModel::PrismaticZ(j) => JointData::PrismaticZ(j.create_data()),
            JointModel::PrismaticUnaligned(j) => JointData::PrismaticUnaligned(j.create_data()),
            JointModel::Planar(j) => JointData::Planar(j.create_data()),
            JointModel::Translation(j) => JointData::Translation(j.create_data()),
            JointModel::Spherical(j) => JointData::Spherical(j.create_data()),
            JointModel::SphericalZyx(j) => JointData::SphericalZyx(j.create_data()),
            JointModel::Floating(j) => JointData::Floating(j.create_data()),
        }
    }

    pub fn shortname(&self) -> &'static str {
        dispatch_model!(self, j => j.shortname())
    }

    pub fn nq(&self) -> usize {
        dispatch_model!(self, j => j.nq())
    }

    pub fn nv(&self) -> usize {
        dispatch_model!(self, j => j.nv())
    }

    pub fn id(&self) -> JointIndex {
        dispatch_model!(self, j => j.id())
    }

    pub fn idx_q(&self) -> usize {
        dispatch_model!(self, j => j.idx_q())
    }

    pub fn idx_v(&self) -> usize {
        dispatch_model!(self, j => j.idx_v())
    }

    pub fn set_indexes(&mut self, id: JointIndex, idx_q: usize, idx_v: usize) {
        dispatch_model!(self, j => j.set_indexes(id, idx_q, idx_v))
    }

    pub fn to_dense(&self) -> JointModelDense {
        dispatch_model!(self, j => j.to_dense())
    }

    pub fn calc(&self, data: &mut JointData, q: &DVector<f64>) -> Result<(), JointErrors> {
        dispatch_pair!(self, data, j, d => basic::calc(j, d, q))
    }

    pub fn calc_velocity(
        &self,
        data: &mut JointData,
        q: &DVector<f64>,
        v: &DVector<f64>,
    ) -> Result<(), JointErrors> {
        dispatch_pair!(self, data, j, d => basic::calc_velocity(j, d, q, v))
    }

    pub fn calc_aba(
        &self,
        data: &mut JointData,
        inertia: &mut Matrix6<f64>,
        update_inertia: bool,
    ) -> Result<(), JointErrors> {
        dispatch_pair!(self, data, j, d => basic::calc_aba(j, d, inertia, update_inertia))
    }

    pub fn integrate(
        &self,
        q: &DVector<f64>,
        v: &DVector<f64>,
        q_out: &mut DVector<f64>,
    ) -> Result<(), JointErrors> {
        dispatch_model!(self, j => basic::integrate(j, q, v, q_out))
    }

    pub fn interpolate(
        &self,
        q0: &DVector<f64>,
        q1: &DVector<f64>,
        u: f64,
        q_out: &mut DVector<f64>,
    ) -> Result<(), JointErrors> {
        dispatch_model!(self, j => basic::interpolate(j, q0, q1, u, q_out))
    }

    pub fn difference(
        &self,
        q0: &DVector<f64>,
        q1: &DVector<f64>,
        v_out: &mut DVector<f64>,
    ) -> Result<(), JointErrors> {
        dispatch_model!(self, j => basic::difference(j, q0, q1, v_out))
    }

    pub fn distance(&self, q0: &DVector<f64>, q1: &DVector<f64>) -> Result<f64, JointErrors> {
        dispatch_model!(self, j => basic::distance(j, q0, q1))
    }

    pub fn random<R: Rng + ?Sized>(
        &self,
        q_out: &mut DVector<f64>,
        rng: &mut R,
    ) -> Result<(), JointErrors> {
        dispatch_model!(self, j => basic::random(j, q_out, rng))
    }

    /// `lower` and `upper` hold this joint's limits only, nq entries each.
    pub fn random_configuration<R: Rng + ?Sized>(
        &self,
        lower: &DVector<f64>,
        upper: &DVector<f64>,
        q_out: &mut DVector<f64>,
        rng: &mut R,
    ) -> Result<(), JointErrors> {
        dispatch_model!(self, j => basic::random_configuration(j, lower, upper, q_out, rng))
    }
}

impl JointData {
    pub fn kind(&self) -> JointKind {
        match self {
            JointData::RevoluteX(_) => JointKind::RevoluteX,
            JointData::RevoluteY(_) => JointKind::RevoluteY,
            JointData::RevoluteZ(_) => JointKind::RevoluteZ,
            JointData::RevoluteUnaligned(_) => JointKind::RevoluteUnaligned,
            JointData::RevoluteUnboundedX(_) => JointKind::RevoluteUnboundedX,
            JointData::RevoluteUnboundedY(_) => JointKind::RevoluteUnboundedY,
            JointData::RevoluteUnboundedZ(_) => JointKind::RevoluteUnboundedZ,
            JointData::PrismaticX(_) => JointKind::PrismaticX,
            JointData::PrismaticY(_) => JointKind::PrismaticY,
            JointData::PrismaticZ(_) => JointKind::PrismaticZ,
            JointData::PrismaticUnaligned(_) => JointKind::PrismaticUnaligned,
            JointData::Planar(_) => JointKind::Planar,
            JointData::Translation(_) => JointKind::Translation,
            JointData::Spherical(_) => JointKind::Spherical,
            JointData::SphericalZyx(_) => JointKind::SphericalZyx,
            JointData::Floating(_) => JointKind::Floating,
        }
    }

    /// Placement of the child frame in the parent frame.
    pub fn transform(&self) -> &SpatialTransform {
        dispatch_data!(self, d => &d.transform)
    }

    pub fn motion(&self) -> Motion {
        dispatch_data!(self, d => d.motion())
    }

    pub fn bias(&self) -> &Motion {
        dispatch_data!(self, d => &d.bias)
    }

    /// Motion subspace S as a 6 x nv matrix.
    pub fn subspace_matrix(&self) -> DMatrix<f64> {
        dispatch_data!(self, d => {
            let s = d.subspace_matrix();
            DMatrix::from_column_slice(6, s.ncols(), s.as_slice())
        })
    }

    /// U = I S from the last articulated body step.
    pub fn u_inertia(&self) -> DMatrix<f64> {
        dispatch_data!(self, d => {
            let u = &d.aba.big_u;
            DMatrix::from_column_slice(6, u.ncols(), u.as_slice())
        })
    }

    /// D^-1 = (S^T I S)^-1 from the last articulated body step.
    pub fn d_inv_inertia(&self) -> DMatrix<f64> {
        dispatch_data!(self, d => {
            let d_inv = &d.aba.big_d_inv;
            DMatrix::from_column_slice(d_inv.nrows(), d_inv.ncols(), d_inv.as_slice())
        })
    }

    pub fn ud_inv_inertia(&self) -> DMatrix<f64> {
        dispatch_data!(self, d => {
            let ud = &d.aba.big_u_d_inv;
            DMatrix::from_column_slice(6, ud.ncols(), ud.as_slice())
        })
    }

    pub fn to_dense(&self) -> JointDataDense {
        dispatch_data!(self, d => d.to_dense())
    }
}

macro_rules! impl_from_kind {
    ($($variant:ident($model:ty)),* $(,)?) => {
        $(
            impl From<$model> for JointModel {
                fn from(value: $model) -> Self {
                    JointModel::$variant(value)
                }
            }
        )*
    };
}

impl_from_kind!(
    RevoluteX(RevoluteX),
    RevoluteY(RevoluteY),
    RevoluteZ(RevoluteZ),
    RevoluteUnaligned(RevoluteUnaligned),
    RevoluteUnboundedX(RevoluteUnboundedX),
    RevoluteUnboundedY(RevoluteUnboundedY),
    RevoluteUnboundedZ(RevoluteUnboundedZ),
    PrismaticX(PrismaticX),
    PrismaticY(PrismaticY),
    PrismaticZ(PrismaticZ),
    PrismaticUnaligned(PrismaticUnaligned),
    Planar(Planar),
    Translation(Translation),
    Spherical(Spherical),
    SphericalZyx(SphericalZyx),
    Floating(Floating),
);
