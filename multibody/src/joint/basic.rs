//! Joint operations on whole-mechanism vectors.
//!
//! Every function reads the joint's segment `q[idx_q .. idx_q + NQ]` (and
//! `v[idx_v .. idx_v + NV]`), checks it, then forwards to the kind.
//! Results are written back into the joint's segment of the output vector.

use super::{FixedVector, JointErrors, JointModelTrait};
use nalgebra::{DVector, Matrix6};
use rand::Rng;

fn config_segment<J: JointModelTrait>(
    model: &J,
    q: &DVector<f64>,
) -> Result<J::ConfigVector, JointErrors> {
    let q = J::ConfigVector::from_segment(q, model.idx_q())?;
    q.ensure_finite("configuration")?;
    model.check_configuration(&q)?;
    Ok(q)
}

fn tangent_segment<J: JointModelTrait>(
    model: &J,
    v: &DVector<f64>,
) -> Result<J::TangentVector, JointErrors> {
    let v = J::TangentVector::from_segment(v, model.idx_v())?;
    v.ensure_finite("velocity")?;
    Ok(v)
}

pub fn calc<J: JointModelTrait>(
    model: &J,
    data: &mut J::Data,
    q: &DVector<f64>,
) -> Result<(), JointErrors> {
    let q = config_segment(model, q)?;
    model.calc(data, &q);
    Ok(())
}

pub fn calc_velocity<J: JointModelTrait>(
    model: &J,
    data: &mut J::Data,
    q: &DVector<f64>,
    v: &DVector<f64>,
) -> Result<(), JointErrors> {
    let q = config_segment(model, q)?;
    let v = tangent_segment(model, v)?;
    model.calc_velocity(data, &q, &v);
    Ok(())
}

pub fn calc_aba<J: JointModelTrait>(
    model: &J,
    data: &mut J::Data,
    inertia: &mut Matrix6<f64>,
    update_inertia: bool,
) -> Result<(), JointErrors> {
    if let Some(&value) = inertia.iter().find(|x| !x.is_finite()) {
        return Err(JointErrors::NumericDomain { quantity: "inertia", value });
    }
    model.calc_aba(data, inertia, update_inertia)
}

pub fn integrate<J: JointModelTrait>(
    model: &J,
    q: &DVector<f64>,
    v: &DVector<f64>,
    q_out: &mut DVector<f64>,
) -> Result<(), JointErrors> {
    let q = config_segment(model, q)?;
    let v = tangent_segment(model, v)?;
    model.integrate(&q, &v).write_segment(q_out, model.idx_q())
}

pub fn interpolate<J: JointModelTrait>(
    model: &J,
    q0: &DVector<f64>,
    q1: &DVector<f64>,
    u: f64,
    q_out: &mut DVector<f64>,
) -> Result<(), JointErrors> {
    if !u.is_finite() {
        return Err(JointErrors::NumericDomain { quantity: "interpolation factor", value: u });
    }
    let q0 = config_segment(model, q0)?;
    let q1 = config_segment(model, q1)?;
    model.interpolate(&q0, &q1, u).write_segment(q_out, model.idx_q())
}

pub fn difference<J: JointModelTrait>(
    model: &J,
    q0: &DVector<f64>,
    q1: &DVector<f64>,
    v_out: &mut DVector<f64>,
) -> Result<(), JointErrors> {
    let q0 = config_segment(model, q0)?;
    let q1 = config_segment(model, q1)?;
    model.difference(&q0, &q1).write_segment(v_out, model.idx_v())
}

pub fn distance<J: JointModelTrait>(
    model: &J,
    q0: &DVector<f64>,
    q1: &DVector<f64>,
) -> Result<f64, JointErrors> {
    let q0 = config_segment(model, q0)?;
    let q1 = config_segment(model, q1)?;
    model.distance(&q0, &q1)
}

pub fn random<J: JointModelTrait, R: Rng + ?Sized>(
    model: &J,
    q_out: &mut DVector<f64>,
    rng: &mut R,
) -> Result<(), JointErrors> {
    model.random(rng).write_segment(q_out, model.idx_q())
}

/// `lower` and `upper` are the joint's own limits, NQ entries each.
pub fn random_configuration<J: JointModelTrait, R: Rng + ?Sized>(
    model: &J,
    lower: &DVector<f64>,
    upper: &DVector<f64>,
    q_out: &mut DVector<f64>,
    rng: &mut R,
) -> Result<(), JointErrors> {
    let lower = J::ConfigVector::from_exact(lower)?;
    let upper = J::ConfigVector::from_exact(upper)?;
    if let Some(&value) = lower.as_slice().iter().chain(upper.as_slice()).find(|x| x.is_nan()) {
        return Err(JointErrors::NumericDomain { quantity: "configuration limit", value });
    }
    model
        .random_configuration(&lower, &upper, rng)?
        .write_segment(q_out, model.idx_q())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::{Planar, Spherical};
    use approx::assert_abs_diff_eq;
    use rand::{SeedableRng, rngs::SmallRng};
    use std::f64::consts::FRAC_PI_2;
    const TOL: f64 = 1e-12;

    fn planar_at(idx_q: usize) -> Planar {
        let mut joint = Planar::default();
        joint.set_indexes(1, idx_q, idx_q);
        joint
    }

    #[test]
    fn test_calc_reads_own_segment() {
        let joint = planar_at(2);
        let mut data = joint.create_data();
        let q = DVector::from_vec(vec![9.0, 9.0, 1.0, 2.0, FRAC_PI_2]);
        calc(&joint, &mut data, &q).unwrap();
        assert_abs_diff_eq!(data.transform.translation()[0], 1.0, epsilon = TOL);
        assert_abs_diff_eq!(data.transform.translation()[1], 2.0, epsilon = TOL);
    }

    #[test]
    fn test_short_vector_is_shape_mismatch() {
        let joint = planar_at(2);
        let mut data = joint.create_data();
        let q = DVector::from_vec(vec![0.0, 0.0, 1.0, 2.0]);
        assert_eq!(
            calc(&joint, &mut data, &q),
            Err(JointErrors::ShapeMismatch { expected: 5, actual: 4 })
        );
    }

    #[test]
    fn test_non_finite_inputs() {
        let joint = planar_at(0);
        let mut data = joint.create_data();
        let q = DVector::from_vec(vec![0.0, f64::NAN, 0.0]);
        assert!(matches!(
            calc(&joint, &mut data, &q),
            Err(JointErrors::NumericDomain { .. })
        ));

        let q = DVector::zeros(3);
        let mut out = DVector::zeros(3);
        assert!(matches!(
            interpolate(&joint, &q, &q, f64::INFINITY, &mut out),
            Err(JointErrors::NumericDomain { .. })
        ));
    }

    #[test]
    fn test_zero_quaternion_rejected() {
        let joint = Spherical::default();
        let mut data = joint.create_data();
        let q = DVector::zeros(4);
        assert!(matches!(
            calc(&joint, &mut data, &q),
            Err(JointErrors::NumericDomain { quantity: "quaternion norm", .. })
        ));
    }

    #[test]
    fn test_integrate_writes_own_segment() {
        let joint = planar_at(1);
        let q = DVector::from_vec(vec![7.0, 1.0, 2.0, 3.0]);
        let v = DVector::from_vec(vec![7.0, 0.5, 0.5, 0.5]);
        let mut out = DVector::zeros(4);
        integrate(&joint, &q, &v, &mut out).unwrap();
        assert_eq!(out, DVector::from_vec(vec![0.0, 1.5, 2.5, 3.5]));
    }

    #[test]
    fn test_random_configuration_bound_sizes() {
        let joint = planar_at(0);
        let mut rng = SmallRng::seed_from_u64(2);
        let mut out = DVector::zeros(3);
        let lower = DVector::from_element(4, -1.0);
        let upper = DVector::from_element(3, 1.0);
        assert_eq!(
            random_configuration(&joint, &lower, &upper, &mut out, &mut rng),
            Err(JointErrors::ShapeMismatch { expected: 3, actual: 4 })
        );
    }

    #[test]
    fn test_calc_aba_rejects_non_finite_inertia() {
        let joint = planar_at(0);
        let mut data = joint.create_data();
        let mut inertia = Matrix6::identity();
        inertia[(2, 3)] = f64::NAN;
        assert!(calc_aba(&joint, &mut data, &mut inertia, true).is_err());
    }
}
