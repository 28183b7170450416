//! Property tests of the configuration manifold of every joint kind.

use multibody::joint::{
    Floating, JointModel, Planar, PrismaticUnaligned, RevoluteUnaligned, Spherical,
    SphericalZyx, Translation,
    prismatic::{PrismaticX, PrismaticY, PrismaticZ},
    revolute::{RevoluteX, RevoluteY, RevoluteZ},
    revolute_unbounded::{RevoluteUnboundedX, RevoluteUnboundedY, RevoluteUnboundedZ},
};
use nalgebra::{DVector, Vector3};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};

const TOL: f64 = 1e-9;

fn all_kinds() -> Vec<JointModel> {
    let axis = Vector3::new(1.5, 1.0, 0.0);
    let unaligned_revolute = RevoluteUnaligned::new(axis).expect("nonzero axis");
    let unaligned_prismatic = PrismaticUnaligned::new(axis).expect("nonzero axis");
    vec![
        RevoluteX::new().into(),
        RevoluteY::new().into(),
        RevoluteZ::new().into(),
        unaligned_revolute.into(),
        RevoluteUnboundedX::new().into(),
        RevoluteUnboundedY::new().into(),
        RevoluteUnboundedZ::new().into(),
        PrismaticX::new().into(),
        PrismaticY::new().into(),
        PrismaticZ::new().into(),
        unaligned_prismatic.into(),
        Planar::new().into(),
        Translation::new().into(),
        Spherical::new().into(),
        SphericalZyx::new().into(),
        Floating::new().into(),
    ]
}

fn random_pair(joint: &JointModel, seed: u64) -> (DVector<f64>, DVector<f64>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut q0 = DVector::zeros(joint.nq());
    let mut q1 = DVector::zeros(joint.nq());
    joint.random(&mut q0, &mut rng).unwrap();
    joint.random(&mut q1, &mut rng).unwrap();
    (q0, q1)
}

fn kind_index() -> impl Strategy<Value = usize> {
    0..all_kinds().len()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn integrate_zero_is_identity(kind in kind_index(), seed in any::<u64>()) {
        let joint = all_kinds()[kind];
        let (q, _) = random_pair(&joint, seed);
        let mut q_out = DVector::zeros(joint.nq());
        joint.integrate(&q, &DVector::zeros(joint.nv()), &mut q_out).unwrap();
        prop_assert!(joint.distance(&q, &q_out).unwrap() <= TOL, "{}", joint.shortname());
    }

    #[test]
    fn difference_is_inverse_of_integrate(kind in kind_index(), seed in any::<u64>()) {
        let joint = all_kinds()[kind];
        let (q0, q1) = random_pair(&joint, seed);
        let mut v = DVector::zeros(joint.nv());
        joint.difference(&q0, &q1, &mut v).unwrap();
        let mut reached = DVector::zeros(joint.nq());
        joint.integrate(&q0, &v, &mut reached).unwrap();
        prop_assert!(joint.distance(&reached, &q1).unwrap() <= TOL, "{}", joint.shortname());
    }

    #[test]
    fn interpolate_hits_both_ends(kind in kind_index(), seed in any::<u64>()) {
        let joint = all_kinds()[kind];
        let (q0, q1) = random_pair(&joint, seed);
        let mut q = DVector::zeros(joint.nq());
        joint.interpolate(&q0, &q1, 0.0, &mut q).unwrap();
        prop_assert!(joint.distance(&q, &q0).unwrap() <= TOL);
        joint.interpolate(&q0, &q1, 1.0, &mut q).unwrap();
        prop_assert!(joint.distance(&q, &q1).unwrap() <= TOL, "{}", joint.shortname());
    }

    #[test]
    fn distance_is_zero_on_itself_and_symmetric(kind in kind_index(), seed in any::<u64>()) {
        let joint = all_kinds()[kind];
        let (q0, q1) = random_pair(&joint, seed);
        prop_assert!(joint.distance(&q0, &q0).unwrap().abs() <= TOL);
        let forward = joint.distance(&q0, &q1).unwrap();
        let backward = joint.distance(&q1, &q0).unwrap();
        prop_assert!(forward >= 0.0);
        prop_assert!((forward - backward).abs() <= TOL, "{}", joint.shortname());
    }

    #[test]
    fn bounded_sampling_stays_inside(
        kind in kind_index(),
        seed in any::<u64>(),
        low in -5.0..0.0f64,
        width in 0.0..3.0f64,
    ) {
        let joint = all_kinds()[kind];
        let lower = DVector::from_element(joint.nq(), low);
        let upper = DVector::from_element(joint.nq(), low + width);
        let mut q = DVector::zeros(joint.nq());
        let mut rng = SmallRng::seed_from_u64(seed);
        joint.random_configuration(&lower, &upper, &mut q, &mut rng).unwrap();
        match joint {
            // limits do not apply to unit quaternions and unit complex numbers
            JointModel::Spherical(_)
            | JointModel::RevoluteUnboundedX(_)
            | JointModel::RevoluteUnboundedY(_)
            | JointModel::RevoluteUnboundedZ(_) => {}
            JointModel::Floating(_) => {
                prop_assert!((0..3).all(|i| q[i] >= low && q[i] <= low + width));
            }
            _ => prop_assert!(q.iter().all(|&x| x >= low && x <= low + width)),
        }
    }
}

#[test]
fn unbounded_limits_are_refused_by_euclidean_kinds() {
    let mut rng = SmallRng::seed_from_u64(9);
    for joint in all_kinds() {
        let lower = DVector::from_element(joint.nq(), f64::NEG_INFINITY);
        let upper = DVector::from_element(joint.nq(), f64::INFINITY);
        let mut q = DVector::zeros(joint.nq());
        let result = joint.random_configuration(&lower, &upper, &mut q, &mut rng);
        match joint {
            JointModel::Spherical(_)
            | JointModel::RevoluteUnboundedX(_)
            | JointModel::RevoluteUnboundedY(_)
            | JointModel::RevoluteUnboundedZ(_) => assert!(result.is_ok()),
            _ => assert!(result.is_err(), "{}", joint.shortname()),
        }
    }
}
