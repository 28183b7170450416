use crate::{Force, Motion, SpatialTransform};
use mass_properties::{CenterOfMass, Inertia, MassProperties, MassPropertiesErrors};
use nalgebra::{Matrix3, Matrix6, Vector3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// Rigid body inertia expressed at the origin of a frame.
/// The rotational inertia is stored about the center of mass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpatialInertia(pub MassProperties);

impl SpatialInertia {
    pub fn new(
        mass: f64,
        center_of_mass: Vector3<f64>,
        inertia: &Matrix3<f64>,
    ) -> Result<Self, MassPropertiesErrors> {
        let inertia = Inertia::from_matrix(inertia)?;
        Ok(Self(MassProperties::new(mass, CenterOfMass::from(center_of_mass), inertia)?))
    }

    pub fn zeros() -> Self {
        Self(MassProperties::zeros())
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(MassProperties::random(rng))
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.0.mass
    }

    #[inline]
    pub fn center_of_mass(&self) -> Vector3<f64> {
        self.0.center_of_mass.vector()
    }

    #[inline]
    pub fn inertia_matrix(&self) -> Matrix3<f64> {
        self.0.inertia.matrix()
    }

    /// Dense 6x6 form, [[m 1, -m c^], [m c^, Ic - m c^ c^]].
    pub fn matrix(&self) -> Matrix6<f64> {
        let mass = self.mass();
        let cx = self.center_of_mass().cross_matrix();

        let quad11 = Matrix3::identity() * mass;
        let quad12 = -cx * mass;
        let quad21 = cx * mass;
        let quad22 = self.inertia_matrix() - cx * cx * mass;

        let mut m = Matrix6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&quad11);
        m.fixed_view_mut::<3, 3>(0, 3).copy_from(&quad12);
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&quad21);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&quad22);
        m
    }

    /// Expresses this inertia in the parent frame of `transform`.
    pub fn transform(&self, transform: &SpatialTransform) -> SpatialInertia {
        let r = transform.rotation();
        let center_of_mass = r * self.center_of_mass() + transform.translation();
        let inertia = r * self.inertia_matrix() * r.transpose();
        SpatialInertia(MassProperties {
            center_of_mass: CenterOfMass::from(center_of_mass),
            mass: self.mass(),
            inertia: Inertia::from_matrix_unchecked(&inertia),
        })
    }
}

impl From<MassProperties> for SpatialInertia {
    fn from(value: MassProperties) -> SpatialInertia {
        SpatialInertia(value)
    }
}

impl Mul<Motion> for SpatialInertia {
    type Output = Force;

    /// Momentum (or force) of the body moving with `motion`.
    fn mul(self, motion: Motion) -> Force {
        let c = self.center_of_mass();
        let linear = (motion.linear() - c.cross(motion.angular())) * self.mass();
        let angular = self.inertia_matrix() * motion.angular() + c.cross(&linear);
        Force::new(linear, angular)
    }
}

impl Add<SpatialInertia> for SpatialInertia {
    type Output = SpatialInertia;

    /// Lumps two bodies expressed in the same frame.
    fn add(self, rhs: SpatialInertia) -> SpatialInertia {
        let mass = self.mass() + rhs.mass();
        if mass <= 0.0 {
            let inertia = self.inertia_matrix() + rhs.inertia_matrix();
            return SpatialInertia(MassProperties {
                center_of_mass: CenterOfMass::default(),
                mass,
                inertia: Inertia::from_matrix_unchecked(&inertia),
            });
        }
        let c1 = self.center_of_mass();
        let c2 = rhs.center_of_mass();
        let center_of_mass = (c1 * self.mass() + c2 * rhs.mass()) / mass;
        let dx = (c1 - c2).cross_matrix();
        let inertia = self.inertia_matrix() + rhs.inertia_matrix()
            - dx * dx * (self.mass() * rhs.mass() / mass);
        SpatialInertia(MassProperties {
            center_of_mass: CenterOfMass::from(center_of_mass),
            mass,
            inertia: Inertia::from_matrix_unchecked(&inertia),
        })
    }
}

impl Mul<SpatialInertia> for SpatialTransform {
    type Output = SpatialInertia;
    #[inline]
    fn mul(self, inertia: SpatialInertia) -> SpatialInertia {
        inertia.transform(&self)
    }
}
