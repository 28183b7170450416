use nalgebra::{Matrix3, Vector3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MassPropertiesErrors {
    #[error("Ixx cant be less than zero")]
    IxxLessThanZero,
    #[error("Iyy cant be less than zero")]
    IyyLessThanZero,
    #[error("Izz cant be less than zero")]
    IzzLessThanZero,
    #[error("mass cannot be less than zero")]
    MassLessThanZero,
    #[error("mass properties must be finite")]
    NonFinite,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CenterOfMass {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CenterOfMass {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl From<Vector3<f64>> for CenterOfMass {
    fn from(v: Vector3<f64>) -> CenterOfMass {
        CenterOfMass::new(v[0], v[1], v[2])
    }
}

/// Rotational inertia about the center of mass.
/// Only the six independent entries of the symmetric tensor are stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Inertia {
    pub ixx: f64,
    pub ixy: f64,
    pub ixz: f64,
    pub iyy: f64,
    pub iyz: f64,
    pub izz: f64,
}

impl Inertia {
    pub fn new(
        ixx: f64,
        iyy: f64,
        izz: f64,
        ixy: f64,
        ixz: f64,
        iyz: f64,
    ) -> Result<Self, MassPropertiesErrors> {
        if ![ixx, iyy, izz, ixy, ixz, iyz]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(MassPropertiesErrors::NonFinite);
        }
        if ixx < 0.0 {
            return Err(MassPropertiesErrors::IxxLessThanZero);
        }
        if iyy < 0.0 {
            return Err(MassPropertiesErrors::IyyLessThanZero);
        }
        if izz < 0.0 {
            return Err(MassPropertiesErrors::IzzLessThanZero);
        }
        Ok(Self { ixx, ixy, ixz, iyy, iyz, izz })
    }

    pub fn zeros() -> Self {
        Self::default()
    }

    /// Builds the inertia from the lower triangle of a matrix.
    pub fn from_matrix(m: &Matrix3<f64>) -> Result<Self, MassPropertiesErrors> {
        Inertia::new(
            m[(0, 0)],
            m[(1, 1)],
            m[(2, 2)],
            m[(1, 0)],
            m[(2, 0)],
            m[(2, 1)],
        )
    }

    /// Same as `from_matrix` without any validation of the entries.
    pub fn from_matrix_unchecked(m: &Matrix3<f64>) -> Self {
        Self {
            ixx: m[(0, 0)],
            ixy: m[(1, 0)],
            ixz: m[(2, 0)],
            iyy: m[(1, 1)],
            iyz: m[(2, 1)],
            izz: m[(2, 2)],
        }
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.ixx, self.ixy, self.ixz, self.ixy, self.iyy, self.iyz, self.ixz, self.iyz,
            self.izz,
        )
    }
}

/// Represents the mass properties of an object
/// Mass, Center of Mass, Inertia
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub center_of_mass: CenterOfMass,
    pub mass: f64,
    pub inertia: Inertia,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            center_of_mass: CenterOfMass::default(),
            mass: 1.0,
            inertia: Inertia { ixx: 1.0, iyy: 1.0, izz: 1.0, ..Default::default() },
        }
    }
}

impl MassProperties {
    pub fn new(
        mass: f64,
        center_of_mass: CenterOfMass,
        inertia: Inertia,
    ) -> Result<Self, MassPropertiesErrors> {
        if !mass.is_finite() || !center_of_mass.vector().iter().all(|v| v.is_finite()) {
            return Err(MassPropertiesErrors::NonFinite);
        }
        if mass < 0.0 {
            return Err(MassPropertiesErrors::MassLessThanZero);
        }
        Ok(MassProperties { mass, center_of_mass, inertia })
    }

    /// Massless body at the origin.
    pub fn zeros() -> Self {
        Self { center_of_mass: CenterOfMass::default(), mass: 0.0, inertia: Inertia::zeros() }
    }

    /// Random mass properties with a positive definite inertia tensor.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mass = rng.random_range(0.5..2.0);
        let center_of_mass = CenterOfMass::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let a = Matrix3::from_fn(|_, _| rng.random_range(-1.0..1.0));
        // A A^T + 0.1 I is positive definite
        let m = a * a.transpose() + Matrix3::identity() * 0.1;
        Self { center_of_mass, mass, inertia: Inertia::from_matrix_unchecked(&m) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    #[test]
    fn test_inertia_rejects_negative_diagonal() {
        assert_eq!(
            Inertia::new(-1.0, 1.0, 1.0, 0.0, 0.0, 0.0),
            Err(MassPropertiesErrors::IxxLessThanZero)
        );
        assert_eq!(
            Inertia::new(1.0, -1.0, 1.0, 0.0, 0.0, 0.0),
            Err(MassPropertiesErrors::IyyLessThanZero)
        );
        assert_eq!(
            Inertia::new(1.0, 1.0, -1.0, 0.0, 0.0, 0.0),
            Err(MassPropertiesErrors::IzzLessThanZero)
        );
        assert_eq!(
            Inertia::new(f64::NAN, 1.0, 1.0, 0.0, 0.0, 0.0),
            Err(MassPropertiesErrors::NonFinite)
        );
    }

    #[test]
    fn test_inertia_matrix_is_symmetric() {
        let inertia = Inertia::new(1.0, 2.0, 3.0, 0.1, 0.2, 0.3).unwrap();
        let m = inertia.matrix();
        assert_eq!(m, m.transpose());
        assert_eq!(Inertia::from_matrix(&m).unwrap(), inertia);
    }

    #[test]
    fn test_mass_allows_zero_rejects_negative() {
        let inertia = Inertia::zeros();
        assert!(MassProperties::new(0.0, CenterOfMass::default(), inertia).is_ok());
        assert_eq!(
            MassProperties::new(-1.0, CenterOfMass::default(), inertia),
            Err(MassPropertiesErrors::MassLessThanZero)
        );
    }

    #[test]
    fn test_random_inertia_positive_definite() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..20 {
            let mp = MassProperties::random(&mut rng);
            assert!(mp.mass > 0.0);
            let eigen = mp.inertia.matrix().symmetric_eigen();
            assert!(eigen.eigenvalues.iter().all(|&l| l > 0.0));
        }
    }
}
