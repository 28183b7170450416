use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Compile time joint axis aligned with one of the frame axes.
pub trait Axis: Copy + Clone + Debug + Default + PartialEq + Send + Sync + 'static {
    const INDEX: usize;

    fn unit() -> Vector3<f64> {
        let mut e = Vector3::zeros();
        e[Self::INDEX] = 1.0;
        e
    }

    /// Rotation about the axis given the cosine and sine of the angle.
    fn rotation(c: f64, s: f64) -> Matrix3<f64>;

    /// v x e, with e the unit axis
    fn cross(v: &Vector3<f64>) -> Vector3<f64>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisX;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisY;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisZ;

impl Axis for AxisX {
    const INDEX: usize = 0;

    #[inline]
    fn rotation(c: f64, s: f64) -> Matrix3<f64> {
        Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
    }

    #[inline]
    fn cross(v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(0.0, v[2], -v[1])
    }
}

impl Axis for AxisY {
    const INDEX: usize = 1;

    #[inline]
    fn rotation(c: f64, s: f64) -> Matrix3<f64> {
        Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
    }

    #[inline]
    fn cross(v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(-v[2], 0.0, v[0])
    }
}

impl Axis for AxisZ {
    const INDEX: usize = 2;

    #[inline]
    fn rotation(c: f64, s: f64) -> Matrix3<f64> {
        Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    fn cross(v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(v[1], -v[0], 0.0)
    }
}
