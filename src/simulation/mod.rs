pub mod buffers;
pub mod concurrency;
pub mod error;
pub mod geometry;
pub mod hashing;
pub mod kinematics;
pub mod overlap_check;
pub mod packer;
pub mod particle_class;
pub mod particle_set;
pub mod scenario;
pub mod scenario_parameters;

#[cfg(feature = "double-precision")]
pub mod floating_type_mod {
    pub type FT = f64;
}

#[cfg(not(feature = "double-precision"))]
pub mod floating_type_mod {
    pub type FT = f32;
}

use nalgebra::SVector;
use num_traits::Float;
use std::fmt::Display;

pub type V<FT, const D: usize> = SVector<FT, D>;

/// Geometry is always generated in double precision, only the packed GPU buffers use `FT`.
pub type V3D = V<f64, 3>;

pub fn vec3d(x: f64, y: f64, z: f64) -> V3D {
    [x, y, z].into()
}

pub fn is_ft_approx_eq<FT: Float>(a: FT, b: FT, tolerance: FT) -> bool {
    assert!(!a.is_nan());
    assert!(!b.is_nan());
    b <= a + tolerance && b >= a - tolerance
}

pub fn assert_ft_approx_eq<FT: Float + Display>(a: FT, b: FT, tolerance: FT, s: impl FnOnce() -> String) {
    if !is_ft_approx_eq(a, b, tolerance) {
        panic!(
            "{} value not equal with a tolerance of {}:\n\ta={}\n\tb={}\n",
            s(),
            tolerance,
            a,
            b
        );
    }
}

pub use scenario::*;
