//! Low-pass filtering for scale-space construction.
//!
//! ## Modules
//!
//! - `core`: kernel generation, blur arithmetic and separable passes
//! - `gaussian`: the [`LowPassFilter`] seam and its Gaussian implementation

pub mod core;
pub mod gaussian;

pub use self::core::{gaussian_kernel_1d, sigma_difference};
pub use gaussian::{GaussianFilter, LowPassFilter};
