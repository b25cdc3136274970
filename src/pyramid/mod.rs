//! Resolution changes between octaves.
//!
//! ## Strategies
//!
//! - [`UpScaler`] / [`LinearUpScaler`]: doubles resolution before the first octave
//! - [`DownScaler`] / [`Subsampler`]: halves resolution between octaves
//!
//! Both keep `sigma` unchanged and update the coordinate transform so that
//! local pixel coordinates still map back onto the original image.

pub mod downscale;
pub mod upscale;

pub use downscale::{DownScaler, Subsampler};
pub use upscale::{LinearUpScaler, UpScaler};
