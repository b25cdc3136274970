//! SIFT Scale Space
//!
//! Gaussian scale-space construction and difference-of-Gaussian extrema
//! detection after Lowe (2004), with Python bindings via PyO3 and WASM
//! bindings for JavaScript.
//!
//! ## Image Format
//! Images are single-channel `f32` grids of shape (height, width), values
//! nominally 0.0-1.0. Every [`Image`] also carries the blur it already has
//! (`sigma`) and an affine map back onto the original input, so keypoints
//! found at any octave are reported in original pixel coordinates.
//!
//! ## Pipeline
//! 1. Double the input resolution ([`LinearUpScaler`])
//! 2. Blur to the initial sigma ([`GaussianFilter`])
//! 3. Build octaves of scale images and their differences ([`DogOctaveFactory`])
//! 4. Subsample the doubled-sigma image to seed the next octave ([`Subsampler`])
//! 5. Report 3x3x3 DoG extrema ([`ExtremaDetector`])
//!
//! Each step sits behind a trait so [`ScaleSpaceFactory`] can be assembled
//! from custom strategies.

pub mod config;
pub mod error;
pub mod filters;
pub mod image;
pub mod keypoints;
pub mod pyramid;
pub mod scale_space;

#[cfg(test)]
mod test_utils;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::ScaleSpaceConfig;
pub use error::{Error, Result};
pub use filters::{sigma_difference, GaussianFilter, LowPassFilter};
pub use image::{Image, Point};
pub use keypoints::{detect_keypoints, ExtremaDetector, KeypointDetector, ScaleSpacePoint};
pub use pyramid::{DownScaler, LinearUpScaler, Subsampler, UpScaler};
pub use scale_space::{
    DogOctaveFactory, Octave, OctaveFactory, ScaleSpace, ScaleSpaceFactory,
    ScaleSpaceFactoryBuilder,
};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
    use pyo3::prelude::*;

    use crate::config::ScaleSpaceConfig;
    use crate::filters::{GaussianFilter, LowPassFilter};
    use crate::image::Image;
    use crate::keypoints::detect_keypoints as detect_keypoints_impl;
    use crate::scale_space::ScaleSpaceFactory;

    type Levels<'py> = Vec<Vec<Bound<'py, PyArray2<f32>>>>;

    fn make_config(
        scales_per_octave: usize,
        original_sigma: f64,
        initial_sigma: f64,
        max_octaves: Option<usize>,
    ) -> ScaleSpaceConfig {
        ScaleSpaceConfig {
            scales_per_octave,
            original_sigma,
            initial_sigma,
            max_octaves,
        }
    }

    // ========================================================================
    // Keypoints
    // ========================================================================

    /// Detect difference-of-Gaussian extrema in a grayscale image.
    ///
    /// # Arguments
    /// * `image` - Grayscale image (height, width) as f32
    /// * `scales_per_octave` - Scale steps per doubling of sigma
    /// * `original_sigma` - Blur already present in `image`
    /// * `initial_sigma` - Blur of the first octave in input-pixel units
    /// * `max_octaves` - Optional cap on the number of octaves
    ///
    /// # Returns
    /// List of `(x, y, sigma)` tuples in input-pixel coordinates
    #[pyfunction]
    #[pyo3(signature = (image, scales_per_octave=3, original_sigma=0.5, initial_sigma=0.8, max_octaves=None))]
    pub fn detect_keypoints<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, f32>,
        scales_per_octave: usize,
        original_sigma: f64,
        initial_sigma: f64,
        max_octaves: Option<usize>,
    ) -> PyResult<Vec<(f64, f64, f64)>> {
        let pixels = image.as_array().to_owned();
        let config = make_config(scales_per_octave, original_sigma, initial_sigma, max_octaves);
        let keypoints = py.allow_threads(|| detect_keypoints_impl(pixels, &config))?;
        Ok(keypoints.into_iter().map(|k| (k.x, k.y, k.sigma)).collect())
    }

    // ========================================================================
    // Scale Space
    // ========================================================================

    /// Build the scale space of a grayscale image.
    ///
    /// # Returns
    /// `(scale_images, dogs)`, each a list of octaves holding a list of
    /// (height, width) f32 arrays
    #[pyfunction]
    #[pyo3(signature = (image, scales_per_octave=3, original_sigma=0.5, initial_sigma=0.8, max_octaves=None))]
    pub fn build_scale_space<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, f32>,
        scales_per_octave: usize,
        original_sigma: f64,
        initial_sigma: f64,
        max_octaves: Option<usize>,
    ) -> PyResult<(Levels<'py>, Levels<'py>)> {
        let pixels = image.as_array().to_owned();
        let config = make_config(scales_per_octave, original_sigma, initial_sigma, max_octaves);
        let space = py.allow_threads(|| {
            config.validate()?;
            let image = Image::from_array(pixels, config.original_sigma, 1.0, 0.0, 0.0)?;
            ScaleSpaceFactory::default().create(&image, &config)
        })?;

        let convert = |images: &[Image]| -> Vec<Bound<'py, PyArray2<f32>>> {
            images
                .iter()
                .map(|i| i.as_array().to_owned().into_pyarray(py))
                .collect()
        };
        let scale_images = space.octaves().iter().map(|o| convert(o.scale_images())).collect();
        let dogs = space
            .octaves()
            .iter()
            .map(|o| convert(o.differences_of_gaussians()))
            .collect();
        Ok((scale_images, dogs))
    }

    // ========================================================================
    // Gaussian Filter
    // ========================================================================

    /// Blur an image that already carries `sigma` up to `target_sigma`.
    #[pyfunction]
    #[pyo3(signature = (image, target_sigma, sigma=0.5))]
    pub fn gaussian_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, f32>,
        target_sigma: f64,
        sigma: f64,
    ) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let input = Image::from_array(image.as_array().to_owned(), sigma, 1.0, 0.0, 0.0)?;
        let output = py.allow_threads(|| GaussianFilter.filter(&input, target_sigma))?;
        Ok(output.into_array().into_pyarray(py))
    }

    /// Python module definition
    #[pymodule]
    pub fn sift_scale_space(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(detect_keypoints, m)?)?;
        m.add_function(wrap_pyfunction!(build_scale_space, m)?)?;
        m.add_function(wrap_pyfunction!(gaussian_filter, m)?)?;
        Ok(())
    }
}
