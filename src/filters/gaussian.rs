//! Gaussian low-pass filtering of scale-space images.

use tracing::trace;

use super::core::{convolve_columns, convolve_rows, gaussian_kernel_1d, kernel_radius, sigma_difference};
use crate::error::{Error, Result};
use crate::image::Image;

/// Filter sigmas (in pixels) at or below this are treated as a no-op.
pub const IDENTITY_SIGMA: f64 = 1e-6;

/// Raises the blur of an image to a requested total sigma.
pub trait LowPassFilter: Send + Sync {
    /// Return a copy of `image` blurred to total `sigma`.
    ///
    /// `sigma` is in original-image units. It must be positive and no
    /// smaller than the blur `image` already carries.
    fn filter(&self, image: &Image, sigma: f64) -> Result<Image>;
}

/// Separable Gaussian filter with pixel-integrated weights.
///
/// The blur that has to be added is computed in the image's own pixel grid,
/// so an image at scale 2 needs twice the filter width of one at scale 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianFilter;

impl GaussianFilter {
    pub fn new() -> Self {
        Self
    }
}

impl LowPassFilter for GaussianFilter {
    fn filter(&self, image: &Image, sigma: f64) -> Result<Image> {
        if !(sigma > 0.0) {
            return Err(Error::invalid(format!("target sigma must be positive, got {sigma}")));
        }
        if sigma < image.sigma() {
            return Err(Error::invalid(format!(
                "cannot reduce blur of image with sigma {} to {sigma}",
                image.sigma()
            )));
        }

        let scale = image.scale().abs();
        let filter_sigma = sigma_difference(image.sigma() * scale, sigma * scale)?;

        if filter_sigma <= IDENTITY_SIGMA {
            trace!(sigma, "gaussian filter is identity");
            return Ok(image.derive(image.as_array().to_owned(), sigma));
        }

        trace!(
            from = image.sigma(),
            to = sigma,
            filter_sigma,
            radius = kernel_radius(filter_sigma),
            "gaussian filter"
        );

        let kernel = gaussian_kernel_1d(filter_sigma);
        let temp = convolve_rows(image.as_array(), &kernel)?;
        let blurred = convolve_columns(temp.view(), &kernel)?;

        Ok(image.derive(blurred, sigma))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_images_close, filled};
    use std::f64::consts::PI;

    fn gaussian_2d(height: usize, width: usize, row: f64, col: f64, sigma: f64) -> Image {
        let mut image = Image::new(height, width);
        let norm = 1.0 / (2.0 * PI * sigma * sigma);
        for r in 0..height {
            for c in 0..width {
                let dr = r as f64 - row;
                let dc = c as f64 - col;
                let v = norm * (-(dr * dr + dc * dc) / (2.0 * sigma * sigma)).exp();
                image.set_pixel(r, c, v as f32).unwrap();
            }
        }
        image
    }

    #[test]
    fn test_flat_image_stays_flat() {
        let input = filled(100, 100, 0.5);
        let output = GaussianFilter.filter(&input, 4.5).unwrap();

        assert_eq!(output.sigma(), 4.5);
        assert_images_close(&output, &filled(100, 100, 0.5), 1e-10);
    }

    #[test]
    fn test_point_source() {
        let mut input = Image::new(101, 101);
        input.set_pixel(50, 50, 1.0).unwrap();

        let target = (6.5f64 * 6.5 + 0.5 * 0.5).sqrt();
        let output = GaussianFilter.filter(&input, target).unwrap();

        assert_images_close(&output, &gaussian_2d(101, 101, 50.0, 50.0, 6.5), 1e-5);
    }

    #[test]
    fn test_point_source_on_scaled_image() {
        let mut input = Image::with_transform(101, 101, 0.8, 2.0, 0.0, 0.0).unwrap();
        input.set_pixel(50, 50, 1.0).unwrap();

        // (6.5 / 2)² + 0.8² in original units
        let output = GaussianFilter
            .filter(&input, 3.347_013_594_235_912_3)
            .unwrap();

        assert_eq!(output.scale(), 2.0);
        assert_images_close(&output, &gaussian_2d(101, 101, 50.0, 50.0, 6.5), 1e-5);
    }

    #[test]
    fn test_reduce_blur_fails() {
        let input = Image::with_transform(20, 20, 3.0, 2.0, 3.0, 4.0).unwrap();
        assert!(matches!(
            GaussianFilter.filter(&input, 2.9),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_zero_sigma_fails() {
        let input = Image::new(20, 20);
        assert!(GaussianFilter.filter(&input, 0.0).is_err());
        assert!(GaussianFilter.filter(&input, f64::NAN).is_err());
    }

    #[test]
    fn test_same_sigma_is_copy() {
        let mut input = Image::with_transform(5, 4, 1.2, 2.0, 1.0, 0.5).unwrap();
        input.set_pixel(2, 1, 0.75).unwrap();

        let output = GaussianFilter.filter(&input, 1.2).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_keeps_transform() {
        let input = Image::with_transform(9, 7, 0.5, 2.0, 3.0, 4.0).unwrap();
        let output = GaussianFilter.filter(&input, 1.5).unwrap();

        assert_eq!(output.sigma(), 1.5);
        assert!(output.same_transform(&input));
        assert_eq!((output.height(), output.width()), (9, 7));
    }
}
