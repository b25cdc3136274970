//! Resolution halving by dropping every other row and column.

use ndarray::{s, Array2};

use crate::error::{Error, Result};
use crate::image::Image;

/// Produces a lower-resolution version of an image.
pub trait DownScaler: Send + Sync {
    fn down_scale(&self, image: &Image) -> Result<Image>;
}

/// Keeps the pixels at even rows and even columns.
///
/// An `h x w` image becomes `ceil(h / 2) x ceil(w / 2)`. No anti-aliasing is
/// applied, the input is expected to be blurred enough already. The scale
/// and both offsets halve, sigma is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct Subsampler;

impl DownScaler for Subsampler {
    fn down_scale(&self, image: &Image) -> Result<Image> {
        if image.width() < 1 || image.height() < 1 {
            return Err(Error::invalid(format!(
                "cannot subsample an image of size {}x{}",
                image.height(),
                image.width()
            )));
        }

        let pixels: Array2<f32> = image.as_array().slice(s![..;2, ..;2]).to_owned();

        Ok(image.resampled(
            pixels,
            image.scale() / 2.0,
            image.offset_x() / 2.0,
            image.offset_y() / 2.0,
        ))
    }
}
