//! Resolution doubling by bilinear interpolation.

use ndarray::Array2;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::image::Image;

/// Produces a higher-resolution version of an image.
pub trait UpScaler: Send + Sync {
    fn up_scale(&self, image: &Image) -> Result<Image>;
}

/// Inserts interpolated samples between every pair of neighbouring pixels.
///
/// An `h x w` image becomes `(2h - 1) x (2w - 1)`. Even output positions copy
/// a source pixel, odd positions average the two (or four) surrounding ones.
/// The scale and both offsets double, sigma is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearUpScaler;

impl UpScaler for LinearUpScaler {
    fn up_scale(&self, image: &Image) -> Result<Image> {
        let (height, width) = (image.height(), image.width());
        let out_h = (2 * height).saturating_sub(1);
        let out_w = (2 * width).saturating_sub(1);

        let scale = image.scale() * 2.0;
        let offset_x = image.offset_x() * 2.0;
        let offset_y = image.offset_y() * 2.0;

        if out_h == 0 || out_w == 0 {
            return Ok(image.resampled(Array2::zeros((out_h, out_w)), scale, offset_x, offset_y));
        }

        let src = image.as_array();
        let mut out = vec![0.0f32; out_h * out_w];
        out.par_chunks_mut(out_w).enumerate().for_each(|(row, line)| {
            let sr = row / 2;
            let odd_row = row % 2 == 1;
            for (col, px) in line.iter_mut().enumerate() {
                let sc = col / 2;
                let odd_col = col % 2 == 1;
                *px = match (odd_row, odd_col) {
                    (false, false) => src[[sr, sc]],
                    (false, true) => (src[[sr, sc]] + src[[sr, sc + 1]]) / 2.0,
                    (true, false) => (src[[sr, sc]] + src[[sr + 1, sc]]) / 2.0,
                    (true, true) => {
                        (src[[sr, sc]] + src[[sr, sc + 1]] + src[[sr + 1, sc]] + src[[sr + 1, sc + 1]])
                            / 4.0
                    }
                };
            }
        });

        let pixels = Array2::from_shape_vec((out_h, out_w), out)
            .map_err(|e| Error::invalid(e.to_string()))?;
        Ok(image.resampled(pixels, scale, offset_x, offset_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_images_close;

    #[test]
    fn test_up_scale_values() {
        let input = Image::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let expected = Image::from_rows(&[
            vec![1.0, 1.5, 2.0, 2.5, 3.0],
            vec![2.5, 3.0, 3.5, 4.0, 4.5],
            vec![4.0, 4.5, 5.0, 5.5, 6.0],
        ])
        .unwrap();

        let output = LinearUpScaler.up_scale(&input).unwrap();
        assert_images_close(&output, &expected, 1e-6);
    }

    #[test]
    fn test_up_scale_transform() {
        let input = Image::with_transform(10, 10, 3.2, 2.0, 3.0, 4.0).unwrap();
        let output = LinearUpScaler.up_scale(&input).unwrap();

        assert_eq!((output.height(), output.width()), (19, 19));
        assert_eq!(output.sigma(), 3.2);
        assert_eq!(output.scale(), 4.0);
        assert_eq!(output.offset_x(), 6.0);
        assert_eq!(output.offset_y(), 8.0);
    }

    #[test]
    fn test_up_scale_empty() {
        let input = Image::new(0, 10);
        let output = LinearUpScaler.up_scale(&input).unwrap();
        assert_eq!((output.height(), output.width()), (0, 19));
    }

    #[test]
    fn test_up_scale_single_pixel() {
        let input = Image::from_rows(&[vec![0.25]]).unwrap();
        let output = LinearUpScaler.up_scale(&input).unwrap();
        assert_eq!(output.to_rows(), vec![vec![0.25]]);
        assert_eq!(output.scale(), 2.0);
    }

    #[test]
    fn test_up_scale_keeps_original_coordinates() {
        let input = Image::with_transform(4, 4, 0.5, 1.0, 0.0, 0.0).unwrap();
        let output = LinearUpScaler.up_scale(&input).unwrap();

        let p = output.to_original(crate::image::Point::new(4.0, 2.0));
        assert_eq!((p.x, p.y), (2.0, 1.0));
    }
}
