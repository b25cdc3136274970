//! Floating-point grayscale image with scale-space bookkeeping.
//!
//! Besides the pixel grid, every [`Image`] records how blurred it is and how
//! its pixel coordinates relate to the original input image:
//!
//! ```text
//! original = (local - offset) / scale
//! local    = original * scale + offset
//! ```
//!
//! `sigma` is always expressed in original-image units, so resampling changes
//! `scale` and the offsets but never `sigma`.

use std::fmt;

use ndarray::{Array2, ArrayView2, Zip};

use crate::error::{Error, Result};

/// Blur assumed for images constructed without explicit metadata.
pub const DEFAULT_SIGMA: f64 = 0.5;

const LUMA8_MAX: f32 = 255.0;
const LUMA16_MAX: f32 = 65535.0;

/// A pixel-centric point, `x` along columns and `y` along rows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Dense `height x width` grid of `f32` samples (0 = black, 1 = white).
///
/// Pixels are addressed as `[row][column]`, zero based.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pixels: Array2<f32>,
    sigma: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Image {
    /// Zero-filled image with the default sigma and the identity transform.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            pixels: Array2::zeros((height, width)),
            sigma: DEFAULT_SIGMA,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Zero-filled image with explicit blur and coordinate transform.
    pub fn with_transform(
        height: usize,
        width: usize,
        sigma: f64,
        scale: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> Result<Self> {
        Self::from_array(
            Array2::zeros((height, width)),
            sigma,
            scale,
            offset_x,
            offset_y,
        )
    }

    /// Wrap an existing `(height, width)` array.
    pub fn from_array(
        pixels: Array2<f32>,
        sigma: f64,
        scale: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> Result<Self> {
        check_sigma(sigma)?;
        Ok(Self {
            pixels,
            sigma,
            scale,
            offset_x,
            offset_y,
        })
    }

    /// Copy pixels given as `rows[row][column]`.
    ///
    /// All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut pixels = Array2::<f32>::zeros((height, width));

        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(Error::invalid(format!(
                    "row {} has {} columns but row 0 has {} columns",
                    row,
                    values.len(),
                    width
                )));
            }
            for (col, &v) in values.iter().enumerate() {
                pixels[[row, col]] = v;
            }
        }

        Ok(Self::from_pixels(pixels))
    }

    /// Copy pixels given as `columns[column][row]`.
    pub fn from_columns(columns: &[Vec<f32>]) -> Result<Self> {
        let width = columns.len();
        let height = columns.first().map_or(0, Vec::len);
        let mut pixels = Array2::<f32>::zeros((height, width));

        for (col, values) in columns.iter().enumerate() {
            if values.len() != height {
                return Err(Error::invalid(format!(
                    "column {} has {} rows but column 0 has {} rows",
                    col,
                    values.len(),
                    height
                )));
            }
            for (row, &v) in values.iter().enumerate() {
                pixels[[row, col]] = v;
            }
        }

        Ok(Self::from_pixels(pixels))
    }

    /// Convert a row-major 8-bit luminance buffer (0-255 -> 0.0-1.0).
    pub fn from_luma8(width: usize, height: usize, data: &[u8]) -> Result<Self> {
        let pixels = Array2::from_shape_vec((height, width), data.to_vec()).map_err(|_| {
            Error::invalid(format!(
                "expected {} luma samples for a {}x{} image, got {}",
                width.saturating_mul(height),
                width,
                height,
                data.len()
            ))
        })?;
        Ok(Self::from_pixels(pixels.mapv(|v| v as f32 / LUMA8_MAX)))
    }

    /// Convert a row-major 16-bit luminance buffer (0-65535 -> 0.0-1.0).
    pub fn from_luma16(width: usize, height: usize, data: &[u16]) -> Result<Self> {
        let pixels = Array2::from_shape_vec((height, width), data.to_vec()).map_err(|_| {
            Error::invalid(format!(
                "expected {} luma samples for a {}x{} image, got {}",
                width.saturating_mul(height),
                width,
                height,
                data.len()
            ))
        })?;
        Ok(Self::from_pixels(pixels.mapv(|v| v as f32 / LUMA16_MAX)))
    }

    /// Replace blur and transform metadata.
    pub fn with_metadata(
        self,
        sigma: f64,
        scale: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> Result<Self> {
        Self::from_array(self.pixels, sigma, scale, offset_x, offset_y)
    }

    fn from_pixels(pixels: Array2<f32>) -> Self {
        Self {
            pixels,
            sigma: DEFAULT_SIGMA,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// New image sharing this image's transform.
    pub(crate) fn derive(&self, pixels: Array2<f32>, sigma: f64) -> Self {
        Self {
            pixels,
            sigma,
            scale: self.scale,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }

    /// New image with this image's sigma and an explicit transform.
    pub(crate) fn resampled(
        &self,
        pixels: Array2<f32>,
        scale: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> Self {
        Self {
            pixels,
            sigma: self.sigma,
            scale,
            offset_x,
            offset_y,
        }
    }

    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Blur relative to the original image. Always strictly positive.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    pub fn pixel(&self, row: usize, column: usize) -> Result<f32> {
        self.pixels
            .get([row, column])
            .copied()
            .ok_or_else(|| self.out_of_range(row, column))
    }

    pub fn set_pixel(&mut self, row: usize, column: usize, value: f32) -> Result<()> {
        let err = self.out_of_range(row, column);
        let px = self.pixels.get_mut([row, column]).ok_or(err)?;
        *px = value;
        Ok(())
    }

    fn out_of_range(&self, row: usize, column: usize) -> Error {
        Error::OutOfRange {
            row,
            column,
            height: self.height(),
            width: self.width(),
        }
    }

    pub fn as_array(&self) -> ArrayView2<'_, f32> {
        self.pixels.view()
    }

    pub fn into_array(self) -> Array2<f32> {
        self.pixels
    }

    /// Copy into `rows[row][column]` order.
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.pixels.rows().into_iter().map(|r| r.to_vec()).collect()
    }

    /// Copy into `columns[column][row]` order.
    pub fn to_columns(&self) -> Vec<Vec<f32>> {
        self.pixels
            .columns()
            .into_iter()
            .map(|c| c.to_vec())
            .collect()
    }

    /// Row-major 16-bit luminance, clamping samples to 0.0-1.0.
    pub fn to_luma16(&self) -> Vec<u16> {
        self.pixels
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * LUMA16_MAX) as u16)
            .collect()
    }

    /// Map a pixel-centric point of this image into the original image.
    pub fn to_original(&self, point: Point) -> Point {
        Point {
            x: (point.x - self.offset_x) / self.scale,
            y: (point.y - self.offset_y) / self.scale,
        }
    }

    /// Map a pixel-centric point of the original image into this image.
    pub fn from_original(&self, point: Point) -> Point {
        Point {
            x: point.x * self.scale + self.offset_x,
            y: point.y * self.scale + self.offset_y,
        }
    }

    /// True if pixels of both images refer to the same original positions.
    pub fn same_transform(&self, other: &Image) -> bool {
        self.scale == other.scale
            && self.offset_x == other.offset_x
            && self.offset_y == other.offset_y
    }

    /// Pixel-wise `self - subtrahend`.
    ///
    /// The result's sigma is the geometric mean of both operands' sigmas.
    pub fn subtract(&self, subtrahend: &Image) -> Result<Image> {
        if self.pixels.dim() != subtrahend.pixels.dim() {
            return Err(Error::invalid(format!(
                "images have different dimensions: {}x{} and {}x{}",
                self.height(),
                self.width(),
                subtrahend.height(),
                subtrahend.width()
            )));
        }
        if !self.same_transform(subtrahend) {
            return Err(Error::invalid(
                "images have different transformations from the original image",
            ));
        }

        let mut difference = Array2::<f32>::zeros(self.pixels.dim());
        Zip::from(&mut difference)
            .and(&self.pixels)
            .and(&subtrahend.pixels)
            .for_each(|d, &a, &b| *d = a - b);

        Ok(self.derive(difference, geometric_mean(self.sigma, subtrahend.sigma)))
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Image(w={} h={} s={} scale={} oX={} oY={})",
            self.width(),
            self.height(),
            self.sigma,
            self.scale,
            self.offset_x,
            self.offset_y
        )
    }
}

/// `exp((ln a + ln b) / 2)`, the sigma of a difference of two blur levels.
pub fn geometric_mean(a: f64, b: f64) -> f64 {
    ((a.ln() + b.ln()) / 2.0).exp()
}

fn check_sigma(sigma: f64) -> Result<()> {
    // also rejects NaN
    if sigma > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(format!(
            "sigma must be larger than zero, got {sigma}"
        )))
    }
}
