//! Keypoint candidates located in a scale space.
//!
//! ## Pipeline
//!
//! [`detect_keypoints`] wraps raw pixels in an [`Image`], builds Lowe's scale
//! space for it and runs the [`ExtremaDetector`] over all octaves.

pub mod extrema;

use std::fmt;
use std::hash::{Hash, Hasher};

use ndarray::Array2;
use tracing::info;

use crate::config::ScaleSpaceConfig;
use crate::error::Result;
use crate::image::Image;
use crate::scale_space::{ScaleSpace, ScaleSpaceFactory};

pub use extrema::ExtremaDetector;

/// Location and scale of a keypoint in original-image coordinates.
///
/// `x` runs along columns and `y` along rows, both pixel-centric. Equality
/// and hashing compare the exact bit patterns of all three fields.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleSpacePoint {
    pub x: f64,
    pub y: f64,
    pub sigma: f64,
}

impl ScaleSpacePoint {
    pub fn new(x: f64, y: f64, sigma: f64) -> Self {
        Self { x, y, sigma }
    }
}

impl PartialEq for ScaleSpacePoint {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.sigma.to_bits() == other.sigma.to_bits()
    }
}

impl Eq for ScaleSpacePoint {}

impl Hash for ScaleSpacePoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
        self.sigma.to_bits().hash(state);
    }
}

impl fmt::Display for ScaleSpacePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x={} y={} s={})", self.x, self.y, self.sigma)
    }
}

/// Finds keypoint candidates in a scale space.
pub trait KeypointDetector: Send + Sync {
    fn detect_keypoints(&self, scale_space: &ScaleSpace) -> Result<Vec<ScaleSpacePoint>>;
}

/// Detect scale-space extrema in a grayscale image.
///
/// # Arguments
/// * `pixels` - Grayscale image (height, width), nominally in 0.0-1.0
/// * `config` - Scale-space parameters; `original_sigma` is the blur assumed
///   for `pixels`
///
/// # Returns
/// Keypoints ordered by octave, then difference-of-Gaussian level, then row
/// and column
pub fn detect_keypoints(
    pixels: Array2<f32>,
    config: &ScaleSpaceConfig,
) -> Result<Vec<ScaleSpacePoint>> {
    config.validate()?;
    let image = Image::from_array(pixels, config.original_sigma, 1.0, 0.0, 0.0)?;
    let scale_space = ScaleSpaceFactory::default().create(&image, config)?;
    let keypoints = ExtremaDetector.detect_keypoints(&scale_space)?;
    info!(
        keypoints = keypoints.len(),
        width = image.width(),
        height = image.height(),
        "detected keypoints"
    );
    Ok(keypoints)
}
