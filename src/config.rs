//! Scale-space parameters.
//!
//! Lowe's reference values are the defaults, but every pipeline entry point
//! takes the configuration explicitly so alternative parameter sets can be
//! used side by side.

use crate::error::{Error, Result};

/// Scales per octave used by Lowe (2004).
pub const LOWE_SCALES_PER_OCTAVE: usize = 3;

/// Blur assumed to be present in a freshly decoded camera image.
pub const LOWE_ORIGINAL_SIGMA: f64 = 0.5;

/// Base blur of the first octave, relative to the original image.
///
/// The first octave lives on the doubled image, where this corresponds to
/// Lowe's 1.6.
pub const LOWE_INITIAL_SIGMA: f64 = 0.8;

/// Parameters of the Gaussian scale space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleSpaceConfig {
    /// Number of scale steps needed to double sigma. Must be at least 1.
    pub scales_per_octave: usize,
    /// Blur of the input image relative to an ideal point-sampled scene.
    pub original_sigma: f64,
    /// Blur of the first octave's base image. Must not be below
    /// `original_sigma`.
    pub initial_sigma: f64,
    /// Optional cap on the number of octaves. `None` builds octaves until
    /// the image cannot be reduced any further.
    pub max_octaves: Option<usize>,
}

impl Default for ScaleSpaceConfig {
    fn default() -> Self {
        Self {
            scales_per_octave: LOWE_SCALES_PER_OCTAVE,
            original_sigma: LOWE_ORIGINAL_SIGMA,
            initial_sigma: LOWE_INITIAL_SIGMA,
            max_octaves: None,
        }
    }
}

impl ScaleSpaceConfig {
    pub fn new(scales_per_octave: usize, original_sigma: f64, initial_sigma: f64) -> Self {
        Self {
            scales_per_octave,
            original_sigma,
            initial_sigma,
            max_octaves: None,
        }
    }

    pub fn with_max_octaves(mut self, max_octaves: usize) -> Self {
        self.max_octaves = Some(max_octaves);
        self
    }

    /// Check the parameters for consistency.
    pub fn validate(&self) -> Result<()> {
        self.validate_octaves()?;
        if !(self.original_sigma.is_finite() && self.original_sigma > 0.0) {
            return Err(Error::invalid(format!(
                "original sigma must be larger than zero, got {}",
                self.original_sigma
            )));
        }
        if !self.initial_sigma.is_finite() || self.initial_sigma < self.original_sigma {
            return Err(Error::invalid(format!(
                "initial sigma {} must be greater or equal the original sigma {}",
                self.initial_sigma, self.original_sigma
            )));
        }
        Ok(())
    }

    /// Check only the parameters that shape the octaves.
    ///
    /// `original_sigma` is ignored, an existing [`Image`](crate::image::Image)
    /// carries its own sigma.
    pub fn validate_octaves(&self) -> Result<()> {
        if self.scales_per_octave < 1 {
            return Err(Error::invalid("need at least one scale per octave"));
        }
        if !(self.initial_sigma.is_finite() && self.initial_sigma > 0.0) {
            return Err(Error::invalid(format!(
                "initial sigma must be larger than zero, got {}",
                self.initial_sigma
            )));
        }
        if self.max_octaves == Some(0) {
            return Err(Error::invalid("max_octaves must be at least 1"));
        }
        Ok(())
    }
}
