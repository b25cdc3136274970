//! WebAssembly exports for keypoint detection.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Output Layout
//!
//! Keypoints are returned as one flat `Float64Array` of `[x, y, sigma]`
//! triples in input-pixel coordinates.

use ndarray::Array2;
use wasm_bindgen::prelude::*;

use crate::config::ScaleSpaceConfig;
use crate::error::Error;
use crate::image::Image;
use crate::keypoints::{detect_keypoints, ScaleSpacePoint};

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn flatten(keypoints: &[ScaleSpacePoint]) -> Vec<f64> {
    keypoints
        .iter()
        .flat_map(|k| [k.x, k.y, k.sigma])
        .collect()
}

// ============================================================================
// Keypoints - f32 (float)
// ============================================================================

/// Detect difference-of-Gaussian extrema in a grayscale float image.
///
/// # Arguments
/// * `data` - Flat row-major array of floats (length = width * height), values 0.0-1.0
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `scales_per_octave` - Scale steps per doubling of sigma
/// * `original_sigma` - Blur already present in the image
/// * `initial_sigma` - Blur of the first octave in input-pixel units
///
/// # Returns
/// Flat array of `[x, y, sigma]` triples
#[wasm_bindgen]
pub fn detect_keypoints_f32_wasm(
    data: &[f32],
    width: usize,
    height: usize,
    scales_per_octave: usize,
    original_sigma: f64,
    initial_sigma: f64,
) -> Result<Vec<f64>, JsValue> {
    let pixels = Array2::from_shape_vec((height, width), data.to_vec())
        .map_err(|e| to_js(Error::invalid(e.to_string())))?;
    let config = ScaleSpaceConfig::new(scales_per_octave, original_sigma, initial_sigma);
    let keypoints = detect_keypoints(pixels, &config).map_err(to_js)?;
    Ok(flatten(&keypoints))
}

// ============================================================================
// Keypoints - u8 (8-bit)
// ============================================================================

/// Detect difference-of-Gaussian extrema in a grayscale 8-bit image using
/// Lowe's default parameters.
///
/// # Arguments
/// * `data` - Flat row-major array of bytes (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Flat array of `[x, y, sigma]` triples
#[wasm_bindgen]
pub fn detect_keypoints_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<f64>, JsValue> {
    let image = Image::from_luma8(width, height, data).map_err(to_js)?;
    let keypoints =
        detect_keypoints(image.into_array(), &ScaleSpaceConfig::default()).map_err(to_js)?;
    Ok(flatten(&keypoints))
}
