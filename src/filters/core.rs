//! Gaussian kernel construction and separable convolution passes.
//!
//! The kernel is built from the Gaussian cumulative distribution, so each tap
//! holds the exact mass of the Gaussian over its unit pixel interval instead
//! of a point sample of the density.
//!
//! Both passes exclude samples that fall outside of the image and divide by
//! the sum of the kernel taps actually used. A constant image therefore stays
//! exactly constant up to the border.

use std::f64::consts::SQRT_2;

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

use crate::error::{Error, Result};

/// Kernel half-width in multiples of sigma.
pub const KERNEL_RADIUS_SIGMAS: f64 = 4.0;

/// Sigma of the filter that takes a blur of `from` to a blur of `to`.
///
/// Gaussian blurs compose in quadrature: `to² = from² + filter²`.
pub fn sigma_difference(from: f64, to: f64) -> Result<f64> {
    if !(to >= from) {
        return Err(Error::invalid(format!(
            "cannot reduce blur from sigma {from} to sigma {to}"
        )));
    }
    Ok((to * to - from * from).sqrt())
}

/// Half-width of the discrete kernel for `sigma`.
pub fn kernel_radius(sigma: f64) -> usize {
    (KERNEL_RADIUS_SIGMAS * sigma).ceil() as usize
}

/// Generate a normalized 1D Gaussian kernel of length `2 * radius + 1`.
///
/// # Arguments
/// * `sigma` - Standard deviation in pixels, must be positive
///
/// # Returns
/// Kernel taps summing to 1, centre tap at index `radius`
pub fn gaussian_kernel_1d(sigma: f64) -> Vec<f64> {
    let radius = kernel_radius(sigma);

    let mut kernel: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let x = (i as f64 - radius as f64).abs();
            pixel_mass(x, sigma)
        })
        .collect();

    // Normalize
    let sum: f64 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

/// Mass of `N(0, sigma²)` over `[x - 0.5, x + 0.5]` for `x >= 0`.
///
/// Evaluated through `erfc` so the far tail keeps its precision.
fn pixel_mass(x: f64, sigma: f64) -> f64 {
    let scale = sigma * SQRT_2;
    0.5 * (libm::erfc((x - 0.5) / scale) - libm::erfc((x + 0.5) / scale))
}

/// Horizontal pass: convolve every row with `kernel`.
pub fn convolve_rows(input: ArrayView2<'_, f32>, kernel: &[f64]) -> Result<Array2<f64>> {
    let (height, width) = input.dim();
    if height == 0 || width == 0 {
        return Ok(Array2::zeros((height, width)));
    }
    let radius = kernel.len() / 2;

    let mut out = vec![0.0f64; height * width];
    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, px) in row.iter_mut().enumerate() {
            let (first, last) = tap_range(x, width, radius);
            let mut sum = 0.0f64;
            let mut weight = 0.0f64;
            for ki in first..=last {
                let kv = kernel[ki];
                sum += input[[y, x + ki - radius]] as f64 * kv;
                weight += kv;
            }
            *px = sum / weight;
        }
    });

    Array2::from_shape_vec((height, width), out).map_err(|e| Error::invalid(e.to_string()))
}

/// Vertical pass: convolve every column with `kernel`.
pub fn convolve_columns(input: ArrayView2<'_, f64>, kernel: &[f64]) -> Result<Array2<f32>> {
    let (height, width) = input.dim();
    if height == 0 || width == 0 {
        return Ok(Array2::zeros((height, width)));
    }
    let radius = kernel.len() / 2;

    let mut out = vec![0.0f32; height * width];
    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let (first, last) = tap_range(y, height, radius);
        let weight: f64 = kernel[first..=last].iter().sum();
        for (x, px) in row.iter_mut().enumerate() {
            let mut sum = 0.0f64;
            for ki in first..=last {
                sum += input[[y + ki - radius, x]] * kernel[ki];
            }
            *px = (sum / weight) as f32;
        }
    });

    Array2::from_shape_vec((height, width), out).map_err(|e| Error::invalid(e.to_string()))
}

/// Indices of the kernel taps that land inside `0..len` when the kernel is
/// centred on `pos`.
#[inline]
fn tap_range(pos: usize, len: usize, radius: usize) -> (usize, usize) {
    let first = radius.saturating_sub(pos);
    let last = (radius + (len - 1 - pos)).min(2 * radius);
    (first, last)
}
