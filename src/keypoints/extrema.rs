//! Local extrema of the difference-of-Gaussian stack.

use ndarray::ArrayView2;
use rayon::prelude::*;
use tracing::debug;

use super::{KeypointDetector, ScaleSpacePoint};
use crate::error::Result;
use crate::image::{Image, Point};
use crate::scale_space::{Octave, ScaleSpace};

/// Reports every DoG sample that is strictly above (or strictly below) all
/// 26 neighbours in its 3x3x3 block.
///
/// Only interior DoG levels and interior pixels are examined. Keypoints are
/// placed at the pixel centre, mapped back to original coordinates, and
/// carry the sigma of their DoG level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtremaDetector;

impl KeypointDetector for ExtremaDetector {
    fn detect_keypoints(&self, scale_space: &ScaleSpace) -> Result<Vec<ScaleSpacePoint>> {
        let per_octave: Vec<Vec<ScaleSpacePoint>> = scale_space
            .octaves()
            .par_iter()
            .map(detect_in_octave)
            .collect();

        for (index, points) in per_octave.iter().enumerate() {
            debug!(octave = index, keypoints = points.len(), "octave extrema");
        }

        Ok(per_octave.into_iter().flatten().collect())
    }
}

fn detect_in_octave(octave: &Octave) -> Vec<ScaleSpacePoint> {
    octave
        .differences_of_gaussians()
        .windows(3)
        .flat_map(|dogs| detect_in_level(&dogs[0], &dogs[1], &dogs[2]))
        .collect()
}

fn detect_in_level(low: &Image, center: &Image, high: &Image) -> Vec<ScaleSpacePoint> {
    let layers = [low.as_array(), center.as_array(), high.as_array()];
    let (height, width) = layers[1].dim();

    let mut points = Vec::new();
    for row in 1..height.saturating_sub(1) {
        for col in 1..width.saturating_sub(1) {
            if is_extremum(&layers, row, col) {
                let p = center.to_original(Point::new(col as f64, row as f64));
                points.push(ScaleSpacePoint::new(p.x, p.y, center.sigma()));
            }
        }
    }
    points
}

/// The left neighbour decides whether `(row, col)` has to be a maximum or a
/// minimum. A sample equal to its left neighbour can't be strict either way.
fn is_extremum(layers: &[ArrayView2<'_, f32>; 3], row: usize, col: usize) -> bool {
    let value = layers[1][[row, col]];
    let diff = value - layers[1][[row, col - 1]];
    if diff == 0.0 {
        return false;
    }
    let sign = if diff > 0.0 { 1.0 } else { -1.0 };
    let value = value * sign;

    for (layer, dog) in layers.iter().enumerate() {
        for r in row - 1..=row + 1 {
            for c in col - 1..=col + 1 {
                if layer == 1 && r == row && c == col {
                    continue;
                }
                // written as `!(<)` so NaN samples never form an extremum
                if !(dog[[r, c]] * sign < value) {
                    return false;
                }
            }
        }
    }
    true
}
