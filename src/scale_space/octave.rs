//! One octave of the Gaussian scale space and the factory that builds it.

use tracing::trace;

use crate::error::{Error, Result};
use crate::filters::LowPassFilter;
use crate::image::Image;

/// Scale images built beyond `scales_per_octave + 1`, so that extrema can be
/// searched over the full octave.
pub const EXTRA_SCALE_IMAGES: usize = 2;

/// Progressively blurred images of one resolution plus their differences.
///
/// Holds `s + 3` scale images and `s + 2` difference-of-Gaussian images, all
/// of the same size, where `s` is the number of scales per octave.
#[derive(Debug, Clone, PartialEq)]
pub struct Octave {
    scale_images: Vec<Image>,
    dogs: Vec<Image>,
}

impl Octave {
    /// Assemble an octave from precomputed images.
    ///
    /// # Arguments
    /// * `scale_images` - At least four images of increasing blur
    /// * `dogs` - Exactly one image fewer than `scale_images`
    ///
    /// # Returns
    /// `InvalidArgument` if the counts or any image size are inconsistent
    pub fn new(scale_images: Vec<Image>, dogs: Vec<Image>) -> Result<Self> {
        if scale_images.len() < 4 {
            return Err(Error::invalid(format!(
                "an octave needs at least 4 scale images, got {}",
                scale_images.len()
            )));
        }
        if dogs.len() + 1 != scale_images.len() {
            return Err(Error::invalid(format!(
                "an octave with {} scale images needs {} difference-of-Gaussian images, got {}",
                scale_images.len(),
                scale_images.len() - 1,
                dogs.len()
            )));
        }

        let (height, width) = (scale_images[0].height(), scale_images[0].width());
        if let Some(image) = scale_images
            .iter()
            .chain(dogs.iter())
            .find(|image| image.height() != height || image.width() != width)
        {
            return Err(Error::invalid(format!(
                "all octave images must be {}x{}, found {}x{}",
                height,
                width,
                image.height(),
                image.width()
            )));
        }

        Ok(Self { scale_images, dogs })
    }

    pub fn scales_per_octave(&self) -> usize {
        self.scale_images.len() - 1 - EXTRA_SCALE_IMAGES
    }

    pub fn scale_images(&self) -> &[Image] {
        &self.scale_images
    }

    pub fn differences_of_gaussians(&self) -> &[Image] {
        &self.dogs
    }

    pub fn height(&self) -> usize {
        self.scale_images[0].height()
    }

    pub fn width(&self) -> usize {
        self.scale_images[0].width()
    }

    /// Sigma of the octave's first scale image.
    pub fn base_sigma(&self) -> f64 {
        self.scale_images[0].sigma()
    }
}

/// Builds an [`Octave`] from its seed image.
pub trait OctaveFactory: Send + Sync {
    /// # Arguments
    /// * `seed` - First scale image of the octave, already blurred to the
    ///   octave's base sigma
    /// * `scales_per_octave` - Number of steps that double sigma, at least 1
    /// * `filter` - Filter used to blur the further scale images
    fn create(
        &self,
        seed: &Image,
        scales_per_octave: usize,
        filter: &dyn LowPassFilter,
    ) -> Result<Octave>;
}

/// Blurs the seed in geometric sigma steps and subtracts neighbours.
///
/// Scale image `i` has sigma `seed.sigma * 2^(i / s)` and is filtered from
/// scale image `i - 1`. Difference image `i` is scale image `i + 1` minus
/// scale image `i`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DogOctaveFactory;

impl OctaveFactory for DogOctaveFactory {
    fn create(
        &self,
        seed: &Image,
        scales_per_octave: usize,
        filter: &dyn LowPassFilter,
    ) -> Result<Octave> {
        if scales_per_octave < 1 {
            return Err(Error::invalid("need at least one scale per octave"));
        }

        let count = scales_per_octave + 1 + EXTRA_SCALE_IMAGES;
        let base_sigma = seed.sigma();

        let mut scale_images = Vec::with_capacity(count);
        let mut current = seed.clone();
        for i in 1..count {
            let sigma = base_sigma * 2f64.powf(i as f64 / scales_per_octave as f64);
            trace!(level = i, sigma, "scale image");
            let next = filter.filter(&current, sigma)?;
            scale_images.push(std::mem::replace(&mut current, next));
        }
        scale_images.push(current);

        let dogs = scale_images
            .windows(2)
            .map(|pair| pair[1].subtract(&pair[0]))
            .collect::<Result<Vec<_>>>()?;

        Octave::new(scale_images, dogs)
    }
}
