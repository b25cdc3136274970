//! Construction of a complete [`ScaleSpace`] from an input image.

use tracing::{debug, info};

use super::octave::{DogOctaveFactory, OctaveFactory};
use super::ScaleSpace;
use crate::config::ScaleSpaceConfig;
use crate::error::{Error, Result};
use crate::filters::{GaussianFilter, LowPassFilter};
use crate::image::Image;
use crate::pyramid::{DownScaler, LinearUpScaler, Subsampler, UpScaler};

/// Builds scale spaces from pluggable resampling and filtering strategies.
///
/// `ScaleSpaceFactory::default()` uses Lowe's setup: linear up-scaling,
/// Gaussian filtering, difference-of-Gaussian octaves and subsampling.
pub struct ScaleSpaceFactory {
    up_scaler: Box<dyn UpScaler>,
    down_scaler: Box<dyn DownScaler>,
    filter: Box<dyn LowPassFilter>,
    octave_factory: Box<dyn OctaveFactory>,
}

impl Default for ScaleSpaceFactory {
    fn default() -> Self {
        Self {
            up_scaler: Box::new(LinearUpScaler),
            down_scaler: Box::new(Subsampler),
            filter: Box::new(GaussianFilter),
            octave_factory: Box::new(DogOctaveFactory),
        }
    }
}

impl ScaleSpaceFactory {
    pub fn new(
        up_scaler: Box<dyn UpScaler>,
        down_scaler: Box<dyn DownScaler>,
        filter: Box<dyn LowPassFilter>,
        octave_factory: Box<dyn OctaveFactory>,
    ) -> Self {
        Self {
            up_scaler,
            down_scaler,
            filter,
            octave_factory,
        }
    }

    pub fn builder() -> ScaleSpaceFactoryBuilder {
        ScaleSpaceFactoryBuilder::default()
    }

    /// Build the scale space of `image`.
    ///
    /// The image is up-scaled and blurred to `config.initial_sigma` to seed
    /// octave 0. Each further octave is seeded by down-scaling the scale image
    /// at index `scales_per_octave` of its predecessor. Octaves are added
    /// until the seed has no pixels left, down-scaling stops shrinking the
    /// image, or `config.max_octaves` is reached.
    ///
    /// # Returns
    /// `InvalidArgument` if `scales_per_octave` or `max_octaves` is zero, if
    /// `config.initial_sigma` is below `image.sigma()`, or if no octave could
    /// be built. Errors of the strategies are passed through.
    /// `config.original_sigma` is not used, `image` carries its own sigma.
    pub fn create(&self, image: &Image, config: &ScaleSpaceConfig) -> Result<ScaleSpace> {
        config.validate_octaves()?;
        if !(config.initial_sigma >= image.sigma()) {
            return Err(Error::invalid(format!(
                "initial sigma {} is below the image sigma {}",
                config.initial_sigma,
                image.sigma()
            )));
        }

        let s = config.scales_per_octave;
        let upscaled = self.up_scaler.up_scale(image)?;
        let mut seed = self.filter.filter(&upscaled, config.initial_sigma)?;

        let mut octaves = Vec::new();
        while seed.width() > 0 && seed.height() > 0 {
            if config.max_octaves.is_some_and(|max| octaves.len() >= max) {
                break;
            }

            let octave = self
                .octave_factory
                .create(&seed, s, self.filter.as_ref())?;
            debug!(
                octave = octaves.len(),
                width = octave.width(),
                height = octave.height(),
                base_sigma = octave.base_sigma(),
                "built octave"
            );

            let doubled = octave.scale_images().get(s).ok_or_else(|| {
                Error::invalid(format!(
                    "octave has {} scale images, need more than {s}",
                    octave.scale_images().len()
                ))
            })?;
            let next = self.down_scaler.down_scale(doubled)?;
            let stalled = next.width() >= seed.width() && next.height() >= seed.height();

            octaves.push(octave);
            if stalled {
                break;
            }
            seed = next;
        }

        info!(
            octaves = octaves.len(),
            scales_per_octave = s,
            width = image.width(),
            height = image.height(),
            "built scale space"
        );
        ScaleSpace::new(octaves)
    }
}

/// Assembles a [`ScaleSpaceFactory`] from individually supplied strategies.
///
/// Every strategy is required, `build` reports the first missing one.
#[derive(Default)]
pub struct ScaleSpaceFactoryBuilder {
    up_scaler: Option<Box<dyn UpScaler>>,
    down_scaler: Option<Box<dyn DownScaler>>,
    filter: Option<Box<dyn LowPassFilter>>,
    octave_factory: Option<Box<dyn OctaveFactory>>,
}

impl ScaleSpaceFactoryBuilder {
    pub fn up_scaler(mut self, up_scaler: impl UpScaler + 'static) -> Self {
        self.up_scaler = Some(Box::new(up_scaler));
        self
    }

    pub fn down_scaler(mut self, down_scaler: impl DownScaler + 'static) -> Self {
        self.down_scaler = Some(Box::new(down_scaler));
        self
    }

    pub fn filter(mut self, filter: impl LowPassFilter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn octave_factory(mut self, octave_factory: impl OctaveFactory + 'static) -> Self {
        self.octave_factory = Some(Box::new(octave_factory));
        self
    }

    pub fn build(self) -> Result<ScaleSpaceFactory> {
        Ok(ScaleSpaceFactory {
            up_scaler: self.up_scaler.ok_or(Error::MissingInput { what: "up scaler" })?,
            down_scaler: self
                .down_scaler
                .ok_or(Error::MissingInput { what: "down scaler" })?,
            filter: self.filter.ok_or(Error::MissingInput { what: "filter" })?,
            octave_factory: self
                .octave_factory
                .ok_or(Error::MissingInput { what: "octave factory" })?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Mocks only track sizes and metadata, pixels stay zero.

    struct GrowingUpScaler;

    impl UpScaler for GrowingUpScaler {
        fn up_scale(&self, image: &Image) -> Result<Image> {
            Image::with_transform(
                image.height() + 1,
                image.width() + 1,
                image.sigma(),
                image.scale() * 2.0,
                0.0,
                0.0,
            )
        }
    }

    struct ShrinkingDownScaler;

    impl DownScaler for ShrinkingDownScaler {
        fn down_scale(&self, image: &Image) -> Result<Image> {
            Image::with_transform(
                image.height().saturating_sub(1),
                image.width().saturating_sub(1),
                image.sigma(),
                image.scale() / 2.0,
                0.0,
                0.0,
            )
        }
    }

    struct RelabelFilter;

    impl LowPassFilter for RelabelFilter {
        fn filter(&self, image: &Image, sigma: f64) -> Result<Image> {
            Image::with_transform(image.height(), image.width(), sigma, image.scale(), 0.0, 0.0)
        }
    }

    fn mock_factory() -> ScaleSpaceFactory {
        ScaleSpaceFactory::builder()
            .up_scaler(GrowingUpScaler)
            .down_scaler(ShrinkingDownScaler)
            .filter(RelabelFilter)
            .octave_factory(DogOctaveFactory)
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_strategies() {
        let err = ScaleSpaceFactory::builder()
            .down_scaler(Subsampler)
            .filter(GaussianFilter)
            .octave_factory(DogOctaveFactory)
            .build()
            .err()
            .unwrap();
        assert_eq!(err, Error::MissingInput { what: "up scaler" });

        let err = ScaleSpaceFactory::builder()
            .up_scaler(LinearUpScaler)
            .down_scaler(Subsampler)
            .filter(GaussianFilter)
            .build()
            .err()
            .unwrap();
        assert_eq!(err, Error::MissingInput { what: "octave factory" });
    }

    #[test]
    fn test_zero_scales_per_octave() {
        let config = ScaleSpaceConfig::new(0, 0.5, 1.7);
        assert!(matches!(
            mock_factory().create(&Image::new(10, 10), &config),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_initial_sigma_below_image_sigma() {
        let config = ScaleSpaceConfig::new(3, 0.4, 0.49);
        assert!(matches!(
            mock_factory().create(&Image::new(10, 10), &config),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_image_sigma_decides_not_original_sigma() {
        // image sigma 0.3 allows an initial sigma below the configured 0.5
        let image = Image::with_transform(8, 8, 0.3, 1.0, 0.0, 0.0).unwrap();
        let config = ScaleSpaceConfig::new(3, 0.5, 0.4);
        let space = ScaleSpaceFactory::default().create(&image, &config).unwrap();
        assert!((space.octaves()[0].base_sigma() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_small_image() {
        let config = ScaleSpaceConfig::new(1, 0.5, 1.7);
        let space = mock_factory().create(&Image::new(10, 1), &config).unwrap();

        assert_eq!(space.len(), 2);
        assert_eq!(space.octaves()[0].width(), 2);
        assert_eq!(space.octaves()[0].height(), 11);
        assert_eq!(space.octaves()[1].width(), 1);
        assert_eq!(space.octaves()[1].height(), 10);
    }

    #[test]
    fn test_octave_base_sigmas_double() {
        let config = ScaleSpaceConfig::new(1, 0.5, 1.7);
        let space = mock_factory().create(&Image::new(10, 10), &config).unwrap();

        assert!((space.octaves()[0].base_sigma() - 1.7).abs() < 1e-6);
        assert!((space.octaves()[1].base_sigma() - 2.0 * 1.7).abs() < 1e-6);
        assert!((space.octaves()[2].base_sigma() - 4.0 * 1.7).abs() < 1e-6);
    }

    #[test]
    fn test_max_octaves() {
        let config = ScaleSpaceConfig::new(1, 0.5, 1.7).with_max_octaves(3);
        let space = mock_factory().create(&Image::new(10, 10), &config).unwrap();
        assert_eq!(space.len(), 3);
    }

    #[test]
    fn test_stops_when_subsampling_stalls() {
        let config = ScaleSpaceConfig::default();
        let space = ScaleSpaceFactory::default()
            .create(&Image::new(3, 3), &config)
            .unwrap();

        // 5x5 -> 3x3 -> 2x2 -> 1x1
        let sizes: Vec<_> = space.octaves().iter().map(|o| (o.height(), o.width())).collect();
        assert_eq!(sizes, vec![(5, 5), (3, 3), (2, 2), (1, 1)]);
    }

    #[test]
    fn test_empty_image() {
        let config = ScaleSpaceConfig::default();
        assert!(ScaleSpaceFactory::default()
            .create(&Image::new(0, 4), &config)
            .is_err());
    }

    #[test]
    fn test_lowe_transforms() {
        let config = ScaleSpaceConfig::default();
        let space = ScaleSpaceFactory::default()
            .create(&Image::new(16, 16), &config)
            .unwrap();

        let mut scale = 2.0;
        for octave in space.octaves() {
            assert_eq!(octave.scales_per_octave(), 3);
            for image in octave.scale_images() {
                assert_eq!(image.scale(), scale);
                assert_eq!(image.offset_x(), 0.0);
            }
            scale /= 2.0;
        }
    }
}
