//! Gaussian scale space: a stack of octaves of halving resolution.
//!
//! ## Layout
//!
//! Octave 0 lives on the doubled input image. Every further octave is seeded
//! from the scale image of its predecessor whose sigma is twice the base
//! sigma, subsampled by two. Within an octave, `s + 3` scale images and
//! `s + 2` difference-of-Gaussian images are kept.

pub mod factory;
pub mod octave;

use crate::error::{Error, Result};

pub use factory::{ScaleSpaceFactory, ScaleSpaceFactoryBuilder};
pub use octave::{DogOctaveFactory, Octave, OctaveFactory};

/// Ordered octaves, finest resolution first.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSpace {
    octaves: Vec<Octave>,
}

impl ScaleSpace {
    /// Wrap a non-empty list of octaves.
    pub fn new(octaves: Vec<Octave>) -> Result<Self> {
        if octaves.is_empty() {
            return Err(Error::invalid("a scale space needs at least one octave"));
        }
        Ok(Self { octaves })
    }

    pub fn octaves(&self) -> &[Octave] {
        &self.octaves
    }

    /// Octave at `index`, 0 being the finest.
    pub fn octave(&self, index: usize) -> Result<&Octave> {
        self.octaves.get(index).ok_or(Error::OctaveOutOfRange {
            index,
            count: self.octaves.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.octaves.len()
    }

    /// Always false, a scale space holds at least one octave.
    pub fn is_empty(&self) -> bool {
        self.octaves.is_empty()
    }

    pub fn into_octaves(self) -> Vec<Octave> {
        self.octaves
    }
}
