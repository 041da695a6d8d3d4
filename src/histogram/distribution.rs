//! Quantized 3D color histograms and their distance metric
//!
//! A [`ColorHistogram`] accumulates raw pixel counts into 8x8x8 RGB bins.
//! Calling [`ColorHistogram::finished`] consumes it and yields a normalized
//! [`ColorDistribution`], whose cells hold the proportion of samples per bin.
//! Only finished distributions can be compared, so a distribution is
//! normalized exactly once and never mutated afterwards.

use image::Rgb;

use crate::constants::histogram::{BINS_PER_CHANNEL, BIN_WIDTH, CELL_COUNT};
use crate::{Result, SegmentationError};

/// Bin coordinates `(r, g, b)` of a pixel, each in `0..8`
pub fn bin_index(color: Rgb<u8>) -> (usize, usize, usize) {
    let [r, g, b] = color.0;
    (
        (r / BIN_WIDTH) as usize,
        (g / BIN_WIDTH) as usize,
        (b / BIN_WIDTH) as usize,
    )
}

#[inline]
fn flat_index(i: usize, j: usize, k: usize) -> usize {
    (i * BINS_PER_CHANNEL + j) * BINS_PER_CHANNEL + k
}

/// Raw color counts being accumulated over a region
///
/// Counts are integers until [`ColorHistogram::finished`], so large regions
/// never lose increments to floating-point rounding.
#[derive(Debug, Clone)]
pub struct ColorHistogram {
    data: [u64; CELL_COUNT],
    samples: u64,
}

impl Default for ColorHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorHistogram {
    /// Create an empty histogram
    pub fn new() -> Self {
        let mut histogram = Self {
            data: [0; CELL_COUNT],
            samples: 0,
        };
        histogram.reset();
        histogram
    }

    /// Zero every cell and the sample count
    pub fn reset(&mut self) {
        self.data.fill(0);
        self.samples = 0;
    }

    /// Count one pixel in its bin
    pub fn add(&mut self, color: Rgb<u8>) {
        let (i, j, k) = bin_index(color);
        self.data[flat_index(i, j, k)] += 1;
        self.samples += 1;
    }

    /// Number of pixels added since the last reset
    pub fn sample_count(&self) -> u64 {
        self.samples
    }

    /// Raw count of a bin
    pub fn bin(&self, i: usize, j: usize, k: usize) -> u64 {
        self.data[flat_index(i, j, k)]
    }

    /// Normalize the counts into proportions.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentationError::EmptyHistogram`] if no sample was added;
    /// normalizing would otherwise divide every cell by zero.
    pub fn finished(self) -> Result<ColorDistribution> {
        if self.samples == 0 {
            return Err(SegmentationError::EmptyHistogram);
        }

        let total = self.samples as f64;
        let mut data = [0.0f32; CELL_COUNT];
        for (cell, &count) in data.iter_mut().zip(self.data.iter()) {
            *cell = (count as f64 / total) as f32;
        }

        Ok(ColorDistribution {
            data,
            samples: self.samples,
        })
    }
}

impl Extend<Rgb<u8>> for ColorHistogram {
    fn extend<T: IntoIterator<Item = Rgb<u8>>>(&mut self, iter: T) {
        for color in iter {
            self.add(color);
        }
    }
}

/// Normalized color distribution: every cell is the share of samples in that
/// bin and all cells sum to 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct ColorDistribution {
    data: [f32; CELL_COUNT],
    samples: u64,
}

impl ColorDistribution {
    /// Proportion of samples in a bin
    pub fn bin(&self, i: usize, j: usize, k: usize) -> f32 {
        self.data[flat_index(i, j, k)]
    }

    /// Number of pixels the distribution was built from
    pub fn sample_count(&self) -> u64 {
        self.samples
    }

    /// All 512 cells, indexed `(r * 8 + g) * 8 + b`
    pub fn cells(&self) -> &[f32; CELL_COUNT] {
        &self.data
    }

    /// Symmetric chi-square distance to another distribution.
    ///
    /// Sums `(a - b)^2 / (a + b)` over all cell pairs, skipping pairs where
    /// both cells are empty. Zero for identical distributions, at most 2.0
    /// for distributions with disjoint support.
    pub fn distance(&self, other: &ColorDistribution) -> f32 {
        self.data
            .iter()
            .zip(other.data.iter())
            .fold(0.0f32, |acc, (&a, &b)| {
                let denominator = a + b;
                if denominator == 0.0 {
                    acc
                } else {
                    let diff = a - b;
                    acc + diff * diff / denominator
                }
            })
    }
}
