//! Color histogram model
//!
//! This module builds normalized RGB color distributions from image regions,
//! measures the distance between them and groups them into per-class
//! reference sets.

pub mod distribution;
pub mod reference;
pub mod sampler;

pub use distribution::{bin_index, ColorDistribution, ColorHistogram};
pub use reference::ReferenceSet;
pub use sampler::{sample, sample_region};
