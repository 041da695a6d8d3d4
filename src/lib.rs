//! # colorseg
//!
//! Foreground/background segmentation of video frames by color-histogram
//! similarity.
//!
//! A frame is tiled into fixed-size blocks. Each block's color distribution
//! (an 8x8x8 RGB histogram, normalized to proportions) is compared with the
//! distributions captured for the background and for the object, and the
//! block takes the label of the closer class:
//! - [`histogram`] builds distributions and measures the distance between them
//! - [`segmentation`] classifies blocks and paints the label overlay
//! - [`session`] owns the reference sets and the capture commands
//!
//! ## Example
//!
//! ```rust,no_run
//! use colorseg::{image_io::load_frame, Command, Session};
//! use std::path::Path;
//!
//! let mut session = Session::default();
//! let empty_scene = load_frame(Path::new("scene.png"))?;
//! let with_object = load_frame(Path::new("object.png"))?;
//!
//! session.dispatch(&empty_scene, Command::CaptureBackground { regions: None })?;
//! session.dispatch(&with_object, Command::CaptureObject { region: None })?;
//! let overlay = session.segment(&with_object)?;
//! println!("Overlay: {}x{}", overlay.width(), overlay.height());
//! # Ok::<(), colorseg::SegmentationError>(())
//! ```

use image::RgbImage;

pub mod config;
pub mod constants;
pub mod error;
pub mod histogram;
pub mod image_io;
pub mod region;
pub mod segmentation;
pub mod session;

pub use config::{OverlayColors, SegmenterConfig};
pub use error::{Result, SegmentationError};
pub use histogram::{ColorDistribution, ColorHistogram, ReferenceSet};
pub use region::Region;
pub use segmentation::{segment, Label, LabelGrid, Segmenter};
pub use session::{Command, CommandQueue, Outcome, Session};

/// Distance between the color distributions of two regions of an image
///
/// Both regions are clipped to the image bounds before sampling.
///
/// # Errors
///
/// Returns `EmptyRegion` if either region lies entirely outside the image.
pub fn region_distance(image: &RgbImage, a: &Region, b: &Region) -> Result<f32> {
    let first = histogram::sample_region(image, a)?;
    let second = histogram::sample_region(image, b)?;
    Ok(first.distance(&second))
}
