//! Block classification and frame segmentation
//!
//! This module labels blocks against background/object reference sets and
//! composes the labels into an overlay image.

pub mod classifier;
pub mod segmenter;

pub use classifier::{classify, classify_detailed, Classification, Label};
pub use segmenter::{blend_overlay, segment, LabelGrid, Segmenter};
