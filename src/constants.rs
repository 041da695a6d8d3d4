//! Histogram layout and default segmentation parameters
//!
//! This module contains compile-time constants for the color histogram and
//! the defaults used by the session and segmenter.

/// Color histogram layout
pub mod histogram {
    /// Number of bins per color channel
    pub const BINS_PER_CHANNEL: usize = 8;

    /// Width of a bin in 8-bit channel values (256 / 8)
    pub const BIN_WIDTH: u8 = 32;

    /// Total number of cells in the 3D histogram
    pub const CELL_COUNT: usize = BINS_PER_CHANNEL * BINS_PER_CHANNEL * BINS_PER_CHANNEL;
}

/// Block sizes and capture regions
pub mod blocks {
    /// Side of a classified block during segmentation
    pub const SEGMENT_BLOCK_SIZE: u32 = 8;

    /// Side of a block sampled when capturing background references
    pub const BACKGROUND_BLOCK_SIZE: u32 = 128;

    /// Side of the centered square sampled when capturing an object reference
    pub const OBJECT_REGION_SIZE: u32 = 50;
}

/// Overlay rendering
pub mod overlay {
    /// Weight of the label overlay when blended over the grayscale frame
    pub const BLEND_ALPHA: f32 = 0.5;

    /// Color painted over background blocks
    pub const BACKGROUND_COLOR: &str = "#000000";

    /// Color painted over object blocks
    pub const OBJECT_COLOR: &str = "#FF0000";
}

/// Capture frame size of the live camera loop, used for synthetic frames
pub mod frame {
    pub const WIDTH: u32 = 640;
    pub const HEIGHT: u32 = 480;
}
