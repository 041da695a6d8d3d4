//! Rectangular pixel regions and block grids
//!
//! A [`Region`] is a half-open rectangle: `x..x + width` by `y..y + height`.
//! Regions may extend past the image; [`Region::clip`] intersects them with
//! the image bounds before any pixel is read.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SegmentationError;

/// Half-open pixel rectangle with top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a region from a top-left corner and an exclusive bottom-right corner.
    ///
    /// Inverted corners produce an empty region.
    pub fn from_corners(top_left: (u32, u32), bottom_right: (u32, u32)) -> Self {
        Self {
            x: top_left.0,
            y: top_left.1,
            width: bottom_right.0.saturating_sub(top_left.0),
            height: bottom_right.1.saturating_sub(top_left.1),
        }
    }

    /// Square of side `size` centered in a `width` x `height` frame
    pub fn centered(width: u32, height: u32, size: u32) -> Self {
        Self {
            x: (width / 2).saturating_sub(size / 2),
            y: (height / 2).saturating_sub(size / 2),
            width: size,
            height: size,
        }
    }

    /// Left half of a frame
    pub fn left_half(width: u32, height: u32) -> Self {
        Self::new(0, 0, width / 2, height)
    }

    /// Right half of a frame (includes the middle column for odd widths)
    pub fn right_half(width: u32, height: u32) -> Self {
        Self::new(width / 2, 0, width - width / 2, height)
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersect with an image of the given size.
    ///
    /// Returns `None` if no pixel of the region lies inside the image.
    pub fn clip(&self, width: u32, height: u32) -> Option<Region> {
        let right = self.right().min(width);
        let bottom = self.bottom().min(height);
        if self.x >= right || self.y >= bottom {
            return None;
        }
        Some(Region::from_corners((self.x, self.y), (right, bottom)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}x{}", self.x, self.y, self.width, self.height)
    }
}

/// Parses `X,Y,W,H`
impl FromStr for Region {
    type Err = SegmentationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(SegmentationError::invalid("region", s));
        }
        let mut values = [0u32; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse()
                .map_err(|_| SegmentationError::invalid("region", s))?;
        }
        Ok(Region::new(values[0], values[1], values[2], values[3]))
    }
}

/// Origins of blocks tiling a frame at stride `block_size`, row-major.
///
/// Every origin inside the frame is produced, so the last block of a row or
/// column may extend past the frame edge. A zero `block_size` yields no
/// blocks.
pub fn block_grid(width: u32, height: u32, block_size: u32) -> impl Iterator<Item = Region> {
    let rows = if block_size == 0 { 0 } else { height };
    let step = block_size.max(1) as usize;
    (0..rows).step_by(step).flat_map(move |y| {
        (0..width)
            .step_by(step)
            .map(move |x| Region::new(x, y, block_size, block_size))
    })
}

/// Blocks of `block_size` that fit entirely inside the frame, row-major.
///
/// Remainders at the right and bottom edges are dropped.
pub fn full_block_grid(width: u32, height: u32, block_size: u32) -> impl Iterator<Item = Region> {
    block_grid(width, height, block_size)
        .filter(move |block| block.right() <= width && block.bottom() <= height)
}
