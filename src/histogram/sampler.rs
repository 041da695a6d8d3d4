//! Building color distributions from image regions

use image::RgbImage;

use super::distribution::{ColorDistribution, ColorHistogram};
use crate::region::Region;
use crate::{Result, SegmentationError};

/// Sample the pixels with `top_left.y <= y < bottom_right.y` and
/// `top_left.x <= x < bottom_right.x` into a finished distribution.
///
/// The rectangle is clipped to the image bounds first, so partial edge blocks
/// only count the pixels that exist.
///
/// # Errors
///
/// Returns [`SegmentationError::EmptyRegion`] if no pixel of the rectangle
/// lies inside the image.
pub fn sample(
    image: &RgbImage,
    top_left: (u32, u32),
    bottom_right: (u32, u32),
) -> Result<ColorDistribution> {
    sample_region(image, &Region::from_corners(top_left, bottom_right))
}

/// Sample a [`Region`] into a finished distribution, clipping it to the image.
pub fn sample_region(image: &RgbImage, region: &Region) -> Result<ColorDistribution> {
    let clipped = region
        .clip(image.width(), image.height())
        .ok_or(SegmentationError::EmptyRegion { region: *region })?;

    let mut histogram = ColorHistogram::new();
    for y in clipped.y..clipped.bottom() {
        for x in clipped.x..clipped.right() {
            histogram.add(*image.get_pixel(x, y));
        }
    }

    histogram.finished()
}
