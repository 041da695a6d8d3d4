//! Block-wise segmentation of a frame into background and object
//!
//! The frame is tiled with square blocks starting at (0, 0). Blocks at the
//! right and bottom edges are clipped to the frame rather than dropped, so
//! every pixel of the output belongs to exactly one block. Each block row is
//! sampled and classified on the rayon pool and painted into its own band of
//! the output.

use image::{imageops, Rgb, RgbImage};
use rayon::prelude::*;
use tracing::{debug, warn};

use super::classifier::{classify, Label};
use crate::config::SegmenterConfig;
use crate::constants::blocks::SEGMENT_BLOCK_SIZE;
use crate::histogram::{sample_region, ReferenceSet};
use crate::region::Region;
use crate::{Result, SegmentationError};

/// Per-block labels of one segmentation pass, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGrid {
    columns: u32,
    rows: u32,
    block_size: u32,
    labels: Vec<Label>,
}

impl LabelGrid {
    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Label of the block at `(column, row)`
    pub fn get(&self, column: u32, row: u32) -> Option<Label> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.labels
            .get((row * self.columns + column) as usize)
            .copied()
    }

    /// Number of blocks carrying `label`
    pub fn count(&self, label: Label) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in row-major order
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }
}

/// Segments frames with a fixed block size and label colors
#[derive(Debug, Clone)]
pub struct Segmenter {
    block_size: u32,
    background_color: Rgb<u8>,
    object_color: Rgb<u8>,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            block_size: SEGMENT_BLOCK_SIZE,
            background_color: Rgb([0, 0, 0]),
            object_color: Rgb([255, 0, 0]),
        }
    }
}

impl Segmenter {
    /// Create a segmenter with default colors (black background, red object)
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `block_size` is zero.
    pub fn new(block_size: u32) -> Result<Self> {
        Self::with_colors(block_size, Rgb([0, 0, 0]), Rgb([255, 0, 0]))
    }

    /// Create a segmenter with custom label colors
    pub fn with_colors(
        block_size: u32,
        background_color: Rgb<u8>,
        object_color: Rgb<u8>,
    ) -> Result<Self> {
        if block_size == 0 {
            return Err(SegmentationError::invalid("block_size", block_size));
        }
        Ok(Self {
            block_size,
            background_color,
            object_color,
        })
    }

    /// Create a segmenter from the block size and colors of a configuration
    pub fn from_config(config: &SegmenterConfig) -> Result<Self> {
        Self::with_colors(
            config.block_size,
            config.colors.rgb(Label::Background)?,
            config.colors.rgb(Label::Object)?,
        )
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Color painted over blocks with `label`
    pub fn color(&self, label: Label) -> Rgb<u8> {
        match label {
            Label::Background => self.background_color,
            Label::Object => self.object_color,
        }
    }

    /// Classify every block of `image` without painting.
    pub fn label_blocks(
        &self,
        image: &RgbImage,
        background: &ReferenceSet,
        object: &ReferenceSet,
    ) -> Result<LabelGrid> {
        let (width, height) = image.dimensions();
        let size = self.block_size;
        let columns = width.div_ceil(size);
        let rows = height.div_ceil(size);

        if background.is_empty() || object.is_empty() {
            warn!(
                background = background.len(),
                object = object.len(),
                "Segmenting with an empty reference set; ties resolve to background"
            );
        }

        let label_rows = (0..rows)
            .into_par_iter()
            .map(|row| {
                (0..columns)
                    .map(|column| {
                        let block = Region::new(column * size, row * size, size, size);
                        let distribution = sample_region(image, &block)?;
                        Ok(classify(&distribution, background, object))
                    })
                    .collect::<Result<Vec<Label>>>()
            })
            .collect::<Result<Vec<Vec<Label>>>>()?;

        let grid = LabelGrid {
            columns,
            rows,
            block_size: size,
            labels: label_rows.into_iter().flatten().collect(),
        };

        debug!(
            width,
            height,
            blocks = grid.len(),
            objects = grid.count(Label::Object),
            "Classified frame blocks"
        );

        Ok(grid)
    }

    /// Paint a label grid into an image of the given size
    pub fn paint(&self, grid: &LabelGrid, width: u32, height: u32) -> Result<RgbImage> {
        let size = grid.block_size as usize;
        if grid.columns != width.div_ceil(grid.block_size)
            || grid.rows != height.div_ceil(grid.block_size)
        {
            return Err(SegmentationError::invalid(
                "label_grid",
                format!("{}x{} blocks for a {}x{} image", grid.columns, grid.rows, width, height),
            ));
        }

        let mut output = RgbImage::new(width, height);
        let row_bytes = width as usize * 3;
        if row_bytes == 0 || height == 0 {
            return Ok(output);
        }

        // One band of `block_size` pixel rows per block row
        output
            .par_chunks_mut(row_bytes * size)
            .zip(grid.labels.par_chunks(grid.columns as usize))
            .for_each(|(band, labels)| {
                for line in band.chunks_mut(row_bytes) {
                    for (x, pixel) in line.chunks_exact_mut(3).enumerate() {
                        let color = self.color(labels[x / size]);
                        pixel.copy_from_slice(&color.0);
                    }
                }
            });

        Ok(output)
    }

    /// Segment `image` into a label overlay of the same size.
    ///
    /// The input is not modified; every pixel of the returned image is painted
    /// with the color of its block's label.
    pub fn segment(
        &self,
        image: &RgbImage,
        background: &ReferenceSet,
        object: &ReferenceSet,
    ) -> Result<RgbImage> {
        let grid = self.label_blocks(image, background, object)?;
        self.paint(&grid, image.width(), image.height())
    }
}

/// Segment `image` with `block_size` blocks and the default label colors.
pub fn segment(
    image: &RgbImage,
    background: &ReferenceSet,
    object: &ReferenceSet,
    block_size: u32,
) -> Result<RgbImage> {
    Segmenter::new(block_size)?.segment(image, background, object)
}

/// Blend a label overlay over the grayscale version of `frame`.
///
/// Each output channel is `alpha * overlay + (1 - alpha) * gray`.
///
/// # Errors
///
/// Returns `InvalidParameter` if the images differ in size or `alpha` is not
/// in `0.0..=1.0`.
pub fn blend_overlay(frame: &RgbImage, overlay: &RgbImage, alpha: f32) -> Result<RgbImage> {
    if frame.dimensions() != overlay.dimensions() {
        return Err(SegmentationError::invalid(
            "overlay",
            format!(
                "{}x{} overlay for a {}x{} frame",
                overlay.width(),
                overlay.height(),
                frame.width(),
                frame.height()
            ),
        ));
    }
    if !(0.0..=1.0).contains(&alpha) {
        return Err(SegmentationError::invalid("alpha", alpha));
    }

    let gray = imageops::grayscale(frame);
    let blended = RgbImage::from_fn(frame.width(), frame.height(), |x, y| {
        let g = gray.get_pixel(x, y).0[0] as f32;
        let o = overlay.get_pixel(x, y).0;
        Rgb(o.map(|channel| {
            (alpha * channel as f32 + (1.0 - alpha) * g)
                .round()
                .clamp(0.0, 255.0) as u8
        }))
    });

    Ok(blended)
}
