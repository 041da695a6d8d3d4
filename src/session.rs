//! Segmentation sessions and the commands that drive them
//!
//! A [`Session`] owns the background and object reference sets of one
//! capture workflow. Hosts feed it [`Command`]s, typically from a
//! [`CommandQueue`] filled by user input, together with the frame the
//! command applies to:
//!
//! - capturing the background replaces the whole background set with a grid
//!   of large blocks sampled over the frame
//! - capturing an object appends one reference sampled from a small region
//! - recognition mode makes [`Session::render`] return the blended overlay
//!
//! Sessions share nothing, so several can run side by side.

use std::collections::VecDeque;

use image::RgbImage;
use tracing::{debug, info};

use crate::config::SegmenterConfig;
use crate::histogram::{sample_region, ReferenceSet};
use crate::region::{full_block_grid, Region};
use crate::segmentation::{blend_overlay, LabelGrid, Segmenter};
use crate::{Result, SegmentationError};

/// Escape key, quits like `q`
const ESCAPE: char = '\u{1b}';

/// Action requested by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the background references, from the given regions or from the
    /// full-block grid over the frame
    CaptureBackground { regions: Option<Vec<Region>> },
    /// Append one object reference, from the given region or from the
    /// centered capture square
    CaptureObject { region: Option<Region> },
    /// Distance between the left and right halves of the frame
    CompareHalves,
    /// Distance between two regions of the frame
    Compare { a: Region, b: Region },
    ToggleRecognition,
    ToggleFreeze,
    Quit,
}

impl Command {
    /// Map a key press to its command
    ///
    /// `b` background, `a` object, `v` compare halves, `r` recognition,
    /// `f` freeze, `q` or Escape quit.
    pub fn from_key(key: char) -> Option<Command> {
        match key {
            'b' => Some(Command::CaptureBackground { regions: None }),
            'a' => Some(Command::CaptureObject { region: None }),
            'v' => Some(Command::CompareHalves),
            'r' => Some(Command::ToggleRecognition),
            'f' => Some(Command::ToggleFreeze),
            'q' | ESCAPE => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Result of dispatching one command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Background set rebuilt with this many references
    BackgroundCaptured { references: usize },
    /// Object set now holds this many references
    ObjectCaptured { references: usize },
    Distance(f32),
    RecognitionToggled(bool),
    FreezeToggled(bool),
    Quit,
}

/// FIFO of pending commands
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the commands of a key sequence, skipping unmapped keys
    pub fn from_keys(keys: &str) -> Self {
        keys.chars().filter_map(Command::from_key).collect()
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    pub fn pop(&mut self) -> Option<Command> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FromIterator<Command> for CommandQueue {
    fn from_iter<T: IntoIterator<Item = Command>>(iter: T) -> Self {
        Self {
            pending: iter.into_iter().collect(),
        }
    }
}

impl Extend<Command> for CommandQueue {
    fn extend<T: IntoIterator<Item = Command>>(&mut self, iter: T) {
        self.pending.extend(iter);
    }
}

/// Reference sets and display state of one segmentation workflow
#[derive(Debug, Clone)]
pub struct Session {
    config: SegmenterConfig,
    segmenter: Segmenter,
    background: ReferenceSet,
    object: ReferenceSet,
    recognition: bool,
    frozen: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            config: SegmenterConfig::default(),
            segmenter: Segmenter::default(),
            background: ReferenceSet::new(),
            object: ReferenceSet::new(),
            recognition: false,
            frozen: false,
        }
    }
}

impl Session {
    /// Create a session from a validated configuration
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        config.validate()?;
        let segmenter = Segmenter::from_config(&config)?;
        Ok(Self {
            config,
            segmenter,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    pub fn background(&self) -> &ReferenceSet {
        &self.background
    }

    pub fn object(&self) -> &ReferenceSet {
        &self.object
    }

    pub fn is_recognizing(&self) -> bool {
        self.recognition
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Rebuild the background set from the full-block grid over `frame`.
    ///
    /// Only blocks of `background_block_size` lying entirely inside the frame
    /// are sampled. Earlier background references are discarded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the frame is smaller than one block; the
    /// previous background set is kept in that case.
    pub fn capture_background(&mut self, frame: &RgbImage) -> Result<usize> {
        let size = self.config.background_block_size;
        let grid: Vec<Region> = full_block_grid(frame.width(), frame.height(), size).collect();
        if grid.is_empty() {
            return Err(SegmentationError::invalid(
                "frame",
                format!(
                    "{}x{} is smaller than one {}px background block",
                    frame.width(),
                    frame.height(),
                    size
                ),
            ));
        }
        self.capture_background_regions(frame, &grid)
    }

    /// Rebuild the background set from explicit regions of `frame`.
    ///
    /// All regions are sampled before the set is replaced, so a failing region
    /// leaves the previous background untouched.
    pub fn capture_background_regions(
        &mut self,
        frame: &RgbImage,
        regions: &[Region],
    ) -> Result<usize> {
        if regions.is_empty() {
            return Err(SegmentationError::invalid("regions", "[]"));
        }
        let captured = regions
            .iter()
            .map(|region| sample_region(frame, region))
            .collect::<Result<ReferenceSet>>()?;

        self.background = captured;
        info!(references = self.background.len(), "Captured background");
        Ok(self.background.len())
    }

    /// Append one object reference sampled from `region`, or from the
    /// centered capture square when `None`.
    pub fn capture_object(&mut self, frame: &RgbImage, region: Option<Region>) -> Result<usize> {
        let region = region.unwrap_or_else(|| {
            Region::centered(frame.width(), frame.height(), self.config.object_region_size)
        });
        let distribution = sample_region(frame, &region)?;

        self.object.append(distribution);
        info!(references = self.object.len(), %region, "Captured object");
        Ok(self.object.len())
    }

    /// Drop every object reference
    pub fn clear_objects(&mut self) {
        self.object.clear();
    }

    /// Distance between the color distributions of two regions of `frame`
    pub fn compare(&self, frame: &RgbImage, a: &Region, b: &Region) -> Result<f32> {
        crate::region_distance(frame, a, b)
    }

    /// Distance between the left and right halves of `frame`
    pub fn compare_halves(&self, frame: &RgbImage) -> Result<f32> {
        let (width, height) = frame.dimensions();
        self.compare(
            frame,
            &Region::left_half(width, height),
            &Region::right_half(width, height),
        )
    }

    /// Per-block labels of `frame` against the session's references
    pub fn label_blocks(&self, frame: &RgbImage) -> Result<LabelGrid> {
        self.segmenter
            .label_blocks(frame, &self.background, &self.object)
    }

    /// Label overlay of `frame` against the session's references
    pub fn segment(&self, frame: &RgbImage) -> Result<RgbImage> {
        self.segmenter.segment(frame, &self.background, &self.object)
    }

    /// Image to display for `frame`: the overlay blended over the grayscale
    /// frame in recognition mode, the frame itself otherwise
    pub fn render(&self, frame: &RgbImage) -> Result<RgbImage> {
        if !self.recognition {
            return Ok(frame.clone());
        }
        let overlay = self.segment(frame)?;
        blend_overlay(frame, &overlay, self.config.overlay_alpha)
    }

    /// Apply one command to `frame`
    pub fn dispatch(&mut self, frame: &RgbImage, command: Command) -> Result<Outcome> {
        debug!(?command, "Dispatching command");
        let outcome = match command {
            Command::CaptureBackground { regions: None } => Outcome::BackgroundCaptured {
                references: self.capture_background(frame)?,
            },
            Command::CaptureBackground {
                regions: Some(regions),
            } => Outcome::BackgroundCaptured {
                references: self.capture_background_regions(frame, &regions)?,
            },
            Command::CaptureObject { region } => Outcome::ObjectCaptured {
                references: self.capture_object(frame, region)?,
            },
            Command::CompareHalves => Outcome::Distance(self.compare_halves(frame)?),
            Command::Compare { a, b } => Outcome::Distance(self.compare(frame, &a, &b)?),
            Command::ToggleRecognition => {
                self.recognition = !self.recognition;
                info!(enabled = self.recognition, "Recognition mode");
                Outcome::RecognitionToggled(self.recognition)
            }
            Command::ToggleFreeze => {
                self.frozen = !self.frozen;
                Outcome::FreezeToggled(self.frozen)
            }
            Command::Quit => Outcome::Quit,
        };
        Ok(outcome)
    }

    /// Dispatch queued commands in order against `frame`.
    ///
    /// Stops after a `Quit`, leaving later commands queued. On error the
    /// failing command is consumed and the rest stay queued.
    pub fn drain(&mut self, frame: &RgbImage, queue: &mut CommandQueue) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::with_capacity(queue.len());
        while let Some(command) = queue.pop() {
            let outcome = self.dispatch(frame, command)?;
            let quit = outcome == Outcome::Quit;
            outcomes.push(outcome);
            if quit {
                break;
            }
        }
        Ok(outcomes)
    }
}
