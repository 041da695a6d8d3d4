//! Error types for the colorseg library

use thiserror::Error;

use crate::region::Region;

/// Result type alias for colorseg operations
pub type Result<T> = std::result::Result<T, SegmentationError>;

/// Error types for sampling, segmentation and session operations
#[derive(Error, Debug)]
pub enum SegmentationError {
    /// A region clipped to the image bounds contained no pixels
    #[error("Region {region} contains no pixels")]
    EmptyRegion { region: Region },

    /// A histogram was finalized without a single sample
    #[error("Cannot normalize a color histogram with no samples")]
    EmptyHistogram,

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Image could not be encoded or written
    #[error("Failed to save image: {message}")]
    ImageSaveError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration could not be read, parsed or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SegmentationError {
    /// Create an invalid parameter error
    pub fn invalid(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an image save error with context
    pub fn image_save<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageSaveError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Check if this error indicates a recoverable condition
    ///
    /// Sampling and parameter errors only affect the current call; the session
    /// and its reference sets are left untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SegmentationError::EmptyRegion { .. }
                | SegmentationError::EmptyHistogram
                | SegmentationError::InvalidParameter { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            SegmentationError::EmptyRegion { region } => format!(
                "The selected region {} does not overlap the image. Pick a region inside the frame.",
                region
            ),
            SegmentationError::EmptyHistogram => {
                "No pixels were sampled, so no color distribution could be built.".to_string()
            }
            SegmentationError::InvalidParameter { parameter, .. } => {
                format!("The value given for '{}' is not valid.", parameter)
            }
            SegmentationError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            SegmentationError::ImageSaveError { .. } => {
                "Could not write the output image. Please check the output path.".to_string()
            }
            SegmentationError::ConfigError { .. } => {
                "Could not use the configuration file. Please check its contents.".to_string()
            }
        }
    }
}
