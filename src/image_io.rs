//! Loading frames from disk and writing overlays back
//!
//! All frames are decoded with the `image` crate and converted to 8-bit RGB,
//! the only pixel layout the histogram model reads.
//!
//! ## Supported Formats
//!
//! BMP, JPEG, PNG, PNM (PBM, PGM, PPM), TIFF and WebP.

use std::path::Path;

use image::{ImageReader, RgbImage};

use crate::{Result, SegmentationError};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// BMP image
    Bmp,
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// PNM image (PBM, PGM, PPM)
    Pnm,
    /// TIFF image
    Tiff,
    /// WebP image
    WebP,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "bmp" => Some(ImageFormat::Bmp),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "pbm" | "pgm" | "ppm" | "pnm" => Some(ImageFormat::Pnm),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    fn codec(self) -> image::ImageFormat {
        match self {
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Pnm => image::ImageFormat::Pnm,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }
}

fn detect_format(path: &Path) -> Result<ImageFormat> {
    ImageFormat::from_extension(path).ok_or_else(|| {
        SegmentationError::invalid("image_format", path.display())
    })
}

/// Load an image from disk as an RGB frame
///
/// # Errors
///
/// Returns `InvalidParameter` for unknown extensions and `ImageLoadError` if
/// the file cannot be opened or decoded.
///
/// # Example
///
/// ```rust,no_run
/// use colorseg::image_io::load_frame;
/// use std::path::Path;
///
/// let frame = load_frame(Path::new("frame.png"))?;
/// println!("Loaded frame: {}x{}", frame.width(), frame.height());
/// # Ok::<(), colorseg::SegmentationError>(())
/// ```
pub fn load_frame(path: &Path) -> Result<RgbImage> {
    let format = detect_format(path)?;

    let mut reader = ImageReader::open(path).map_err(|e| {
        SegmentationError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;
    reader.set_format(format.codec());

    let decoded = reader.decode().map_err(|e| {
        SegmentationError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    Ok(decoded.to_rgb8())
}

/// Write an RGB image, choosing the encoder from the file extension
pub fn save_image(image: &RgbImage, path: &Path) -> Result<()> {
    let format = detect_format(path)?;

    image
        .save_with_format(path, format.codec())
        .map_err(|e| {
            SegmentationError::image_save(format!("Failed to write image: {}", path.display()), e)
        })
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &[
        "bmp", "jpg", "jpeg", "png", "pbm", "pgm", "ppm", "pnm", "tiff", "tif", "webp",
    ]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}
