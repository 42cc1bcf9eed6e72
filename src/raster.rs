//! Page raster access.
//!
//! The renderer never touches the filesystem directly: it asks an
//! [`ImageSource`] for the bytes and pixel size behind a page's image URI.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageReader;

use crate::error::{Error, Result};

/// A loaded page raster.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    /// Encoded image bytes
    pub data: Vec<u8>,

    /// MIME type used for embedding
    pub mime_type: &'static str,

    /// Pixel size, when it could be determined
    pub dimensions: Option<(u32, u32)>,
}

impl PageImage {
    /// Create a page image.
    pub fn new(data: Vec<u8>, mime_type: &'static str, dimensions: Option<(u32, u32)>) -> Self {
        Self {
            data,
            mime_type,
            dimensions,
        }
    }

    /// Embed the image as a base64 data URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

/// Access to page rasters by URI.
pub trait ImageSource: Send + Sync {
    /// Load the image behind `uri`.
    fn load(&self, uri: &str) -> Result<PageImage>;
}

/// MIME type guessed from the file extension; JPEG when unknown.
pub fn mime_type_for(uri: &str) -> &'static str {
    let ext = Path::new(uri)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

/// Read pixel dimensions from encoded image bytes.
pub fn probe_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

/// Loads page images from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageSource;

impl FsImageSource {
    /// Create a filesystem image source.
    pub fn new() -> Self {
        Self
    }
}

impl ImageSource for FsImageSource {
    fn load(&self, uri: &str) -> Result<PageImage> {
        let path = Path::new(uri);
        if !path.exists() {
            return Err(Error::image(uri, "file not found"));
        }

        let data = fs::read(path).map_err(|e| Error::image(uri, e.to_string()))?;
        let dimensions = match probe_dimensions(&data) {
            Ok(dims) => Some(dims),
            Err(e) => {
                log::warn!("Could not read dimensions of {}: {}", uri, e);
                None
            }
        };

        Ok(PageImage::new(data, mime_type_for(uri), dimensions))
    }
}

/// Serves preloaded images, keyed by URI.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageSource {
    images: HashMap<String, PageImage>,
}

impl MemoryImageSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image under `uri`.
    pub fn insert(&mut self, uri: impl Into<String>, image: PageImage) {
        self.images.insert(uri.into(), image);
    }

    /// Register an image and return the source (builder style).
    pub fn with_image(mut self, uri: impl Into<String>, image: PageImage) -> Self {
        self.insert(uri, image);
        self
    }
}

impl ImageSource for MemoryImageSource {
    fn load(&self, uri: &str) -> Result<PageImage> {
        self.images
            .get(uri)
            .cloned()
            .ok_or_else(|| Error::image(uri, "file not found"))
    }
}
