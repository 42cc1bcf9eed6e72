//! Page-level types.

use serde::{Deserialize, Serialize};

/// A single page of a parse result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Stable page identifier referenced by bounding boxes
    #[serde(default)]
    pub id: Option<i64>,

    /// Path or URI of the rendered page raster
    #[serde(default)]
    pub image_uri: Option<String>,

    /// Why the producer's entry for this page could not be read
    #[serde(skip)]
    pub error: Option<String>,
}

impl Page {
    /// Create a new page with an id and image location.
    pub fn new(id: i64, image_uri: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            image_uri: Some(image_uri.into()),
            error: None,
        }
    }

    /// Placeholder for a page entry that failed to deserialize.
    ///
    /// The page keeps its position, so later pages keep their numbers, and
    /// renders as an error block.
    pub fn invalid(id: Option<i64>, reason: impl Into<String>) -> Self {
        Self {
            id,
            image_uri: None,
            error: Some(reason.into()),
        }
    }

    /// Whether the page entry was malformed.
    pub fn is_invalid(&self) -> bool {
        self.error.is_some()
    }

    /// Page id, falling back to the page's position when the producer omitted it.
    pub fn effective_id(&self, index: usize) -> i64 {
        self.id.unwrap_or(index as i64)
    }

    /// Image location, if present and non-empty.
    pub fn image_uri(&self) -> Option<&str> {
        self.image_uri.as_deref().filter(|uri| !uri.is_empty())
    }
}
