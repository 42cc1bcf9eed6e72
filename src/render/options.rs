//! Rendering options and configuration.

use super::Palette;
use crate::geometry::DEFAULT_MAX_DISPLAY_WIDTH;

/// Default character budget for tooltip text.
pub const DEFAULT_TOOLTIP_CHAR_LIMIT: usize = 500;

/// Default heading of the rendered view.
pub const DEFAULT_TITLE: &str = "Parsed Document Results";

/// Options for rendering a parse result.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Page images wider than this are scaled down
    pub max_display_width: u32,

    /// Tooltip text beyond this many characters is truncated
    pub tooltip_char_limit: usize,

    /// Element-type colours
    pub palette: Palette,

    /// Heading shown at the top of the view
    pub title: String,

    /// Prefix for container ids and CSS classes
    pub container_prefix: String,

    /// Emit the element listing after each page image
    pub include_listing: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum display width.
    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_display_width = width.max(1);
        self
    }

    /// Set the tooltip character limit.
    pub fn with_tooltip_limit(mut self, limit: usize) -> Self {
        self.tooltip_char_limit = limit;
        self
    }

    /// Set the colour palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Set the view title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the container id prefix.
    pub fn with_container_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.container_prefix = prefix.into();
        self
    }

    /// Enable or disable per-page element listings.
    pub fn with_listing(mut self, include: bool) -> Self {
        self.include_listing = include;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_display_width: DEFAULT_MAX_DISPLAY_WIDTH,
            tooltip_char_limit: DEFAULT_TOOLTIP_CHAR_LIMIT,
            palette: Palette::default(),
            title: DEFAULT_TITLE.to_string(),
            container_prefix: "pv_".to_string(),
            include_listing: true,
        }
    }
}
