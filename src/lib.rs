//! # parseview
//!
//! Renders document-parsing results as annotated HTML for inspection.
//!
//! A parse result lists pages (each with a raster image) and elements (typed
//! content with bounding boxes on those pages). This crate draws every box
//! over its page image with a hoverable tooltip, lists the elements of each
//! page below it, and summarizes the document at the top.
//!
//! ## Quick Start
//!
//! ```no_run
//! use parseview::render_file;
//!
//! fn main() -> parseview::Result<()> {
//!     // Render pages 1 to 3 of a parse result
//!     let html = render_file("result.json", Some("1-3"))?;
//!     std::fs::write("result.html", html)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Annotated pages**: scaled page images with colour-coded box overlays
//! - **Tooltips**: element content on hover, CSS only
//! - **Page selection**: `"1-3,7"` style expressions with lenient fallback
//! - **Batch rendering**: many parse results in parallel with Rayon
//! - **Navigation state**: page and document stepping for interactive viewers

pub mod batch;
pub mod error;
pub mod geometry;
pub mod input;
pub mod model;
pub mod navigate;
pub mod raster;
pub mod render;

// Re-export commonly used types
pub use batch::{render_batch, BatchEntry, BatchReport};
pub use error::{Error, Result};
pub use input::{ParsedInput, ToJsonText, ToStructured};
pub use model::{BBox, Element, ElementId, ElementType, Metadata, Page, ParsedDocument};
pub use navigate::{Navigator, RenderCommand, Transition};
pub use raster::{FsImageSource, ImageSource, MemoryImageSource, PageImage};
pub use render::{
    to_html_page, DocumentRenderer, PageSelection, Palette, RenderOptions, RenderResult,
    RenderStats,
};

use std::path::Path;
use std::sync::Arc;

/// Render a parse result given as JSON text.
///
/// Never fails; invalid input is rendered as an error block.
///
/// # Example
///
/// ```
/// use parseview::render_json_str;
///
/// let html = render_json_str("[1, 2]", None);
/// assert!(html.contains("Unsupported input type: array"));
/// ```
pub fn render_json_str(json: &str, selection: Option<&str>) -> String {
    DocumentRenderer::new(RenderOptions::default()).render(ParsedInput::json_text(json), selection)
}

/// Load a parse result from a JSON file.
///
/// # Example
///
/// ```no_run
/// use parseview::load_document;
///
/// let doc = load_document("result.json").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<ParsedDocument> {
    let text = std::fs::read_to_string(path)?;
    ParsedDocument::from_json_str(&text)
}

/// Render a parse result stored in a JSON file.
///
/// Reading the file is the only failure reported as an error; problems with
/// its content are rendered into the output.
pub fn render_file<P: AsRef<Path>>(path: P, selection: Option<&str>) -> Result<String> {
    let text = std::fs::read_to_string(path)?;
    Ok(render_json_str(&text, selection))
}

/// Render a parse result stored in a JSON file with custom options.
pub fn render_file_with_options<P: AsRef<Path>>(
    path: P,
    selection: Option<&str>,
    options: &RenderOptions,
) -> Result<String> {
    let text = std::fs::read_to_string(path)?;
    Ok(render::to_html(ParsedInput::json_text(text), selection, options))
}

/// Builder for configuring and running renders.
///
/// # Example
///
/// ```no_run
/// use parseview::ParseView;
///
/// let html = ParseView::new()
///     .with_max_width(800)
///     .with_title("Invoice 42")
///     .with_pages("1-2")
///     .render_file("invoice.json")?;
/// # Ok::<(), parseview::Error>(())
/// ```
pub struct ParseView {
    options: RenderOptions,
    pages: Option<String>,
    images: Option<Arc<dyn ImageSource>>,
}

impl ParseView {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: RenderOptions::default(),
            pages: None,
            images: None,
        }
    }

    /// Set the maximum display width of page images.
    pub fn with_max_width(mut self, width: u32) -> Self {
        self.options = self.options.with_max_width(width);
        self
    }

    /// Set the tooltip character limit.
    pub fn with_tooltip_limit(mut self, limit: usize) -> Self {
        self.options = self.options.with_tooltip_limit(limit);
        self
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options = self.options.with_title(title);
        self
    }

    /// Set the colour palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.options = self.options.with_palette(palette);
        self
    }

    /// Show or hide per-page element listings.
    pub fn with_listing(mut self, include: bool) -> Self {
        self.options = self.options.with_listing(include);
        self
    }

    /// Set the page selection expression, e.g. `"1-3,7"`.
    pub fn with_pages(mut self, expression: impl Into<String>) -> Self {
        self.pages = Some(expression.into());
        self
    }

    /// Load page images from a custom source.
    pub fn with_image_source(mut self, images: Arc<dyn ImageSource>) -> Self {
        self.images = Some(images);
        self
    }

    /// Build the configured renderer.
    pub fn renderer(&self) -> DocumentRenderer {
        let renderer = DocumentRenderer::new(self.options.clone());
        match &self.images {
            Some(images) => renderer.with_image_source(Arc::clone(images)),
            None => renderer,
        }
    }

    /// Render one parse result.
    pub fn render(&self, input: ParsedInput) -> String {
        self.renderer().render(input, self.pages.as_deref())
    }

    /// Render a parse result stored in a JSON file.
    pub fn render_file<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.render(ParsedInput::json_text(text)))
    }

    /// Render several parse results.
    pub fn render_batch(&self, inputs: Vec<ParsedInput>) -> BatchReport {
        batch::render_batch(&self.renderer(), inputs, self.pages.as_deref())
    }
}

impl Default for ParseView {
    fn default() -> Self {
        Self::new()
    }
}
