//! HTML rendering for parse results.

use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Once};

use super::annotate::{PageAnnotator, PageRef};
use super::content::escape_html;
use super::index::ElementIndex;
use super::summary::{summary_panel, DocumentSummary};
use super::{PageSelection, RenderOptions, RenderResult, RenderStats};
use crate::error::{Error, Result};
use crate::input::ParsedInput;
use crate::model::ParsedDocument;
use crate::raster::{FsImageSource, ImageSource};

/// Render a parse result to HTML with the given options.
///
/// Never fails: problems are rendered as visible blocks in the output.
pub fn to_html(input: ParsedInput, selection: Option<&str>, options: &RenderOptions) -> String {
    DocumentRenderer::new(options.clone()).render(input, selection)
}

/// Drives selection, summary, page annotation and listings for one document.
#[derive(Clone)]
pub struct DocumentRenderer {
    options: RenderOptions,
    images: Arc<dyn ImageSource>,
}

impl DocumentRenderer {
    /// Create a renderer loading page images from the filesystem.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            images: Arc::new(FsImageSource::new()),
        }
    }

    /// Use a different image source.
    pub fn with_image_source(mut self, images: Arc<dyn ImageSource>) -> Self {
        self.images = images;
        self
    }

    /// Rendering options in effect.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a parse result.
    ///
    /// Errors and panics raised while rendering are caught here and turned
    /// into an error block, so the caller never sees them.
    pub fn render(&self, input: ParsedInput, selection: Option<&str>) -> String {
        match catch_panic(|| self.try_render(input, selection)) {
            Ok(Ok(result)) => result.html,
            Ok(Err(e)) => {
                log::error!("Rendering failed: {}", e);
                error_block(&e)
            }
            Err(caught) => {
                log::error!("Rendering panicked: {}", caught.message);
                error_block_with_trace(&caught.to_error(), caught.trace.as_deref())
            }
        }
    }

    /// Normalize and render, returning errors instead of error blocks.
    pub fn try_render(&self, input: ParsedInput, selection: Option<&str>) -> Result<RenderResult> {
        let document = input.into_document()?;
        Ok(self.render_document(&document, selection))
    }

    /// Render an already-normalized document.
    pub fn render_document(&self, document: &ParsedDocument, selection: Option<&str>) -> RenderResult {
        self.render_with_prefix(document, selection, &self.options.container_prefix)
    }

    pub(crate) fn render_with_prefix(
        &self,
        document: &ParsedDocument,
        selection: Option<&str>,
        container_prefix: &str,
    ) -> RenderResult {
        if !document.has_elements() {
            return RenderResult::html_only(
                "<p style='color: #555;'>No elements found in document</p>".to_string(),
            );
        }

        let selection = PageSelection::parse(selection, document.page_count());
        let summary = DocumentSummary::new(document, &selection);

        let mut html = String::new();
        html.push_str(&format!("<h1>{}</h1>", escape_html(&self.options.title)));
        html.push_str(&summary_panel(&summary, &self.options.palette));

        let mut stats = RenderStats::new();
        if document.page_count() > 0 {
            html.push_str("<h2>Annotated Images and Elements</h2>");

            let options = RenderOptions {
                container_prefix: container_prefix.to_string(),
                ..self.options.clone()
            };
            let annotator = PageAnnotator::new(&options, self.images.as_ref());
            let index = ElementIndex::new(&document.elements);

            for page_index in selection.indices() {
                let Some(page) = document.get_page(page_index) else {
                    continue;
                };
                let page = PageRef {
                    index: page_index,
                    id: page.effective_id(page_index),
                    image_uri: page.image_uri(),
                    error: page.error.as_deref(),
                };

                html.push_str("<div style='margin: 20px 0;'>");
                html.push_str(&annotator.annotate(page, &index, &mut stats));
                html.push_str("</div>");

                if options.include_listing {
                    html.push_str(&annotator.render_listing(page, &index, &mut stats));
                }
            }
        }

        log::debug!(
            "Rendered {} of {} pages ({} overlays, {} image failures)",
            stats.pages_rendered,
            document.page_count(),
            stats.overlays_drawn,
            stats.image_failures
        );
        RenderResult::new(html, stats)
    }
}

/// A panic caught while rendering.
#[derive(Debug)]
pub(crate) struct CaughtPanic {
    /// Panic payload, when it was a string
    pub message: String,
    /// Panic location and backtrace recorded by the hook
    pub trace: Option<String>,
}

impl CaughtPanic {
    pub fn to_error(&self) -> Error {
        Error::Render(format!("internal failure: {}", self.message))
    }
}

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static LAST_TRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// Chain a hook in front of the existing one. While this thread is inside
/// [`catch_panic`] the hook records the trace instead of printing it.
fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.with(Cell::get) {
                let trace = format!("{}\n\n{}", info, Backtrace::force_capture());
                LAST_TRACE.with(|slot| *slot.borrow_mut() = Some(trace));
            } else {
                previous(info);
            }
        }));
    });
}

/// Run `f`, turning a panic into a [`CaughtPanic`] with its backtrace.
pub(crate) fn catch_panic<T>(f: impl FnOnce() -> T) -> std::result::Result<T, CaughtPanic> {
    install_panic_hook();
    let outer = CAPTURING.with(|flag| flag.replace(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    CAPTURING.with(|flag| flag.set(outer));

    outcome.map_err(|payload| CaughtPanic {
        message: payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string()),
        trace: LAST_TRACE.with(|slot| slot.borrow_mut().take()),
    })
}

/// Error block with the message and its chain of causes.
pub fn error_block(err: &dyn StdError) -> String {
    error_block_with_trace(err, None)
}

/// Error block with the message, its causes and a backtrace when one is known.
pub fn error_block_with_trace(err: &dyn StdError, trace: Option<&str>) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str("\ncaused by: ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    if let Some(trace) = trace {
        detail.push_str("\n\nBacktrace:\n");
        detail.push_str(trace);
    }

    format!(
        "<p style='color: red;'>Error: {}</p><pre>{}</pre>",
        escape_html(&err.to_string()),
        escape_html(&detail)
    )
}

/// Wrap a rendered fragment into a standalone HTML page.
pub fn to_html_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n\
         <body style=\"font-family: 'Segoe UI', 'Helvetica Neue', Arial, sans-serif; margin: 20px;\">\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{MemoryImageSource, PageImage};
    use serde_json::json;

    fn renderer() -> DocumentRenderer {
        let images = MemoryImageSource::new()
            .with_image("mem://p0", PageImage::new(vec![1], "image/png", Some((2000, 1500))))
            .with_image("mem://p1", PageImage::new(vec![2], "image/png", Some((800, 600))));
        DocumentRenderer::new(RenderOptions::default()).with_image_source(Arc::new(images))
    }

    fn input() -> ParsedInput {
        ParsedInput::from(json!({
            "document": {
                "pages": [
                    {"id": 0, "image_uri": "mem://p0"},
                    {"id": 1, "image_uri": "mem://p1"},
                    {"id": 2, "image_uri": "mem://missing"}
                ],
                "elements": [
                    {"id": 0, "type": "section_header", "content": "Title",
                     "bbox": [{"page_id": 0, "coord": [100, 100, 600, 200]}]},
                    {"id": 1, "type": "text", "content": "Body",
                     "bbox": [{"page_id": 1, "coord": [10, 10, 10, 10]}]},
                    {"id": 2, "type": "text", "content": "Tail",
                     "bbox": [{"page_id": 2, "coord": [1, 1, 5, 5]}]}
                ]
            },
            "metadata": {"id": "doc-1"}
        }))
    }

    #[test]
    fn test_render_full_document() {
        let result = renderer().try_render(input(), None).unwrap();
        assert!(result.html.starts_with("<h1>Parsed Document Results</h1>"));
        assert!(result.html.contains("All 3 pages"));
        assert!(result.html.contains("Scale factor:</strong> 0.512"));
        assert!(result.html.contains("Could not load image:</strong> mem://missing"));
        assert_eq!(result.stats.pages_rendered, 2);
        assert_eq!(result.stats.image_failures, 1);
        assert_eq!(result.stats.overlays_drawn, 1);
        assert_eq!(result.stats.boxes_skipped, 1);
        assert_eq!(result.stats.elements_listed, 3);
    }

    #[test]
    fn test_render_selected_pages_only() {
        let result = renderer().try_render(input(), Some("2")).unwrap();
        assert!(result.html.contains("Pages 2 (1 of 3)"));
        assert!(!result.html.contains("Elements on page 1 "));
        assert!(result.html.contains("Elements on page 2 (1 items)"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let r = renderer();
        assert_eq!(r.render(input(), Some("1-2")), r.render(input(), Some("1-2")));
    }

    #[test]
    fn test_unsupported_input_is_rendered() {
        let html = renderer().render(ParsedInput::from(json!(42)), None);
        assert!(html.contains("Unsupported input type: number"));
    }

    #[test]
    fn test_document_without_elements() {
        let html = renderer().render(ParsedInput::from(json!({"document": {"pages": [{}]}})), None);
        assert!(html.contains("No elements found in document"));
    }

    #[test]
    fn test_error_block_includes_causes() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk <gone>");
        let err = Error::from(io);
        let html = error_block(&err);
        assert!(html.contains("Error: I/O error: disk &lt;gone&gt;"));
    }

    #[test]
    fn test_panicking_source_is_contained() {
        struct Exploding;
        impl ImageSource for Exploding {
            fn load(&self, _uri: &str) -> Result<PageImage> {
                panic!("decoder exploded");
            }
        }

        let r = DocumentRenderer::new(RenderOptions::default()).with_image_source(Arc::new(Exploding));
        let html = r.render(input(), None);
        assert!(html.contains("internal failure"));
        assert!(html.contains("decoder exploded"));
        assert!(html.contains("Backtrace:"));
        assert!(html.contains("html.rs"));
    }

    #[test]
    fn test_catch_panic_passes_values_through() {
        assert_eq!(catch_panic(|| 7).unwrap(), 7);
        let caught = catch_panic(|| -> u8 { panic!("boom {}", 1) }).unwrap_err();
        assert_eq!(caught.message, "boom 1");
        assert!(caught.trace.unwrap().contains("boom 1"));
    }

    #[test]
    fn test_error_block_with_trace() {
        let err = Error::Render("internal failure: x".to_string());
        let html = error_block_with_trace(&err, Some("at <frame>"));
        assert!(html.contains("Backtrace:\nat &lt;frame&gt;"));
        assert!(!error_block(&err).contains("Backtrace:"));
    }

    #[test]
    fn test_malformed_entries_do_not_blank_the_document() {
        let html = renderer().render(
            ParsedInput::from(json!({
                "document": {
                    "pages": [
                        {"id": 0, "image_uri": "mem://p0"},
                        {"id": 1, "image_uri": ["mem://p1"]}
                    ],
                    "elements": [
                        {"id": 1, "type": "text", "content": "Kept",
                         "bbox": [{"page_id": 0, "coord": [0, 0, 50, 50]}]},
                        {"id": 2, "type": "text",
                         "bbox": [{"page_id": 0, "coord": [0, 0, null, 50]}]},
                        {"id": 3, "type": null,
                         "bbox": [{"page_id": 0, "coord": [0, 0, 50, 50]}]}
                    ]
                }
            })),
            None,
        );

        assert!(!html.contains("Invalid document"));
        assert!(html.contains("TEXT#1"));
        assert!(!html.contains("TEXT#2"));
        assert!(html.contains("Page 1: 1 elements"));
        assert!(html.contains("Invalid page data for page 2:"));
    }

    #[test]
    fn test_to_html_page() {
        let page = to_html_page("A & B", "<p>x</p>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>A &amp; B</title>"));
        assert!(page.contains("<p>x</p>"));
    }
}
