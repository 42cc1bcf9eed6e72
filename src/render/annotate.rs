//! Annotated page images and per-page element listings.
//!
//! Layout is computed first as plain [`BoxOverlay`] values so the geometry
//! can be tested without looking at markup; formatting happens afterwards.

use std::fmt::Write as _;

use super::content::{escape_html, ContentRenderer, RenderMode};
use super::index::{ElementIndex, PageElement};
use super::{RenderOptions, RenderStats};
use crate::geometry::{tooltip_width, ScaleContext, ScaledBox, FALLBACK_DIMENSIONS};
use crate::raster::ImageSource;

/// A page to annotate.
#[derive(Debug, Clone, Copy)]
pub struct PageRef<'a> {
    /// Position in the document (0-indexed)
    pub index: usize,
    /// Id bounding boxes refer to
    pub id: i64,
    /// Location of the page raster
    pub image_uri: Option<&'a str>,
    /// Set when the producer's page entry was malformed
    pub error: Option<&'a str>,
}

impl PageRef<'_> {
    /// 1-based page number shown to users.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// One positioned overlay for one bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxOverlay {
    /// Unique id within the rendered view
    pub box_id: String,
    /// Compact label, e.g. `SECTIO#3`
    pub label: String,
    /// Tooltip heading, e.g. `SECTION_HEADER #3`
    pub heading: String,
    /// Border and tint colour
    pub color: String,
    /// Box geometry in display pixels
    pub rect: ScaledBox,
    /// Tooltip width in pixels
    pub tooltip_width: u32,
    /// Tooltip offset from the box's left edge
    pub tooltip_left: f64,
    /// Tooltip body markup
    pub tooltip_html: String,
}

/// Overlays for one page.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub overlays: Vec<BoxOverlay>,
    /// Boxes dropped for missing coordinates or zero area
    pub skipped: u32,
}

/// Compute overlays for the elements on one page.
pub fn layout_page(
    container_id: &str,
    elements: &[PageElement<'_>],
    scale: &ScaleContext,
    options: &RenderOptions,
) -> PageLayout {
    let content = ContentRenderer::new(options.tooltip_char_limit);
    let mut layout = PageLayout::default();

    for (idx, item) in elements.iter().enumerate() {
        let element = item.element;
        let id = escape_html(&element.display_id());
        let color = options.palette.color_for(&element.kind);
        let width = tooltip_width(element, scale.display_width);
        let tooltip_html = content.render(element, RenderMode::Tooltip);

        for (bbox_idx, bbox) in item.boxes.iter().enumerate() {
            let Some(rect) = scale.scale_box(bbox) else {
                layout.skipped += 1;
                continue;
            };

            layout.overlays.push(BoxOverlay {
                box_id: format!("{}_bbox_{}_{}", container_id, idx, bbox_idx),
                label: format!("{}#{}", escape_html(&element.kind.short_label()), id),
                heading: format!("{} #{}", escape_html(&element.kind.as_str().to_uppercase()), id),
                color: color.to_string(),
                rect,
                tooltip_width: width,
                tooltip_left: rect.tooltip_left(width, scale.display_width),
                tooltip_html: tooltip_html.clone(),
            });
        }
    }

    layout
}

/// Produces one page's annotated image and element listing.
pub struct PageAnnotator<'a> {
    options: &'a RenderOptions,
    images: &'a dyn ImageSource,
}

impl<'a> PageAnnotator<'a> {
    /// Create an annotator.
    pub fn new(options: &'a RenderOptions, images: &'a dyn ImageSource) -> Self {
        Self { options, images }
    }

    /// Render the annotated image for a page.
    ///
    /// Image problems and empty pages produce visible blocks instead of
    /// errors so that sibling pages still render.
    pub fn annotate(&self, page: PageRef<'_>, index: &ElementIndex<'_>, stats: &mut RenderStats) -> String {
        if let Some(reason) = page.error {
            stats.image_failures += 1;
            return invalid_page_block(page, reason);
        }
        let Some(uri) = page.image_uri else {
            stats.image_failures += 1;
            return "<p style='color: red;'>No image URI found for this page</p>".to_string();
        };

        let image = match self.images.load(uri) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Could not load image for page {}: {}", page.number(), e);
                stats.image_failures += 1;
                return image_error_block(uri);
            }
        };

        let (original_width, original_height) = image.dimensions.unwrap_or_else(|| {
            log::warn!(
                "Unknown dimensions for {}, assuming {}x{}",
                uri,
                FALLBACK_DIMENSIONS.0,
                FALLBACK_DIMENSIONS.1
            );
            FALLBACK_DIMENSIONS
        });
        let scale = ScaleContext::new(original_width, original_height, self.options.max_display_width);

        let elements = drawable(index.elements_on_page(page.id));
        if elements.is_empty() {
            return format!(
                "<div style=\"background: #f5f5f5; border: 1px solid #ddd; border-radius: 8px; padding: 15px; margin: 10px 0;\">\
                 No elements found on page {}</div>",
                page.number()
            );
        }

        let container_id = format!("{}page_{}", self.options.container_prefix, page.id);
        let layout = layout_page(&container_id, &elements, &scale, self.options);

        log::debug!(
            "Page {}: {} elements, {} overlays, {} boxes skipped",
            page.number(),
            elements.len(),
            layout.overlays.len(),
            layout.skipped
        );
        stats.pages_rendered += 1;
        stats.overlays_drawn += layout.overlays.len() as u32;
        stats.boxes_skipped += layout.skipped;

        let mut html = String::new();
        html.push_str(&page_header(page, elements.len(), &scale));
        html.push_str(&hover_styles(&container_id));
        let _ = write!(
            html,
            "<div id=\"{id}\" style=\"position: relative; display: inline-block; border: 2px solid #333; \
             border-radius: 8px; overflow: visible; background: white;\">\
             <img src=\"{src}\" style=\"display: block; width: {w}px; height: {h}px;\" alt=\"Page {n}\">",
            id = container_id,
            src = image.to_data_uri(),
            w = scale.display_width,
            h = scale.display_height,
            n = page.number(),
        );
        for overlay in &layout.overlays {
            html.push_str(&overlay_markup(overlay, &container_id));
        }
        html.push_str("</div>");
        html
    }

    /// Render the element listing for a page.
    pub fn render_listing(&self, page: PageRef<'_>, index: &ElementIndex<'_>, stats: &mut RenderStats) -> String {
        let elements = index.elements_on_page(page.id);
        if elements.is_empty() {
            return format!("<p>No elements found on page {}</p>", page.number());
        }

        let content = ContentRenderer::new(self.options.tooltip_char_limit);
        let mut cards = String::new();

        for item in &elements {
            let element = item.element;
            let color = self.options.palette.color_for(&element.kind);

            let _ = write!(
                cards,
                "<div style=\"border-left: 5px solid {color}; padding: 15px; margin: 15px 0; background: {color}15; border-radius: 5px;\">\
                 <div style=\"display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 10px;\">\
                 <h4 style=\"margin: 0; color: {color}; font-size: 16px;\">{heading} (ID: {id})</h4>\
                 <code style=\"background: #f5f5f5; padding: 3px 6px; border-radius: 3px; font-size: 10px; max-width: 300px; word-break: break-all;\">{boxes}</code>\
                 </div>\
                 <div style=\"font-size: 14px; line-height: 1.4;\">{body}</div>\
                 </div>",
                color = color,
                heading = escape_html(&element.kind.heading()),
                id = escape_html(&element.display_id()),
                boxes = describe_boxes(item),
                body = content.render(element, RenderMode::Listing),
            );
        }
        stats.elements_listed += elements.len() as u32;

        format!(
            "<div style=\"margin: 20px 0;\">\
             <h3 style=\"color: #333; margin-bottom: 15px;\">Elements on page {} ({} items)</h3>{}</div>",
            page.number(),
            elements.len(),
            cards
        )
    }
}

/// Keep only boxes with four coordinates, dropping elements left without any.
fn drawable(mut elements: Vec<PageElement<'_>>) -> Vec<PageElement<'_>> {
    for item in &mut elements {
        item.boxes.retain(|b| b.corners().is_some());
    }
    elements.retain(|item| !item.boxes.is_empty());
    elements
}

/// Box coordinates as `[x1, y1, x2, y2]`, rounded, joined with `; `.
fn describe_boxes(item: &PageElement<'_>) -> String {
    let described: Vec<String> = item
        .boxes
        .iter()
        .filter_map(|b| b.corners())
        .map(|[x1, y1, x2, y2]| format!("[{:.0}, {:.0}, {:.0}, {:.0}]", x1, y1, x2, y2))
        .collect();

    if described.is_empty() {
        "Invalid bounding box".to_string()
    } else {
        described.join("; ")
    }
}

fn invalid_page_block(page: PageRef<'_>, reason: &str) -> String {
    format!(
        "<div style=\"background: #f8d7da; border: 1px solid #f5c6cb; color: #721c24; padding: 15px; border-radius: 5px;\">\
         <strong>Invalid page data for page {}:</strong> {}</div>",
        page.number(),
        escape_html(reason)
    )
}

fn image_error_block(uri: &str) -> String {
    format!(
        "<div style=\"background: #f8d7da; border: 1px solid #f5c6cb; color: #721c24; padding: 15px; border-radius: 5px;\">\
         <strong>Could not load image:</strong> {}<br>\
         <small>Check that the file exists and is readable.</small></div>",
        escape_html(uri)
    )
}

fn page_header(page: PageRef<'_>, element_count: usize, scale: &ScaleContext) -> String {
    format!(
        "<div style=\"background: #e3f2fd; border: 1px solid #2196f3; border-radius: 8px; padding: 15px; margin: 10px 0;\">\
         <strong>Page {}: {} elements</strong><br>\
         <strong>Original size:</strong> {}×{}px | \
         <strong>Display size:</strong> {}×{}px | \
         <strong>Scale factor:</strong> {:.3}</div>",
        page.number(),
        element_count,
        scale.original_width,
        scale.original_height,
        scale.display_width,
        scale.display_height,
        scale.scale_factor
    )
}

/// Hover rules scoped to one page container. Tooltips are children of their
/// box, so only the hovered box ever shows one.
fn hover_styles(container_id: &str) -> String {
    format!(
        "<style>\
         .bbox-{c} {{ z-index: 100; }}\
         .bbox-{c}:hover {{ background: rgba(255, 255, 0, 0.3) !important; border-width: 3px !important; z-index: 9999 !important; }}\
         .bbox-{c}:hover .bbox-tooltip {{ display: block !important; }}\
         </style>",
        c = container_id
    )
}

fn overlay_markup(overlay: &BoxOverlay, container_id: &str) -> String {
    let rect = &overlay.rect;
    format!(
        "<div id=\"{id}\" class=\"bbox-overlay bbox-{container}\" style=\"position: absolute; \
         left: {left:.1}px; top: {top:.1}px; width: {width:.1}px; height: {height:.1}px; \
         border: 2px solid {color}; background: {color}25; box-sizing: border-box; cursor: pointer; transition: all 0.2s ease;\">\
         <div style=\"background: {color}; color: white; padding: 1px 4px; font-size: 9px; font-weight: bold; \
         position: absolute; top: {label_top}px; left: 0; white-space: nowrap; border-radius: 2px; \
         box-shadow: 0 1px 2px rgba(0,0,0,0.3); pointer-events: none; max-width: {label_width:.0}px; overflow: hidden; z-index: 1000;\">{label}</div>\
         <div class=\"bbox-tooltip\" style=\"position: absolute; left: {tip_left:.1}px; top: {height:.1}px; \
         background: rgba(255, 255, 255, 0.98); color: #333; border: 2px solid #ccc; padding: 12px; border-radius: 6px; \
         font-size: 12px; width: {tip_width}px; max-width: {tip_width}px; word-wrap: break-word; z-index: 10000; \
         pointer-events: none; box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15); display: none; line-height: 1.4; \
         max-height: 400px; overflow-y: auto;\">\
         <div style=\"font-weight: bold; color: #0066cc; margin-bottom: 8px; padding-bottom: 6px; border-bottom: 1px solid #ddd;\">{heading}</div>\
         <div style=\"font-family: 'Segoe UI', 'Helvetica Neue', Arial, sans-serif; font-size: 11px;\">{body}</div>\
         </div></div>",
        id = overlay.box_id,
        container = container_id,
        left = rect.left,
        top = rect.top,
        width = rect.width,
        height = rect.height,
        color = overlay.color,
        label_top = rect.label_offset(),
        label_width = rect.label_max_width(),
        label = overlay.label,
        tip_left = overlay.tooltip_left,
        tip_width = overlay.tooltip_width,
        heading = overlay.heading,
        body = overlay.tooltip_html,
    )
}
