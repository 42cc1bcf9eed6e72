//! Page geometry: display scaling and overlay layout.
//!
//! Bounding boxes arrive in original image pixels. Pages wider than the
//! display budget are scaled down once per page and every box on that page is
//! multiplied by the same factor. Pages are never scaled up.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{BBox, Element};

/// Default maximum display width in pixels.
pub const DEFAULT_MAX_DISPLAY_WIDTH: u32 = 1024;

/// Dimensions assumed when an image loads but cannot be probed.
pub const FALLBACK_DIMENSIONS: (u32, u32) = (1024, 768);

/// Vertical room a label needs to sit above its box.
pub const LABEL_HEADROOM: f64 = 18.0;

/// Offset of a label drawn inside its box.
const LABEL_INSET: f64 = 2.0;

/// Labels never shrink below this width.
const LABEL_MIN_WIDTH: f64 = 50.0;

/// Tooltip width for non-table content.
pub const DEFAULT_TOOLTIP_WIDTH: u32 = 400;

const TOOLTIP_BASE_WIDTH: u32 = 300;
const TOOLTIP_COLUMN_WIDTH: u32 = 80;
const TOOLTIP_MAX_WIDTH_RATIO: f64 = 0.8;

/// Preferred horizontal gap between a box's left edge and its tooltip.
const TOOLTIP_OFFSET: f64 = 10.0;

/// Scaling decision for one page image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleContext {
    /// Image width in pixels
    pub original_width: u32,
    /// Image height in pixels
    pub original_height: u32,
    /// Factor applied to every coordinate (at most 1.0)
    pub scale_factor: f64,
    /// Rendered width in pixels
    pub display_width: u32,
    /// Rendered height in pixels
    pub display_height: u32,
}

impl ScaleContext {
    /// Compute the scale for an image shown at most `max_display_width` wide.
    pub fn new(original_width: u32, original_height: u32, max_display_width: u32) -> Self {
        if original_width <= max_display_width {
            return Self {
                original_width,
                original_height,
                scale_factor: 1.0,
                display_width: original_width,
                display_height: original_height,
            };
        }

        let scale_factor = f64::from(max_display_width) / f64::from(original_width);
        Self {
            original_width,
            original_height,
            scale_factor,
            display_width: max_display_width,
            display_height: (f64::from(original_height) * scale_factor).round() as u32,
        }
    }

    /// Whether the image is shown smaller than its original size.
    pub fn is_scaled(&self) -> bool {
        self.scale_factor < 1.0
    }

    /// Scale a box into display space, dropping boxes that would not render.
    pub fn scale_box(&self, bbox: &BBox) -> Option<ScaledBox> {
        ScaledBox::from_corners(bbox.corners()?, self.scale_factor)
    }
}

/// Multiply all four coordinates by `scale_factor`.
pub fn transform(coord: [f64; 4], scale_factor: f64) -> [f64; 4] {
    coord.map(|v| v * scale_factor)
}

/// A bounding box in display pixels with positive area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScaledBox {
    /// Scale `[x1, y1, x2, y2]`; `None` when the result has no area.
    pub fn from_corners(coord: [f64; 4], scale_factor: f64) -> Option<Self> {
        let [x1, y1, x2, y2] = transform(coord, scale_factor);
        let width = x2 - x1;
        let height = y2 - y1;

        // NaN fails both comparisons, so it is rejected too
        if !(width > 0.0 && height > 0.0) {
            return None;
        }

        Some(Self {
            left: x1,
            top: y1,
            width,
            height,
        })
    }

    /// Vertical label offset relative to the box top: above the box when
    /// there is headroom, otherwise just inside it.
    pub fn label_offset(&self) -> f64 {
        if self.top >= LABEL_HEADROOM {
            -LABEL_HEADROOM
        } else {
            LABEL_INSET
        }
    }

    /// Maximum label width.
    pub fn label_max_width(&self) -> f64 {
        (self.width - 4.0).max(LABEL_MIN_WIDTH)
    }

    /// Horizontal tooltip offset relative to the box's left edge.
    ///
    /// Prefers a small offset to the right; when the tooltip would run past
    /// the page's right edge it is pulled left, but never past the page's
    /// left edge.
    pub fn tooltip_left(&self, tooltip_width: u32, display_width: u32) -> f64 {
        let width = f64::from(tooltip_width);
        let page_width = f64::from(display_width);

        if self.left + TOOLTIP_OFFSET + width <= page_width {
            return TOOLTIP_OFFSET;
        }
        (page_width - width - self.left).max(-self.left)
    }
}

fn first_row_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").unwrap())
}

fn header_cell_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<th[^>]*>").unwrap())
}

fn data_cell_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<td[^>]*>").unwrap())
}

/// Count columns in the first row of HTML table markup.
///
/// Returns the larger of the header-cell and data-cell counts, or `None` when
/// there is no row or the row has no cells.
pub fn table_column_count(markup: &str) -> Option<usize> {
    let row = first_row_regex().captures(markup)?.get(1)?.as_str();
    let th = header_cell_regex().find_iter(row).count();
    let td = data_cell_regex().find_iter(row).count();

    match th.max(td) {
        0 => None,
        n => Some(n),
    }
}

/// Tooltip width for an element on a page `display_width` pixels wide.
///
/// Tables get wider tooltips so columns stay readable, bounded by 80% of the
/// page width.
pub fn tooltip_width(element: &Element, display_width: u32) -> u32 {
    if !element.kind.is_table() {
        return DEFAULT_TOOLTIP_WIDTH;
    }

    let columns = element.content().and_then(table_column_count);
    match columns {
        Some(n) => {
            let wanted = TOOLTIP_BASE_WIDTH.saturating_add(TOOLTIP_COLUMN_WIDTH.saturating_mul(n as u32));
            let cap = (f64::from(display_width) * TOOLTIP_MAX_WIDTH_RATIO) as u32;
            wanted.min(cap)
        }
        None => DEFAULT_TOOLTIP_WIDTH,
    }
}
