//! Rendering of parse results into annotated HTML views.

mod annotate;
mod content;
mod html;
mod index;
mod options;
mod palette;
mod result;
mod selection;
mod summary;

pub use annotate::{layout_page, BoxOverlay, PageAnnotator, PageLayout, PageRef};
pub use content::{escape_for_tooltip, escape_html, ContentRenderer, RenderMode};
pub use html::{error_block, error_block_with_trace, to_html, to_html_page, DocumentRenderer};
pub(crate) use html::{catch_panic, CaughtPanic};
pub use index::{ElementIndex, PageElement};
pub use options::{RenderOptions, DEFAULT_TITLE, DEFAULT_TOOLTIP_CHAR_LIMIT};
pub use palette::{Palette, FALLBACK_COLOR};
pub use result::{RenderResult, RenderStats};
pub use selection::PageSelection;
pub use summary::{legend_html, summary_panel, DocumentSummary};
