//! Element content rendering for tooltips and listings.
//!
//! Tooltips are compact: text is truncated and escaped so it can sit inside a
//! hover panel. Listings show content in full and trust it to be sanitized
//! upstream. Table markup is kept structurally intact in both modes; only
//! presentational attributes are injected into its tags.

use crate::model::Element;

/// Where rendered content will be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Hover panel attached to a bounding box
    Tooltip,
    /// Per-page element listing
    Listing,
}

/// Presentational attributes for table tags.
struct TableStyle {
    table: &'static str,
    th: &'static str,
    td: &'static str,
    thead: &'static str,
}

const TOOLTIP_TABLE_STYLE: TableStyle = TableStyle {
    table: r#"style="width: 100%; border-collapse: collapse; margin: 5px 0; font-size: 10px;""#,
    th: r#"style="border: 1px solid #ddd; padding: 4px; background: #f8f9fa; color: #333; font-weight: bold; text-align: left; font-size: 10px;""#,
    td: r#"style="border: 1px solid #ddd; padding: 4px; color: #333; font-size: 10px;""#,
    thead: r#"style="background: #e9ecef;""#,
};

const LISTING_TABLE_STYLE: TableStyle = TableStyle {
    table: r#"style="width: 100%; border-collapse: collapse; margin: 10px 0; font-size: 13px;""#,
    th: r#"style="border: 1px solid #ddd; padding: 8px; background: #f5f5f5; font-weight: bold; text-align: left;""#,
    td: r#"style="border: 1px solid #ddd; padding: 8px;""#,
    thead: r#"style="background: #f0f0f0;""#,
};

/// Renders element content in tooltip or listing mode.
#[derive(Debug, Clone, Copy)]
pub struct ContentRenderer {
    char_limit: usize,
}

impl ContentRenderer {
    /// Create a renderer truncating tooltip text beyond `char_limit` characters.
    pub fn new(char_limit: usize) -> Self {
        Self { char_limit }
    }

    /// Render an element's content.
    ///
    /// Content wins over description; with neither, a placeholder is shown.
    pub fn render(&self, element: &Element, mode: RenderMode) -> String {
        if let Some(content) = element.content() {
            if element.kind.is_table() {
                return render_table(content, mode);
            }
            return match mode {
                RenderMode::Tooltip => escape_for_tooltip(&self.truncate(content)),
                RenderMode::Listing => content.to_string(),
            };
        }

        if let Some(description) = element.description() {
            return match mode {
                RenderMode::Tooltip => {
                    escape_for_tooltip(&format!("Description: {}", self.truncate(description)))
                }
                RenderMode::Listing => format!("<em>Description: {}</em>", description),
            };
        }

        match mode {
            RenderMode::Tooltip => "No content available".to_string(),
            RenderMode::Listing => "<em>No content</em>".to_string(),
        }
    }

    /// Cut text to the character limit, marking the cut with an ellipsis.
    fn truncate(&self, text: &str) -> String {
        match text.char_indices().nth(self.char_limit) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.to_string(),
        }
    }
}

impl Default for ContentRenderer {
    fn default() -> Self {
        Self::new(super::options::DEFAULT_TOOLTIP_CHAR_LIMIT)
    }
}

fn render_table(markup: &str, mode: RenderMode) -> String {
    let style = match mode {
        RenderMode::Tooltip => &TOOLTIP_TABLE_STYLE,
        RenderMode::Listing => &LISTING_TABLE_STYLE,
    };
    let styled = style_table(markup, style);

    match mode {
        RenderMode::Tooltip => styled,
        RenderMode::Listing => format!(
            "<div style='overflow-x: auto; margin: 10px 0;'>{}</div>",
            styled
        ),
    }
}

/// Inject attributes into bare table tags. Tags that already carry
/// attributes are left alone.
fn style_table(markup: &str, style: &TableStyle) -> String {
    markup
        .replace("<table>", &format!("<table {}>", style.table))
        .replace("<th>", &format!("<th {}>", style.th))
        .replace("<td>", &format!("<td {}>", style.td))
        .replace("<thead>", &format!("<thead {}>", style.thead))
}

/// Escape text for a hover panel: HTML special characters become entities
/// and newlines become line breaks.
pub fn escape_for_tooltip(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

/// Escape HTML special characters.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
