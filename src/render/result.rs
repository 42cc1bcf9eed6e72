//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

/// Result of rendering a document: the HTML plus what went into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered HTML fragment
    pub html: String,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(html: String, stats: RenderStats) -> Self {
        Self { html, stats }
    }

    /// Create a result with just markup (error and informational views).
    pub fn html_only(html: String) -> Self {
        Self {
            html,
            stats: RenderStats::default(),
        }
    }

    /// Get the HTML length in bytes.
    pub fn html_len(&self) -> usize {
        self.html.len()
    }
}

/// Counters collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Pages whose annotated image was emitted
    pub pages_rendered: u32,

    /// Pages whose image could not be loaded
    pub image_failures: u32,

    /// Bounding-box overlays drawn
    pub overlays_drawn: u32,

    /// Boxes skipped for missing coordinates or zero area
    pub boxes_skipped: u32,

    /// Elements listed across all page listings
    pub elements_listed: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add another set of counters to this one.
    pub fn merge(&mut self, other: &RenderStats) {
        self.pages_rendered += other.pages_rendered;
        self.image_failures += other.image_failures;
        self.overlays_drawn += other.overlays_drawn;
        self.boxes_skipped += other.boxes_skipped;
        self.elements_listed += other.elements_listed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge() {
        let mut total = RenderStats::new();
        total.merge(&RenderStats {
            pages_rendered: 1,
            overlays_drawn: 4,
            ..Default::default()
        });
        total.merge(&RenderStats {
            pages_rendered: 2,
            boxes_skipped: 1,
            ..Default::default()
        });

        assert_eq!(total.pages_rendered, 3);
        assert_eq!(total.overlays_drawn, 4);
        assert_eq!(total.boxes_skipped, 1);
    }

    #[test]
    fn test_html_only() {
        let result = RenderResult::html_only("<p>x</p>".to_string());
        assert_eq!(result.html_len(), 8);
        assert_eq!(result.stats, RenderStats::default());
    }
}
