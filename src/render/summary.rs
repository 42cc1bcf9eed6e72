//! Summary panel and colour legend.

use std::collections::BTreeSet;

use super::content::escape_html;
use super::index::ElementIndex;
use super::{PageSelection, Palette};
use crate::model::{count_types, ParsedDocument};

/// Figures shown in the summary panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    /// Human description of the page selection
    pub pages: String,
    /// Elements touching at least one selected page
    pub element_count: usize,
    /// Per-type counts over those elements, first-seen order
    pub type_counts: Vec<(String, usize)>,
    /// Document identifier
    pub document_id: String,
}

impl DocumentSummary {
    /// Summarize the selected part of a document.
    ///
    /// An element with boxes on several selected pages is counted once.
    pub fn new(document: &ParsedDocument, selection: &PageSelection) -> Self {
        let page_ids: BTreeSet<i64> = selection
            .indices()
            .filter_map(|index| document.page_id_at(index))
            .collect();
        let selected = ElementIndex::new(&document.elements).elements_on_pages(&page_ids);

        Self {
            pages: selection.describe(),
            element_count: selected.len(),
            type_counts: count_types(selected.into_iter()),
            document_id: document.metadata.document_id(),
        }
    }

    /// `type: count` pairs joined with commas, or `None`.
    pub fn type_breakdown(&self) -> String {
        if self.type_counts.is_empty() {
            return "None".to_string();
        }
        self.type_counts
            .iter()
            .map(|(kind, count)| format!("{}: {}", kind, count))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render the summary panel.
    pub fn to_html(&self) -> String {
        format!(
            "<div style=\"background: #e3f2fd; border: 1px solid #2196f3; border-radius: 8px; padding: 20px;\">\
             <h3 style=\"margin: 0 0 10px 0; color: #1976d2;\">Document Summary</h3>\
             <p style=\"margin: 8px 0;\"><strong>Showing:</strong> {}</p>\
             <p style=\"margin: 8px 0;\"><strong>Elements on selected pages:</strong> {}</p>\
             <p style=\"margin: 8px 0;\"><strong>Element types:</strong> {}</p>\
             <p style=\"margin: 8px 0;\"><strong>Document ID:</strong> \
             <span style=\"font-family: monospace; font-size: 0.9em;\">{}</span></p>\
             </div>",
            self.pages,
            self.element_count,
            escape_html(&self.type_breakdown()),
            escape_html(&self.document_id)
        )
    }
}

/// Render the colour legend: one swatch per palette entry.
pub fn legend_html(palette: &Palette) -> String {
    let items: String = palette
        .entries()
        .map(|(kind, color)| {
            format!(
                "<span style=\"display: inline-block; margin: 5px;\">\
                 <span style=\"display: inline-block; width: 15px; height: 15px; background: {}; \
                 border: 1px solid #999; margin-right: 5px;\"></span>{}</span>",
                color,
                escape_html(&kind.title_case())
            )
        })
        .collect();

    format!(
        "<div style=\"background: #f9f9f9; padding: 20px; border-radius: 8px; border: 1px solid #ddd;\">\
         <strong>Element colors:</strong><br>{}</div>",
        items
    )
}

/// Summary and legend side by side.
pub fn summary_panel(summary: &DocumentSummary, palette: &Palette) -> String {
    format!(
        "<div style=\"display: grid; grid-template-columns: 1fr 1fr; gap: 15px; margin: 15px 0;\">{}{}</div>",
        summary.to_html(),
        legend_html(palette)
    )
}
