//! Rendering several parse results at once.
//!
//! Documents are independent, so they are rendered in parallel with rayon.
//! Entries stay in input order and one failed document never affects another.

use rayon::prelude::*;
use serde::Serialize;

use crate::input::{producer_error, ParsedInput};
use crate::model::ParsedDocument;
use crate::render::{catch_panic, escape_html, DocumentRenderer, RenderResult, RenderStats};

/// Outcome of one batch entry.
#[derive(Debug, Clone, Serialize)]
pub enum BatchEntry {
    /// The document rendered
    Rendered { index: usize, result: RenderResult },
    /// The entry could not be rendered
    Failed { index: usize, message: String },
}

impl BatchEntry {
    /// Position of the entry in the input list.
    pub fn index(&self) -> usize {
        match self {
            BatchEntry::Rendered { index, .. } | BatchEntry::Failed { index, .. } => *index,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, BatchEntry::Rendered { .. })
    }
}

/// All entries of a batch, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Number of rendered documents.
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.is_rendered()).count()
    }

    /// Number of failed entries.
    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }

    /// `(index, message)` for every failed entry.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().filter_map(|entry| match entry {
            BatchEntry::Failed { index, message } => Some((*index, message.as_str())),
            BatchEntry::Rendered { .. } => None,
        })
    }

    /// Indices of the rendered documents.
    pub fn rendered_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .filter(|e| e.is_rendered())
            .map(BatchEntry::index)
            .collect()
    }

    /// Statistics summed over all rendered documents.
    pub fn stats(&self) -> RenderStats {
        let mut total = RenderStats::new();
        for entry in &self.entries {
            if let BatchEntry::Rendered { result, .. } = entry {
                total.merge(&result.stats);
            }
        }
        total
    }

    /// Tally panel, failure list, then one view per rendered document.
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<div style='background: #f0f0f0; padding: 15px; border-radius: 5px; margin: 10px 0;'>\
             <strong>Batch results:</strong> {} succeeded, {} failed</div>",
            self.succeeded(),
            self.failed()
        );

        if self.failed() > 0 {
            html.push_str(
                "<div style='background: #fff3cd; border: 1px solid #ffc107; padding: 10px; margin: 10px 0; border-radius: 5px;'>\
                 <strong>Errors occurred:</strong><ul>",
            );
            for (index, message) in self.failures() {
                html.push_str(&format!("<li>Document {}: {}</li>", index, escape_html(message)));
            }
            html.push_str("</ul></div>");
        }

        if self.succeeded() == 0 {
            html.push_str("<p style='color: red;'>No successful results to display</p>");
            return html;
        }

        for entry in &self.entries {
            if let BatchEntry::Rendered { index, result } = entry {
                html.push_str(&format!(
                    "<section id='document_{}' style='margin: 30px 0;'><h2>Document {}</h2>{}</section>",
                    index, index, result.html
                ));
            }
        }
        html
    }
}

/// Render every input, in parallel.
pub fn render_batch(
    renderer: &DocumentRenderer,
    inputs: Vec<ParsedInput>,
    selection: Option<&str>,
) -> BatchReport {
    render_batch_with(renderer, inputs, selection, |_| {})
}

/// Like [`render_batch`], calling `on_done` as each entry finishes.
///
/// `on_done` runs on rayon worker threads in completion order.
pub fn render_batch_with<F>(
    renderer: &DocumentRenderer,
    inputs: Vec<ParsedInput>,
    selection: Option<&str>,
    on_done: F,
) -> BatchReport
where
    F: Fn(&BatchEntry) + Sync + Send,
{
    let entries: Vec<BatchEntry> = inputs
        .into_par_iter()
        .enumerate()
        .map(|(index, input)| {
            let entry = render_entry(renderer, index, input, selection);
            on_done(&entry);
            entry
        })
        .collect();

    let report = BatchReport { entries };
    log::info!(
        "Batch finished: {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );
    report
}

fn render_entry(
    renderer: &DocumentRenderer,
    index: usize,
    input: ParsedInput,
    selection: Option<&str>,
) -> BatchEntry {
    let mapping = match input.normalize() {
        Ok(mapping) => mapping,
        Err(e) => return failed(index, e.to_string()),
    };
    if let Some(message) = producer_error(&mapping) {
        return failed(index, message);
    }
    let document = match ParsedDocument::from_mapping(mapping) {
        Ok(document) => document,
        Err(e) => return failed(index, e.to_string()),
    };

    let prefix = format!("{}doc{}_", renderer.options().container_prefix, index);
    match catch_panic(|| renderer.render_with_prefix(&document, selection, &prefix)) {
        Ok(result) => BatchEntry::Rendered { index, result },
        Err(caught) => {
            if let Some(trace) = &caught.trace {
                log::debug!("Document {} panicked:\n{}", index, trace);
            }
            failed(index, caught.to_error().to_string())
        }
    }
}

fn failed(index: usize, message: String) -> BatchEntry {
    log::warn!("Document {} failed: {}", index, message);
    BatchEntry::Failed { index, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{MemoryImageSource, PageImage};
    use crate::render::RenderOptions;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn renderer() -> DocumentRenderer {
        let images = MemoryImageSource::new()
            .with_image("mem://a", PageImage::new(vec![1, 2, 3], "image/png", Some((400, 300))));
        DocumentRenderer::new(RenderOptions::default()).with_image_source(Arc::new(images))
    }

    fn document(id: &str) -> ParsedInput {
        ParsedInput::from(json!({
            "document": {
                "pages": [{"id": 0, "image_uri": "mem://a"}],
                "elements": [{"id": 1, "type": "text", "content": id,
                              "bbox": [{"page_id": 0, "coord": [0, 0, 50, 50]}]}]
            },
            "metadata": {"id": id}
        }))
    }

    fn inputs() -> Vec<ParsedInput> {
        vec![
            document("first"),
            ParsedInput::from(json!({"type": "error", "message": "OCR <timeout>"})),
            ParsedInput::from(json!("not a document")),
            document("second"),
            ParsedInput::from(json!({"type": "error"})),
        ]
    }

    #[test]
    fn test_tally_and_failures() {
        let report = render_batch(&renderer(), inputs(), None);

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 3);
        assert_eq!(report.rendered_indices(), vec![0, 3]);

        let failures: Vec<(usize, &str)> = report.failures().collect();
        assert_eq!(failures[0], (1, "OCR <timeout>"));
        assert_eq!(failures[1], (2, "Unsupported input type: string"));
        assert_eq!(failures[2], (4, "Unknown error"));
    }

    #[test]
    fn test_batch_html() {
        let html = render_batch(&renderer(), inputs(), None).to_html();

        assert!(html.contains("2 succeeded, 3 failed"));
        assert!(html.contains("<li>Document 1: OCR &lt;timeout&gt;</li>"));
        assert!(html.contains("<h2>Document 3</h2>"));
        assert!(html.contains("id=\"pv_doc0_page_0\""));
        assert!(html.contains("id=\"pv_doc3_page_0\""));

        let first = html.find("Document 0</h2>").unwrap();
        let second = html.find("Document 3</h2>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_nothing_succeeded() {
        let report = render_batch(
            &renderer(),
            vec![ParsedInput::from(json!({"type": "error", "error": "boom"}))],
            None,
        );
        let html = report.to_html();
        assert!(html.contains("0 succeeded, 1 failed"));
        assert!(html.contains("Document 0: boom"));
        assert!(html.contains("No successful results to display"));
    }

    #[test]
    fn test_panicking_document_fails_alone() {
        struct Flaky;
        impl crate::raster::ImageSource for Flaky {
            fn load(&self, uri: &str) -> crate::error::Result<PageImage> {
                if uri == "mem://bad" {
                    panic!("corrupt raster");
                }
                Ok(PageImage::new(vec![1], "image/png", Some((100, 100))))
            }
        }

        let renderer = DocumentRenderer::new(RenderOptions::default()).with_image_source(Arc::new(Flaky));
        let bad = ParsedInput::from(json!({
            "document": {
                "pages": [{"id": 0, "image_uri": "mem://bad"}],
                "elements": [{"id": 1, "type": "text",
                              "bbox": [{"page_id": 0, "coord": [0, 0, 5, 5]}]}]
            }
        }));
        let report = render_batch(&renderer, vec![document("first"), bad], None);

        assert_eq!(report.rendered_indices(), vec![0]);
        let failures: Vec<(usize, &str)> = report.failures().collect();
        assert_eq!(failures, vec![(1, "Rendering error: internal failure: corrupt raster")]);
    }

    #[test]
    fn test_progress_callback_sees_every_entry() {
        let seen = AtomicUsize::new(0);
        let report = render_batch_with(&renderer(), inputs(), None, |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(seen.load(Ordering::SeqCst), 5);
        assert_eq!(report.stats().pages_rendered, 2);
    }
}
