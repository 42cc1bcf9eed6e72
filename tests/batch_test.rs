//! Integration tests for batch rendering and producer input shapes.

use std::sync::Arc;

use parseview::error::Result;
use parseview::{
    BatchEntry, MemoryImageSource, PageImage, ParseView, ParsedInput, ToJsonText, ToStructured,
};
use serde_json::{json, Value};

/// Producer that hands over a structured value.
struct StructuredResult {
    document_id: &'static str,
}

impl ToStructured for StructuredResult {
    fn to_structured(&self) -> Result<Value> {
        Ok(json!({
            "document": {
                "pages": [{"id": 0, "image_uri": "mem://page"}],
                "elements": [{"id": 0, "type": "caption", "content": "Figure 1",
                              "bbox": [{"page_id": 0, "coord": [5, 5, 60, 20]}]}]
            },
            "metadata": {"id": self.document_id}
        }))
    }
}

/// Producer that only knows how to serialize itself.
struct SerializedResult(&'static str);

impl ToJsonText for SerializedResult {
    fn to_json_text(&self) -> Result<String> {
        Ok(self.0.to_string())
    }
}

fn view() -> ParseView {
    let images = MemoryImageSource::new().with_image(
        "mem://page",
        PageImage::new(vec![0; 16], "image/png", Some((300, 200))),
    );
    ParseView::new().with_image_source(Arc::new(images))
}

fn inputs() -> Vec<ParsedInput> {
    vec![
        ParsedInput::Structured(Box::new(StructuredResult { document_id: "alpha" })),
        ParsedInput::Json(Box::new(SerializedResult(
            r#"{"type": "error", "message": "page limit exceeded"}"#,
        ))),
        ParsedInput::Json(Box::new(SerializedResult("true"))),
        ParsedInput::Structured(Box::new(StructuredResult { document_id: "beta" })),
    ]
}

#[test]
fn test_batch_keeps_input_order() {
    let report = view().render_batch(inputs());

    let indices: Vec<usize> = report.entries().iter().map(BatchEntry::index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
    assert_eq!(report.rendered_indices(), vec![0, 3]);
}

#[test]
fn test_batch_failures() {
    let report = view().render_batch(inputs());

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 2);

    let failures: Vec<(usize, &str)> = report.failures().collect();
    assert_eq!(failures[0], (1, "page limit exceeded"));
    assert_eq!(failures[1], (2, "Unsupported input type: boolean"));
}

#[test]
fn test_batch_html() {
    let html = view().with_pages("1").render_batch(inputs()).to_html();

    assert!(html.contains("2 succeeded, 2 failed"));
    assert!(html.contains("<li>Document 1: page limit exceeded</li>"));
    assert!(html.contains("alpha"));
    assert!(html.contains("beta"));
    assert!(html.contains("CAPTIO#0"));

    // Each document gets its own container ids
    assert!(html.contains("id=\"pv_doc0_page_0\""));
    assert!(html.contains("id=\"pv_doc3_page_0\""));
}

#[test]
fn test_batch_stats() {
    let stats = view().render_batch(inputs()).stats();
    assert_eq!(stats.pages_rendered, 2);
    assert_eq!(stats.overlays_drawn, 2);
    assert_eq!(stats.image_failures, 0);
}

#[test]
fn test_single_render_of_structured_producer() {
    let html = view().render(ParsedInput::Structured(Box::new(StructuredResult {
        document_id: "gamma",
    })));
    assert!(html.contains("gamma"));
    assert!(html.contains("Elements on page 1 (1 items)"));
}
