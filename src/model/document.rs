//! Document-level types.

use super::{Element, Page};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder shown when a value such as the document id is absent.
pub const NOT_AVAILABLE: &str = "N/A";

/// A parse result, normalized and ready to render.
///
/// Built once from the producer's output and only read afterwards; every
/// render call derives its own selection and geometry from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Pages in positional order
    pub pages: Vec<Page>,

    /// Detected layout elements in producer order
    pub elements: Vec<Element>,

    /// Free-form producer metadata
    pub metadata: Metadata,
}

/// Wire shape: `{"document": {"pages": [...], "elements": [...]}, "metadata": {...}}`.
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    document: Option<Body>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

/// Entries stay raw so one malformed page or element does not sink the rest.
#[derive(Deserialize, Default)]
struct Body {
    #[serde(default)]
    pages: Option<Vec<Value>>,
    #[serde(default)]
    elements: Option<Vec<Value>>,
}

impl ParsedDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from the producer's JSON mapping.
    ///
    /// Missing sections default to empty; sections present with the wrong
    /// shape are reported as [`Error::InvalidDocument`]. Inside the lists,
    /// a malformed element is skipped with a warning and a malformed page
    /// becomes an [invalid](Page::invalid) placeholder.
    pub fn from_mapping(mapping: Map<String, Value>) -> Result<Self> {
        let envelope: Envelope = serde_json::from_value(Value::Object(mapping))
            .map_err(|e| Error::InvalidDocument(e.to_string()))?;
        let body = envelope.document.unwrap_or_default();

        let pages = body
            .pages
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, raw)| read_page(index, raw))
            .collect();
        let elements = body
            .elements
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| read_element(index, raw))
            .collect();

        Ok(Self {
            pages,
            elements,
            metadata: envelope.metadata.unwrap_or_default(),
        })
    }

    /// Parse a document from JSON text in the producer's shape.
    pub fn from_json_str(json: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(mapping) => Self::from_mapping(mapping),
            other => Err(Error::UnsupportedInput(crate::input::shape_name(&other))),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by positional index (0-indexed).
    pub fn get_page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Effective page id for the page at `index`.
    pub fn page_id_at(&self, index: usize) -> Option<i64> {
        self.pages.get(index).map(|page| page.effective_id(index))
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Add an element to the document.
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Check if the document has any elements.
    pub fn has_elements(&self) -> bool {
        !self.elements.is_empty()
    }

    /// Count elements per raw type name, in first-seen order.
    pub fn type_counts(&self) -> Vec<(String, usize)> {
        count_types(self.elements.iter())
    }
}

fn read_page(index: usize, raw: Value) -> Page {
    let id = raw.get("id").and_then(Value::as_i64);
    match serde_json::from_value::<Page>(raw) {
        Ok(page) => page,
        Err(e) => {
            log::warn!("Skipping malformed page at position {}: {}", index, e);
            Page::invalid(id, e.to_string())
        }
    }
}

fn read_element(index: usize, raw: Value) -> Option<Element> {
    match serde_json::from_value::<Element>(raw) {
        Ok(element) => Some(element),
        Err(e) => {
            log::warn!("Skipping malformed element at position {}: {}", index, e);
            None
        }
    }
}

/// Count elements per type name, preserving the order types first appear.
pub(crate) fn count_types<'a>(elements: impl Iterator<Item = &'a Element>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for element in elements {
        let name = element.kind.as_str();
        match counts.iter_mut().find(|(t, _)| t == name) {
            Some((_, n)) => *n += 1,
            None => counts.push((name.to_string(), 1)),
        }
    }
    counts
}

/// Producer metadata.
///
/// Kept as an open mapping since producers attach arbitrary keys; only `id`
/// is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(pub Map<String, Value>);

impl Metadata {
    /// Look up a raw metadata value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a metadata value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Document identifier for display, `N/A` when absent.
    pub fn document_id(&self) -> String {
        match self.0.get("id") {
            None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}
