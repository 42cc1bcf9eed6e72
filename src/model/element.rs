//! Layout element types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::document::NOT_AVAILABLE;

/// One detected logical unit of document content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Producer-assigned identifier
    #[serde(default)]
    pub id: Option<ElementId>,

    /// Layout type (text, table, figure, ...)
    #[serde(rename = "type", default)]
    pub kind: ElementType,

    /// Extracted content; tables carry HTML table markup
    #[serde(default)]
    pub content: Option<String>,

    /// Narrative description, used when content is absent
    #[serde(default)]
    pub description: Option<String>,

    /// Locations of this element, possibly across several pages
    #[serde(default)]
    pub bbox: Vec<BBox>,
}

impl Element {
    /// Create a new element of the given type.
    pub fn new(id: i64, kind: impl Into<ElementType>) -> Self {
        Self {
            id: Some(ElementId::from(id)),
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Set the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a bounding box.
    pub fn with_bbox(mut self, page_id: i64, coord: [f64; 4]) -> Self {
        self.bbox.push(BBox::new(page_id, coord));
        self
    }

    /// Identifier for display, `N/A` when absent.
    pub fn display_id(&self) -> String {
        self.id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Content if present and non-empty.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }

    /// Description if present and non-empty.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// Check whether any bounding box lies on the given page.
    pub fn is_on_page(&self, page_id: i64) -> bool {
        self.bbox.iter().any(|b| b.page_id == page_id)
    }

    /// Bounding boxes lying on the given page, in producer order.
    pub fn boxes_on_page(&self, page_id: i64) -> impl Iterator<Item = &BBox> {
        self.bbox.iter().filter(move |b| b.page_id == page_id)
    }
}

/// Element identifier: producers emit either numbers or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementId {
    /// Numeric id
    Number(serde_json::Number),
    /// String id
    Text(String),
}

impl From<i64> for ElementId {
    fn from(id: i64) -> Self {
        ElementId::Number(id.into())
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        ElementId::Text(id.to_string())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Number(n) => write!(f, "{}", n),
            ElementId::Text(s) => f.write_str(s),
        }
    }
}

/// Layout element type.
///
/// Known types are matched case-insensitively. Anything else is kept
/// verbatim so labels still show what the producer emitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementType {
    SectionHeader,
    Text,
    Figure,
    Caption,
    PageFooter,
    PageHeader,
    Table,
    List,
    /// Unrecognized type, raw spelling preserved
    Other(String),
}

impl ElementType {
    /// Known types in legend order.
    pub const KNOWN: [ElementType; 8] = [
        ElementType::SectionHeader,
        ElementType::Text,
        ElementType::Figure,
        ElementType::Caption,
        ElementType::PageFooter,
        ElementType::PageHeader,
        ElementType::Table,
        ElementType::List,
    ];

    /// Parse a type name.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "section_header" => ElementType::SectionHeader,
            "text" => ElementType::Text,
            "figure" => ElementType::Figure,
            "caption" => ElementType::Caption,
            "page_footer" => ElementType::PageFooter,
            "page_header" => ElementType::PageHeader,
            "table" => ElementType::Table,
            "list" => ElementType::List,
            _ => ElementType::Other(name.to_string()),
        }
    }

    /// Type name as the producer spells it.
    pub fn as_str(&self) -> &str {
        match self {
            ElementType::SectionHeader => "section_header",
            ElementType::Text => "text",
            ElementType::Figure => "figure",
            ElementType::Caption => "caption",
            ElementType::PageFooter => "page_footer",
            ElementType::PageHeader => "page_header",
            ElementType::Table => "table",
            ElementType::List => "list",
            ElementType::Other(raw) => raw,
        }
    }

    /// Whether this is a table element.
    pub fn is_table(&self) -> bool {
        matches!(self, ElementType::Table)
    }

    /// Whether this is one of the known types.
    pub fn is_known(&self) -> bool {
        !matches!(self, ElementType::Other(_))
    }

    /// Compact overlay label, e.g. `SECTIO` for `section_header`.
    pub fn short_label(&self) -> String {
        self.as_str().to_uppercase().chars().take(6).collect()
    }

    /// Heading form, e.g. `SECTION HEADER`.
    pub fn heading(&self) -> String {
        self.as_str().to_uppercase().replace('_', " ")
    }

    /// Legend form, e.g. `Section Header`.
    pub fn title_case(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ElementType {
    fn default() -> Self {
        ElementType::Other("unknown".to_string())
    }
}

impl From<String> for ElementType {
    fn from(name: String) -> Self {
        ElementType::parse(&name)
    }
}

impl From<&str> for ElementType {
    fn from(name: &str) -> Self {
        ElementType::parse(name)
    }
}

impl From<ElementType> for String {
    fn from(kind: ElementType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bounding rectangle locating an element on one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Id of the page this box lies on
    #[serde(default)]
    pub page_id: i64,

    /// `[x1, y1, x2, y2]` in original image pixels, top-left origin
    #[serde(default)]
    pub coord: Vec<f64>,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(page_id: i64, coord: [f64; 4]) -> Self {
        Self {
            page_id,
            coord: coord.to_vec(),
        }
    }

    /// The four corner values, or `None` when fewer than four are present.
    pub fn corners(&self) -> Option<[f64; 4]> {
        match self.coord.as_slice() {
            [x1, y1, x2, y2, ..] => Some([*x1, *y1, *x2, *y2]),
            _ => None,
        }
    }
}
