//! Document model types for parse-result representation.
//!
//! This module defines the canonical form every producer shape is normalized
//! into before any geometry or rendering runs. The model mirrors the JSON the
//! upstream document parser emits: pages with raster images, and layout
//! elements that point back at pages through their bounding boxes.

mod document;
mod element;
mod page;

pub use document::{Metadata, ParsedDocument, NOT_AVAILABLE};
pub(crate) use document::count_types;
pub use element::{BBox, Element, ElementId, ElementType};
pub use page::Page;
