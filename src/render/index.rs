//! Page-to-element lookup.

use std::collections::BTreeSet;

use crate::model::{BBox, Element};

/// An element as seen from one page: the element plus only its boxes on
/// that page.
#[derive(Debug, Clone)]
pub struct PageElement<'a> {
    pub element: &'a Element,
    pub boxes: Vec<&'a BBox>,
}

/// Answers which elements touch a page.
///
/// Filters are stable: results keep the producer's element order.
#[derive(Debug, Clone, Copy)]
pub struct ElementIndex<'a> {
    elements: &'a [Element],
}

impl<'a> ElementIndex<'a> {
    /// Index a slice of elements.
    pub fn new(elements: &'a [Element]) -> Self {
        Self { elements }
    }

    /// Elements with at least one box on `page_id`, each with its matching boxes.
    pub fn elements_on_page(&self, page_id: i64) -> Vec<PageElement<'a>> {
        self.elements
            .iter()
            .filter_map(|element| {
                let boxes: Vec<&BBox> = element.boxes_on_page(page_id).collect();
                if boxes.is_empty() {
                    None
                } else {
                    Some(PageElement { element, boxes })
                }
            })
            .collect()
    }

    /// Elements with a box on any of `page_ids`, each counted once.
    pub fn elements_on_pages(&self, page_ids: &BTreeSet<i64>) -> Vec<&'a Element> {
        self.elements
            .iter()
            .filter(|element| element.bbox.iter().any(|b| page_ids.contains(&b.page_id)))
            .collect()
    }

    /// Total number of indexed elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether there are no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
