//! Page selection expressions.
//!
//! Expressions are comma-separated 1-based page numbers and inclusive ranges,
//! e.g. `"1-3,7,10-12"`. `"all"` (any case) or no expression selects every
//! page. Bad tokens are skipped with a warning; a selection that ends up empty
//! falls back to every page, so a render never comes out blank.

use std::collections::BTreeSet;

/// Selections of at most this many pages are listed page by page.
const LISTED_PAGES_LIMIT: usize = 10;

/// A resolved set of zero-based page indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    pages: BTreeSet<usize>,
    total_pages: usize,
    warnings: Vec<String>,
}

impl PageSelection {
    /// Select every page.
    pub fn all(total_pages: usize) -> Self {
        Self {
            pages: (0..total_pages).collect(),
            total_pages,
            warnings: Vec::new(),
        }
    }

    /// Parse a selection expression against a document of `total_pages` pages.
    pub fn parse(expression: Option<&str>, total_pages: usize) -> Self {
        let expression = match expression.map(str::trim) {
            None => return Self::all(total_pages),
            Some(e) if e.eq_ignore_ascii_case("all") => return Self::all(total_pages),
            Some(e) => e,
        };

        let mut pages = BTreeSet::new();
        let mut warnings = Vec::new();

        for token in expression.split(',').map(str::trim) {
            if let Some((start, end)) = token.split_once('-') {
                match parse_range(start, end) {
                    Some((start, end)) => pages.extend(clip_range(start, end, total_pages)),
                    None => warnings.push(format!("Invalid page range '{}'", token)),
                }
                continue;
            }

            match token.parse::<i64>() {
                Ok(number) => match to_index(number, total_pages) {
                    Some(index) => {
                        pages.insert(index);
                    }
                    None => warnings.push(format!(
                        "Page {} is out of range (1-{})",
                        number, total_pages
                    )),
                },
                Err(_) => warnings.push(format!("Invalid page number '{}'", token)),
            }
        }

        if pages.is_empty() {
            warnings.push(format!(
                "Selection '{}' contains no valid pages, showing all pages",
                expression
            ));
            pages = (0..total_pages).collect();
        }

        for warning in &warnings {
            log::warn!("{}", warning);
        }

        Self {
            pages,
            total_pages,
            warnings,
        }
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.pages.iter().copied()
    }

    /// Selected 1-based page numbers in ascending order.
    pub fn page_numbers(&self) -> Vec<usize> {
        self.pages.iter().map(|i| i + 1).collect()
    }

    /// Whether the page at `index` is selected.
    pub fn contains(&self, index: usize) -> bool {
        self.pages.contains(&index)
    }

    /// Number of selected pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether nothing is selected (only for documents with no pages).
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Whether every page of the document is selected.
    pub fn is_all(&self) -> bool {
        self.pages.len() == self.total_pages
    }

    /// Page count the selection was resolved against.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Warnings raised while parsing.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Human-readable description for the summary panel.
    pub fn describe(&self) -> String {
        if self.is_all() {
            return format!("All {} pages", self.total_pages);
        }

        if self.pages.len() <= LISTED_PAGES_LIMIT {
            let listed = self
                .page_numbers()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("Pages {} ({} of {})", listed, self.len(), self.total_pages)
        } else {
            format!("{} of {} pages selected", self.len(), self.total_pages)
        }
    }
}

fn parse_range(start: &str, end: &str) -> Option<(i64, i64)> {
    let start = start.trim().parse::<i64>().ok()?;
    let end = end.trim().parse::<i64>().ok()?;
    Some((start, end))
}

/// Zero-based indices of the 1-based range `start..=end` that exist in the
/// document. Reversed ranges are empty.
fn clip_range(start: i64, end: i64, total_pages: usize) -> std::ops::Range<usize> {
    let first = start.saturating_sub(1).max(0);
    let last = end.saturating_sub(1).min(total_pages as i64 - 1);

    if first > last {
        return 0..0;
    }
    first as usize..last as usize + 1
}

fn to_index(number: i64, total_pages: usize) -> Option<usize> {
    let index = number.checked_sub(1)?;
    if index >= 0 && (index as usize) < total_pages {
        Some(index as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(selection: &PageSelection) -> Vec<usize> {
        selection.indices().collect()
    }

    #[test]
    fn test_all_and_absent() {
        assert_eq!(set(&PageSelection::parse(None, 3)), vec![0, 1, 2]);
        assert_eq!(set(&PageSelection::parse(Some("all"), 3)), vec![0, 1, 2]);
        assert_eq!(set(&PageSelection::parse(Some(" ALL "), 3)), vec![0, 1, 2]);
        assert!(PageSelection::parse(Some("All"), 3).warnings().is_empty());
    }

    #[test]
    fn test_mixed_expression() {
        let selection = PageSelection::parse(Some("1-3,7,10-12"), 12);
        assert_eq!(set(&selection), vec![0, 1, 2, 6, 9, 10, 11]);
        assert!(selection.warnings().is_empty());
    }

    #[test]
    fn test_out_of_range_single_page_falls_back() {
        let selection = PageSelection::parse(Some("99"), 5);
        assert_eq!(set(&selection), vec![0, 1, 2, 3, 4]);
        assert_eq!(selection.warnings().len(), 2);
        assert!(selection.warnings()[0].contains("out of range"));
    }

    #[test]
    fn test_reversed_range_falls_back() {
        let selection = PageSelection::parse(Some("2-1"), 5);
        assert_eq!(set(&selection), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_range_members_clipped_silently() {
        let selection = PageSelection::parse(Some("4-9"), 5);
        assert_eq!(set(&selection), vec![3, 4]);
        assert!(selection.warnings().is_empty());

        let selection = PageSelection::parse(Some("0-2"), 5);
        assert_eq!(set(&selection), vec![0, 1]);
    }

    #[test]
    fn test_huge_range_is_clipped() {
        let selection = PageSelection::parse(Some("1-9999999999"), 4);
        assert_eq!(set(&selection), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_invalid_tokens_skipped() {
        let selection = PageSelection::parse(Some("x,2,a-b,1-2-3,,-1"), 5);
        assert_eq!(set(&selection), vec![1]);
        assert_eq!(selection.warnings().len(), 5);
    }

    #[test]
    fn test_zero_is_out_of_range() {
        let selection = PageSelection::parse(Some("0"), 3);
        assert!(selection.is_all());
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = PageSelection::parse(Some("7,1-3"), 10);
        let b = PageSelection::parse(Some("1-3,7"), 10);
        assert_eq!(set(&a), set(&b));
    }

    #[test]
    fn test_whitespace_tolerated() {
        let selection = PageSelection::parse(Some(" 1 - 2 , 4 "), 5);
        assert_eq!(set(&selection), vec![0, 1, 3]);
    }

    #[test]
    fn test_empty_document() {
        let selection = PageSelection::parse(Some("1"), 0);
        assert!(selection.is_empty());
        assert!(selection.is_all());
    }

    #[test]
    fn test_describe() {
        assert_eq!(PageSelection::parse(None, 4).describe(), "All 4 pages");
        assert_eq!(
            PageSelection::parse(Some("1,3"), 4).describe(),
            "Pages 1, 3 (2 of 4)"
        );
        assert_eq!(
            PageSelection::parse(Some("1-11"), 40).describe(),
            "11 of 40 pages selected"
        );
    }
}
