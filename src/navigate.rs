//! Page navigation state for interactive viewers.
//!
//! A viewer shows one page of one document at a time. [`Navigator`] is the
//! state behind its controls: every transition produces a new state plus the
//! [`RenderCommand`] the viewer should execute, so the state can be driven
//! and tested without any UI attached.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ParsedDocument;

/// A user action on the navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Move one page forward
    Next,
    /// Move one page back
    Previous,
    /// Go to a 1-based page number
    JumpTo(usize),
    /// Show another document, starting at its first page.
    /// Ignored when that document has no pages.
    SwitchDocument(usize),
}

/// What to render after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderCommand {
    /// Position of the document in the navigator's list
    pub document: usize,
    /// Page selection expression naming the single page to show
    pub selection: String,
}

/// Current document and page over a fixed list of documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigator {
    page_counts: Vec<usize>,
    document: usize,
    page: usize,
}

impl Navigator {
    /// Start on page 1 of the first document.
    ///
    /// Fails when there is nothing to show.
    pub fn new(page_counts: Vec<usize>) -> Result<Self> {
        match page_counts.first() {
            None => Err(Error::InvalidDocument("no documents to navigate".to_string())),
            Some(0) => Err(Error::InvalidDocument("no pages found".to_string())),
            Some(_) => Ok(Self {
                page_counts,
                document: 0,
                page: 1,
            }),
        }
    }

    /// Navigator over already-loaded documents.
    pub fn for_documents(documents: &[ParsedDocument]) -> Result<Self> {
        Self::new(documents.iter().map(ParsedDocument::page_count).collect())
    }

    /// Apply a transition, returning the new state and what to render.
    pub fn apply(&self, transition: Transition) -> (Navigator, RenderCommand) {
        let mut next = self.clone();
        match transition {
            Transition::Next => {
                if next.can_go_forward() {
                    next.page += 1;
                }
            }
            Transition::Previous => {
                if next.can_go_back() {
                    next.page -= 1;
                }
            }
            Transition::JumpTo(page) => {
                next.page = page.clamp(1, next.page_count().max(1));
            }
            Transition::SwitchDocument(document) => {
                let document = document.min(next.page_counts.len() - 1);
                if next.page_counts[document] == 0 {
                    log::warn!("Document {} has no pages, staying on document {}", document, next.document);
                } else {
                    next.document = document;
                    next.page = 1;
                }
            }
        }

        log::debug!("{:?}: document {}, page {}", transition, next.document, next.page);
        let command = next.command();
        (next, command)
    }

    /// Command rendering the current page.
    pub fn command(&self) -> RenderCommand {
        RenderCommand {
            document: self.document,
            selection: self.page.to_string(),
        }
    }

    /// Position of the current document.
    pub fn document(&self) -> usize {
        self.document
    }

    /// Current 1-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Pages in the current document.
    pub fn page_count(&self) -> usize {
        self.page_counts[self.document]
    }

    pub fn document_count(&self) -> usize {
        self.page_counts.len()
    }

    /// Whether "previous" is enabled.
    pub fn can_go_back(&self) -> bool {
        self.page > 1
    }

    /// Whether "next" is enabled.
    pub fn can_go_forward(&self) -> bool {
        self.page < self.page_count()
    }

    /// `Page p of N`
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page, self.page_count())
    }

    /// `d of N documents`
    pub fn document_label(&self) -> String {
        format!("{} of {} documents", self.document + 1, self.document_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_first_page() {
        let nav = Navigator::new(vec![3, 5]).unwrap();
        assert_eq!(nav.page(), 1);
        assert_eq!(nav.document(), 0);
        assert!(!nav.can_go_back());
        assert!(nav.can_go_forward());
        assert_eq!(nav.command().selection, "1");
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(Navigator::new(vec![]).is_err());
        assert!(Navigator::new(vec![0, 2]).is_err());
    }

    #[test]
    fn test_next_and_previous_clamp() {
        let nav = Navigator::new(vec![2]).unwrap();

        let (nav, cmd) = nav.apply(Transition::Next);
        assert_eq!(nav.page(), 2);
        assert_eq!(cmd.selection, "2");
        assert!(!nav.can_go_forward());

        let (nav, _) = nav.apply(Transition::Next);
        assert_eq!(nav.page(), 2);

        let (nav, _) = nav.apply(Transition::Previous);
        let (nav, cmd) = nav.apply(Transition::Previous);
        assert_eq!(nav.page(), 1);
        assert_eq!(cmd.selection, "1");
    }

    #[test]
    fn test_jump_clamps() {
        let nav = Navigator::new(vec![4]).unwrap();
        assert_eq!(nav.apply(Transition::JumpTo(3)).0.page(), 3);
        assert_eq!(nav.apply(Transition::JumpTo(40)).0.page(), 4);
        assert_eq!(nav.apply(Transition::JumpTo(0)).0.page(), 1);
    }

    #[test]
    fn test_switch_document_resets_page() {
        let nav = Navigator::new(vec![4, 2, 6]).unwrap();
        let (nav, _) = nav.apply(Transition::JumpTo(4));

        let (nav, cmd) = nav.apply(Transition::SwitchDocument(2));
        assert_eq!(cmd, RenderCommand { document: 2, selection: "1".to_string() });
        assert_eq!(nav.page_label(), "Page 1 of 6");
        assert_eq!(nav.document_label(), "3 of 3 documents");

        let (nav, _) = nav.apply(Transition::SwitchDocument(9));
        assert_eq!(nav.document(), 2);
    }

    #[test]
    fn test_apply_leaves_original_untouched() {
        let nav = Navigator::new(vec![3]).unwrap();
        let (moved, _) = nav.apply(Transition::Next);
        assert_eq!(nav.page(), 1);
        assert_eq!(moved.page(), 2);
    }

    #[test]
    fn test_switch_to_document_without_pages_is_ignored() {
        let nav = Navigator::new(vec![3, 0]).unwrap();
        let (nav, _) = nav.apply(Transition::Next);
        let (after, command) = nav.apply(Transition::SwitchDocument(1));

        assert_eq!(after, nav);
        assert_eq!(after.page_label(), "Page 2 of 3");
        assert_eq!(
            command,
            RenderCommand {
                document: 0,
                selection: "2".to_string()
            }
        );
    }
}
