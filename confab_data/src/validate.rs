//! Batch content validation for authored dialogs.

use std::collections::HashSet;

use thiserror::Error;

use crate::graph::reachable_from;
use crate::{Dialog, Id, Target};

/// A content problem found while scanning a dialog.
///
/// These are diagnostics for the author, not runtime failures: the engine
/// tolerates all of them (a dangling target simply ends the conversation
/// early).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A response points at a page id that does not exist in the dialog.
    #[error("dialog {dialog}: page {page} response #{index} targets missing page {target}")]
    DanglingResponse { dialog: Id, page: Id, index: usize, target: Id },
    /// A page no path from the entry page can ever reach.
    #[error("dialog {dialog}: page {page} is unreachable from entry page {entry}")]
    UnreachablePage { dialog: Id, page: Id, entry: Id },
    /// A page with no responses at all, stranding the player.
    #[error("dialog {dialog}: page {page} has no responses")]
    DeadEndPage { dialog: Id, page: Id },
}

/// Scan a dialog and report every content problem found.
///
/// A response targeting its own page is a valid "ask again" cycle and is
/// not reported.
pub fn validate_dialog(dialog: &Dialog) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for page in dialog.pages() {
        if page.responses.is_empty() {
            errors.push(ValidationError::DeadEndPage {
                dialog: dialog.id(),
                page: page.id,
            });
        }
        for (index, response) in page.responses.iter().enumerate() {
            if let Target::Page(target) = response.target
                && !dialog.contains_page(target)
            {
                errors.push(ValidationError::DanglingResponse {
                    dialog: dialog.id(),
                    page: page.id,
                    index,
                    target,
                });
            }
        }
    }

    let reachable: HashSet<Id> = reachable_from(dialog, dialog.entry())
        .iter()
        .map(|page| page.id)
        .collect();
    for page in dialog.pages() {
        if page.id != dialog.entry() && !reachable.contains(&page.id) {
            errors.push(ValidationError::UnreachablePage {
                dialog: dialog.id(),
                page: page.id,
                entry: dialog.entry(),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Page, Response};

    fn response(raw_target: u16) -> Response {
        Response::new(Target::from_raw(raw_target), "...")
    }

    #[test]
    fn clean_dialog_produces_no_diagnostics() {
        let pages = vec![
            Page::new(Id::from(1), "Hello", vec![response(2)]),
            Page::new(Id::from(2), "Bye", vec![response(65535)]),
        ];
        let dialog = Dialog::new(Id::from(5), "Greeting", pages, Id::from(1)).unwrap();
        assert!(validate_dialog(&dialog).is_empty());
    }

    #[test]
    fn reports_dangling_response() {
        let pages = vec![Page::new(Id::from(1), "Hello", vec![response(7)])];
        let dialog = Dialog::new(Id::from(5), "Broken", pages, Id::from(1)).unwrap();
        let errors = validate_dialog(&dialog);
        assert_eq!(
            errors,
            vec![ValidationError::DanglingResponse {
                dialog: Id::from(5),
                page: Id::from(1),
                index: 0,
                target: Id::from(7),
            }]
        );
    }

    #[test]
    fn reports_unreachable_page() {
        let pages = vec![
            Page::new(Id::from(1), "Hello", vec![response(65535)]),
            Page::new(Id::from(2), "Orphan", vec![response(1)]),
        ];
        let dialog = Dialog::new(Id::from(5), "Orphaned", pages, Id::from(1)).unwrap();
        let errors = validate_dialog(&dialog);
        assert!(errors.contains(&ValidationError::UnreachablePage {
            dialog: Id::from(5),
            page: Id::from(2),
            entry: Id::from(1),
        }));
    }

    #[test]
    fn reports_dead_end_page() {
        let pages = vec![Page::new(Id::from(1), "Mute", Vec::new())];
        let dialog = Dialog::new(Id::from(5), "Mute", pages, Id::from(1)).unwrap();
        assert_eq!(
            validate_dialog(&dialog),
            vec![ValidationError::DeadEndPage {
                dialog: Id::from(5),
                page: Id::from(1),
            }]
        );
    }

    #[test]
    fn self_loop_is_not_dangling() {
        let pages = vec![Page::new(Id::from(1), "Again?", vec![response(1), response(65535)])];
        let dialog = Dialog::new(Id::from(5), "Loop", pages, Id::from(1)).unwrap();
        assert!(validate_dialog(&dialog).is_empty());
    }
}
