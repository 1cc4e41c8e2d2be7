//! Reachability analysis over a dialog's page graph.

use std::collections::{BTreeSet, VecDeque};

use crate::{Dialog, Id, Page, Target};

/// Pages transitively reachable from `root` by following response targets.
///
/// The root page itself is excluded. End-sentinel responses terminate a
/// branch, and responses targeting a missing page are skipped here (the
/// validation pass reports those separately), so the walk itself never
/// fails. A seen-set keyed by id makes the traversal safe on cyclic graphs,
/// and the result is sorted ascending by id regardless of visit order so
/// repeated runs over unchanged content are diffable.
pub fn reachable_from<'a>(dialog: &'a Dialog, root: Id) -> Vec<&'a Page> {
    let mut seen = BTreeSet::new();
    seen.insert(root);
    let mut queue = VecDeque::from([root]);

    while let Some(id) = queue.pop_front() {
        let Some(page) = dialog.page(id) else { continue };
        for response in &page.responses {
            if let Target::Page(next) = response.target
                && seen.insert(next)
            {
                queue.push_back(next);
            }
        }
    }

    seen.remove(&root);
    seen.iter().filter_map(|id| dialog.page(*id)).collect()
}
