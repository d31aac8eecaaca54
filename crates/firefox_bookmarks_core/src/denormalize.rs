use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::bookmark::BookmarkRecord;

pub const FOLDER_SEPARATOR: char = '/';

/// Collapse the parent-pointer tree into leaf records annotated with their
/// full ancestor path.
///
/// Every folder that still has a live child is absorbed, smallest id first:
/// its children get the folder's own path prepended to theirs and the folder
/// leaves the working set. Absorbing a folder can only change the child set
/// of that folder's own parent, so the ready set is maintained incrementally
/// instead of rescanning the whole set after each absorption.
///
/// Folders that never had a child (and orphans or cycle members that never
/// resolve) stay in the output as-is. Callers that need leaves only must drop
/// records without a url themselves.
pub fn denormalize(records: Vec<BookmarkRecord>) -> Vec<BookmarkRecord> {
    let initial_count = records.len();

    let mut working: BTreeMap<i64, BookmarkRecord> = records
        .into_iter()
        .map(|record| (record.id, record))
        .collect();

    let mut children: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
    for record in working.values() {
        if record.parent != record.id {
            children.entry(record.parent).or_default().insert(record.id);
        }
    }
    // Child sets keyed by ids outside the working set belong to nothing
    // absorbable; they only mark root-level records.
    let mut ready: BTreeSet<i64> = children
        .keys()
        .copied()
        .filter(|id| working.contains_key(id))
        .collect();

    let mut absorbed = 0usize;
    while let Some(parent_id) = ready.pop_first() {
        let Some(parent) = working.remove(&parent_id) else {
            continue;
        };
        let parent_path = folder_path(&parent);

        for child_id in children.remove(&parent_id).unwrap_or_default() {
            if let Some(child) = working.get_mut(&child_id) {
                child.folder = if child.folder.is_empty() {
                    parent_path.clone()
                } else {
                    format!("{parent_path}{FOLDER_SEPARATOR}{}", child.folder)
                };
            }
        }

        if parent.parent != parent.id
            && let Some(siblings) = children.get_mut(&parent.parent)
        {
            siblings.remove(&parent_id);
            if siblings.is_empty() {
                ready.remove(&parent.parent);
            }
        }
        absorbed += 1;
    }

    debug!(
        initial_count,
        absorbed,
        final_count = working.len(),
        "denormalized bookmark tree"
    );

    working.into_values().collect()
}

/// Path a folder hands down to its children: its own folder plus its title.
fn folder_path(record: &BookmarkRecord) -> String {
    if record.folder.is_empty() {
        record.title.clone()
    } else {
        format!("{}{FOLDER_SEPARATOR}{}", record.folder, record.title)
    }
}
