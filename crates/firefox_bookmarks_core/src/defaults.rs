use std::collections::HashSet;

use tracing::debug;

use crate::bookmark::BookmarkRecord;

/// Folder path of the bookmarks Firefox ships with every new profile.
pub const MOZILLA_FIREFOX_FOLDER: &str = "menu/Mozilla Firefox";

/// Drop the built-in Firefox bookmarks, along with every folder record.
///
/// A record whose `folder` equals [`MOZILLA_FIREFOX_FOLDER`] marks the
/// default set; markers and their direct children are removed. Records
/// without a url are removed unconditionally. Markers are collected before
/// filtering, so input order does not matter.
pub fn remove_defaults(records: Vec<BookmarkRecord>) -> Vec<BookmarkRecord> {
    let initial_count = records.len();
    let markers: HashSet<i64> = records
        .iter()
        .filter(|record| record.folder == MOZILLA_FIREFOX_FOLDER)
        .map(|record| record.id)
        .collect();

    let kept: Vec<BookmarkRecord> = records
        .into_iter()
        .filter(|record| {
            record.is_leaf() && !markers.contains(&record.id) && !markers.contains(&record.parent)
        })
        .collect();

    debug!(
        initial_count,
        markers = markers.len(),
        kept = kept.len(),
        "removed default bookmarks"
    );
    kept
}
