use serde::{Deserialize, Serialize};

pub const TABLE_HEADER: [&str; 5] = ["URL", "TITLE", "FOLDER", "ID", "PARENT"];

/// One row of `moz_bookmarks`, joined with its place URL when it has one.
///
/// `folder` is empty as fetched; the denormalizer rewrites it to the
/// slash-delimited path of ancestor folder titles.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct BookmarkRecord {
    pub url: Option<String>,
    pub title: String,
    pub folder: String,
    pub id: i64,
    pub parent: i64,
}

impl BookmarkRecord {
    pub fn leaf(id: i64, parent: i64, title: &str, url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            title: title.to_string(),
            folder: String::new(),
            id,
            parent,
        }
    }

    pub fn folder_node(id: i64, parent: i64, title: &str) -> Self {
        Self {
            url: None,
            title: title.to_string(),
            folder: String::new(),
            id,
            parent,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.url.is_some()
    }
}

/// Flatten records into the string sheet shared by the CSV and table encoders.
///
/// No records means no sheet, even when a header was requested.
pub fn table_rows(records: &[BookmarkRecord], include_header: bool) -> Vec<Vec<String>> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut sheet = Vec::with_capacity(records.len() + 1);
    if include_header {
        sheet.push(TABLE_HEADER.iter().map(|cell| cell.to_string()).collect());
    }
    for record in records {
        sheet.push(vec![
            record.url.as_deref().unwrap_or("").trim().to_string(),
            record.title.trim().to_string(),
            record.folder.trim().to_string(),
            record.id.to_string(),
            record.parent.to_string(),
        ]);
    }
    sheet
}
