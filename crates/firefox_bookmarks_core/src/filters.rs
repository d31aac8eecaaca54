use std::fmt;

use tracing::info;

use crate::bookmark::BookmarkRecord;
use crate::defaults::remove_defaults;
use crate::denormalize::denormalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FilterKind {
    Denormalize,
    IgnoreDefaults,
}

impl FilterKind {
    pub const ALL: [FilterKind; 2] = [FilterKind::Denormalize, FilterKind::IgnoreDefaults];

    pub fn name(self) -> &'static str {
        match self {
            Self::Denormalize => "denormalize",
            Self::IgnoreDefaults => "ignore-defaults",
        }
    }

    pub fn apply(self, records: Vec<BookmarkRecord>) -> Vec<BookmarkRecord> {
        match self {
            Self::Denormalize => denormalize(records),
            Self::IgnoreDefaults => remove_defaults(records),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sorted, comma-separated filter names for help output.
pub fn available_filters() -> String {
    let mut names: Vec<&str> = FilterKind::ALL.iter().map(|kind| kind.name()).collect();
    names.sort_unstable();
    names.join(", ")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPipeline {
    stages: Vec<FilterKind>,
}

impl FilterPipeline {
    /// Build the stage list from the command-line toggles.
    ///
    /// Raw mode disables every filter. Denormalization always runs before
    /// the defaults filter, which matches on the folder paths it produces.
    pub fn from_flags(raw: bool, denormalize: bool, ignore_defaults: bool) -> Self {
        let mut stages = Vec::new();
        if raw {
            return Self { stages };
        }
        if denormalize {
            stages.push(FilterKind::Denormalize);
        }
        if ignore_defaults {
            stages.push(FilterKind::IgnoreDefaults);
        }
        Self { stages }
    }

    pub fn stages(&self) -> &[FilterKind] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn apply(&self, mut records: Vec<BookmarkRecord>) -> Vec<BookmarkRecord> {
        for stage in &self.stages {
            let before = records.len();
            records = stage.apply(records);
            info!(filter = %stage, before, after = records.len(), "applied filter");
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterKind, FilterPipeline, available_filters};
    use crate::bookmark::BookmarkRecord;

    fn firefox_tree() -> Vec<BookmarkRecord> {
        vec![
            BookmarkRecord::folder_node(1, 0, ""),
            BookmarkRecord::folder_node(2, 1, "menu"),
            BookmarkRecord::folder_node(3, 1, "toolbar"),
            BookmarkRecord::folder_node(7, 2, "Mozilla Firefox"),
            BookmarkRecord::leaf(8, 7, "Get Help", "https://support.mozilla.org"),
            BookmarkRecord::leaf(9, 7, "About Us", "https://www.mozilla.org/about/"),
            BookmarkRecord::folder_node(10, 3, "Profiles"),
            BookmarkRecord::folder_node(11, 10, "GitHub"),
            BookmarkRecord::leaf(12, 11, "Vague Coder", "https://github.com/vaguecoder"),
            BookmarkRecord::folder_node(13, 3, "Empty"),
        ]
    }

    #[test]
    fn raw_mode_disables_every_filter() {
        assert!(FilterPipeline::from_flags(true, true, true).is_empty());
    }

    #[test]
    fn denormalize_runs_before_ignore_defaults() {
        let pipeline = FilterPipeline::from_flags(false, true, true);
        assert_eq!(
            pipeline.stages(),
            &[FilterKind::Denormalize, FilterKind::IgnoreDefaults]
        );
    }

    #[test]
    fn empty_pipeline_passes_records_through() {
        let records = firefox_tree();
        let output = FilterPipeline::from_flags(false, false, false).apply(records.clone());
        assert_eq!(output, records);
    }

    #[test]
    fn denormalize_only_keeps_empty_folders() {
        let output = FilterPipeline::from_flags(false, true, false).apply(firefox_tree());

        let summary: Vec<(i64, &str)> = output
            .iter()
            .map(|record| (record.id, record.folder.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (8, "menu/Mozilla Firefox"),
                (9, "menu/Mozilla Firefox"),
                (12, "toolbar/Profiles/GitHub"),
                (13, "toolbar"),
            ]
        );
    }

    #[test]
    fn combined_filters_leave_only_user_leaves() {
        let output = FilterPipeline::from_flags(false, true, true).apply(firefox_tree());

        assert_eq!(output.len(), 1);
        assert_eq!(output[0].id, 12);
        assert_eq!(output[0].folder, "toolbar/Profiles/GitHub");
        assert_eq!(output[0].title, "Vague Coder");
    }

    #[test]
    fn ignore_defaults_alone_only_drops_folders_on_raw_shape() {
        let output = FilterPipeline::from_flags(false, false, true).apply(firefox_tree());

        let ids: Vec<i64> = output.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![8, 9, 12]);
    }

    #[test]
    fn available_filters_are_sorted() {
        assert_eq!(available_filters(), "denormalize, ignore-defaults");
        assert_eq!(FilterKind::IgnoreDefaults.to_string(), "ignore-defaults");
    }
}
