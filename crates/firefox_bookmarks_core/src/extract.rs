use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::config::ResolvedSettings;
use crate::encoding::{OutputFormat, encode};
use crate::filters::FilterPipeline;
use crate::output::{OutputTarget, display_path};
use crate::places::{PlacesSnapshot, fetch_bookmarks};

pub const STDOUT_LABEL: &str = "stdout";

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub input: PathBuf,
    pub pipeline: FilterPipeline,
    pub header: bool,
    pub stdout_format: Option<OutputFormat>,
    pub outputs: Vec<OutputTarget>,
}

impl ExtractOptions {
    /// Stdout is written when a format was asked for, or when there is no
    /// file output at all.
    pub fn from_settings(settings: &ResolvedSettings) -> Self {
        let stdout_format = settings.stdout_format.or_else(|| {
            settings
                .outputs
                .is_empty()
                .then_some(OutputFormat::Table)
        });
        Self {
            input: settings.input.clone(),
            pipeline: FilterPipeline::from_flags(
                settings.raw,
                settings.denormalize,
                settings.ignore_defaults,
            ),
            header: settings.header,
            stdout_format,
            outputs: settings.outputs.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WrittenOutput {
    pub format: String,
    pub destination: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExtractReport {
    pub fetched: usize,
    pub emitted: usize,
    pub filters: Vec<String>,
    pub written: Vec<WrittenOutput>,
}

/// Snapshot the database, fetch, filter, and encode to every destination.
pub fn run_extract<W: Write>(options: &ExtractOptions, stdout: &mut W) -> Result<ExtractReport> {
    let snapshot = PlacesSnapshot::create(&options.input)?;
    let records = fetch_bookmarks(snapshot.db_path())
        .with_context(|| format!("failed to fetch bookmarks from {}", options.input.display()))?;
    drop(snapshot);

    let fetched = records.len();
    let records = options.pipeline.apply(records);
    let mut written = Vec::new();

    for target in &options.outputs {
        let destination = display_path(&target.path);
        let mut writer = target.create()?;
        encode(target.format, &records, &mut writer, options.header)
            .with_context(|| format!("failed to write {destination}"))?;
        info!(format = %target.format, destination = %destination, "wrote bookmarks");
        written.push(WrittenOutput {
            format: target.format.to_string(),
            destination,
        });
    }

    if let Some(format) = options.stdout_format {
        encode(format, &records, stdout, options.header)
            .with_context(|| format!("failed to write {STDOUT_LABEL}"))?;
        info!(format = %format, destination = STDOUT_LABEL, "wrote bookmarks");
        written.push(WrittenOutput {
            format: format.to_string(),
            destination: STDOUT_LABEL.to_string(),
        });
    }

    Ok(ExtractReport {
        fetched,
        emitted: records.len(),
        filters: options
            .pipeline
            .stages()
            .iter()
            .map(|stage| stage.name().to_string())
            .collect(),
        written,
    })
}
