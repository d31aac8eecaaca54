use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::encoding::{OutputFormat, available_formats};

pub const FORMAT_FILENAME_DELIMITER: char = ':';
pub const OUTPUT_FILES_DELIMITER: char = ',';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub format: OutputFormat,
    pub path: PathBuf,
}

impl OutputTarget {
    /// Create or truncate the destination file.
    pub fn create(&self) -> Result<BufWriter<File>> {
        let file = File::create(&self.path)
            .with_context(|| format!("failed to open/create {}", self.path.display()))?;
        Ok(BufWriter::new(file))
    }
}

/// Parse `format:filename[,format:filename...]`.
///
/// Targets come back ordered by format name; targets sharing a format keep
/// their command-line order.
pub fn parse_output_targets(value: &str) -> Result<Vec<OutputTarget>> {
    let mut targets = Vec::new();

    for (index, entry) in value.split(OUTPUT_FILES_DELIMITER).enumerate() {
        let (format, filename) = entry
            .split_once(FORMAT_FILENAME_DELIMITER)
            .map(|(format, filename)| (format.trim(), filename.trim()))
            .unwrap_or((entry.trim(), ""));

        if format.is_empty() {
            if index == 0 {
                bail!(
                    "missing argument in --output-files: expected <format>{FORMAT_FILENAME_DELIMITER}<filename>[{OUTPUT_FILES_DELIMITER}<format>{FORMAT_FILENAME_DELIMITER}<filename>...]"
                );
            }
            bail!(
                "missing arguments after delimiter `{OUTPUT_FILES_DELIMITER}` in --output-files entry {}",
                index + 1
            );
        }
        if filename.is_empty() {
            bail!(
                "missing filename in --output-files entry {}: expected {format}{FORMAT_FILENAME_DELIMITER}<filename>",
                index + 1
            );
        }

        let format = format.parse::<OutputFormat>().map_err(|_| {
            anyhow::anyhow!(
                "invalid output format `{format}` in --output-files (allowed formats: {})",
                available_formats()
            )
        })?;
        targets.push(OutputTarget {
            format,
            path: PathBuf::from(filename),
        });
    }

    targets.sort_by_key(|target| target.format.name());
    Ok(targets)
}

pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
