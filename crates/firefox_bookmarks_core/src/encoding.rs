use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::bookmark::{BookmarkRecord, table_rows};
use crate::table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputFormat {
    Csv,
    Json,
    Table,
    Yaml,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Csv,
        OutputFormat::Json,
        OutputFormat::Table,
        OutputFormat::Yaml,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Table => "table",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match OutputFormat::ALL
            .into_iter()
            .find(|format| format.name() == value)
        {
            Some(format) => Ok(format),
            None => bail!(
                "unknown output format `{value}` (available formats: {})",
                available_formats()
            ),
        }
    }
}

/// Sorted, comma-separated format names for help and error output.
pub fn available_formats() -> String {
    let mut names: Vec<&str> = OutputFormat::ALL.iter().map(|format| format.name()).collect();
    names.sort_unstable();
    names.join(", ")
}

/// Serialize `records` into `writer`. `include_header` only affects the CSV
/// and table formats.
pub fn encode<W: Write>(
    format: OutputFormat,
    records: &[BookmarkRecord],
    writer: &mut W,
    include_header: bool,
) -> Result<()> {
    let encoded = match format {
        OutputFormat::Json => encode_json(records, writer),
        OutputFormat::Yaml => encode_yaml(records, writer),
        OutputFormat::Csv => encode_csv(records, writer, include_header),
        OutputFormat::Table => encode_table(records, writer, include_header),
    };
    encoded.with_context(|| format!("failed to encode bookmarks as {format}"))?;
    writer
        .flush()
        .with_context(|| format!("failed to flush {format} output"))
}

fn encode_json<W: Write>(records: &[BookmarkRecord], writer: &mut W) -> Result<()> {
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut *writer, PrettyFormatter::with_indent(b"\t"));
    records
        .serialize(&mut serializer)
        .context("failed to serialize JSON")?;
    writeln!(writer).context("failed to terminate JSON output")
}

fn encode_yaml<W: Write>(records: &[BookmarkRecord], writer: &mut W) -> Result<()> {
    serde_yaml::to_writer(writer, records).context("failed to serialize YAML")
}

fn encode_csv<W: Write>(
    records: &[BookmarkRecord],
    writer: &mut W,
    include_header: bool,
) -> Result<()> {
    for row in table_rows(records, include_header) {
        let line: Vec<String> = row.iter().map(|field| csv_field(field)).collect();
        writeln!(writer, "{}", line.join(",")).context("failed to write CSV row")?;
    }
    Ok(())
}

fn encode_table<W: Write>(
    records: &[BookmarkRecord],
    writer: &mut W,
    include_header: bool,
) -> Result<()> {
    for line in table::render(&table_rows(records, include_header), include_header) {
        writeln!(writer, "{line}").context("failed to write table row")?;
    }
    Ok(())
}

fn csv_field(field: &str) -> String {
    let needs_quotes = field.starts_with(' ') || field.contains([',', '"', '\r', '\n']);
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
