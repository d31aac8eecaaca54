use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use firefox_bookmarks_core::config::{FlagValues, ToolConfig, config_path, load_config};
use firefox_bookmarks_core::encoding::{OutputFormat, available_formats};
use firefox_bookmarks_core::extract::{ExtractOptions, run_extract};
use firefox_bookmarks_core::filters::available_filters;
use firefox_bookmarks_core::logging::init_logging;
use firefox_bookmarks_core::output::display_path;
use tracing::info;

const DENORMALIZE_EXAMPLE: &str = "\
Eg.
    Raw:
      | URL                   | TITLE       | FOLDER | ID | PARENT |
      |                       | Profiles    |        | 1  | 0      |
      |                       | GitHub      |        | 2  | 1      |
      | github.com/vaguecoder | Vague Coder |        | 3  | 2      |
    Denormalized:
      | URL                   | TITLE       | FOLDER          | ID | PARENT |
      | github.com/vaguecoder | Vague Coder | Profiles/GitHub | 3  | 2      |";

#[derive(Debug, Parser)]
#[command(
    name = "firefox-bookmarks",
    version,
    about = "Extract bookmarks from a Firefox places.sqlite database"
)]
struct Cli {
    #[arg(
        long,
        short = 'i',
        alias = "input-sqlite-file",
        value_name = "PATH",
        help = "Input places.sqlite file path (default \"places.sqlite\")"
    )]
    input: Option<PathBuf>,
    #[arg(
        long,
        help = format!("Fetch all bookmarks without filtering (available filters: {})", available_filters())
    )]
    raw: bool,
    #[arg(
        long,
        help = "Keep only leaf bookmarks, with the full folder path in each record",
        long_help = format!(
            "Update the full directory path in leaf bookmarks and eliminate parent directory records.\nIgnored when --raw is enabled.\n{DENORMALIZE_EXAMPLE}"
        )
    )]
    denormalize: bool,
    #[arg(
        long,
        help = "Ignore the default Mozilla bookmarks (ignored when --raw is enabled)"
    )]
    ignore_defaults: bool,
    #[arg(
        long,
        value_name = "FORMAT",
        value_parser = parse_output_format,
        help = format!("Stdout data format; defaults to table when no output files are given (available formats: {})", available_formats())
    )]
    stdout_format: Option<OutputFormat>,
    #[arg(
        long,
        value_name = "FORMAT:FILE[,FORMAT:FILE...]",
        help = "Write bookmarks to one or more files, e.g. json:bookmarks.json,csv:bookmarks.csv"
    )]
    output_files: Option<String>,
    #[arg(long, help = "Omit the column header from csv and table output")]
    no_header: bool,
    #[arg(long, help = "Discard all logs")]
    silent: bool,
    #[arg(long, value_name = "PATH", help = "Read defaults from a TOML config file")]
    config: Option<PathBuf>,
}

impl Cli {
    fn flag_values(&self) -> FlagValues {
        FlagValues {
            input: self.input.clone(),
            raw: self.raw,
            denormalize: self.denormalize,
            ignore_defaults: self.ignore_defaults,
            silent: self.silent,
            no_header: self.no_header,
            stdout_format: self.stdout_format,
            output_files: self.output_files.clone(),
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let cwd = env::current_dir().context("failed to read current directory")?;
    if let Some(path) = cli.config.as_deref()
        && !path.exists()
    {
        bail!("config file not found: {}", display_path(path));
    }
    let config = match config_path(cli.config.as_deref(), &cwd) {
        Some(path) => load_config(&path)?,
        None => ToolConfig::default(),
    };
    let settings = config.resolve(&cli.flag_values())?;

    init_logging(settings.silent);
    info!(
        input = %display_path(&settings.input),
        raw = settings.raw,
        denormalize = settings.denormalize,
        ignore_defaults = settings.ignore_defaults,
        outputs = settings.outputs.len(),
        "resolved settings"
    );

    let options = ExtractOptions::from_settings(&settings);
    let stdout = io::stdout();
    let report = run_extract(&options, &mut stdout.lock())?;

    info!(
        fetched = report.fetched,
        emitted = report.emitted,
        filters = %report.filters.join(", "),
        outputs = report.written.len(),
        "extraction complete"
    );
    Ok(())
}

fn parse_output_format(value: &str) -> Result<OutputFormat, String> {
    value.parse().map_err(|error: anyhow::Error| error.to_string())
}
