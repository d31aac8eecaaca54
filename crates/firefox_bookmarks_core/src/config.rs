use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::encoding::OutputFormat;
use crate::output::{OutputTarget, parse_output_targets};
use crate::places::PLACES_DB_FILENAME;

pub const CONFIG_ENV: &str = "FIREFOX_BOOKMARKS_CONFIG";
pub const INPUT_ENV: &str = "FIREFOX_BOOKMARKS_INPUT";
pub const DEFAULT_CONFIG_FILENAME: &str = ".firefox-bookmarks.toml";

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ToolConfig {
    #[serde(default)]
    pub extract: ExtractSection,
}

/// `[extract]` table. Every key is optional; unset keys fall through to the
/// built-in defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ExtractSection {
    pub input: Option<PathBuf>,
    pub raw: Option<bool>,
    pub denormalize: Option<bool>,
    pub ignore_defaults: Option<bool>,
    pub silent: Option<bool>,
    pub header: Option<bool>,
    pub stdout_format: Option<String>,
    #[serde(default)]
    pub output_files: Vec<String>,
}

/// Values supplied on the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct FlagValues {
    pub input: Option<PathBuf>,
    pub raw: bool,
    pub denormalize: bool,
    pub ignore_defaults: bool,
    pub silent: bool,
    pub no_header: bool,
    pub stdout_format: Option<OutputFormat>,
    pub output_files: Option<String>,
}

/// Fully resolved settings for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub input: PathBuf,
    pub raw: bool,
    pub denormalize: bool,
    pub ignore_defaults: bool,
    pub silent: bool,
    pub header: bool,
    pub stdout_format: Option<OutputFormat>,
    pub outputs: Vec<OutputTarget>,
}

/// Locate the config file: flag > env > `.firefox-bookmarks.toml` in `cwd`.
pub fn config_path(flag: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    config_path_with_lookup(flag, cwd, |key| env::var(key).ok())
}

fn config_path_with_lookup<F>(flag: Option<&Path>, cwd: &Path, lookup_env: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    if let Some(value) = lookup_env(CONFIG_ENV) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    let fallback = cwd.join(DEFAULT_CONFIG_FILENAME);
    fallback.exists().then_some(fallback)
}

/// Load and parse a ToolConfig from a TOML file. Returns default if file doesn't exist.
pub fn load_config(config_path: &Path) -> Result<ToolConfig> {
    if !config_path.exists() {
        return Ok(ToolConfig::default());
    }
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    let parsed: ToolConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    Ok(parsed)
}

impl ToolConfig {
    /// Merge flags, environment and this config: flag > env > config > default.
    pub fn resolve(&self, flags: &FlagValues) -> Result<ResolvedSettings> {
        self.resolve_with_lookup(flags, |key| env::var(key).ok())
    }

    fn resolve_with_lookup<F>(&self, flags: &FlagValues, lookup_env: F) -> Result<ResolvedSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let section = &self.extract;

        let input = flags
            .input
            .clone()
            .or_else(|| {
                lookup_env(INPUT_ENV)
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
                    .map(PathBuf::from)
            })
            .or_else(|| section.input.clone())
            .unwrap_or_else(|| PathBuf::from(PLACES_DB_FILENAME));

        let outputs = match flags.output_files.as_deref() {
            Some(value) => parse_output_targets(value)?,
            None if section.output_files.is_empty() => Vec::new(),
            None => parse_output_targets(&section.output_files.join(","))
                .context("invalid output_files in config")?,
        };

        let stdout_format = match flags.stdout_format {
            Some(format) => Some(format),
            None => section
                .stdout_format
                .as_deref()
                .map(str::parse::<OutputFormat>)
                .transpose()
                .context("invalid stdout_format in config")?,
        };

        Ok(ResolvedSettings {
            input,
            raw: flags.raw || section.raw.unwrap_or(false),
            denormalize: flags.denormalize || section.denormalize.unwrap_or(false),
            ignore_defaults: flags.ignore_defaults || section.ignore_defaults.unwrap_or(false),
            silent: flags.silent || section.silent.unwrap_or(false),
            header: !flags.no_header && section.header.unwrap_or(true),
            stdout_format,
            outputs,
        })
    }
}
