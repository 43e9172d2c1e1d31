use std::path::PathBuf;

use anyhow::Context;
use pagetext_core::config_file::ConfigFile;

use crate::Cli;

pub const DEFAULT_INPUT: &str = "input.pdf";
pub const DEFAULT_OUTPUT: &str = "extracted_text.txt";

/// Fully resolved run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub quiet: bool,
    pub header_exclusion: f32,
    pub footer_exclusion: f32,
    pub expand_ligatures: bool,
}

fn parse_ratio(name: &str, raw: &str) -> anyhow::Result<f32> {
    let ratio: f32 = raw
        .trim()
        .parse()
        .with_context(|| format!("invalid {name} value {raw:?}"))?;
    validate_ratio(name, ratio)
}

fn validate_ratio(name: &str, ratio: f32) -> anyhow::Result<f32> {
    if !ratio.is_finite() || ratio < 0.0 {
        anyhow::bail!("{name} must be a non-negative fraction of page height, got {ratio}");
    }
    Ok(ratio)
}

fn parse_flag(name: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("invalid {name} value {raw:?}, expected true or false"),
    }
}

impl Settings {
    /// Resolve configuration: CLI flags > env vars > config file > defaults.
    ///
    /// `env` looks up an environment variable; tests pass a map instead of
    /// touching the process environment.
    pub fn resolve(
        cli: &Cli,
        file: &ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let input = cli
            .input
            .clone()
            .or_else(|| env("PAGETEXT_INPUT").map(PathBuf::from))
            .or_else(|| file.input().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

        let output = cli
            .output
            .clone()
            .or_else(|| env("PAGETEXT_OUTPUT").map(PathBuf::from))
            .or_else(|| file.output().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let header_exclusion = match (cli.header_exclusion, env("PAGETEXT_HEADER_EXCLUSION")) {
            (Some(r), _) => validate_ratio("--header-exclusion", r)?,
            (None, Some(raw)) => parse_ratio("PAGETEXT_HEADER_EXCLUSION", &raw)?,
            (None, None) => validate_ratio(
                "extraction.header_exclusion",
                file.header_exclusion().unwrap_or(0.0),
            )?,
        };

        let footer_exclusion = match (cli.footer_exclusion, env("PAGETEXT_FOOTER_EXCLUSION")) {
            (Some(r), _) => validate_ratio("--footer-exclusion", r)?,
            (None, Some(raw)) => parse_ratio("PAGETEXT_FOOTER_EXCLUSION", &raw)?,
            (None, None) => validate_ratio(
                "extraction.footer_exclusion",
                file.footer_exclusion().unwrap_or(0.0),
            )?,
        };

        let cli_ligatures = if cli.expand_ligatures {
            Some(true)
        } else if cli.no_expand_ligatures {
            Some(false)
        } else {
            None
        };
        let expand_ligatures = match (cli_ligatures, env("PAGETEXT_EXPAND_LIGATURES")) {
            (Some(b), _) => b,
            (None, Some(raw)) => parse_flag("PAGETEXT_EXPAND_LIGATURES", &raw)?,
            (None, None) => file.expand_ligatures().unwrap_or(false),
        };

        Ok(Self {
            input,
            output,
            quiet: cli.quiet,
            header_exclusion,
            footer_exclusion,
            expand_ligatures,
        })
    }
}
