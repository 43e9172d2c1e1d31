use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pagetext_core::config_file::{self, ConfigFile};
use pagetext_core::{ExtractionError, PageBackend};
use pagetext_mupdf::MupdfBackend;

mod output;
mod settings;

use output::ColorMode;
use settings::Settings;

/// Dump the text of a PDF page by page, with `--- PAGE N ---` markers
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = None,
    after_help = "Exit status: 0 when the text was saved, 1 when the input was not found \
                  or extracting or saving failed."
)]
pub struct Cli {
    /// PDF file to extract [default: input.pdf]
    input: Option<PathBuf>,

    /// File the extracted text is written to (overwritten) [default: extracted_text.txt]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Read settings from this TOML file instead of the default locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only print the page count and the saved-file line
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Drop text in the top fraction of each page (e.g. 0.04)
    #[arg(long)]
    header_exclusion: Option<f32>,

    /// Drop text in the bottom fraction of each page (e.g. 0.05)
    #[arg(long)]
    footer_exclusion: Option<f32>,

    /// Replace typographic ligatures (ﬁ, ﬂ, ...) with plain letters
    #[arg(long, overrides_with = "no_expand_ligatures")]
    expand_ligatures: bool,

    /// Keep ligatures even if the config file or environment enables expansion
    #[arg(long, overrides_with = "expand_ligatures")]
    no_expand_ligatures: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// How a run ended. Only `Saved` leaves a file behind.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Saved { pages: usize },
    NotFound,
    Failed,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config_file(explicit: Option<&PathBuf>) -> anyhow::Result<ConfigFile> {
    match explicit {
        Some(path) => config_file::load_from_path(path)
            .ok_or_else(|| anyhow::anyhow!("Could not read config file {}", path.display())),
        None => Ok(config_file::load_config()),
    }
}

fn build_backend(settings: &Settings) -> MupdfBackend {
    MupdfBackend::new()
        .with_header_exclusion(settings.header_exclusion)
        .with_footer_exclusion(settings.footer_exclusion)
        .with_ligature_expansion(settings.expand_ligatures)
}

/// Extract, report and save. Every failure is turned into one printed line;
/// only I/O errors on `w` itself propagate.
fn run(
    settings: &Settings,
    backend: &dyn PageBackend,
    w: &mut dyn Write,
    color: ColorMode,
) -> std::io::Result<Outcome> {
    let doc = match pagetext_core::extract(&settings.input, backend) {
        Ok(doc) => doc,
        Err(ExtractionError::PathNotFound(path)) => {
            output::print_not_found(w, &path, color)?;
            return Ok(Outcome::NotFound);
        }
        Err(e) => {
            tracing::debug!(error = ?e, "extraction failed");
            output::print_error(w, "Error extracting text", &e, color)?;
            return Ok(Outcome::Failed);
        }
    };

    let text = doc.render();

    // Save before reporting so a closed stdout cannot cost the output file.
    if let Err(e) = pagetext_core::write_output(&settings.output, &text) {
        output::print_error(w, "Error saving text", &e, color)?;
        return Ok(Outcome::Failed);
    }

    let outcome = Outcome::Saved {
        pages: doc.page_count(),
    };
    match report_saved(settings, doc.page_count(), &text, w, color) {
        Ok(()) => Ok(outcome),
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
            tracing::debug!("stdout closed before the report finished");
            Ok(outcome)
        }
        Err(e) => Err(e),
    }
}

fn report_saved(
    settings: &Settings,
    page_count: usize,
    text: &str,
    w: &mut dyn Write,
    color: ColorMode,
) -> std::io::Result<()> {
    output::print_extraction(w, page_count, text, settings.quiet, color)?;
    output::print_saved(w, &settings.output, color)
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file = load_config_file(cli.config.as_ref())?;
    let settings = Settings::resolve(&cli, &file, |key| std::env::var(key).ok())?;
    tracing::debug!(?settings, "resolved settings");

    let use_color =
        !cli.no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();
    let color = ColorMode(use_color);

    let backend = build_backend(&settings);
    let mut stdout = std::io::stdout().lock();
    let outcome = run(&settings, &backend, &mut stdout, color)?;
    if let Err(e) = stdout.flush()
        && e.kind() != std::io::ErrorKind::BrokenPipe
    {
        return Err(e.into());
    }

    Ok(match outcome {
        Outcome::Saved { .. } => ExitCode::SUCCESS,
        Outcome::NotFound | Outcome::Failed => ExitCode::FAILURE,
    })
}
