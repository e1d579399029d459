use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use clipmark_core::{
    ExtractError, Extraction, Extractor, FetchConfig, ReadabilityConfig, classify, error_envelope, format_markdown,
    format_plain_text, success_envelope, to_json,
};
use owo_colors::OwoColorize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use url::Url;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the extraction result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, markdown, json", s)),
        }
    }
}

/// Turn a social post or web article into clean text or Markdown
#[derive(Parser, Debug)]
#[command(name = "clipmark")]
#[command(version)]
#[command(about = "Turn social posts and web articles into clean text or Markdown", long_about = None)]
struct Args {
    /// http(s) URL of a post or article
    #[arg(value_name = "URL")]
    url: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (text, markdown, json)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    format: OutputFormat,

    /// Overall deadline for the whole extraction in seconds
    #[arg(long, default_value = "20", value_name = "SECS")]
    timeout: u64,

    /// Timeout for each individual HTTP request in seconds
    #[arg(long, default_value = "10", value_name = "SECS")]
    request_timeout: u64,

    /// Custom User-Agent for article pages
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Base URL of the social mirror API
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Base URL of the social mirror HTML pages
    #[arg(long, value_name = "URL")]
    page_base: Option<String>,

    /// Elements shorter than a tenth of this many characters are not scored
    #[arg(long, default_value = "500", value_name = "NUM")]
    char_threshold: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,clipmark_core={level},clipmark={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Only absolute http(s) URLs are handed to the extractor.
fn validate_url(input: &str) -> Result<(), ExtractError> {
    match Url::parse(input) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(url) => Err(ExtractError::InvalidUrl(format!("unsupported scheme: {}", url.scheme()))),
        Err(e) => Err(ExtractError::InvalidUrl(e.to_string())),
    }
}

fn build_extractor(args: &Args) -> Result<Extractor, ExtractError> {
    let defaults = FetchConfig::default();
    let fetch = FetchConfig {
        timeout: args.request_timeout,
        browser_user_agent: args.user_agent.clone().unwrap_or(defaults.browser_user_agent),
        api_base: args.api_base.clone().unwrap_or(defaults.api_base),
        page_base: args.page_base.clone().unwrap_or(defaults.page_base),
        ..defaults
    };
    let readability = ReadabilityConfig::builder().char_threshold(args.char_threshold).build();

    Extractor::builder().fetch_config(fetch).readability_config(readability).build()
}

/// Run the extraction under an overall deadline enforced through cancellation.
async fn run(args: &Args) -> Result<Extraction, ExtractError> {
    validate_url(&args.url)?;
    let extractor = build_extractor(args)?;

    let cancel = CancellationToken::new();
    let deadline = Duration::from_secs(args.timeout);
    let watchdog = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            tracing::warn!(secs = deadline.as_secs(), "overall timeout reached, cancelling");
            cancel.cancel();
        })
    };

    let result = extractor.extract(&args.url, &cancel).await;
    watchdog.abort();
    result
}

fn render(extraction: &Extraction, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => format_plain_text(extraction),
        OutputFormat::Markdown => format_markdown(extraction),
        OutputFormat::Json => to_json(&success_envelope(extraction), true).context("Failed to encode JSON")?,
    })
}

fn write_output(output: &str, path: Option<&PathBuf>, verbose: bool) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            if verbose {
                echo::print_success(&format!("Output written to {}", path.display().bright_white()));
            }
        }
        None => println!("{}", output),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        echo::print_banner();
        echo::print_step(1, 3, &format!("Classifying {}", args.url.bright_white().underline()));
        eprintln!("  {} {}\n", "Kind:".dimmed(), classify(&args.url).as_str().bright_white());
        echo::print_step(2, 3, "Extracting content");
    }

    let started = Instant::now();
    let result = run(&args).await;

    if args.verbose {
        echo::print_timing("Extraction", started.elapsed());
    }

    let extraction = match result {
        Ok(extraction) => extraction,
        Err(err) => {
            tracing::debug!(error = %err, "extraction failed");
            let code = err.code();

            if args.format == OutputFormat::Json {
                let envelope = to_json(&error_envelope(&err), true).context("Failed to encode JSON")?;
                write_output(&envelope, args.output.as_ref(), args.verbose)?;
            } else {
                echo::print_error(&format!("{}: {}", code, code.user_message()));
                if code.offers_manual_paste() {
                    echo::print_warning("Copy the text from the page and paste it manually instead.");
                }
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.verbose {
        echo::print_extraction_details(&extraction);
        echo::print_step(3, 3, "Writing output");
    }

    let output = render(&extraction, args.format)?;

    if args.verbose {
        eprintln!("  {} {}", "Format:".dimmed(), format!("{:?}", args.format).bright_white());
        eprintln!("  {} {}\n", "Size:".dimmed(), echo::format_size(output.len()).bright_white());
    }

    write_output(&output, args.output.as_ref(), args.verbose)?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_aliases() {
        assert_eq!("md".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert_eq!("TXT".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("html".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/a").is_ok());
        assert!(validate_url("http://x.com/u/status/1").is_ok());
        assert!(matches!(validate_url("ftp://example.com"), Err(ExtractError::InvalidUrl(_))));
        assert!(matches!(validate_url("not a url"), Err(ExtractError::InvalidUrl(_))));
    }
}
