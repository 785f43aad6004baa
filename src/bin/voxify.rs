//! CLI binary for voxify.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ClientConfig`, drives the session, and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use voxify::{
    check_health, format_file_size, process_many, process_memo_to_file, resolve_audio,
    ClientConfig, OutputFormat, ProcessedDocument, SessionController, VoxifyError,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract a task board from a memo (stdout)
  voxify standup.mp3

  # Strategic roadmap, written to a file (premium plan)
  voxify --premium --format roadmap vision.m4a -o roadmap.md

  # Process documentation from a walkthrough recording
  voxify --premium --format process deploy-walkthrough.wav

  # Constellation insight graph as JSON
  voxify --premium --format constellation retro.mp3 --json

  # Several memos at once, four uploads in flight
  voxify --concurrency 4 memo1.mp3 memo2.mp3 memo3.mp3

  # Check backend availability and demo mode, no upload
  voxify --health-only

OUTPUT FORMATS:
  Format         Plan     Result
  ─────────      ─────    ─────────────────────────────────────────────
  tasks          free     prioritised task board, next steps, notes
  roadmap        premium  market / resources / dependencies / milestones / metrics
  process        premium  overview, prerequisites, numbered steps, notes
  constellation  premium  central theme, orbits, timeline, support, patterns

ENVIRONMENT VARIABLES:
  VOXIFY_API_URL    Backend base URL (default: http://localhost:8000)
  VOXIFY_PREMIUM    Set to enable premium formats

ACCEPTED FILES:
  MP3, M4A, and WAV voice memos up to 25 MiB.
"#;

/// Turn voice memos into structured documents using the Voxify backend.
#[derive(Parser, Debug)]
#[command(
    name = "voxify",
    version,
    about = "Turn voice memos into tasks, roadmaps, process docs, and constellations",
    long_about = "Upload voice memos (MP3, M4A, WAV) to a Voxify backend for AI structuring \
and render the result as Markdown or JSON. The free plan covers the task-board format; \
roadmap, process, and constellation outputs require a premium plan.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Voice memo file(s) to process.
    #[arg(required_unless_present = "health_only")]
    inputs: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, env = "VOXIFY_FORMAT", value_enum, default_value = "tasks")]
    format: FormatArg,

    /// Backend base URL.
    #[arg(long, env = "VOXIFY_API_URL", default_value = "http://localhost:8000")]
    base_url: String,

    /// Write the Markdown document to this file instead of stdout
    /// (single input only).
    #[arg(short, long, env = "VOXIFY_OUTPUT")]
    output: Option<PathBuf>,

    /// Output the full structured result as JSON instead of Markdown.
    #[arg(long, env = "VOXIFY_JSON")]
    json: bool,

    /// Enable premium formats (roadmap, process, constellation).
    #[arg(long, env = "VOXIFY_PREMIUM")]
    premium: bool,

    /// Retries after a server-error response.
    #[arg(long, env = "VOXIFY_MAX_RETRIES", default_value_t = 3)]
    max_retries: u32,

    /// Base retry delay in milliseconds (linear backoff).
    #[arg(long, env = "VOXIFY_RETRY_DELAY_MS", default_value_t = 1000)]
    retry_delay_ms: u64,

    /// Concurrent uploads when processing several memos.
    #[arg(short, long, env = "VOXIFY_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Check backend health and exit, no upload.
    #[arg(long)]
    health_only: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "VOXIFY_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "VOXIFY_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the document itself.
    #[arg(short, long, env = "VOXIFY_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Tasks,
    Roadmap,
    Process,
    Constellation,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Tasks => OutputFormat::Tasks,
            FormatArg::Roadmap => OutputFormat::Roadmap,
            FormatArg::Process => OutputFormat::Process,
            FormatArg::Constellation => OutputFormat::Constellation,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner is the feedback channel in normal runs; keep library logs
    // at error level unless the user asked for more.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let config = ClientConfig::builder()
        .base_url(&cli.base_url)
        .premium(cli.premium)
        .max_retries(cli.max_retries)
        .retry_delay_ms(cli.retry_delay_ms)
        .concurrency(cli.concurrency)
        .build()
        .context("Invalid configuration")?;

    // ── Health-only mode ─────────────────────────────────────────────────
    if cli.health_only {
        let status = check_health(&config).await?;
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "available": status.available,
                    "demo_mode": status.demo_mode,
                })
            );
        } else {
            println!(
                "Backend:    {}",
                if status.available {
                    green("available")
                } else {
                    red("unreachable")
                }
            );
            println!(
                "Demo mode:  {}",
                if status.demo_mode { yellow("yes") } else { "no".to_string() }
            );
        }
        return Ok(());
    }

    if cli.inputs.len() > 1 && cli.output.is_some() {
        bail!("--output only works with a single input file");
    }
    if cli.json && cli.output.is_some() {
        bail!("--output writes Markdown; drop it when using --json");
    }

    // ── Session setup ────────────────────────────────────────────────────
    let mut session = SessionController::new(config.clone()).context("Session setup failed")?;
    let format: OutputFormat = cli.format.into();
    session
        .select_format(format)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let backend = session.check_health().await;
    if !cli.quiet && backend.demo_mode {
        let badge = if backend.available {
            "Demo Mode"
        } else {
            "Demo Mode (Offline)"
        };
        eprintln!("{} {}", yellow("⚠"), bold(badge));
    }

    // ── Run ──────────────────────────────────────────────────────────────
    let spinner = if show_progress {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Processing");
        bar.set_message(format!(
            "{} memo{} as {format}",
            cli.inputs.len(),
            if cli.inputs.len() == 1 { "" } else { "s" }
        ));
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    if let Some(output_path) = &cli.output {
        // Single input to file: show the size up front, write atomically.
        let input = &cli.inputs[0];
        let size = resolve_audio(input).map(|s| s.size).unwrap_or(0);
        let stats = process_memo_to_file(input, output_path, format, &config)
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
        if let Some(bar) = &spinner {
            bar.finish_and_clear();
        }
        if !cli.quiet {
            eprintln!(
                "{}  {}  {}  →  {}",
                green("✔"),
                dim(&format_file_size(size)),
                dim(&format!("{} attempts, {}ms", stats.attempts, stats.total_ms)),
                bold(&output_path.display().to_string()),
            );
            eprintln!("   {}", dim(session.completion_message()));
        }
        return Ok(());
    }

    let results = process_many(&cli.inputs, format, &config).await;
    if let Some(bar) = &spinner {
        bar.finish_and_clear();
    }

    let mut documents: Vec<(PathBuf, ProcessedDocument)> = Vec::new();
    let mut failures: Vec<(PathBuf, VoxifyError)> = Vec::new();
    for (path, result) in results {
        match result {
            Ok(doc) => documents.push((path, doc)),
            Err(e) => failures.push((path, e)),
        }
    }

    if !cli.quiet {
        for (path, doc) in &documents {
            eprintln!(
                "{} {}  {}",
                green("✓"),
                path.display(),
                dim(&format!(
                    "{} attempts, {}ms",
                    doc.stats.attempts, doc.stats.total_ms
                )),
            );
        }
        for (path, e) in &failures {
            eprintln!("{} {}  {}", red("✗"), path.display(), red(&e.user_message()));
        }
        if !documents.is_empty() {
            eprintln!("   {}", dim(session.completion_message()));
        }
    }

    if documents.is_empty() {
        bail!("all {} upload(s) failed", cli.inputs.len());
    }

    // ── Emit documents ───────────────────────────────────────────────────
    if cli.json {
        let docs: Vec<&ProcessedDocument> = documents.iter().map(|(_, d)| d).collect();
        let json = if docs.len() == 1 {
            serde_json::to_string_pretty(docs[0])
        } else {
            serde_json::to_string_pretty(&docs)
        }
        .context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for (index, (path, doc)) in documents.iter().enumerate() {
            if documents.len() > 1 {
                if index > 0 {
                    writeln!(handle)?;
                }
                writeln!(handle, "# {}\n", path.display())?;
            }
            handle
                .write_all(doc.markdown.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}
