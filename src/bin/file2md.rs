//! CLI binary for file2md.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `ConversionRequest` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use file2md::config::DEFAULT_API_TIMEOUT_SECS;
use file2md::{
    ConversionAdapter, ConversionRequest, ConversionResult, LlmCredentials, MarkitdownEngine,
    ModelConfig, NoticeSink, Preview, PreviewKind, DEFAULT_MODEL,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Terminal notice sink ─────────────────────────────────────────────────────

/// Prints status notices above a spinner and, optionally, the preview.
struct CliNoticeSink {
    bar: ProgressBar,
    show_preview: bool,
}

impl CliNoticeSink {
    fn new(file_name: &str, show_preview: bool) -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.set_message(file_name.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar, show_preview })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl NoticeSink for CliNoticeSink {
    fn on_status(&self, message: &str) {
        self.bar.println(format!("{} {}", cyan("◆"), message));
    }

    fn on_preview(&self, preview: &Preview) {
        // Text previews repeat a status line that was already printed.
        if self.show_preview && preview.kind == PreviewKind::Markdown {
            self.bar.println(format!("{}\n{}", bold("Preview:"), dim(&preview.data)));
        }
    }
}

/// Sink used when the spinner is disabled: status lines go to stderr.
struct PlainNoticeSink {
    show_preview: bool,
}

impl NoticeSink for PlainNoticeSink {
    fn on_status(&self, message: &str) {
        eprintln!("{message}");
    }

    fn on_preview(&self, preview: &Preview) {
        if self.show_preview && preview.kind == PreviewKind::Markdown {
            eprintln!("Preview:\n{}", preview.data);
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (stdout)
  file2md report.docx

  # Convert to file, with markitdown plugins
  file2md --plugins slides.pptx -o slides.md

  # Describe an image with an OpenAI-compatible model
  FILE2MD_LLM_API_KEY=sk-... file2md --llm --base-url https://api.deepseek.com/v1 photo.jpg

  # Host-style JSON result
  file2md --json data.xlsx > result.json

ENVIRONMENT VARIABLES:
  FILE2MD_LLM_BASE_URL   OpenAI-compatible base URL (default https://api.openai.com/v1)
  FILE2MD_LLM_API_KEY    API key for enhancement
  FILE2MD_MODEL          Model name (default deepseek-chat)
  MARKITDOWN_BIN         markitdown executable (default: markitdown on PATH)

SETUP:
  pip install 'markitdown[all]'
"#;

/// Convert local documents to Markdown via markitdown.
#[derive(Parser, Debug)]
#[command(
    name = "file2md",
    version,
    about = "Convert local documents to Markdown via markitdown",
    long_about = "Convert PDF, Office, HTML, CSV, image and other local files to Markdown \
by running the markitdown CLI. With --llm, image inputs also get a description written \
by any OpenAI-compatible chat model; if the model cannot be configured the conversion \
falls back to plain mode instead of failing.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local file to convert.
    input: String,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "FILE2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Enable markitdown third-party plugins.
    #[arg(long, env = "FILE2MD_PLUGINS")]
    plugins: bool,

    /// Enhance image inputs with an LLM description.
    #[arg(long, env = "FILE2MD_LLM")]
    llm: bool,

    /// Model name used with --llm.
    #[arg(long, env = "FILE2MD_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// OpenAI-compatible base URL used with --llm.
    #[arg(long, env = "FILE2MD_LLM_BASE_URL")]
    base_url: Option<String>,

    /// API key used with --llm.
    #[arg(long, env = "FILE2MD_LLM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "FILE2MD_TEMPERATURE")]
    temperature: Option<f32>,

    /// Max LLM output tokens.
    #[arg(long, env = "FILE2MD_MAX_TOKENS")]
    max_tokens: Option<u32>,

    /// Per-request LLM timeout in seconds.
    #[arg(long, env = "FILE2MD_API_TIMEOUT", default_value_t = DEFAULT_API_TIMEOUT_SECS)]
    api_timeout: u64,

    /// Path to a text file containing a custom image-description prompt.
    #[arg(long, env = "FILE2MD_PROMPT")]
    prompt: Option<PathBuf>,

    /// markitdown executable.
    #[arg(long, env = "MARKITDOWN_BIN", default_value = "markitdown")]
    markitdown: PathBuf,

    /// Output the host-style JSON result instead of Markdown.
    #[arg(long, env = "FILE2MD_JSON")]
    json: bool,

    /// Print the 1000-character preview to stderr.
    #[arg(long, env = "FILE2MD_PREVIEW")]
    preview: bool,

    /// Disable the spinner.
    #[arg(long, env = "FILE2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FILE2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "FILE2MD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // status notices already say what is happening.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build request and adapter ────────────────────────────────────────
    let request = build_request(&cli).await?;
    let credentials = LlmCredentials::new(cli.base_url.clone(), cli.api_key.clone());
    let engine = MarkitdownEngine::new(&cli.markitdown);
    let mut adapter = ConversionAdapter::with_engine(engine, credentials);

    let spinner = if show_progress {
        let name = PathBuf::from(&cli.input)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| cli.input.clone());
        let sink = CliNoticeSink::new(&name, cli.preview);
        adapter = adapter.with_notices(sink.clone());
        Some(sink)
    } else if !cli.quiet {
        adapter = adapter.with_notices(Arc::new(PlainNoticeSink {
            show_preview: cli.preview,
        }));
        None
    } else {
        None
    };

    // ── Run conversion ───────────────────────────────────────────────────
    let outcome = match cli.output {
        Some(ref path) => adapter.run_to_file(&request, path).await,
        None => adapter.run(&request).await,
    };

    if let Some(ref s) = spinner {
        s.finish();
    }

    if cli.json {
        let failed = outcome.is_err();
        let result = ConversionResult::from_outcome(outcome);
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialise result")?
        );
        if failed {
            std::process::exit(1);
        }
        return Ok(());
    }

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{} {}", red("✘"), e.failure_message());
            std::process::exit(1);
        }
    };

    match cli.output {
        Some(ref path) => {
            if !cli.quiet {
                eprintln!(
                    "{}  {} chars  →  {}",
                    green("✔"),
                    result.markdown().chars().count(),
                    bold(&path.display().to_string()),
                );
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(result.markdown().as_bytes())
                .context("Failed to write to stdout")?;
            // Ensure a trailing newline on stdout.
            if !result.markdown().ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }
    }

    Ok(())
}

/// Map CLI args to a `ConversionRequest`.
async fn build_request(cli: &Cli) -> Result<ConversionRequest> {
    let prompt = if let Some(ref path) = cli.prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let mut builder = ConversionRequest::builder(&cli.input)
        .enable_plugins(cli.plugins)
        .llm_enhanced(cli.llm);

    if cli.llm {
        builder = builder.model_config(ModelConfig {
            model_name: cli.model.clone(),
            temperature: cli.temperature.map(|t| t.clamp(0.0, 2.0)),
            max_tokens: cli.max_tokens,
            prompt,
            api_timeout_secs: cli.api_timeout,
        });
    }

    builder.build().context("Invalid request")
}
