//! CLI binary for intake-client.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `IntakeConfig`, fills the form, submits, and prints the result panel.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use intake_client::config::{DEFAULT_ORIGIN, DEFAULT_TIMEOUT_MS};
use intake_client::view::PROCESSING_LABEL;
use intake_client::{
    IntakeConfig, IntakeError, IntakeField, Notice, SubmissionController, SubmissionObserver,
    SubmissionOutcome,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
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

// ── CLI observer: spinner while in flight, notices on stderr ─────────────────

struct CliObserver {
    show_progress: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl CliObserver {
    fn new(show_progress: bool) -> Arc<Self> {
        Arc::new(Self {
            show_progress,
            bar: Mutex::new(None),
        })
    }
}

impl SubmissionObserver for CliObserver {
    fn on_submit_start(&self, field: IntakeField) {
        if !self.show_progress {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix(PROCESSING_LABEL);
        bar.set_message(format!("sending {field}"));
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn on_notice(&self, notice: &Notice) {
        let line = format!("{} {}", red("✘"), red(&notice.message));
        match self.bar.lock().ok().and_then(|slot| slot.clone()) {
            Some(bar) => bar.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }
    }

    fn on_settled(&self) {
        if let Some(bar) = self.bar.lock().ok().and_then(|mut slot| slot.take()) {
            bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Submit a PDF to the default origin (http://127.0.0.1:8000/intake/)
  intake --file invoice.pdf

  # Submit a JSON payload to a specific backend
  intake --api-url http://localhost:8000 --json '{"id": "123", "type": "order"}'

  # Submit an email body read from a file
  intake --email-file complaint.eml

  # Print a one-line classification summary after the result
  intake --summary --email 'Subject: Complaint about service'

  # Interactive form: edit slots, submit repeatedly
  intake --interactive

PRECEDENCE:
  When several inputs are given, only one is sent:
  file, then JSON body, then email body. Blank text does not count.

ENVIRONMENT VARIABLES:
  INTAKE_API_URL     API base URL (empty: relative /intake/ against the origin)
  INTAKE_ORIGIN      Origin used for relative addressing
  INTAKE_TIMEOUT_MS  Request timeout in milliseconds (default 10000)
  RUST_LOG           Log filter override (e.g. intake_client=debug)
"#;

const REPL_HELP: &str = "\
Commands:
  file <path>      choose a PDF file
  json <text>      set the JSON body (just `json` to type several lines, end with `.`)
  email <text>     set the email body (just `email` to type several lines, end with `.`)
  clear <slot>     clear file | json | email | all
  show             show the form and the latest result
  submit           send the selected input
  help             show this help
  quit             leave";

/// Submit a PDF, a JSON payload or an email body to the intake endpoint.
#[derive(Parser, Debug)]
#[command(
    name = "intake",
    version,
    about = "Submit a PDF, a JSON payload or an email body to a multi-agent intake endpoint",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to upload.
    #[arg(short, long, value_name = "PDF")]
    file: Option<PathBuf>,

    /// Raw JSON body (sent verbatim, not validated).
    #[arg(long, value_name = "TEXT", conflicts_with = "json_file")]
    json: Option<String>,

    /// Read the JSON body from a file.
    #[arg(long, value_name = "PATH")]
    json_file: Option<PathBuf>,

    /// Raw email body.
    #[arg(long, value_name = "TEXT", conflicts_with = "email_file")]
    email: Option<String>,

    /// Read the email body from a file.
    #[arg(long, value_name = "PATH")]
    email_file: Option<PathBuf>,

    /// API base URL. Empty means relative addressing against --origin.
    #[arg(long, env = "INTAKE_API_URL", default_value = "")]
    api_url: String,

    /// Origin used when the API base is empty or relative.
    #[arg(long, env = "INTAKE_ORIGIN", default_value = DEFAULT_ORIGIN)]
    origin: String,

    /// Request timeout in milliseconds.
    #[arg(long, env = "INTAKE_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS,
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: u64,

    /// Edit the form and submit repeatedly from a prompt.
    #[arg(short, long)]
    interactive: bool,

    /// Print a one-line classification summary on stderr after success.
    #[arg(long)]
    summary: bool,

    /// Disable the in-flight spinner.
    #[arg(long, env = "INTAKE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "INTAKE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, env = "INTAKE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters while a request is
    // out, so library INFO logs are hidden unless asked for.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    let filter = if cli.verbose { "debug" } else { filter };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build controller ─────────────────────────────────────────────────
    let config = build_config(&cli)?;
    if !cli.quiet {
        eprintln!(
            "{}",
            dim(&format!("→ {}", config.endpoint_url().context("Invalid endpoint")?))
        );
    }
    let controller = SubmissionController::new(config)
        .context("Failed to set up the intake client")?
        .with_observer(CliObserver::new(show_progress));

    if cli.interactive {
        return run_interactive(&controller, &cli).await;
    }

    // ── One-shot submission ──────────────────────────────────────────────
    fill_form(&controller, &cli).await?;

    match controller.submit().await {
        Ok(outcome) => {
            print_outcome(&controller, &outcome, &cli);
            Ok(if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        // The observer already showed the notice.
        Err(IntakeError::NoInputProvided) => Ok(ExitCode::FAILURE),
        Err(e) => Err(e).context("Submission failed"),
    }
}

/// Map CLI args to `IntakeConfig`.
fn build_config(cli: &Cli) -> Result<IntakeConfig> {
    IntakeConfig::builder()
        .api_base(cli.api_url.clone())
        .origin(cli.origin.clone())
        .timeout_ms(cli.timeout_ms)
        .build()
        .context("Invalid configuration")
}

/// Put every input given on the command line into its slot.
async fn fill_form(controller: &SubmissionController, cli: &Cli) -> Result<()> {
    if let Some(ref path) = cli.file {
        controller
            .load_file(path)
            .await
            .with_context(|| format!("Cannot use {:?} as the PDF file", path))?;
    }

    if let Some(ref text) = cli.json {
        controller.set_json_body(text.clone());
    } else if let Some(ref path) = cli.json_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read JSON body from {:?}", path))?;
        controller.set_json_body(text);
    }

    if let Some(ref text) = cli.email {
        controller.set_email_body(text.clone());
    } else if let Some(ref path) = cli.email_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read email body from {:?}", path))?;
        controller.set_email_body(text);
    }

    Ok(())
}

/// Print the result panel on stdout and, on request, a summary on stderr.
fn print_outcome(controller: &SubmissionController, outcome: &SubmissionOutcome, cli: &Cli) {
    let Some(result) = controller.result() else {
        return;
    };
    println!("{}", result.render());

    if cli.quiet || result.is_error() {
        return;
    }
    if cli.summary {
        match outcome.response() {
            Some(response) => eprintln!("{} {}", green("✔"), bold(&response.summary())),
            None => eprintln!("{} {}", green("✔"), dim("response has no classification")),
        }
    }
}

// ── Interactive form ─────────────────────────────────────────────────────────

async fn run_interactive(controller: &SubmissionController, cli: &Cli) -> Result<ExitCode> {
    fill_form(controller, cli).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("{}", controller.view().render());
    eprintln!("{}", dim(REPL_HELP));

    loop {
        eprint!("{} ", bold("intake>"));
        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "file" if !rest.is_empty() => match controller.load_file(rest).await {
                Ok(()) => eprintln!("{} file set", green("✓")),
                Err(e) => eprintln!("{} {}", red("✘"), red(&e.to_string())),
            },
            "file" => eprintln!("{} usage: file <path>", red("✘")),
            "json" => {
                let text = slot_text(rest, &mut lines).await?;
                controller.set_json_body(text);
            }
            "email" => {
                let text = slot_text(rest, &mut lines).await?;
                controller.set_email_body(text);
            }
            "clear" => match rest {
                "file" => controller.clear_file(),
                "json" => controller.set_json_body(""),
                "email" => controller.set_email_body(""),
                "all" => {
                    controller.clear_file();
                    controller.set_json_body("");
                    controller.set_email_body("");
                }
                other => eprintln!("{} unknown slot '{}'", red("✘"), other),
            },
            "show" => eprintln!("{}", controller.view().render()),
            "submit" => {
                let needs_ack = match controller.submit().await {
                    Ok(outcome) => {
                        print_outcome(controller, &outcome, cli);
                        outcome.notice().is_some()
                    }
                    Err(IntakeError::NoInputProvided) => true,
                    Err(e) => {
                        eprintln!("{} {}", red("✘"), red(&e.to_string()));
                        false
                    }
                };
                if needs_ack {
                    eprint!("{}", dim("Press Enter to continue…"));
                    lines.next_line().await.context("Failed to read stdin")?;
                }
            }
            "help" => eprintln!("{}", dim(REPL_HELP)),
            "quit" | "exit" => break,
            other => eprintln!("{} unknown command '{}' (try `help`)", red("✘"), other),
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Inline text after the command, or a block of lines ending with `.`.
async fn slot_text(inline: &str, lines: &mut Lines<BufReader<Stdin>>) -> Result<String> {
    if !inline.is_empty() {
        return Ok(inline.to_string());
    }

    eprintln!("{}", dim("Enter text, finish with a line containing only `.`"));
    let mut block = Vec::new();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line == "." {
            break;
        }
        block.push(line);
    }
    Ok(block.join("\n"))
}
