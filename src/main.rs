//! pagewire CLI
//!
//! Host for the page behaviors: loads a page fixture, attaches behaviors,
//! replays a scenario and prints what the page did.
//!
//! ## Usage
//!
//! ```bash
//! # Print a built-in fixture
//! pagewire demo register > register.json
//!
//! # Attach and show the resulting page
//! pagewire run register.json
//!
//! # Replay a scenario, keeping the page log
//! pagewire run users.json --scenario browse.json --log-jsonl page.jsonl
//!
//! # Wait steps sleep for real instead of jumping the clock
//! pagewire run users.json --scenario browse.json --realtime
//!
//! # Check registration input without a page
//! pagewire validate --username ab --email x@y --full-name A
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pagewire_core::logging::{CaptureLayer, LogBuffer};
use pagewire_core::{
    validate, AttachReport, BehaviorConfig, MemoryDocument, Page, RecordingNotifier,
    RegistrationInput, Scenario, ScenarioReport, ScenarioRunner, Step, StepOutcome,
};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const REGISTER_FIXTURE: &str = include_str!("../demos/register.json");
const USERS_FIXTURE: &str = include_str!("../demos/users.json");

/// pagewire - registration and user list page behaviors
#[derive(Parser)]
#[command(name = "pagewire")]
#[command(version = "0.1.0")]
#[command(about = "pagewire - registration and user list page behaviors")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Behavior configuration (JSON); defaults apply for missing fields
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach behaviors to a page fixture and replay a scenario
    Run {
        /// Page fixture (JSON)
        fixture: PathBuf,

        /// Scenario to replay (JSON)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Sleep through wait steps instead of jumping the virtual clock
        #[arg(long)]
        realtime: bool,

        /// Write the captured page log as JSON lines
        #[arg(long)]
        log_jsonl: Option<PathBuf>,

        /// Print the scenario report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check registration input against the form rules
    Validate {
        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        full_name: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Print a built-in page fixture
    Demo {
        #[arg(value_enum)]
        page: DemoPage,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DemoPage {
    Register,
    Users,
}

impl DemoPage {
    fn fixture(self) -> &'static str {
        match self {
            DemoPage::Register => REGISTER_FIXTURE,
            DemoPage::Users => USERS_FIXTURE,
        }
    }
}

fn setup_logging(verbosity: u8, capture: Option<LogBuffer>) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        );

    // The page log keeps debug output regardless of what reaches the terminal.
    let capture_layer = capture.map(|buffer| CaptureLayer::new(buffer).with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(capture_layer)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<BehaviorConfig> {
    match path {
        Some(path) => BehaviorConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(BehaviorConfig::default()),
    }
}

fn load_fixture(path: &Path) -> Result<MemoryDocument> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture {}", path.display()))?;
    MemoryDocument::from_json(&json).with_context(|| format!("Invalid fixture {}", path.display()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_buffer = match &cli.command {
        Commands::Run { log_jsonl: Some(_), .. } => Some(LogBuffer::new()),
        _ => None,
    };
    setup_logging(cli.verbose, log_buffer.clone());

    match cli.command {
        Commands::Run {
            fixture,
            scenario,
            realtime,
            log_jsonl,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let doc = load_fixture(&fixture)?;
            let scenario = match scenario {
                Some(path) => Scenario::load(&path)
                    .with_context(|| format!("Failed to load scenario {}", path.display()))?,
                None => Scenario::default(),
            };

            let title = doc.title().to_string();
            let mut page = Page::new(doc, RecordingNotifier::new(), config);
            let attach = page.attach();
            let mut runner = ScenarioRunner::new(page);

            let report = if realtime {
                run_realtime(&mut runner, &scenario).await?
            } else {
                runner.run(&scenario).context("Scenario failed")?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_run(&title, &fixture, &attach, &report, runner.page().document());
            }

            if let (Some(path), Some(buffer)) = (log_jsonl, log_buffer) {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                let written = buffer.write_jsonl(BufWriter::new(file))?;
                tracing::debug!(entries = written, path = %path.display(), "Page log written");
            }
        }

        Commands::Validate {
            username,
            email,
            full_name,
            phone,
        } => {
            let input = RegistrationInput {
                username,
                email,
                full_name,
                phone,
            };
            let report = validate(&input);
            if report.is_valid() {
                println!("Valid.");
            } else {
                println!("Invalid:");
                for violation in &report.violations {
                    println!("  - {}", violation.message);
                }
                bail!("{} rule(s) failed", report.violations.len());
            }
        }

        Commands::Demo { page } => {
            print!("{}", page.fixture());
        }
    }

    Ok(())
}

/// Replay the scenario, sleeping through wait steps so timers fire on the
/// wall clock.
async fn run_realtime(
    runner: &mut ScenarioRunner<MemoryDocument>,
    scenario: &Scenario,
) -> Result<ScenarioReport> {
    let mut report = ScenarioReport::default();
    for step in &scenario.steps {
        let outcome = match step {
            Step::Wait { ms } => {
                let ran = sleep_and_advance(runner.page_mut(), Duration::from_millis(*ms)).await;
                let page = runner.page_mut();
                StepOutcome {
                    step: step.describe(),
                    at_ms: page.now().as_millis() as u64,
                    note: (ran > 0).then(|| format!("{} timer task(s) ran", ran)),
                    alerts: page.notifier_mut().drain(),
                    ..Default::default()
                }
            }
            _ => runner.run_step(step).context("Scenario failed")?,
        };
        report.steps.push(outcome);
    }
    Ok(report)
}

async fn sleep_and_advance(
    page: &mut Page<MemoryDocument, RecordingNotifier>,
    total: Duration,
) -> usize {
    let mut remaining = total;
    let mut ran = 0;
    while !remaining.is_zero() {
        let chunk = page
            .time_until_next_timer()
            .map_or(remaining, |next| next.min(remaining));
        tokio::time::sleep(chunk).await;
        ran += page.advance(chunk);
        remaining -= chunk;
    }
    ran
}

fn print_run(
    title: &str,
    fixture: &Path,
    attach: &AttachReport,
    report: &ScenarioReport,
    doc: &MemoryDocument,
) {
    println!("Page: {} ({})", title, fixture.display());
    let active = attach.active();
    if active.is_empty() {
        println!("Active behaviors: (none)");
    } else {
        println!("Active behaviors: {}", active.join(", "));
    }
    println!("Listeners: {}", attach.listeners);

    if !report.steps.is_empty() {
        println!();
        println!("Steps:");
        for outcome in &report.steps {
            print_outcome(outcome);
        }
    }

    let alerts = report.alerts();
    println!();
    println!("Alerts: {}", alerts.len());
    for alert in alerts {
        for line in alert.lines() {
            println!("  {}", line);
        }
    }

    println!();
    println!("Document:");
    for line in doc.outline().lines() {
        println!("  {}", line);
    }
}

fn print_outcome(outcome: &StepOutcome) {
    let mut line = format!("  [{:>5}ms] {}", outcome.at_ms, outcome.step);
    if outcome.handled > 0 {
        line.push_str(&format!(" (handled: {})", outcome.handled));
    }
    if outcome.default_prevented {
        line.push_str(" [default prevented]");
    }
    match outcome.submitted {
        Some(true) => line.push_str(" -> submitted"),
        Some(false) => line.push_str(" -> blocked"),
        None => {}
    }
    println!("{}", line);
    if let Some(note) = &outcome.note {
        println!("           {}", note);
    }
    for alert in &outcome.alerts {
        println!("           alert: {}", alert.lines().collect::<Vec<_>>().join(" | "));
    }
}
