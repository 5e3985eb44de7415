//! Folio - headless driver for the portfolio page
//!
//! Replays scenarios against the page, manages the persisted theme, and prints
//! the page outline.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_app::{open_theme_store, run_loaded_scenario, Page, PageConfig, RunConfig, Scenario};
use folio_theme::{FileStorage, ThemeStore};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Headless driver for the portfolio page
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Section tracking, reveal, and theme diagnostics for the portfolio page")]
#[command(version)]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. "folio_core=trace"
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON scenario and print its report
    Run {
        /// Scenario file
        scenario: PathBuf,

        /// Page config (defaults to the built-in portfolio)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Also write the report to this relative path
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Logical milliseconds per frame
        #[arg(long, default_value = "16")]
        tick_ms: u64,
    },
    /// Show or toggle the persisted theme preference
    Theme {
        /// Flip the preference before printing it
        #[arg(long)]
        toggle: bool,

        /// Preference file (defaults to an in-memory store)
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Print the section and block layout
    Outline {
        /// Page config (defaults to the built-in portfolio)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());

    match cli.command {
        Command::Run {
            scenario,
            config,
            report,
            tick_ms,
        } => run(&scenario, config.as_deref(), report.as_deref(), tick_ms),
        Command::Theme { toggle, store } => theme(toggle, store),
        Command::Outline { config } => outline(config.as_deref()),
    }
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PageConfig> {
    match path {
        Some(path) => PageConfig::load(path)
            .with_context(|| format!("failed to load page config {}", path.display())),
        None => Ok(PageConfig::portfolio()),
    }
}

fn run(
    scenario_path: &Path,
    config_path: Option<&Path>,
    report_path: Option<&Path>,
    tick_ms: u64,
) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let scenario = Scenario::from_path(scenario_path)?;

    tracing::info!(
        "Running {} ({} step(s))",
        scenario_path.display(),
        scenario.steps.len()
    );

    let theme = Rc::new(open_theme_store(&config.theme));
    let mut page = Page::with_theme(config, theme);
    let outcome = run_loaded_scenario(&scenario, &mut page, RunConfig { tick_ms })?;

    let report = outcome.report();
    report.write_to_writer(&mut std::io::stdout().lock())?;
    if let Some(path) = report_path {
        report.write_to_path(path)?;
        tracing::info!("Report written to {}", path.display());
    }

    if outcome.is_failed() {
        tracing::info!(
            "Scenario failed at step {}",
            report.failed_step_index.unwrap_or_default()
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn theme(toggle: bool, store: Option<PathBuf>) -> Result<ExitCode> {
    let theme = match store {
        Some(path) => ThemeStore::load(FileStorage::new(path)),
        None => ThemeStore::default(),
    };

    if toggle {
        theme.toggle();
    }
    if !theme.is_persistent() {
        tracing::info!("Theme preference is not persisted");
    }

    println!("{}", theme.preference());
    Ok(ExitCode::SUCCESS)
}

fn outline(config_path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let page = Page::with_theme(config, Rc::new(ThemeStore::default()));
    let layout = page.layout();

    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "viewport {}x{}, content height {}",
        page.viewport().size.width,
        page.viewport().size.height,
        layout.content_height()
    )?;
    for node in layout.nodes() {
        let indent = if node.section.is_some() { "    " } else { "" };
        writeln!(
            out,
            "{indent}{:<24} top {:>6} height {:>6}",
            node.id.as_str(),
            node.bounds.top(),
            node.bounds.size.height
        )?;
    }
    Ok(ExitCode::SUCCESS)
}
