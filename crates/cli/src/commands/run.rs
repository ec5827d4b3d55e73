//! Run Commands
//!
//! Loads scenarios, drives them through Playwright and writes the suite
//! result next to the other test output.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use quotecheck_common::TraceMode;
use quotecheck_e2e::{
    PlaywrightDriver, QuotecheckConfig, RunnerConfig, Scenario, ScenarioResult, ScenarioRunner,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::output::{print_error, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct RunArgs {
    /// Configuration file
    #[arg(short, long, default_value = "quotecheck.toml")]
    pub config: PathBuf,

    /// Scenario directory (overrides the configuration)
    #[arg(short, long)]
    pub scenarios: Option<PathBuf>,

    /// Run only scenarios carrying this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Run only the scenario with this name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Rule trace mode: immediate or deferred
    #[arg(long)]
    pub trace_mode: Option<TraceMode>,

    /// Application base URL (overrides the configuration)
    #[arg(long, env = "QUOTECHECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

#[derive(Serialize)]
pub struct ScenarioRow {
    pub name: String,
    pub success: bool,
    pub steps: usize,
    pub duration_ms: u64,
    pub rules_flushed: usize,
    pub error: Option<String>,
}

impl From<&ScenarioResult> for ScenarioRow {
    fn from(result: &ScenarioResult) -> Self {
        Self {
            name: result.name.clone(),
            success: result.success,
            steps: result.steps.len(),
            duration_ms: result.duration_ms,
            rules_flushed: result.rules_flushed,
            error: result.error.clone(),
        }
    }
}

impl TableDisplay for ScenarioRow {
    fn headers() -> Vec<&'static str> {
        vec!["Scenario", "Result", "Steps", "Duration", "Rules", "Error"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            if self.success {
                "pass".green().to_string()
            } else {
                "FAIL".red().to_string()
            },
            self.steps.to_string(),
            format!("{} ms", self.duration_ms),
            self.rules_flushed.to_string(),
            self.error.clone().unwrap_or_default(),
        ]
    }
}

pub async fn execute(args: RunArgs, format: OutputFormat) -> Result<()> {
    let mut config = QuotecheckConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    if let Some(dir) = args.scenarios {
        config.scenarios_dir = dir;
    }
    if let Some(mode) = args.trace_mode {
        config.trace.mode = mode;
    }
    if let Some(base_url) = args.base_url {
        config.playwright.base_url = base_url;
    }
    if args.headed {
        config.playwright.headless = false;
    }
    debug!(?config, "effective configuration");

    let mut scenarios = Scenario::load_all(&config.scenarios_dir).with_context(|| {
        format!("Failed to load scenarios from {}", config.scenarios_dir.display())
    })?;
    if let Some(tag) = &args.tag {
        scenarios.retain(|s| s.tags.iter().any(|t| t == tag));
    }
    if let Some(name) = &args.name {
        scenarios.retain(|s| &s.name == name);
    }
    if scenarios.is_empty() {
        bail!("No scenarios matched in {}", config.scenarios_dir.display());
    }
    info!("Loaded {} scenario(s)", scenarios.len());

    let driver = PlaywrightDriver::launch(config.playwright_config()).await?;
    let runner = ScenarioRunner::new(&driver, RunnerConfig::from_config(&config));
    let suite = runner.run_all(&scenarios).await;
    let path = match &suite {
        Ok(suite) => Some(runner.write_results(suite)),
        Err(_) => None,
    };
    drop(runner);
    driver.close().await?;

    let suite = suite?;
    let path = path.transpose()?.unwrap_or_else(|| config.results_path());

    let rows: Vec<ScenarioRow> = suite.results.iter().map(ScenarioRow::from).collect();
    print_list(&rows, format);

    if suite.failed > 0 {
        print_error(&format!(
            "{} of {} scenario(s) failed, results in {}",
            suite.failed,
            suite.total,
            path.display()
        ));
        bail!("{} scenario(s) failed", suite.failed);
    }
    print_success(&format!(
        "{} scenario(s) passed, results in {}",
        suite.passed,
        path.display()
    ));
    Ok(())
}
