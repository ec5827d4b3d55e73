//! Trace Commands
//!
//! Reads a JSON Lines rule trace and reports how often each rule fired.

use anyhow::{Context, Result};
use clap::Subcommand;
use quotecheck_common::{read_trace_log, summarize, RuleSummary};
use serde::Serialize;
use std::path::PathBuf;

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum TraceCommands {
    /// Per-rule firing counts
    Summary {
        /// Rule trace log (JSON Lines)
        #[arg(default_value = "business_rule_trace.jsonl")]
        log: PathBuf,
    },
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct RuleRow(RuleSummary);

impl TableDisplay for RuleRow {
    fn headers() -> Vec<&'static str> {
        vec!["Rule", "Firings", "Fields", "First Seen", "Last Seen"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.0.rule_number.to_string(),
            self.0.firings.to_string(),
            self.0.fields.join(", "),
            self.0.first_seen.clone(),
            self.0.last_seen.clone(),
        ]
    }
}

pub fn execute(cmd: TraceCommands, format: OutputFormat) -> Result<()> {
    match cmd {
        TraceCommands::Summary { log } => {
            let records = read_trace_log(&log)
                .with_context(|| format!("Failed to read rule trace {}", log.display()))?;
            let rows: Vec<RuleRow> = summarize(&records).into_iter().map(RuleRow).collect();
            print_list(&rows, format);
            Ok(())
        }
    }
}
