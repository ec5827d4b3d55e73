//! Reading rule trace logs back for reporting

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;
use crate::tracer::TraceRecord;

/// Parse a JSON Lines rule log. Blank lines are skipped.
pub fn read_trace_log(path: &Path) -> Result<Vec<TraceRecord>> {
    let file = std::fs::File::open(path)?;
    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

/// Firing statistics for one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    pub rule_number: u32,
    pub firings: usize,
    /// Distinct values of the `field` fact, when present
    pub fields: Vec<String>,
    pub first_seen: String,
    pub last_seen: String,
}

/// Group records by rule number, ordered by rule number
pub fn summarize(records: &[TraceRecord]) -> Vec<RuleSummary> {
    let mut by_rule: BTreeMap<u32, RuleSummary> = BTreeMap::new();

    for record in records {
        let summary = by_rule.entry(record.rule_number).or_insert_with(|| RuleSummary {
            rule_number: record.rule_number,
            firings: 0,
            fields: Vec::new(),
            first_seen: record.timestamp.clone(),
            last_seen: record.timestamp.clone(),
        });

        summary.firings += 1;
        if record.timestamp < summary.first_seen {
            summary.first_seen = record.timestamp.clone();
        }
        if record.timestamp > summary.last_seen {
            summary.last_seen = record.timestamp.clone();
        }
        for pair in record.key_value_pairs.iter().filter(|pair| pair.key == "field") {
            if !summary.fields.contains(&pair.value) {
                summary.fields.push(pair.value.clone());
            }
        }
    }

    by_rule.into_values().collect()
}
