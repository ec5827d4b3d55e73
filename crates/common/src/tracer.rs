//! Business rule tracer
//!
//! Records which rule justified each expectation computed by a field
//! controller. Two modes are supported:
//!
//! - `Immediate`: every firing is timestamped and appended to the sink as
//!   soon as it is logged.
//! - `Deferred`: firings are buffered and deduplicated on
//!   `(rule number, facts)`; `flush` timestamps and writes the unique set
//!   once, at the end of a scenario.
//!
//! Sink failures are reported through `tracing` and counted, never returned:
//! a broken log file must not turn into a field validation failure.

use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::facts::{KeyValue, RuleFact};

/// When rule firings reach the sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    Immediate,
    #[default]
    Deferred,
}

impl FromStr for TraceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "immediate" => Ok(TraceMode::Immediate),
            "deferred" => Ok(TraceMode::Deferred),
            other => Err(Error::InvalidConfig(format!("unknown trace mode: {}", other))),
        }
    }
}

/// One persisted rule-log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    pub timestamp: String,
    pub rule_number: u32,
    pub key_value_pairs: Vec<KeyValue>,
}

impl TraceRecord {
    pub fn new(timestamp: String, fact: &RuleFact) -> Self {
        Self {
            timestamp,
            rule_number: fact.rule_number(),
            key_value_pairs: fact.key_value_pairs(),
        }
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Destination of trace records
pub trait TraceSink: Send {
    fn append(&mut self, record: &TraceRecord) -> std::io::Result<()>;
}

/// Appends one JSON object per line to a file
pub struct JsonLinesSink {
    path: PathBuf,
    file: File,
}

impl JsonLinesSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TraceSink for JsonLinesSink {
    fn append(&mut self, record: &TraceRecord) -> std::io::Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.file.flush()
    }
}

/// In-memory sink; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<TraceRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl TraceSink for MemorySink {
    fn append(&mut self, record: &TraceRecord) -> std::io::Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// Scenario-scoped rule tracer
pub struct RuleTracer {
    mode: TraceMode,
    sink: Box<dyn TraceSink>,
    pending: Vec<RuleFact>,
    seen: HashSet<RuleFact>,
    write_failures: usize,
}

impl RuleTracer {
    pub fn new(mode: TraceMode, sink: impl TraceSink + 'static) -> Self {
        Self {
            mode,
            sink: Box::new(sink),
            pending: Vec::new(),
            seen: HashSet::new(),
            write_failures: 0,
        }
    }

    pub fn immediate(sink: impl TraceSink + 'static) -> Self {
        Self::new(TraceMode::Immediate, sink)
    }

    pub fn deferred(sink: impl TraceSink + 'static) -> Self {
        Self::new(TraceMode::Deferred, sink)
    }

    pub fn mode(&self) -> TraceMode {
        self.mode
    }

    /// Record that `rule_number` fired with the given symbolic facts.
    ///
    /// Fails only when a key is outside the fact vocabulary.
    pub fn log_rule(&mut self, rule_number: u32, pairs: &[(&str, &str)]) -> Result<()> {
        let fact = RuleFact::new(rule_number, pairs)?;
        self.record(fact);
        Ok(())
    }

    /// Record an already resolved fact set
    pub fn record(&mut self, fact: RuleFact) {
        debug!(rule = fact.rule_number(), "rule fired");
        match self.mode {
            TraceMode::Immediate => {
                let timestamp = now_rfc3339();
                self.write(&TraceRecord::new(timestamp, &fact));
            }
            TraceMode::Deferred => {
                if self.seen.insert(fact.clone()) {
                    self.pending.push(fact);
                }
            }
        }
    }

    /// Unique facts buffered since the last flush, in first-seen order
    pub fn pending(&self) -> &[RuleFact] {
        &self.pending
    }

    /// Write all buffered facts with one shared timestamp and clear the
    /// buffer. Returns the number of records the sink accepted.
    pub fn flush(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let timestamp = now_rfc3339();
        let pending = std::mem::take(&mut self.pending);
        self.seen.clear();

        let mut written = 0;
        for fact in &pending {
            if self.write(&TraceRecord::new(timestamp.clone(), fact)) {
                written += 1;
            }
        }
        debug!(written, "rule trace flushed");
        written
    }

    /// Records the sink rejected so far
    pub fn write_failures(&self) -> usize {
        self.write_failures
    }

    fn write(&mut self, record: &TraceRecord) -> bool {
        match self.sink.append(record) {
            Ok(()) => true,
            Err(e) => {
                self.write_failures += 1;
                warn!(rule = record.rule_number, error = %e, "failed to write rule trace record");
                false
            }
        }
    }
}

impl Drop for RuleTracer {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            warn!(
                pending = self.pending.len(),
                "rule tracer dropped with unflushed facts"
            );
        }
    }
}
