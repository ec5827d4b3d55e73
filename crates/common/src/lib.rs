//! Quotecheck Common Library
//!
//! Transaction state, dropdown catalogue types, the rule fact vocabulary and
//! the business rule tracer shared by the validation engine and the CLI.

pub mod error;
pub mod facts;
pub mod state;
pub mod trace_log;
pub mod tracer;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use facts::{FactKey, KeyValue, RuleFact};
pub use state::{FieldState, TransactionState};
pub use trace_log::{read_trace_log, summarize, RuleSummary};
pub use tracer::{JsonLinesSink, MemorySink, RuleTracer, TraceMode, TraceRecord, TraceSink};
pub use types::*;

/// Quotecheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
