//! Quotecheck validation engine
//!
//! This crate checks a quoting web application against its business-rule
//! matrix:
//! - Field controllers compute each dropdown's expected presence,
//!   visibility, enablement, value, options and required flag from the
//!   shared transaction state
//! - Page validators assert every control of a page through a page driver
//! - Value changes cascade into dependent controls and re-validate the page
//! - Declarative YAML scenarios drive it all through Playwright
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ScenarioRunner                            │
//! │    ├── Scenario (YAML): navigate / select / validate / ...   │
//! │    ├── TransactionState (fresh per scenario)                 │
//! │    └── RuleTracer (flushed once per scenario)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PageValidator::for_page(page)                               │
//! │    └── FieldController::validate (per control, in order)    │
//! │          ├── expected_* rules ── RuleTracer::log_rule        │
//! │          └── assertions ──────── PageDriver                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PageDriver: PlaywrightDriver (node bridge) | MockPage      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod assertions;
pub mod config;
pub mod driver;
pub mod error;
pub mod field;
pub mod page;
pub mod playwright;
pub mod runner;
pub mod scenario;

pub use config::QuotecheckConfig;
pub use driver::{MockElement, MockPage, PageDriver};
pub use error::{Check, E2eError, E2eResult};
pub use field::{
    FieldController, FieldDescriptor, NewBusinessCreditDropDown, RewriteReasonDropDown,
    SourceOfBusinessDropDown, TransactionTypeDropDown,
};
pub use page::{validate_active_page, PageValidator};
pub use playwright::{Browser, PlaywrightConfig, PlaywrightDriver};
pub use runner::{RunnerConfig, ScenarioResult, ScenarioRunner, SuiteResult, TraceTarget};
pub use scenario::{Scenario, ScenarioContext, ScenarioStep, StateExpectation};

/// Control registry, keyed by state key
pub mod controls {
    pub use crate::field::{all, by_name};
}
