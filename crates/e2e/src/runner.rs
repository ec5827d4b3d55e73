//! Scenario runner
//!
//! Drives scenarios against a page driver. Every scenario gets a fresh
//! transaction state and its own rule tracer, which is flushed exactly once
//! when the scenario ends, whether it passed or not.

use chrono::{DateTime, Utc};
use quotecheck_common::{
    FieldState, JsonLinesSink, MemorySink, RuleTracer, TraceMode, TransactionState,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::QuotecheckConfig;
use crate::driver::PageDriver;
use crate::error::{Check, E2eError, E2eResult};
use crate::field::{self, FieldController};
use crate::page;
use crate::scenario::{Scenario, ScenarioStep, StateExpectation};

/// Result of executing a scenario step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    /// Records written by the end-of-scenario flush
    pub rules_flushed: usize,
    /// Rule records the sink rejected
    pub trace_write_failures: usize,
    pub error: Option<String>,
}

/// Result of running all scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

/// Where rule firings of a run end up
#[derive(Debug, Clone)]
pub enum TraceTarget {
    /// JSON Lines file, appended to
    File(PathBuf),
    /// Shared in-memory buffer
    Memory(MemorySink),
}

impl TraceTarget {
    fn tracer(&self, mode: TraceMode) -> E2eResult<RuleTracer> {
        Ok(match self {
            TraceTarget::File(path) => RuleTracer::new(mode, JsonLinesSink::open(path)?),
            TraceTarget::Memory(sink) => RuleTracer::new(mode, sink.clone()),
        })
    }
}

/// Configuration for the scenario runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub trace_mode: TraceMode,
    pub trace: TraceTarget,
    pub logging_on: bool,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::from_config(&QuotecheckConfig::default())
    }
}

impl RunnerConfig {
    pub fn from_config(config: &QuotecheckConfig) -> Self {
        Self {
            trace_mode: config.trace.mode,
            trace: TraceTarget::File(config.trace.path.clone()),
            logging_on: config.logging_on,
            output_dir: config.output_dir.clone(),
        }
    }
}

/// Runs scenarios one after another against a single page driver
pub struct ScenarioRunner<'d> {
    driver: &'d dyn PageDriver,
    config: RunnerConfig,
}

impl<'d> ScenarioRunner<'d> {
    pub fn new(driver: &'d dyn PageDriver, config: RunnerConfig) -> Self {
        Self { driver, config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run a list of scenarios
    pub async fn run_all(&self, scenarios: &[Scenario]) -> E2eResult<SuiteResult> {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut results = Vec::with_capacity(scenarios.len());
        let mut passed = 0;
        let mut failed = 0;

        info!("Running {} scenario(s)...", scenarios.len());

        for scenario in scenarios {
            let result = self.run_scenario(scenario).await?;
            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Scenario results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        Ok(SuiteResult {
            run_id: Uuid::new_v4(),
            started_at,
            total: scenarios.len(),
            passed,
            failed,
            duration_ms,
            results,
        })
    }

    /// Run a single scenario, stopping at its first failing step.
    ///
    /// Step failures are reported in the result; only a trace sink that
    /// cannot be opened fails the call itself.
    pub async fn run_scenario(&self, scenario: &Scenario) -> E2eResult<ScenarioResult> {
        let start = Instant::now();
        debug!("Running scenario: {}", scenario.name);

        let mut tracer = self.config.trace.tracer(self.config.trace_mode)?;
        let mut state = scenario.context.initial_state(self.config.logging_on);
        let mut steps = Vec::with_capacity(scenario.steps.len());
        let mut scenario_error = None;

        for step in &scenario.steps {
            let step_start = Instant::now();
            let outcome = self.execute_step(step, &mut state, &mut tracer).await;
            let duration_ms = step_start.elapsed().as_millis() as u64;

            match outcome {
                Ok(()) => steps.push(StepResult {
                    name: step.name(),
                    success: true,
                    duration_ms,
                    error: None,
                }),
                Err(e) => {
                    if !e.is_assertion() {
                        warn!(scenario = %scenario.name, step = %step.name(), "step error: {}", e);
                    }
                    steps.push(StepResult {
                        name: step.name(),
                        success: false,
                        duration_ms,
                        error: Some(e.to_string()),
                    });
                    scenario_error = Some(e.to_string());
                    break;
                }
            }
        }

        let rules_flushed = tracer.flush();

        Ok(ScenarioResult {
            name: scenario.name.clone(),
            success: scenario_error.is_none(),
            duration_ms: start.elapsed().as_millis() as u64,
            steps,
            rules_flushed,
            trace_write_failures: tracer.write_failures(),
            error: scenario_error,
        })
    }

    async fn execute_step(
        &self,
        step: &ScenarioStep,
        state: &mut TransactionState,
        tracer: &mut RuleTracer,
    ) -> E2eResult<()> {
        match step {
            ScenarioStep::Navigate { page, url } => {
                if let Some(url) = url {
                    self.driver.goto(url).await?;
                }
                state.enter_page(*page);
                Ok(())
            }
            ScenarioStep::Select { field, code } => {
                let control = resolve(field)?;
                control.select(self.driver, state, tracer, code).await
            }
            ScenarioStep::SelectDescription { field, description } => {
                let control = resolve(field)?;
                let code = control.code_for(description);
                if code.is_empty() {
                    return Err(E2eError::UnknownOption {
                        field: control.descriptor().label,
                        description: description.clone(),
                    });
                }
                control.select(self.driver, state, tracer, code).await
            }
            ScenarioStep::Validate => page::validate_active_page(self.driver, state, tracer).await,
            ScenarioStep::ExpectState(expectation) => check_state(expectation, state),
        }
    }

    /// Write suite results to `output_dir/scenario-results.json`
    pub fn write_results(&self, results: &SuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("scenario-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

fn resolve(name: &str) -> E2eResult<&'static dyn FieldController> {
    field::by_name(name).ok_or_else(|| E2eError::UnknownField(name.to_string()))
}

fn check_state(expectation: &StateExpectation, state: &TransactionState) -> E2eResult<()> {
    let control = resolve(&expectation.field)?;
    let descriptor = control.descriptor();
    let actual: &FieldState = (descriptor.state)(state);

    let mismatch = |check: Check, expected: String, actual: String| E2eError::Mismatch {
        check,
        field: descriptor.label,
        page: state.current_active_page,
        expected,
        actual,
    };

    if let Some(value) = &expectation.value {
        if *value != actual.value {
            return Err(mismatch(Check::Value, value.clone(), actual.value.clone()));
        }
    }
    if let Some(previous) = &expectation.previous_value {
        if *previous != actual.previous_value {
            return Err(mismatch(
                Check::PreviousValue,
                previous.clone(),
                actual.previous_value.clone(),
            ));
        }
    }
    if let Some(count) = expectation.update_count {
        if count != actual.update_count {
            return Err(mismatch(
                Check::UpdateCount,
                count.to_string(),
                actual.update_count.to_string(),
            ));
        }
    }
    for (check, expected, actual) in [
        (Check::Visibility, expectation.visible, actual.is_visible),
        (Check::Enablement, expectation.enabled, actual.is_enabled),
        (Check::Required, expectation.required, actual.is_required_input),
    ] {
        if let Some(expected) = expected {
            if expected != actual {
                return Err(mismatch(check, expected.to_string(), actual.to_string()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotecheck_common::PageName;

    fn state_expectation(field: &str) -> StateExpectation {
        StateExpectation {
            field: field.to_string(),
            ..StateExpectation::default()
        }
    }

    #[test]
    fn test_check_state_reports_first_difference() {
        let mut state = TransactionState::new();
        state.enter_page(PageName::QuoteSummary);
        state.transaction_type.commit("03");

        let mut expectation = state_expectation("transactionType");
        expectation.value = Some("03".to_string());
        expectation.previous_value = Some(" ".to_string());
        expectation.update_count = Some(1);
        assert!(check_state(&expectation, &state).is_ok());

        expectation.update_count = Some(2);
        let err = check_state(&expectation, &state).unwrap_err();
        assert!(matches!(err, E2eError::Mismatch { check: Check::UpdateCount, .. }));
        assert!(err.to_string().contains("Transaction Type"));
    }

    #[test]
    fn test_check_state_flags() {
        let mut state = TransactionState::new();
        state.rewrite_reason.is_visible = true;

        let mut expectation = state_expectation("rewriteReason");
        expectation.visible = Some(true);
        expectation.required = Some(true);
        let err = check_state(&expectation, &state).unwrap_err();
        assert!(matches!(err, E2eError::Mismatch { check: Check::Required, .. }));
    }

    #[test]
    fn test_unknown_field() {
        let state = TransactionState::new();
        assert!(matches!(
            check_state(&state_expectation("billingPlan"), &state),
            Err(E2eError::UnknownField(_))
        ));
    }
}
