//! Scenario runner end to end against the mock Quote Summary page

mod common;

use common::install_quote_summary_app;
use quotecheck_common::{read_trace_log, MemorySink, PageName, TraceMode};
use quotecheck_e2e::{
    MockPage, RunnerConfig, Scenario, ScenarioRunner, SuiteResult, TraceTarget,
};

const FIRST_VISIT: &str = r#"
name: first-visit
tags: [smoke]
context:
  jurisdiction: WI
  rating_program_code: OM1
  distribution_channel: AGENT
  is_omega1: true
steps:
  - action: navigate
    page: QuoteSummary
    url: /quote/summary
  - action: validate
  - action: validate
  - action: expect_state
    field: transactionType
    visible: true
    enabled: true
    required: true
    update_count: 0
"#;

const REWRITE: &str = r#"
name: rewrite
tags: [cascade]
context:
  jurisdiction: WI
  rating_program_code: OM1
  distribution_channel: AGENT
  is_omega1: true
steps:
  - action: navigate
    page: QuoteSummary
  - action: select_description
    field: transactionType
    description: Rewrite
  - action: select
    field: rewriteReason
    code: "02"
  - action: select
    field: transactionType
    code: "02"
  - action: expect_state
    field: rewriteReason
    value: " "
    previous_value: "02"
    update_count: 2
  - action: expect_state
    field: newBusinessCredit
    value: "N"
    previous_value: "N"
    update_count: 2
"#;

const BROKEN: &str = r#"
name: broken
tags: [smoke]
context:
  is_omega2: true
steps:
  - action: navigate
    page: QuoteSummary
  - action: expect_state
    field: transactionType
    update_count: 5
  - action: validate
"#;

fn runner_config(sink: &MemorySink, mode: TraceMode, output_dir: &std::path::Path) -> RunnerConfig {
    RunnerConfig {
        trace_mode: mode,
        trace: TraceTarget::Memory(sink.clone()),
        logging_on: false,
        output_dir: output_dir.to_path_buf(),
    }
}

fn scenarios(sources: &[&str]) -> Vec<Scenario> {
    sources.iter().map(|yaml| Scenario::from_yaml(yaml).unwrap()).collect()
}

#[tokio::test]
async fn test_suite_passes_and_writes_results() {
    let dir = tempfile::tempdir().unwrap();
    let sink = MemorySink::new();
    let page = MockPage::new();
    install_quote_summary_app(&page);

    let runner = ScenarioRunner::new(&page, runner_config(&sink, TraceMode::Deferred, dir.path()));
    let suite = runner.run_all(&scenarios(&[FIRST_VISIT, REWRITE])).await.unwrap();

    assert_eq!(suite.total, 2);
    assert_eq!(suite.passed, 2, "{:?}", suite.results);
    assert_eq!(suite.failed, 0);
    assert_eq!(page.navigations(), vec!["/quote/summary"]);

    let path = runner.write_results(&suite).unwrap();
    assert_eq!(path, dir.path().join("scenario-results.json"));
    let written: SuiteResult =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written.run_id, suite.run_id);
    assert_eq!(written.results[1].name, "rewrite");
}

#[tokio::test]
async fn test_deferred_trace_is_flushed_once_per_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let sink = MemorySink::new();
    let page = MockPage::new();
    install_quote_summary_app(&page);

    let runner = ScenarioRunner::new(&page, runner_config(&sink, TraceMode::Deferred, dir.path()));
    let result = runner
        .run_scenario(&Scenario::from_yaml(FIRST_VISIT).unwrap())
        .await
        .unwrap();

    assert!(result.success);
    assert!(result.rules_flushed > 0);
    assert_eq!(sink.len(), result.rules_flushed);

    // both validate steps fire the same facts, the flush shares one timestamp
    let records = sink.records();
    assert!(records.iter().all(|r| r.timestamp == records[0].timestamp));
}

#[tokio::test]
async fn test_immediate_trace_keeps_every_firing() {
    let dir = tempfile::tempdir().unwrap();
    let deferred = MemorySink::new();
    let immediate = MemorySink::new();
    let page = MockPage::new();
    install_quote_summary_app(&page);
    let scenario = Scenario::from_yaml(FIRST_VISIT).unwrap();

    ScenarioRunner::new(&page, runner_config(&deferred, TraceMode::Deferred, dir.path()))
        .run_scenario(&scenario)
        .await
        .unwrap();
    let result = ScenarioRunner::new(&page, runner_config(&immediate, TraceMode::Immediate, dir.path()))
        .run_scenario(&scenario)
        .await
        .unwrap();

    assert_eq!(result.rules_flushed, 0);
    assert_eq!(immediate.len(), deferred.len() * 2);
}

#[tokio::test]
async fn test_failing_step_stops_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let sink = MemorySink::new();
    let page = MockPage::new();

    let runner = ScenarioRunner::new(&page, runner_config(&sink, TraceMode::Deferred, dir.path()));
    let suite = runner.run_all(&scenarios(&[BROKEN])).await.unwrap();

    assert_eq!(suite.failed, 1);
    let result = &suite.results[0];
    assert!(!result.success);
    assert_eq!(result.steps.len(), 2);
    assert!(result.steps[0].success);
    assert!(result.error.as_deref().unwrap_or_default().contains("update count"));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_unknown_field_and_option_fail_the_step() {
    let dir = tempfile::tempdir().unwrap();
    let sink = MemorySink::new();
    let page = MockPage::new();
    install_quote_summary_app(&page);
    let runner = ScenarioRunner::new(&page, runner_config(&sink, TraceMode::Deferred, dir.path()));

    let unknown_field = Scenario::from_yaml(
        "name: f\nsteps:\n  - action: select\n    field: billingPlan\n    code: '01'\n",
    )
    .unwrap();
    let result = runner.run_scenario(&unknown_field).await.unwrap();
    assert!(result.error.unwrap().contains("billingPlan"));

    let unknown_option = Scenario::from_yaml(
        "name: o\nsteps:\n  - action: select_description\n    field: transactionType\n    description: Renewal\n",
    )
    .unwrap();
    let result = runner.run_scenario(&unknown_option).await.unwrap();
    assert!(result.error.unwrap().contains("Renewal"));
}

#[tokio::test]
async fn test_file_trace_target_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("logs").join("trace.jsonl");
    let page = MockPage::new();
    install_quote_summary_app(&page);

    let config = RunnerConfig {
        trace_mode: TraceMode::Deferred,
        trace: TraceTarget::File(log.clone()),
        logging_on: true,
        output_dir: dir.path().to_path_buf(),
    };
    let runner = ScenarioRunner::new(&page, config);
    let scenario = Scenario::from_yaml(FIRST_VISIT).unwrap();
    let first = runner.run_scenario(&scenario).await.unwrap();
    runner.run_scenario(&scenario).await.unwrap();

    let records = read_trace_log(&log).unwrap();
    assert_eq!(records.len(), first.rules_flushed * 2);
    assert!(records
        .iter()
        .any(|r| r.key_value_pairs.iter().any(|kv| kv.key == "page" && kv.value == PageName::QuoteSummary.as_str())));
}

#[tokio::test]
async fn test_shipped_scenarios_pass_against_mock_app() {
    let dir = tempfile::tempdir().unwrap();
    let shipped = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios");
    let scenarios = Scenario::load_all(&shipped).unwrap();
    assert_eq!(scenarios.len(), 2);
    assert_eq!(Scenario::filter_by_tag(&scenarios, "cascade").len(), 1);

    let sink = MemorySink::new();
    let page = MockPage::new();
    install_quote_summary_app(&page);

    let runner = ScenarioRunner::new(&page, runner_config(&sink, TraceMode::Deferred, dir.path()));
    let suite = runner.run_all(&scenarios).await.unwrap();
    assert_eq!(suite.passed, 2, "{:?}", suite.results);
}
