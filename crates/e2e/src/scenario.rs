//! Declarative YAML scenario specification

use quotecheck_common::{PageName, TransactionState};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{E2eError, E2eResult};

/// A complete scenario parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique name for this scenario
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering scenarios
    #[serde(default)]
    pub tags: Vec<String>,

    /// Business context the transaction starts from
    #[serde(default)]
    pub context: ScenarioContext,

    /// Steps to execute in order
    pub steps: Vec<ScenarioStep>,
}

/// Starting business context of a scenario
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioContext {
    pub jurisdiction: String,
    pub rating_program_code: String,
    pub distribution_channel: String,
    pub is_omega1: bool,
    pub is_omega2: bool,

    /// Re-validate the Quote Summary page after every change on it
    pub dom_validation: bool,

    /// Overrides the configured `logging_on` for this scenario
    pub logging_on: Option<bool>,
}

impl ScenarioContext {
    /// Fresh transaction state for a scenario run
    pub fn initial_state(&self, logging_on: bool) -> TransactionState {
        TransactionState {
            jurisdiction: self.jurisdiction.clone(),
            rating_program_code: self.rating_program_code.clone(),
            current_user_distribution_channel: self.distribution_channel.clone(),
            is_omega1: self.is_omega1,
            is_omega2: self.is_omega2,
            enable_dom_validation_quote_summary_page: self.dom_validation,
            is_logging_on: self.logging_on.unwrap_or(logging_on),
            ..TransactionState::default()
        }
    }
}

/// A single step in a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Enter a page, optionally loading a URL (relative to base)
    Navigate {
        page: PageName,
        #[serde(default)]
        url: Option<String>,
    },

    /// Select an option by code, running the control's cascade
    Select { field: String, code: String },

    /// Select an option by its description
    SelectDescription { field: String, description: String },

    /// Validate every control of the active page
    Validate,

    /// Check the tracked state of one control
    ExpectState(StateExpectation),
}

/// Expected tracked state of a control; unset fields are not checked
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateExpectation {
    pub field: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub previous_value: Option<String>,
    #[serde(default)]
    pub update_count: Option<u32>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub required: Option<bool>,
}

impl ScenarioStep {
    /// Short label used in results and logs
    pub fn name(&self) -> String {
        match self {
            ScenarioStep::Navigate { page, .. } => format!("navigate:{}", page),
            ScenarioStep::Select { field, code } => format!("select:{}={}", field, code),
            ScenarioStep::SelectDescription { field, description } => {
                format!("select:{}={:?}", field, description)
            }
            ScenarioStep::Validate => "validate".to_string(),
            ScenarioStep::ExpectState(expectation) => format!("expect:{}", expectation.field),
        }
    }
}

impl Scenario {
    /// Parse a scenario from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        serde_yaml::from_str(yaml).map_err(E2eError::from)
    }

    /// Parse a scenario from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| E2eError::ScenarioParse(format!("{}: {}", path.display(), e)))
    }

    /// Load all scenarios from a directory, sorted by file path
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut scenarios = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            scenarios.push(Self::from_file(entry.path())?);
        }

        Ok(scenarios)
    }

    /// Filter scenarios by tag
    pub fn filter_by_tag<'a>(scenarios: &'a [Self], tag: &str) -> Vec<&'a Self> {
        scenarios
            .iter()
            .filter(|s| s.tags.iter().any(|t| t == tag))
            .collect()
    }
}
