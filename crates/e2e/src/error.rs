//! Error types for field validation and scenario runs

use quotecheck_common::PageName;
use thiserror::Error;

/// Which expectation a mismatch was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Count,
    Visibility,
    Enablement,
    Value,
    PreviousValue,
    UpdateCount,
    Required,
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Check::Count => write!(f, "element count"),
            Check::Visibility => write!(f, "visibility"),
            Check::Enablement => write!(f, "enablement"),
            Check::Value => write!(f, "value"),
            Check::PreviousValue => write!(f, "previous value"),
            Check::UpdateCount => write!(f, "update count"),
            Check::Required => write!(f, "required"),
        }
    }
}

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("{field} on {page}: {check} mismatch, expected {expected:?} but found {actual:?}")]
    Mismatch {
        check: Check,
        field: &'static str,
        page: PageName,
        expected: String,
        actual: String,
    },

    #[error("Dropdown list for '{field}' on page '{}' does not match: expected {expected:?}, found {actual:?}", .page.title())]
    OptionListMismatch {
        field: &'static str,
        page: PageName,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Page driver error: {0}")]
    Driver(String),

    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("'{description}' is not an option of {field}")]
    UnknownOption { field: &'static str, description: String },

    #[error("Scenario parse error: {0}")]
    ScenarioParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] quotecheck_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl E2eError {
    pub fn is_assertion(&self) -> bool {
        matches!(self, E2eError::Mismatch { .. } | E2eError::OptionListMismatch { .. })
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
