//! Core types shared by every field control

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Pages of the quoting flow that carry tracked controls or visit counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageName {
    Login,
    PolicyInformation,
    QuoteSummary,
    Bind,
}

impl Default for PageName {
    fn default() -> Self {
        Self::Login
    }
}

impl PageName {
    pub const ALL: [PageName; 4] = [
        PageName::Login,
        PageName::PolicyInformation,
        PageName::QuoteSummary,
        PageName::Bind,
    ];

    /// Identifier used in scenario files and rule facts
    pub fn as_str(&self) -> &'static str {
        match self {
            PageName::Login => "Login",
            PageName::PolicyInformation => "PolicyInformation",
            PageName::QuoteSummary => "QuoteSummary",
            PageName::Bind => "Bind",
        }
    }

    /// Human readable page title used in diagnostics
    pub fn title(&self) -> &'static str {
        match self {
            PageName::Login => "Login",
            PageName::PolicyInformation => "Policy Information",
            PageName::QuoteSummary => "Quote Summary",
            PageName::Bind => "Bind",
        }
    }
}

impl std::fmt::Display for PageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageName::ALL
            .into_iter()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| Error::UnknownPage(s.to_string()))
    }
}

/// Code of the blank option every catalogue carries
pub const BLANK_CODE: &str = " ";

/// One entry of a dropdown catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DropdownOption {
    pub code: &'static str,
    pub description: &'static str,
}

impl DropdownOption {
    pub const fn new(code: &'static str, description: &'static str) -> Self {
        Self { code, description }
    }

    pub const BLANK: DropdownOption = DropdownOption::new(BLANK_CODE, "");
}

/// Code of the option carrying `description`, or "" when the catalogue has none.
pub fn code_for(catalogue: &[DropdownOption], description: &str) -> &'static str {
    catalogue
        .iter()
        .find(|option| option.description == description)
        .map(|option| option.code)
        .unwrap_or("")
}

/// Description of the option carrying `code`, or "" when the catalogue has none.
pub fn description_for(catalogue: &[DropdownOption], code: &str) -> &'static str {
    catalogue
        .iter()
        .find(|option| option.code == code)
        .map(|option| option.description)
        .unwrap_or("")
}

/// Descriptions in declared order
pub fn descriptions(catalogue: &[DropdownOption]) -> Vec<String> {
    catalogue
        .iter()
        .map(|option| option.description.to_string())
        .collect()
}
