//! Business transaction state shared by every control of a scenario

use serde::{Deserialize, Serialize};

use crate::types::{PageName, BLANK_CODE};

/// Tracked state of a single control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldState {
    /// Current code value
    pub value: String,
    /// Code held immediately before the last committed update
    pub previous_value: String,
    /// Number of committed updates, user or system driven
    pub update_count: u32,
    pub is_enabled: bool,
    pub is_visible: bool,
    pub is_required_input: bool,
}

impl Default for FieldState {
    fn default() -> Self {
        Self {
            value: BLANK_CODE.to_string(),
            previous_value: BLANK_CODE.to_string(),
            update_count: 0,
            is_enabled: false,
            is_visible: false,
            is_required_input: false,
        }
    }
}

impl FieldState {
    /// Commit a new value. The previous value is captured before the write.
    pub fn commit(&mut self, new_value: &str) {
        self.previous_value = std::mem::replace(&mut self.value, new_value.to_string());
        self.update_count += 1;
    }

    /// Mark the control as absent from the page
    pub fn mark_absent(&mut self) {
        self.is_visible = false;
        self.is_enabled = false;
        self.is_required_input = false;
    }
}

/// The mutable business transaction threaded through a scenario.
///
/// Created once per scenario, mutated only by field controllers (values and
/// derived flags) and by page navigation, then dropped when the scenario ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionState {
    pub current_active_page: PageName,
    pub jurisdiction: String,
    pub rating_program_code: String,
    pub current_user_distribution_channel: String,
    pub is_omega1: bool,
    pub is_omega2: bool,
    pub visit_count_policy_information: u32,
    pub visit_count_quote_summary: u32,
    pub is_logging_on: bool,
    pub enable_dom_validation_quote_summary_page: bool,

    pub transaction_type: FieldState,
    pub source_of_business: FieldState,
    pub new_business_credit: FieldState,
    pub rewrite_reason: FieldState,
}

impl Default for TransactionState {
    fn default() -> Self {
        Self {
            current_active_page: PageName::default(),
            jurisdiction: String::new(),
            rating_program_code: String::new(),
            current_user_distribution_channel: String::new(),
            is_omega1: false,
            is_omega2: false,
            visit_count_policy_information: 0,
            visit_count_quote_summary: 0,
            is_logging_on: false,
            enable_dom_validation_quote_summary_page: false,
            transaction_type: FieldState::default(),
            source_of_business: FieldState::default(),
            new_business_credit: FieldState::default(),
            rewrite_reason: FieldState::default(),
        }
    }
}

impl TransactionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to `page`, bumping its visit counter
    pub fn enter_page(&mut self, page: PageName) {
        self.current_active_page = page;
        match page {
            PageName::PolicyInformation => self.visit_count_policy_information += 1,
            PageName::QuoteSummary => self.visit_count_quote_summary += 1,
            PageName::Login | PageName::Bind => {}
        }
    }

    /// Whether a change on `page` should re-validate the whole page
    pub fn dom_validation_enabled(&self, page: PageName) -> bool {
        match page {
            PageName::QuoteSummary => self.enable_dom_validation_quote_summary_page,
            _ => false,
        }
    }

    pub fn is_on(&self, page: PageName) -> bool {
        self.current_active_page == page
    }

    /// Either Omega rating program variant applies
    pub fn has_omega_rating_program(&self) -> bool {
        self.is_omega1 || self.is_omega2
    }
}
