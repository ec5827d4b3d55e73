//! Rewrite Reason dropdown

use async_trait::async_trait;
use quotecheck_common::{DropdownOption, FieldState, PageName, Result, RuleTracer, TransactionState};

use super::{
    fire_if, log_context_rule, log_event, option_list_if, revalidate_if_enabled, FieldController,
    FieldDescriptor, TransactionTypeDropDown,
};
use crate::driver::PageDriver;
use crate::error::E2eResult;

pub const RULE_PRESENCE: u32 = 20;
pub const RULE_VISIBILITY: u32 = 21;
pub const RULE_ENABLEMENT: u32 = 22;
pub const RULE_DEFAULT_VALUE: u32 = 23;
pub const RULE_OPTION_LIST: u32 = 24;
pub const RULE_REQUIRED: u32 = 25;

fn state(bt: &TransactionState) -> &FieldState {
    &bt.rewrite_reason
}

fn state_mut(bt: &mut TransactionState) -> &mut FieldState {
    &mut bt.rewrite_reason
}

/// Why a policy is being rewritten. Rendered on the Quote Summary page but
/// only shown while the transaction type is Rewrite.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteReasonDropDown;

impl RewriteReasonDropDown {
    pub const BLANK: DropdownOption = DropdownOption::BLANK;
    pub const LAPSE_IN_COVERAGE: DropdownOption = DropdownOption::new("01", "Lapse in Coverage");
    pub const UNDERWRITING_ACTION: DropdownOption = DropdownOption::new("02", "Underwriting Action");
    pub const COMPANY_INITIATED: DropdownOption = DropdownOption::new("03", "Company Initiated");
    pub const INSURED_REQUEST: DropdownOption = DropdownOption::new("04", "Insured Request");
    pub const BILLING_CHANGE: DropdownOption = DropdownOption::new("05", "Billing Change");

    pub const CATALOGUE: [DropdownOption; 6] = [
        Self::BLANK,
        Self::LAPSE_IN_COVERAGE,
        Self::UNDERWRITING_ACTION,
        Self::COMPANY_INITIATED,
        Self::INSURED_REQUEST,
        Self::BILLING_CHANGE,
    ];

    pub const DEFAULTED_VALUE: &'static str = Self::BLANK.code;

    fn applies(bt: &TransactionState) -> bool {
        bt.is_on(PageName::QuoteSummary) && bt.has_omega_rating_program()
    }

    fn rewriting(bt: &TransactionState) -> bool {
        Self::applies(bt) && bt.transaction_type.value == TransactionTypeDropDown::REWRITE.code
    }

    fn fire_when_rewriting(
        bt: &TransactionState,
        tracer: &mut RuleTracer,
        rule_number: u32,
    ) -> Result<bool> {
        let transaction_type = bt.transaction_type.value.as_str();
        fire_if(
            Self::rewriting(bt),
            tracer,
            rule_number,
            &DESCRIPTOR,
            bt,
            &[("TRANSACTION_TYPE", transaction_type)],
        )
    }
}

static DESCRIPTOR: FieldDescriptor = FieldDescriptor {
    key: "rewriteReason",
    label: "Rewrite Reason",
    selector: r#"select[name="rewriteReason"]"#,
    catalogue: &RewriteReasonDropDown::CATALOGUE,
    state,
    state_mut,
};

#[async_trait]
impl FieldController for RewriteReasonDropDown {
    fn descriptor(&self) -> &'static FieldDescriptor {
        &DESCRIPTOR
    }

    fn expected_presence(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<usize> {
        let present = fire_if(Self::applies(bt), tracer, RULE_PRESENCE, &DESCRIPTOR, bt, &[])?;
        Ok(usize::from(present))
    }

    fn expected_visibility(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<bool> {
        Self::fire_when_rewriting(bt, tracer, RULE_VISIBILITY)
    }

    fn expected_enablement(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<bool> {
        Self::fire_when_rewriting(bt, tracer, RULE_ENABLEMENT)
    }

    fn expected_required(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<bool> {
        Self::fire_when_rewriting(bt, tracer, RULE_REQUIRED)
    }

    fn expected_value(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<String> {
        if Self::applies(bt) && bt.rewrite_reason.update_count == 0 {
            log_context_rule(tracer, RULE_DEFAULT_VALUE, &DESCRIPTOR, bt, &[])?;
            return Ok(Self::DEFAULTED_VALUE.to_string());
        }
        Ok(bt.rewrite_reason.value.clone())
    }

    fn expected_option_list(
        &self,
        bt: &TransactionState,
        tracer: &mut RuleTracer,
    ) -> Result<Vec<String>> {
        option_list_if(Self::rewriting(bt), tracer, RULE_OPTION_LIST, &DESCRIPTOR, bt)
    }

    async fn on_change(
        &self,
        page: &dyn PageDriver,
        bt: &mut TransactionState,
        tracer: &mut RuleTracer,
        new_code: &str,
        cascade: bool,
    ) -> E2eResult<()> {
        log_event(
            bt.is_logging_on,
            &format!(
                "RewriteReasonDropDown OnChange Triggered: {}",
                self.description_for(new_code).to_uppercase()
            ),
        );
        revalidate_if_enabled(page, bt, tracer, cascade).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotecheck_common::MemorySink;

    fn quote_summary_state() -> TransactionState {
        TransactionState {
            current_active_page: PageName::QuoteSummary,
            is_omega1: true,
            visit_count_quote_summary: 1,
            ..TransactionState::default()
        }
    }

    #[test]
    fn test_present_but_hidden_outside_rewrite() {
        let sink = MemorySink::new();
        let mut tracer = RuleTracer::immediate(sink.clone());
        let mut bt = quote_summary_state();
        bt.transaction_type.commit(TransactionTypeDropDown::TRANSFER.code);

        assert_eq!(RewriteReasonDropDown.expected_presence(&bt, &mut tracer).unwrap(), 1);
        assert!(!RewriteReasonDropDown.expected_visibility(&bt, &mut tracer).unwrap());
        assert!(RewriteReasonDropDown.expected_option_list(&bt, &mut tracer).unwrap().is_empty());

        let rules: Vec<u32> = sink.records().iter().map(|r| r.rule_number).collect();
        assert_eq!(rules, vec![RULE_PRESENCE]);
    }

    #[test]
    fn test_rewrite_makes_it_required() {
        let mut tracer = RuleTracer::immediate(MemorySink::new());
        let mut bt = quote_summary_state();
        bt.transaction_type.commit(TransactionTypeDropDown::REWRITE.code);

        assert!(RewriteReasonDropDown.expected_visibility(&bt, &mut tracer).unwrap());
        assert!(RewriteReasonDropDown.expected_enablement(&bt, &mut tracer).unwrap());
        assert!(RewriteReasonDropDown.expected_required(&bt, &mut tracer).unwrap());
        assert_eq!(
            RewriteReasonDropDown.expected_option_list(&bt, &mut tracer).unwrap(),
            vec![
                "",
                "Lapse in Coverage",
                "Underwriting Action",
                "Company Initiated",
                "Insured Request",
                "Billing Change",
            ]
        );
    }
}
