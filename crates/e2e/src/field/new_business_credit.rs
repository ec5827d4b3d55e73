//! New Business Credit dropdown

use async_trait::async_trait;
use quotecheck_common::{DropdownOption, FieldState, PageName, Result, RuleTracer, TransactionState};

use super::{
    fire_if, log_context_rule, log_event, option_list_if, revalidate_if_enabled, FieldController,
    FieldDescriptor, TransactionTypeDropDown,
};
use crate::driver::PageDriver;
use crate::error::E2eResult;

pub const RULE_PRESENCE: u32 = 30;
pub const RULE_VISIBILITY: u32 = 31;
pub const RULE_ENABLEMENT: u32 = 32;
pub const RULE_DEFAULT_VALUE: u32 = 33;
pub const RULE_OPTION_LIST: u32 = 34;
pub const RULE_REQUIRED: u32 = 35;

fn state(bt: &TransactionState) -> &FieldState {
    &bt.new_business_credit
}

fn state_mut(bt: &mut TransactionState) -> &mut FieldState {
    &mut bt.new_business_credit
}

/// Whether the quote earns new business credit. Shown for transfers and
/// rewrites; only a rewrite lets the user change it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewBusinessCreditDropDown;

impl NewBusinessCreditDropDown {
    pub const YES: DropdownOption = DropdownOption::new("Y", "Yes");
    pub const NO: DropdownOption = DropdownOption::new("N", "No");
    pub const BLANK: DropdownOption = DropdownOption::BLANK;

    pub const CATALOGUE: [DropdownOption; 3] = [Self::YES, Self::NO, Self::BLANK];

    pub const DEFAULTED_VALUE: &'static str = Self::YES.code;

    fn applies(bt: &TransactionState) -> bool {
        bt.is_on(PageName::QuoteSummary) && bt.has_omega_rating_program()
    }

    /// Visible for (Transfer or Rewrite) on the Quote Summary page
    fn shown(bt: &TransactionState) -> bool {
        let transaction_type = bt.transaction_type.value.as_str();
        Self::applies(bt)
            && (transaction_type == TransactionTypeDropDown::TRANSFER.code
                || transaction_type == TransactionTypeDropDown::REWRITE.code)
    }

    fn rewriting(bt: &TransactionState) -> bool {
        Self::applies(bt) && bt.transaction_type.value == TransactionTypeDropDown::REWRITE.code
    }
}

static DESCRIPTOR: FieldDescriptor = FieldDescriptor {
    key: "newBusinessCredit",
    label: "New Business Credit",
    selector: r#"select[name="newBusinessCredit"]"#,
    catalogue: &NewBusinessCreditDropDown::CATALOGUE,
    state,
    state_mut,
};

#[async_trait]
impl FieldController for NewBusinessCreditDropDown {
    fn descriptor(&self) -> &'static FieldDescriptor {
        &DESCRIPTOR
    }

    fn expected_presence(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<usize> {
        let present = fire_if(Self::applies(bt), tracer, RULE_PRESENCE, &DESCRIPTOR, bt, &[])?;
        Ok(usize::from(present))
    }

    fn expected_visibility(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<bool> {
        let transaction_type = bt.transaction_type.value.as_str();
        fire_if(
            Self::shown(bt),
            tracer,
            RULE_VISIBILITY,
            &DESCRIPTOR,
            bt,
            &[("TRANSACTION_TYPE", transaction_type)],
        )
    }

    fn expected_enablement(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<bool> {
        let transaction_type = bt.transaction_type.value.as_str();
        fire_if(
            Self::rewriting(bt),
            tracer,
            RULE_ENABLEMENT,
            &DESCRIPTOR,
            bt,
            &[("TRANSACTION_TYPE", transaction_type)],
        )
    }

    fn expected_required(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<bool> {
        let transaction_type = bt.transaction_type.value.as_str();
        fire_if(
            Self::rewriting(bt),
            tracer,
            RULE_REQUIRED,
            &DESCRIPTOR,
            bt,
            &[("TRANSACTION_TYPE", transaction_type)],
        )
    }

    fn expected_value(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<String> {
        if Self::applies(bt) && bt.new_business_credit.update_count == 0 {
            log_context_rule(tracer, RULE_DEFAULT_VALUE, &DESCRIPTOR, bt, &[])?;
            return Ok(Self::DEFAULTED_VALUE.to_string());
        }
        Ok(bt.new_business_credit.value.clone())
    }

    fn expected_option_list(
        &self,
        bt: &TransactionState,
        tracer: &mut RuleTracer,
    ) -> Result<Vec<String>> {
        option_list_if(Self::shown(bt), tracer, RULE_OPTION_LIST, &DESCRIPTOR, bt)
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
                "NewBusinessCreditDropDown OnChange Triggered: {}",
                self.description_for(new_code).to_uppercase()
            ),
        );
        revalidate_if_enabled(page, bt, tracer, cascade).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotecheck_common::{FactKey, MemorySink};
    use test_case::test_case;

    fn state_with_transaction_type(code: &str) -> TransactionState {
        let mut bt = TransactionState {
            current_active_page: PageName::QuoteSummary,
            is_omega1: true,
            visit_count_quote_summary: 1,
            ..TransactionState::default()
        };
        bt.transaction_type.commit(code);
        bt
    }

    #[test_case("01", false, false ; "new business hides")]
    #[test_case("02", true, false ; "transfer shows read only")]
    #[test_case("03", true, true ; "rewrite shows editable")]
    #[test_case(" ", false, false ; "blank hides")]
    fn test_visibility_and_enablement(code: &str, visible: bool, enabled: bool) {
        let mut tracer = RuleTracer::immediate(MemorySink::new());
        let bt = state_with_transaction_type(code);
        assert_eq!(
            NewBusinessCreditDropDown.expected_visibility(&bt, &mut tracer).unwrap(),
            visible
        );
        assert_eq!(
            NewBusinessCreditDropDown.expected_enablement(&bt, &mut tracer).unwrap(),
            enabled
        );
    }

    #[test]
    fn test_visibility_is_page_bound() {
        let mut tracer = RuleTracer::immediate(MemorySink::new());
        let mut bt = state_with_transaction_type("02");
        bt.current_active_page = PageName::PolicyInformation;
        assert!(!NewBusinessCreditDropDown.expected_visibility(&bt, &mut tracer).unwrap());
    }

    #[test]
    fn test_visibility_fact_carries_transaction_type() {
        let sink = MemorySink::new();
        let mut tracer = RuleTracer::deferred(sink.clone());
        let bt = state_with_transaction_type("03");

        NewBusinessCreditDropDown.expected_visibility(&bt, &mut tracer).unwrap();
        let fact = &tracer.pending()[0];
        assert_eq!(fact.rule_number(), RULE_VISIBILITY);
        assert_eq!(fact.get(FactKey::TransactionType), Some("03"));
        assert_eq!(fact.get(FactKey::Field), Some("New Business Credit"));
        tracer.flush();
    }
}
