//! Transaction Type dropdown

use async_trait::async_trait;
use quotecheck_common::{DropdownOption, FieldState, PageName, Result, RuleTracer, TransactionState};

use super::{
    fire_if, log_context_rule, log_event, option_list_if, revalidate_if_enabled, FieldController,
    FieldDescriptor, NewBusinessCreditDropDown, RewriteReasonDropDown,
};
use crate::driver::PageDriver;
use crate::error::E2eResult;

pub const RULE_ENABLEMENT: u32 = 5;
pub const RULE_VISIBILITY: u32 = 6;
pub const RULE_DEFAULT_VALUE: u32 = 7;
pub const RULE_PRESENCE: u32 = 8;
pub const RULE_REQUIRED: u32 = 15;
pub const RULE_OPTION_LIST: u32 = 18;

fn state(bt: &TransactionState) -> &FieldState {
    &bt.transaction_type
}

fn state_mut(bt: &mut TransactionState) -> &mut FieldState {
    &mut bt.transaction_type
}

/// Selects whether the quote is new business, a transfer or a rewrite.
/// Changing it resets New Business Credit and, when leaving Rewrite, clears
/// Rewrite Reason.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionTypeDropDown;

impl TransactionTypeDropDown {
    pub const NEW_BUSINESS: DropdownOption = DropdownOption::new("01", "New Business");
    pub const TRANSFER: DropdownOption = DropdownOption::new("02", "Transfer");
    pub const REWRITE: DropdownOption = DropdownOption::new("03", "Rewrite");
    pub const BLANK: DropdownOption = DropdownOption::BLANK;

    pub const CATALOGUE: [DropdownOption; 4] =
        [Self::NEW_BUSINESS, Self::TRANSFER, Self::REWRITE, Self::BLANK];

    /// Value the page defaults to before anyone touches the control
    pub const DEFAULTED_VALUE: &'static str = Self::NEW_BUSINESS.code;

    fn option_name(code: &str) -> &'static str {
        match code {
            c if c == Self::NEW_BUSINESS.code => "NEW_BUSINESS",
            c if c == Self::TRANSFER.code => "TRANSFER",
            c if c == Self::REWRITE.code => "REWRITE",
            c if c == Self::BLANK.code => "BLANK",
            _ => "INVALID_VALUE",
        }
    }

    fn applies(bt: &TransactionState) -> bool {
        bt.is_on(PageName::QuoteSummary) && bt.has_omega_rating_program()
    }

    async fn reset_new_business_credit(
        &self,
        page: &dyn PageDriver,
        bt: &mut TransactionState,
        tracer: &mut RuleTracer,
        code: &str,
    ) -> E2eResult<()> {
        NewBusinessCreditDropDown
            .commit_system_update(page, bt, tracer, code, false)
            .await
    }

    async fn reset_rewrite_reason(
        &self,
        page: &dyn PageDriver,
        bt: &mut TransactionState,
        tracer: &mut RuleTracer,
    ) -> E2eResult<()> {
        RewriteReasonDropDown
            .commit_system_update(page, bt, tracer, RewriteReasonDropDown::BLANK.code, false)
            .await
    }
}

static DESCRIPTOR: FieldDescriptor = FieldDescriptor {
    key: "transactionType",
    label: "Transaction Type",
    selector: r#"select[name="transactionType"]"#,
    catalogue: &TransactionTypeDropDown::CATALOGUE,
    state,
    state_mut,
};

#[async_trait]
impl FieldController for TransactionTypeDropDown {
    fn descriptor(&self) -> &'static FieldDescriptor {
        &DESCRIPTOR
    }

    fn expected_presence(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<usize> {
        let present = fire_if(Self::applies(bt), tracer, RULE_PRESENCE, &DESCRIPTOR, bt, &[])?;
        Ok(usize::from(present))
    }

    fn expected_visibility(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<bool> {
        fire_if(Self::applies(bt), tracer, RULE_VISIBILITY, &DESCRIPTOR, bt, &[])
    }

    /// Editable only on the first visit to the Quote Summary page
    fn expected_enablement(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<bool> {
        let first_visit = bt.visit_count_quote_summary == 1;
        fire_if(
            Self::applies(bt) && first_visit,
            tracer,
            RULE_ENABLEMENT,
            &DESCRIPTOR,
            bt,
            &[],
        )
    }

    fn expected_required(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<bool> {
        fire_if(Self::applies(bt), tracer, RULE_REQUIRED, &DESCRIPTOR, bt, &[])
    }

    fn expected_value(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<String> {
        let untouched = bt.transaction_type.update_count == 0;
        if Self::applies(bt) && untouched {
            log_context_rule(tracer, RULE_DEFAULT_VALUE, &DESCRIPTOR, bt, &[])?;
            return Ok(Self::DEFAULTED_VALUE.to_string());
        }
        Ok(bt.transaction_type.value.clone())
    }

    fn expected_option_list(
        &self,
        bt: &TransactionState,
        tracer: &mut RuleTracer,
    ) -> Result<Vec<String>> {
        option_list_if(Self::applies(bt), tracer, RULE_OPTION_LIST, &DESCRIPTOR, bt)
    }

    async fn on_change(
        &self,
        page: &dyn PageDriver,
        bt: &mut TransactionState,
        tracer: &mut RuleTracer,
        new_code: &str,
        cascade: bool,
    ) -> E2eResult<()> {
        let leaving_rewrite = bt.transaction_type.previous_value == Self::REWRITE.code;

        log_event(
            bt.is_logging_on,
            &format!(
                "TransactionTypeDropDown.{} OnChange Triggered",
                Self::option_name(new_code)
            ),
        );

        if !cascade {
            return Ok(());
        }

        match new_code {
            code if code == Self::NEW_BUSINESS.code || code == Self::BLANK.code => {
                self.reset_new_business_credit(page, bt, tracer, NewBusinessCreditDropDown::YES.code)
                    .await?;
                if leaving_rewrite {
                    self.reset_rewrite_reason(page, bt, tracer).await?;
                }
            }
            code if code == Self::TRANSFER.code => {
                self.reset_new_business_credit(page, bt, tracer, NewBusinessCreditDropDown::NO.code)
                    .await?;
                if leaving_rewrite {
                    self.reset_rewrite_reason(page, bt, tracer).await?;
                }
            }
            code if code == Self::REWRITE.code => {
                self.reset_new_business_credit(page, bt, tracer, NewBusinessCreditDropDown::NO.code)
                    .await?;
            }
            _ => {}
        }

        revalidate_if_enabled(page, bt, tracer, cascade).await
    }
}
