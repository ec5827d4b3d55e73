//! Page validators
//!
//! A page validator runs the validation pass of every control tracked on
//! one page, in declared order, stopping at the first failure.

use quotecheck_common::{PageName, RuleTracer, TransactionState};
use tracing::debug;

use crate::driver::PageDriver;
use crate::error::E2eResult;
use crate::field::{
    FieldController, NewBusinessCreditDropDown, RewriteReasonDropDown, SourceOfBusinessDropDown,
    TransactionTypeDropDown,
};

static QUOTE_SUMMARY_CONTROLS: [&'static dyn FieldController; 4] = [
    &TransactionTypeDropDown,
    &SourceOfBusinessDropDown,
    &NewBusinessCreditDropDown,
    &RewriteReasonDropDown,
];

static NO_CONTROLS: [&'static dyn FieldController; 0] = [];

#[derive(Clone, Copy)]
pub struct PageValidator {
    page: PageName,
    controls: &'static [&'static dyn FieldController],
}

impl PageValidator {
    pub fn for_page(page: PageName) -> Self {
        let controls: &'static [&'static dyn FieldController] = match page {
            PageName::QuoteSummary => &QUOTE_SUMMARY_CONTROLS,
            PageName::Login | PageName::PolicyInformation | PageName::Bind => &NO_CONTROLS,
        };
        Self { page, controls }
    }

    pub fn page(&self) -> PageName {
        self.page
    }

    /// Controls validated on this page, in validation order
    pub fn controls(&self) -> &'static [&'static dyn FieldController] {
        self.controls
    }

    /// Validate every control of the page against `state`
    pub async fn validate_dom_states(
        &self,
        driver: &dyn PageDriver,
        state: &mut TransactionState,
        tracer: &mut RuleTracer,
    ) -> E2eResult<()> {
        debug!(page = %self.page, controls = self.controls.len(), "validating page");
        for control in self.controls {
            control.validate(driver, state, tracer).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for PageValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.controls.iter().map(|c| c.descriptor().key).collect();
        f.debug_struct("PageValidator")
            .field("page", &self.page)
            .field("controls", &keys)
            .finish()
    }
}

/// Validate whichever page `state` says is active
pub async fn validate_active_page(
    driver: &dyn PageDriver,
    state: &mut TransactionState,
    tracer: &mut RuleTracer,
) -> E2eResult<()> {
    PageValidator::for_page(state.current_active_page)
        .validate_dom_states(driver, state, tracer)
        .await
}
