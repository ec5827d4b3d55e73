//! Field controllers
//!
//! One controller per dropdown on the quoting flow. Each controller owns its
//! option catalogue and six business-rule computations (presence,
//! visibility, enablement, value, option list, required), and commits value
//! changes back into the `TransactionState`.
//!
//! The validation pass and the update paths are shared through default
//! methods on `FieldController`; a concrete control only supplies its
//! descriptor, its rules and its `on_change` cascade.

pub mod new_business_credit;
pub mod rewrite_reason;
pub mod source_of_business;
pub mod transaction_type;

use async_trait::async_trait;
use quotecheck_common::{
    types, DropdownOption, FieldState, Result, RuleTracer, TransactionState,
};
use tracing::{debug, info};

use crate::assertions::{self, Target};
use crate::driver::PageDriver;
use crate::error::E2eResult;
use crate::page;

pub use new_business_credit::NewBusinessCreditDropDown;
pub use rewrite_reason::RewriteReasonDropDown;
pub use source_of_business::SourceOfBusinessDropDown;
pub use transaction_type::TransactionTypeDropDown;

/// Static declaration of a control
pub struct FieldDescriptor {
    /// State key, also the name used in scenario files
    pub key: &'static str,
    /// Label used in diagnostics and rule facts
    pub label: &'static str,
    pub selector: &'static str,
    /// Options in canonical declared order
    pub catalogue: &'static [DropdownOption],
    pub state: fn(&TransactionState) -> &FieldState,
    pub state_mut: fn(&mut TransactionState) -> &mut FieldState,
}

#[async_trait]
pub trait FieldController: Send + Sync {
    fn descriptor(&self) -> &'static FieldDescriptor;

    /// Code for `description`, "" when the catalogue has no such option
    fn code_for(&self, description: &str) -> &'static str {
        types::code_for(self.descriptor().catalogue, description)
    }

    /// Description for `code`, "" when the catalogue has no such option
    fn description_for(&self, code: &str) -> &'static str {
        types::description_for(self.descriptor().catalogue, code)
    }

    /// How many instances of the control the page should carry
    fn expected_presence(&self, state: &TransactionState, tracer: &mut RuleTracer)
        -> Result<usize>;

    fn expected_visibility(&self, state: &TransactionState, tracer: &mut RuleTracer)
        -> Result<bool>;

    fn expected_enablement(&self, state: &TransactionState, tracer: &mut RuleTracer)
        -> Result<bool>;

    fn expected_required(&self, state: &TransactionState, tracer: &mut RuleTracer)
        -> Result<bool>;

    /// Defaulted code when a default rule applies, the stored value otherwise
    fn expected_value(&self, state: &TransactionState, tracer: &mut RuleTracer)
        -> Result<String>;

    /// Option descriptions the control should offer; empty when not applicable
    fn expected_option_list(
        &self,
        state: &TransactionState,
        tracer: &mut RuleTracer,
    ) -> Result<Vec<String>>;

    /// React to a committed value change.
    ///
    /// With `cascade` unset the change is only logged: no dependent control
    /// is reset and the page is not re-validated.
    async fn on_change(
        &self,
        page: &dyn PageDriver,
        state: &mut TransactionState,
        tracer: &mut RuleTracer,
        new_code: &str,
        cascade: bool,
    ) -> E2eResult<()>;

    /// Assert the live control against the rule matrix and record the
    /// derived flags. Stops at the first failing assertion.
    async fn validate(
        &self,
        page: &dyn PageDriver,
        state: &mut TransactionState,
        tracer: &mut RuleTracer,
    ) -> E2eResult<()> {
        let field = self.descriptor();
        let target = Target {
            field: field.label,
            selector: field.selector,
            page: state.current_active_page,
            logging_on: state.is_logging_on,
        };

        let expected_count = self.expected_presence(state, tracer)?;
        assertions::assert_element_count(page, &target, expected_count).await?;
        if expected_count == 0 {
            (field.state_mut)(state).mark_absent();
            return Ok(());
        }

        let visible = self.expected_visibility(state, tracer)?;
        assertions::assert_visibility(page, &target, visible).await?;
        (field.state_mut)(state).is_visible = visible;

        let enabled = self.expected_enablement(state, tracer)?;
        assertions::assert_enablement(page, &target, enabled).await?;
        (field.state_mut)(state).is_enabled = enabled;

        let expected_value = self.expected_value(state, tracer)?;
        let actual_value = self.read_value(page, state).await?;
        assertions::assert_value(&target, &expected_value, &actual_value)?;

        if visible {
            let actual_options = page.read_options(field.selector).await?;
            let expected_options = self.expected_option_list(state, tracer)?;
            assertions::assert_option_list(&target, &expected_options, &actual_options)?;
        }

        let required = self.expected_required(state, tracer)?;
        (field.state_mut)(state).is_required_input = required;
        Ok(())
    }

    /// Read the control's live value
    async fn read_value(&self, page: &dyn PageDriver, state: &TransactionState) -> E2eResult<String> {
        let field = self.descriptor();
        let value = page.read_value(field.selector).await?;
        log_event(
            state.is_logging_on,
            &format!("{} read: {:?}", field.label, self.description_for(&value)),
        );
        Ok(value)
    }

    /// Select `new_code` on the page, then commit it to the state
    async fn commit_user_update(
        &self,
        page: &dyn PageDriver,
        state: &mut TransactionState,
        new_code: &str,
    ) -> E2eResult<()> {
        let field = self.descriptor();
        page.select(field.selector, new_code).await?;
        log_event(
            state.is_logging_on,
            &format!("{} updated: {:?}", field.label, self.description_for(new_code)),
        );
        (field.state_mut)(state).commit(new_code);
        Ok(())
    }

    /// Commit `new_code` without touching the page, then run `on_change`
    async fn commit_system_update(
        &self,
        page: &dyn PageDriver,
        state: &mut TransactionState,
        tracer: &mut RuleTracer,
        new_code: &str,
        cascade: bool,
    ) -> E2eResult<()> {
        let field = self.descriptor();
        (field.state_mut)(state).commit(new_code);
        debug!(field = field.label, code = new_code, cascade, "system update");
        self.on_change(page, state, tracer, new_code, cascade).await
    }

    /// User selection followed by its full cascade
    async fn select(
        &self,
        page: &dyn PageDriver,
        state: &mut TransactionState,
        tracer: &mut RuleTracer,
        new_code: &str,
    ) -> E2eResult<()> {
        self.commit_user_update(page, state, new_code).await?;
        self.on_change(page, state, tracer, new_code, true).await
    }
}

/// Log a rule firing with the page context facts every controller records:
/// field, page, jurisdiction, rating program and distribution channel,
/// followed by `extra`.
pub(crate) fn log_context_rule(
    tracer: &mut RuleTracer,
    rule_number: u32,
    field: &FieldDescriptor,
    state: &TransactionState,
    extra: &[(&str, &str)],
) -> Result<()> {
    let mut pairs: Vec<(&str, &str)> = vec![
        ("FIELD", field.label),
        ("PAGE", state.current_active_page.as_str()),
        ("JURS", state.jurisdiction.as_str()),
        ("RATING_PROGRAM_CODE", state.rating_program_code.as_str()),
        ("USER_DISTRIBUTION_CHANNEL", state.current_user_distribution_channel.as_str()),
    ];
    pairs.extend_from_slice(extra);
    tracer.log_rule(rule_number, &pairs)
}

/// Evaluate a rule predicate, logging its facts only when it matched
pub(crate) fn fire_if(
    matched: bool,
    tracer: &mut RuleTracer,
    rule_number: u32,
    field: &FieldDescriptor,
    state: &TransactionState,
    extra: &[(&str, &str)],
) -> Result<bool> {
    if matched {
        log_context_rule(tracer, rule_number, field, state, extra)?;
    }
    Ok(matched)
}

/// Full option list when `matched`, logged with the joined descriptions
pub(crate) fn option_list_if(
    matched: bool,
    tracer: &mut RuleTracer,
    rule_number: u32,
    field: &FieldDescriptor,
    state: &TransactionState,
) -> Result<Vec<String>> {
    if !matched {
        return Ok(Vec::new());
    }
    let options = types::descriptions(field.catalogue);
    let joined = options.join(", ");
    log_context_rule(tracer, rule_number, field, state, &[("DROP_DOWN_VALUES", joined.as_str())])?;
    Ok(options)
}

/// Shared tail of every `on_change`: re-validate the active page when the
/// change may cascade and the page asks for DOM validation.
pub(crate) async fn revalidate_if_enabled(
    page: &dyn PageDriver,
    state: &mut TransactionState,
    tracer: &mut RuleTracer,
    cascade: bool,
) -> E2eResult<()> {
    if cascade && state.dom_validation_enabled(state.current_active_page) {
        page::validate_active_page(page, state, tracer).await?;
    }
    Ok(())
}

pub(crate) fn log_event(logging_on: bool, message: &str) {
    if logging_on {
        info!("{}", message);
    } else {
        debug!("{}", message);
    }
}

static CONTROLS: [&'static dyn FieldController; 4] = [
    &TransactionTypeDropDown,
    &SourceOfBusinessDropDown,
    &NewBusinessCreditDropDown,
    &RewriteReasonDropDown,
];

/// Every tracked control
pub fn all() -> &'static [&'static dyn FieldController] {
    &CONTROLS
}

/// Resolve a control by its state key
pub fn by_name(key: &str) -> Option<&'static dyn FieldController> {
    CONTROLS
        .iter()
        .copied()
        .find(|control| control.descriptor().key == key)
}
