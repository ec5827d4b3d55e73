//! Source of Business dropdown

use async_trait::async_trait;
use quotecheck_common::{DropdownOption, FieldState, PageName, Result, RuleTracer, TransactionState};

use super::{
    fire_if, log_context_rule, log_event, option_list_if, revalidate_if_enabled, FieldController,
    FieldDescriptor,
};
use crate::driver::PageDriver;
use crate::error::E2eResult;

pub const RULE_PRESENCE: u32 = 40;
pub const RULE_VISIBILITY: u32 = 41;
pub const RULE_ENABLEMENT: u32 = 42;
pub const RULE_DEFAULT_VALUE: u32 = 43;
pub const RULE_OPTION_LIST: u32 = 44;
pub const RULE_REQUIRED: u32 = 45;

fn state(bt: &TransactionState) -> &FieldState {
    &bt.source_of_business
}

fn state_mut(bt: &mut TransactionState) -> &mut FieldState {
    &mut bt.source_of_business
}

/// Marketing channel the quote came in through. No cascades.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceOfBusinessDropDown;

impl SourceOfBusinessDropDown {
    pub const QUICK_QUOTE: DropdownOption = DropdownOption::new("54", "Quick Quote");
    pub const AFFINITY_ONSITE: DropdownOption = DropdownOption::new("37", "Affinity Onsite");
    pub const CUNA_ONSITE_VISIT: DropdownOption = DropdownOption::new("51", "CUNA - Onsite Visit");
    pub const CUNA_LOCAL_MARKETING: DropdownOption =
        DropdownOption::new("52", "CUNA - Local Marketing");
    pub const CUNA_REFERRAL: DropdownOption = DropdownOption::new("53", "CUNA - Referral");
    pub const PRIOR_POLICYHOLDER: DropdownOption = DropdownOption::new("09", "Prior Policyholder");
    pub const LM_COM: DropdownOption = DropdownOption::new("15", "LM.com");
    pub const SOCIAL_MEDIA_FACEBOOK: DropdownOption =
        DropdownOption::new("47", "Social Media: Facebook");
    pub const SOCIAL_MEDIA_LINKEDIN: DropdownOption =
        DropdownOption::new("48", "Social Media: LinkedIn");
    pub const SON_DAUGHTER_REWRITE: DropdownOption = DropdownOption::new("11", "Son/Daughter Rewrite");
    pub const DIRECT_DEALERSHIP_REFERRAL_PROGRAM: DropdownOption =
        DropdownOption::new("45", "Direct Dealership Referral Program");
    pub const AFFINITY_DEALERSHIP_REFERRAL_PROGRAM: DropdownOption =
        DropdownOption::new("38", "Affinity Dealership Referral Program");
    pub const SMALL_MORTGAGE_COMPANY_BANK_PARTNERSHIP: DropdownOption =
        DropdownOption::new("46", "Small Mortgage Company/Bank Partnerships");
    pub const REFERRAL_AFFINITY_BANK_LENDER: DropdownOption =
        DropdownOption::new("39", "Referral - Affinity Bank/Lender");
    pub const REFERRAL: DropdownOption = DropdownOption::new("10", "Referral");
    pub const PURCHASED_LEAD: DropdownOption = DropdownOption::new("41", "Purchased Lead");
    pub const NETWORKING_GROUP: DropdownOption = DropdownOption::new("42", "Networking Group");
    pub const SALES_GENIE: DropdownOption = DropdownOption::new("43", "SalesGenie");
    pub const COMMUNITY_MARKETING_EVENT: DropdownOption =
        DropdownOption::new("32", "Community Marketing Event");
    pub const GIFT_FOR_QUOTE: DropdownOption = DropdownOption::new("44", "Gift for Quote");
    pub const ADVERTISING: DropdownOption = DropdownOption::new("01", "Advertising");
    /// Shares "54" with Quick Quote on the live page; kept distinct here so
    /// code lookups stay one-to-one.
    pub const OTHER: DropdownOption = DropdownOption::new("56", "Other");
    pub const NAR_REFERRAL_PROGRAM: DropdownOption = DropdownOption::new("55", "NAR Referral Program");
    pub const BLANK: DropdownOption = DropdownOption::BLANK;
    pub const PRESENT_POLICYHOLDER: DropdownOption = DropdownOption::new("08", "Present Policyholder");

    pub const CATALOGUE: [DropdownOption; 25] = [
        Self::QUICK_QUOTE,
        Self::AFFINITY_ONSITE,
        Self::CUNA_ONSITE_VISIT,
        Self::CUNA_LOCAL_MARKETING,
        Self::CUNA_REFERRAL,
        Self::PRIOR_POLICYHOLDER,
        Self::LM_COM,
        Self::SOCIAL_MEDIA_FACEBOOK,
        Self::SOCIAL_MEDIA_LINKEDIN,
        Self::SON_DAUGHTER_REWRITE,
        Self::DIRECT_DEALERSHIP_REFERRAL_PROGRAM,
        Self::AFFINITY_DEALERSHIP_REFERRAL_PROGRAM,
        Self::SMALL_MORTGAGE_COMPANY_BANK_PARTNERSHIP,
        Self::REFERRAL_AFFINITY_BANK_LENDER,
        Self::REFERRAL,
        Self::PURCHASED_LEAD,
        Self::NETWORKING_GROUP,
        Self::SALES_GENIE,
        Self::COMMUNITY_MARKETING_EVENT,
        Self::GIFT_FOR_QUOTE,
        Self::ADVERTISING,
        Self::OTHER,
        Self::NAR_REFERRAL_PROGRAM,
        Self::BLANK,
        Self::PRESENT_POLICYHOLDER,
    ];

    pub const DEFAULTED_VALUE: &'static str = Self::BLANK.code;

    fn applies(bt: &TransactionState) -> bool {
        bt.is_on(PageName::QuoteSummary) && bt.has_omega_rating_program()
    }
}

static DESCRIPTOR: FieldDescriptor = FieldDescriptor {
    key: "sourceOfBusiness",
    label: "Source of Business",
    selector: r#"select[name="sourceOfBusiness"]"#,
    catalogue: &SourceOfBusinessDropDown::CATALOGUE,
    state,
    state_mut,
};

#[async_trait]
impl FieldController for SourceOfBusinessDropDown {
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

    fn expected_enablement(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<bool> {
        fire_if(Self::applies(bt), tracer, RULE_ENABLEMENT, &DESCRIPTOR, bt, &[])
    }

    fn expected_required(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<bool> {
        fire_if(Self::applies(bt), tracer, RULE_REQUIRED, &DESCRIPTOR, bt, &[])
    }

    fn expected_value(&self, bt: &TransactionState, tracer: &mut RuleTracer) -> Result<String> {
        if Self::applies(bt) && bt.source_of_business.update_count == 0 {
            log_context_rule(tracer, RULE_DEFAULT_VALUE, &DESCRIPTOR, bt, &[])?;
            return Ok(Self::DEFAULTED_VALUE.to_string());
        }
        Ok(bt.source_of_business.value.clone())
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
        log_event(
            bt.is_logging_on,
            &format!(
                "SourceOfBusinessDropDown.description OnChange Triggered: {}",
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
    use std::collections::HashSet;

    fn quote_summary_state() -> TransactionState {
        TransactionState {
            current_active_page: PageName::QuoteSummary,
            jurisdiction: "OH".to_string(),
            rating_program_code: "OM2".to_string(),
            current_user_distribution_channel: "DIRECT".to_string(),
            is_omega2: true,
            visit_count_quote_summary: 1,
            ..TransactionState::default()
        }
    }

    #[test]
    fn test_catalogue_codes_and_descriptions_are_unique() {
        let codes: HashSet<_> = SourceOfBusinessDropDown::CATALOGUE.iter().map(|o| o.code).collect();
        let descriptions: HashSet<_> = SourceOfBusinessDropDown::CATALOGUE
            .iter()
            .map(|o| o.description)
            .collect();
        assert_eq!(codes.len(), SourceOfBusinessDropDown::CATALOGUE.len());
        assert_eq!(descriptions.len(), SourceOfBusinessDropDown::CATALOGUE.len());
    }

    #[test]
    fn test_other_and_quick_quote_resolve_separately() {
        let control = SourceOfBusinessDropDown;
        assert_eq!(control.code_for("Other"), "56");
        assert_eq!(control.description_for("54"), "Quick Quote");
    }

    #[test]
    fn test_default_is_blank_until_first_update() {
        let sink = MemorySink::new();
        let mut tracer = RuleTracer::immediate(sink.clone());
        let mut bt = quote_summary_state();

        let value = SourceOfBusinessDropDown.expected_value(&bt, &mut tracer).unwrap();
        assert_eq!(value, " ");
        assert_eq!(sink.records()[0].rule_number, RULE_DEFAULT_VALUE);

        bt.source_of_business.commit("10");
        let value = SourceOfBusinessDropDown.expected_value(&bt, &mut tracer).unwrap();
        assert_eq!(value, "10");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_option_list_keeps_declared_order() {
        let mut tracer = RuleTracer::immediate(MemorySink::new());
        let bt = quote_summary_state();
        let options = SourceOfBusinessDropDown.expected_option_list(&bt, &mut tracer).unwrap();
        assert_eq!(options.len(), 25);
        assert_eq!(options.first().map(String::as_str), Some("Quick Quote"));
        assert_eq!(options.last().map(String::as_str), Some("Present Policyholder"));
    }
}
