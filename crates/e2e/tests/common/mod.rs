//! Quote Summary page as the application renders it

#![allow(dead_code)]

use quotecheck_common::{descriptions, PageName, TransactionState};
use quotecheck_e2e::{
    FieldController, MockElement, MockPage, NewBusinessCreditDropDown, RewriteReasonDropDown,
    SourceOfBusinessDropDown, TransactionTypeDropDown,
};

/// Values shown by the page's four dropdowns
#[derive(Debug, Clone)]
pub struct Render {
    pub transaction_type: String,
    pub source_of_business: String,
    pub new_business_credit: String,
    pub rewrite_reason: String,
    pub first_visit: bool,
}

impl Default for Render {
    fn default() -> Self {
        Self {
            transaction_type: "01".to_string(),
            source_of_business: " ".to_string(),
            new_business_credit: "Y".to_string(),
            rewrite_reason: " ".to_string(),
            first_visit: true,
        }
    }
}

impl Render {
    pub fn transaction_type(mut self, code: &str) -> Self {
        self.transaction_type = code.to_string();
        self
    }

    pub fn new_business_credit(mut self, code: &str) -> Self {
        self.new_business_credit = code.to_string();
        self
    }

    pub fn rewrite_reason(mut self, code: &str) -> Self {
        self.rewrite_reason = code.to_string();
        self
    }

    pub fn revisit(mut self) -> Self {
        self.first_visit = false;
        self
    }
}

fn element(
    control: &dyn FieldController,
    value: &str,
    visible: bool,
    enabled: bool,
) -> MockElement {
    let mut element = MockElement::new()
        .with_value(value)
        .with_options(descriptions(control.descriptor().catalogue));
    element.visible = visible;
    element.enabled = enabled;
    element
}

/// Put the Quote Summary DOM for `render` on `page`
pub fn render_quote_summary(page: &MockPage, render: Render) {
    let rewriting = render.transaction_type == TransactionTypeDropDown::REWRITE.code;
    let transferring = render.transaction_type == TransactionTypeDropDown::TRANSFER.code;

    let controls: [(&dyn FieldController, &str, bool, bool); 4] = [
        (&TransactionTypeDropDown, render.transaction_type.as_str(), true, render.first_visit),
        (&SourceOfBusinessDropDown, render.source_of_business.as_str(), true, true),
        (
            &NewBusinessCreditDropDown,
            render.new_business_credit.as_str(),
            rewriting || transferring,
            rewriting,
        ),
        (&RewriteReasonDropDown, render.rewrite_reason.as_str(), rewriting, rewriting),
    ];
    for (control, value, visible, enabled) in controls {
        page.set(
            control.descriptor().selector,
            element(control, value, visible, enabled),
        );
    }
}

fn current_value(page: &MockPage, control: &dyn FieldController) -> String {
    page.element(control.descriptor().selector)
        .map(|element| element.value)
        .unwrap_or_else(|| " ".to_string())
}

/// Render the first visit and re-render dependent controls whenever the
/// transaction type is selected, the way the application does
pub fn install_quote_summary_app(page: &MockPage) {
    render_quote_summary(page, Render::default());
    page.on_select(|page, selector, value| {
        if selector != TransactionTypeDropDown.descriptor().selector {
            return;
        }
        let credit = match value {
            "02" | "03" => NewBusinessCreditDropDown::NO.code,
            _ => NewBusinessCreditDropDown::YES.code,
        };
        let reason = if value == TransactionTypeDropDown::REWRITE.code {
            current_value(page, &RewriteReasonDropDown)
        } else {
            RewriteReasonDropDown::BLANK.code.to_string()
        };
        let first_visit = page
            .element(TransactionTypeDropDown.descriptor().selector)
            .map(|element| element.enabled)
            .unwrap_or(true);

        render_quote_summary(
            page,
            Render {
                transaction_type: value.to_string(),
                source_of_business: current_value(page, &SourceOfBusinessDropDown),
                new_business_credit: credit.to_string(),
                rewrite_reason: reason,
                first_visit,
            },
        );
    });
}

/// Omega1 transaction that has just entered the Quote Summary page
pub fn quote_summary_state() -> TransactionState {
    let mut state = TransactionState {
        jurisdiction: "WI".to_string(),
        rating_program_code: "OM1".to_string(),
        current_user_distribution_channel: "AGENT".to_string(),
        is_omega1: true,
        is_omega2: false,
        ..TransactionState::default()
    };
    state.enter_page(PageName::QuoteSummary);
    state
}
