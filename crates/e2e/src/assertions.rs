//! Live-page assertions shared by every field controller

use quotecheck_common::PageName;
use tracing::{debug, info};

use crate::driver::PageDriver;
use crate::error::{Check, E2eError, E2eResult};

/// Where an assertion is being made: which control, on which page
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub field: &'static str,
    pub selector: &'static str,
    pub page: PageName,
    pub logging_on: bool,
}

impl Target {
    fn mismatch(&self, check: Check, expected: impl ToString, actual: impl ToString) -> E2eError {
        E2eError::Mismatch {
            check,
            field: self.field,
            page: self.page,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    fn trace(&self, check: Check, value: impl std::fmt::Debug) {
        if self.logging_on {
            info!(field = self.field, page = %self.page, "{} ok: {:?}", check, value);
        } else {
            debug!(field = self.field, page = %self.page, "{} ok: {:?}", check, value);
        }
    }
}

pub async fn assert_element_count(
    driver: &dyn PageDriver,
    target: &Target,
    expected: usize,
) -> E2eResult<()> {
    let actual = driver.locate_count(target.selector).await?;
    if actual != expected {
        return Err(target.mismatch(Check::Count, expected, actual));
    }
    target.trace(Check::Count, actual);
    Ok(())
}

pub async fn assert_visibility(
    driver: &dyn PageDriver,
    target: &Target,
    expected: bool,
) -> E2eResult<()> {
    let actual = driver.is_visible(target.selector).await?;
    if actual != expected {
        return Err(target.mismatch(Check::Visibility, expected, actual));
    }
    target.trace(Check::Visibility, actual);
    Ok(())
}

pub async fn assert_enablement(
    driver: &dyn PageDriver,
    target: &Target,
    expected: bool,
) -> E2eResult<()> {
    let actual = driver.is_enabled(target.selector).await?;
    if actual != expected {
        return Err(target.mismatch(Check::Enablement, expected, actual));
    }
    target.trace(Check::Enablement, actual);
    Ok(())
}

pub fn assert_value(target: &Target, expected: &str, actual: &str) -> E2eResult<()> {
    if actual != expected {
        return Err(target.mismatch(Check::Value, expected, actual));
    }
    target.trace(Check::Value, actual);
    Ok(())
}

/// Compare option lists ignoring order. Duplicates still count.
pub fn assert_option_list(target: &Target, expected: &[String], actual: &[String]) -> E2eResult<()> {
    let mut expected_sorted = expected.to_vec();
    let mut actual_sorted = actual.to_vec();
    expected_sorted.sort();
    actual_sorted.sort();

    if expected_sorted != actual_sorted {
        return Err(E2eError::OptionListMismatch {
            field: target.field,
            page: target.page,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    debug!(field = target.field, page = %target.page, "option list ok: {:?}", actual);
    Ok(())
}
