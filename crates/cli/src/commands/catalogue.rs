//! Catalogue Commands
//!
//! Prints the `(code, description)` options of a tracked dropdown.

use anyhow::{anyhow, Result};
use clap::Args;
use quotecheck_e2e::controls;
use serde::Serialize;

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct CatalogueArgs {
    /// State key of the control, e.g. transactionType
    pub field: String,
}

#[derive(Serialize)]
pub struct OptionRow {
    pub code: String,
    pub description: String,
}

impl TableDisplay for OptionRow {
    fn headers() -> Vec<&'static str> {
        vec!["Code", "Description"]
    }

    fn row(&self) -> Vec<String> {
        vec![format!("{:?}", self.code), self.description.clone()]
    }
}

pub fn execute(args: CatalogueArgs, format: OutputFormat) -> Result<()> {
    let control = controls::by_name(&args.field).ok_or_else(|| {
        let known: Vec<&str> = controls::all().iter().map(|c| c.descriptor().key).collect();
        anyhow!("Unknown field '{}', expected one of: {}", args.field, known.join(", "))
    })?;

    let rows: Vec<OptionRow> = control
        .descriptor()
        .catalogue
        .iter()
        .map(|option| OptionRow {
            code: option.code.to_string(),
            description: option.description.to_string(),
        })
        .collect();

    print_list(&rows, format);
    Ok(())
}
