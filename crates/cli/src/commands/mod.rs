//! CLI command implementations

pub mod catalogue;
pub mod run;
pub mod trace;
