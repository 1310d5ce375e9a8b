//! Output module for persisting rows and summarizing runs
//!
//! This module handles:
//! - Appending built rows to the tabular store
//! - Rendering the end-of-run summary

mod report;
mod sink;

pub use report::{print_rows, RunReport};
pub use sink::{append_rows, SinkReport};
