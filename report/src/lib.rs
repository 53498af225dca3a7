//! Report generation for finished load runs
//!
//! This crate renders finalized [`RunStatistics`](loadstats_core::RunStatistics):
//!
//! - Tab-aligned summary and failure tables for the terminal
//! - JSON export of the full statistics

#![warn(missing_docs)]
#![warn(clippy::all)]

mod json_export;
mod table;

pub use json_export::JsonExporter;
pub use table::{print_failures, print_summary, SummaryTable};
