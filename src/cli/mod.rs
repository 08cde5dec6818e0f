//! Command-line interface: argument parsing and report rendering

mod args;
mod output;

pub use args::{print_genres, Args, OutputFormat};
pub use output::{format_json, format_report, format_summary};
