//! Output formatting and writing functionality

mod formatters;
pub mod patcher;
mod progress;
mod writers;

pub use self::formatters::{format_skipped, format_summary, render, stats_line};
pub use self::progress::ProgressReporter;
pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::aggregate::AggregateModel;
use crate::models::config::OutputFormat;

/// Trait for different output formatters
pub trait Formatter {
    /// Format the aggregate model; `root_label` names the scanned directory
    fn format(&self, model: &AggregateModel, root_label: &str, frameworks: &[&str]) -> Result<String>;
}

/// Markdown-like map for context documents
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format(&self, model: &AggregateModel, root_label: &str, frameworks: &[&str]) -> Result<String> {
        Ok(formatters::render(model, root_label, frameworks))
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, model: &AggregateModel, root_label: &str, frameworks: &[&str]) -> Result<String> {
        formatters::format_json(model, root_label, frameworks, self.pretty)
    }
}

/// CSV formatter, one row per type
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, model: &AggregateModel, _root_label: &str, _frameworks: &[&str]) -> Result<String> {
        formatters::format_csv(model)
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}
