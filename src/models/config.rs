//! Configuration-related data structures

use super::grammar::Grammar;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration settings for a mapping run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root directory to scan
    pub root: PathBuf,

    /// Source grammar to map
    pub grammar: Grammar,

    /// How much member detail to extract
    pub depth: DepthPolicy,

    /// Extra path-segment names (or glob patterns) to exclude, on top of the grammar defaults
    pub exclude: Vec<String>,

    /// Output format (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Whether to follow symbolic links during directory traversal
    pub follow_links: bool,

    /// Whether to use colors in the stderr summary
    pub use_colors: bool,

    /// Whether to show a progress spinner
    pub show_progress: bool,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed progress and debug information
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            grammar: Grammar::Python,
            depth: DepthPolicy::Methods,
            exclude: Vec::new(),
            output_format: OutputFormat::Text,
            output_file: None,
            follow_links: false,
            use_colors: true,
            show_progress: true,
            quiet: false,
            verbose: false,
        }
    }
}

impl Settings {
    /// Grammar defaults merged with the configured extra excludes
    pub fn effective_excludes(&self) -> Vec<String> {
        let mut excludes: Vec<String> = self
            .grammar
            .profile()
            .default_excludes
            .iter()
            .map(|s| s.to_string())
            .collect();
        for extra in &self.exclude {
            if !excludes.contains(extra) {
                excludes.push(extra.clone());
            }
        }
        excludes
    }
}

/// Run-wide member detail policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthPolicy {
    /// Type-level summary only; no members
    Classes,
    /// Public API members; private/protected dropped
    Methods,
    /// Everything, including private members, fields and enum values
    Full,
}

impl DepthPolicy {
    pub fn includes_members(&self) -> bool {
        *self != DepthPolicy::Classes
    }

    pub fn includes_private(&self) -> bool {
        *self == DepthPolicy::Full
    }

    /// Fields and enum values are only collected at full depth
    pub fn includes_fields(&self) -> bool {
        *self == DepthPolicy::Full
    }
}

impl std::str::FromStr for DepthPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classes" => Ok(DepthPolicy::Classes),
            "methods" => Ok(DepthPolicy::Methods),
            "full" => Ok(DepthPolicy::Full),
            _ => Err(format!("Invalid depth: {}", s)),
        }
    }
}

impl std::fmt::Display for DepthPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepthPolicy::Classes => write!(f, "classes"),
            DepthPolicy::Methods => write!(f, "methods"),
            DepthPolicy::Full => write!(f, "full"),
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown-like map for embedding in a context document
    Text,
    /// JSON for programmatic consumption
    Json,
    /// CSV, one row per type
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSettings {
    pub root: Option<PathBuf>,
    pub grammar: Option<Grammar>,
    pub depth: Option<DepthPolicy>,
    pub exclude: Option<Vec<String>>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub follow_links: Option<bool>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        if other.root.is_some() {
            self.root = other.root;
        }
        if other.grammar.is_some() {
            self.grammar = other.grammar;
        }
        if other.depth.is_some() {
            self.depth = other.depth;
        }
        if other.exclude.is_some() {
            self.exclude = other.exclude;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        if other.follow_links.is_some() {
            self.follow_links = other.follow_links;
        }
        if other.use_colors.is_some() {
            self.use_colors = other.use_colors;
        }
        if other.show_progress.is_some() {
            self.show_progress = other.show_progress;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
    }

    /// Convert to full Settings, using defaults for unspecified fields
    pub fn to_settings(&self) -> Settings {
        let defaults = Settings::default();

        Settings {
            root: self.root.clone().unwrap_or(defaults.root),
            grammar: self.grammar.unwrap_or(defaults.grammar),
            depth: self.depth.unwrap_or(defaults.depth),
            exclude: self.exclude.clone().unwrap_or(defaults.exclude),
            output_format: self.output_format.unwrap_or(defaults.output_format),
            output_file: self.output_file.clone().or(defaults.output_file),
            follow_links: self.follow_links.unwrap_or(defaults.follow_links),
            use_colors: self.use_colors.unwrap_or(defaults.use_colors),
            show_progress: self.show_progress.unwrap_or(defaults.show_progress),
            quiet: self.quiet.unwrap_or(defaults.quiet),
            verbose: self.verbose.unwrap_or(defaults.verbose),
        }
    }
}
