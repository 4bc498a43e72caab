//! Command-line argument parsing

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::config::{DepthPolicy, OutputFormat as ModelOutputFormat};
use crate::models::grammar::Grammar;
use crate::output::patcher::DEFAULT_INSERT_AFTER;

/// codemap - compact structure maps of C#, Python and TypeScript codebases
#[derive(Parser, Debug)]
#[command(name = "codemap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Map the namespaces, types and members of a codebase for context documents")]
#[command(long_about = "codemap walks a source tree, recognises type and member declarations \
with lightweight pattern matching, and renders a compact architecture map. The map can be \
spliced into a context document such as CLAUDE.md between sentinel markers.")]
#[command(after_help = "EXAMPLES:

    # Map a Python project
    codemap map --lang python --root ./backend

    # Types only, as JSON
    codemap map --lang typescript --depth classes --format json

    # Write maps to files, then merge them into CLAUDE.md
    codemap map --lang csharp --root ./api --output api-map.md
    codemap map --lang typescript --root ./web --output web-map.md
    codemap update --doc CLAUDE.md --maps api-map.md web-map.md

    # Preview the update without writing
    codemap update --doc CLAUDE.md --maps '*-map.md' --dry-run

    # Create a .codemap.toml in the current directory
    codemap init
")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a structure map of a source tree
    Map(MapArgs),
    /// Insert or replace the generated section of a context document
    Update(UpdateArgs),
    /// Create a default configuration file
    Init(InitArgs),
}

/// Arguments for `codemap map`
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct MapArgs {
    /// Source language to map
    #[arg(short, long, value_enum, value_name = "LANG")]
    pub lang: Option<Lang>,

    /// Root directory to scan
    #[arg(short, long, value_name = "DIR", help = "Root directory to scan (defaults to the current directory)")]
    pub root: Option<PathBuf>,

    /// Member detail
    #[arg(short, long, value_enum, help = "Member detail: 'classes' for types only, 'methods' for the public API, 'full' for everything")]
    pub depth: Option<Depth>,

    /// Extra names or glob patterns to skip
    #[arg(short, long, value_name = "PATTERN", value_delimiter = ',', help = "Extra directory or file names to skip, comma separated (e.g., --exclude generated,'*.egg-info')")]
    pub exclude: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, help = "Output format: 'text' for the markdown map, 'json' or 'csv' for tooling")]
    pub format: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to configuration file (defaults to .codemap.toml in the current directory)")]
    pub config: Option<PathBuf>,

    /// Follow symbolic links during directory traversal
    #[arg(long)]
    pub follow_links: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_colors: bool,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show per-file progress and skipped files
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for `codemap update`
#[derive(ClapArgs, Debug, Clone)]
pub struct UpdateArgs {
    /// Document to patch
    #[arg(long, value_name = "FILE", default_value = "CLAUDE.md")]
    pub doc: PathBuf,

    /// Map files to insert; glob patterns are expanded
    #[arg(long, value_name = "FILE", num_args = 1.., required_unless_present = "remove")]
    pub maps: Vec<String>,

    /// Heading whose section receives a new map
    #[arg(long, value_name = "HEADING", default_value = DEFAULT_INSERT_AFTER)]
    pub insert_after: String,

    /// Remove the generated section instead of writing one
    #[arg(long, conflicts_with = "maps")]
    pub remove: bool,

    /// Show what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_colors: bool,
}

/// Arguments for `codemap init`
#[derive(ClapArgs, Debug, Clone)]
pub struct InitArgs {
    /// Where to write the configuration file
    #[arg(long, value_name = "FILE", default_value = ".codemap.toml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Language options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Lang {
    #[value(alias = "cs", alias = "c#")]
    Csharp,
    #[value(alias = "py")]
    Python,
    #[value(alias = "ts", alias = "javascript", alias = "js")]
    Typescript,
}

impl From<Lang> for Grammar {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Csharp => Grammar::CSharp,
            Lang::Python => Grammar::Python,
            Lang::Typescript => Grammar::TypeScript,
        }
    }
}

/// Depth options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Depth {
    Classes,
    Methods,
    Full,
}

impl From<Depth> for DepthPolicy {
    fn from(depth: Depth) -> Self {
        match depth {
            Depth::Classes => DepthPolicy::Classes,
            Depth::Methods => DepthPolicy::Methods,
            Depth::Full => DepthPolicy::Full,
        }
    }
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown map for context documents
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output, one row per type
    Csv,
}

impl From<OutputFormat> for ModelOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ModelOutputFormat::Text,
            OutputFormat::Json => ModelOutputFormat::Json,
            OutputFormat::Csv => ModelOutputFormat::Csv,
        }
    }
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_map_arguments() {
        let args = parse(&[
            "codemap", "map", "--lang", "ts", "--root", "web", "--depth", "full", "--exclude", "stories,generated",
            "--format", "json", "-q",
        ]);
        let Commands::Map(map) = args.command else {
            panic!("expected map command");
        };
        assert_eq!(map.lang, Some(Lang::Typescript));
        assert_eq!(map.root, Some(PathBuf::from("web")));
        assert_eq!(map.depth, Some(Depth::Full));
        assert_eq!(map.exclude, vec!["stories".to_string(), "generated".to_string()]);
        assert_eq!(map.format, Some(OutputFormat::Json));
        assert!(map.quiet);
    }

    #[test]
    fn test_update_arguments() {
        let args = parse(&["codemap", "update", "--maps", "a.md", "b.md", "--dry-run"]);
        let Commands::Update(update) = args.command else {
            panic!("expected update command");
        };
        assert_eq!(update.doc, PathBuf::from("CLAUDE.md"));
        assert_eq!(update.maps, vec!["a.md".to_string(), "b.md".to_string()]);
        assert_eq!(update.insert_after, DEFAULT_INSERT_AFTER);
        assert!(update.dry_run);
    }

    #[test]
    fn test_update_requires_maps_unless_removing() {
        assert!(Args::try_parse_from(["codemap", "update"]).is_err());
        assert!(Args::try_parse_from(["codemap", "update", "--remove"]).is_ok());
        assert!(Args::try_parse_from(["codemap", "update", "--remove", "--maps", "a.md"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["codemap", "map", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Grammar::from(Lang::Csharp), Grammar::CSharp);
        assert_eq!(DepthPolicy::from(Depth::Classes), DepthPolicy::Classes);
        assert_eq!(ModelOutputFormat::from(OutputFormat::Csv), ModelOutputFormat::Csv);
    }
}
