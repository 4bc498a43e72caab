//! Command implementations

use std::fs;
use std::path::{Path, PathBuf};

use ansi_term::Colour::{Green, Yellow};

use super::args::{Args, Commands, InitArgs, MapArgs, UpdateArgs};
use crate::config::{self, parser, CliArgs};
use crate::core::frameworks;
use crate::core::Walker;
use crate::error::{try_with_recovery, CodemapError, OptionExt, Result, ResultExt};
use crate::models::aggregate::AggregateModel;
use crate::models::config::Settings;
use crate::output::patcher::{self, PatchAction, END_MARKER, START_MARKER};
use crate::output::{create_formatter, create_writer, format_skipped, format_summary, ProgressReporter};

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Map a source tree
    Map(MapArgs),
    /// Patch a context document with map files
    Update(UpdateArgs),
    /// Initialize a default configuration file
    Init(InitArgs),
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        match args.command {
            Commands::Map(map) => Command::Map(map),
            Commands::Update(update) => Command::Update(update),
            Commands::Init(init) => Command::Init(init),
        }
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        match self {
            Command::Map(args) => run_map(args),
            Command::Update(args) => run_update(args),
            Command::Init(args) => run_init(args),
        }
    }
}

/// Everything a finished map run produced
#[derive(Debug)]
pub struct MapRun {
    pub model: AggregateModel,
    pub frameworks: Vec<&'static str>,
    pub root_label: String,
    pub output: String,
}

/// Display name of the scanned root: its final path component
pub fn root_label(root: &Path) -> String {
    let resolved = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| resolved.display().to_string())
}

/// Walk, detect frameworks and format, without writing anything
pub fn generate_map(settings: &Settings, reporter: &ProgressReporter) -> Result<MapRun> {
    let walker = Walker::new(settings.clone())?;
    let model = walker.walk_with_progress(|count, path| reporter.file(count, path))?;
    reporter.finish();

    let frameworks = frameworks::detect_for(walker.profile(), &model.imports);
    let root_label = root_label(&settings.root);
    let output = create_formatter(settings.output_format)
        .format(&model, &root_label, &frameworks)
        .with_context(|| format!("Failed to format map as {}", settings.output_format))?;

    Ok(MapRun {
        model,
        frameworks,
        root_label,
        output,
    })
}

fn run_map(args: &MapArgs) -> Result<()> {
    let settings = config::load_config(CliArgs::from(args))?;
    tracing::debug!(?settings, "resolved settings");

    let reporter = ProgressReporter::new(settings.show_progress && !settings.quiet, settings.verbose);
    let run = generate_map(&settings, &reporter)?;

    create_writer(settings.output_file.as_ref()).write(&run.output)?;

    // The summary goes to stderr so stdout stays a clean map
    if !settings.quiet {
        let label = settings.grammar.profile().label;
        eprintln!(
            "{}",
            format_summary(label, run.model.stats(), &run.model.skipped, settings.use_colors)
        );
        if settings.verbose && !run.model.skipped.is_empty() {
            eprintln!("{}", format_skipped(&run.model.skipped, settings.use_colors));
        }
        if let Some(path) = &settings.output_file {
            eprintln!("Map written to: {}", path.display());
        }
    }

    Ok(())
}

/// Result of patching a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The map payload was placed in the document
    Patched {
        action: PatchAction,
        payload: String,
        tokens: usize,
    },
    /// The marked section was removed
    Removed,
    /// `--remove` found no marked section
    NothingToRemove,
}

/// Expand map arguments; glob patterns are expanded in sorted order
pub fn expand_map_paths(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let mut matched: Vec<PathBuf> = glob::glob(pattern)?.filter_map(|entry| entry.ok()).collect();
        if matched.is_empty() {
            tracing::warn!(pattern = pattern.as_str(), "map pattern matched no files");
        }
        matched.sort();
        paths.append(&mut matched);
    }
    Ok(paths)
}

/// Read every existing map file; missing or unreadable ones are warned about and skipped
pub fn read_maps(paths: &[PathBuf]) -> Result<Vec<String>> {
    let mut sections = Vec::new();
    for path in paths {
        if !path.is_file() {
            tracing::warn!("Map file not found: {}", path.display());
            continue;
        }
        if let Some(text) = try_with_recovery(|| fs::read_to_string(path).with_file_context(path))? {
            sections.push(text);
        }
    }
    Ok(sections)
}

/// Patch or remove the map section of `args.doc`.
/// Nothing is written when `args.dry_run` is set.
pub fn update_document(args: &UpdateArgs, timestamp: &str) -> Result<UpdateOutcome> {
    if !args.doc.is_file() {
        return Err(CodemapError::DocumentNotFound { path: args.doc.clone() });
    }
    let document = fs::read_to_string(&args.doc).with_file_context(&args.doc)?;

    if args.remove {
        return match patcher::remove(&document) {
            Some(updated) => {
                if !args.dry_run {
                    write_document(&args.doc, &updated)?;
                }
                Ok(UpdateOutcome::Removed)
            }
            None => Ok(UpdateOutcome::NothingToRemove),
        };
    }

    let sections = read_maps(&expand_map_paths(&args.maps)?)?;
    let payload = patcher::combine_maps(&sections, timestamp).ok_or_error(|| CodemapError::EmptyMaps)?;
    let tokens = patcher::estimate_tokens(&payload);

    let (updated, action) = patcher::patch(&document, &payload, &args.insert_after);
    if !args.dry_run {
        write_document(&args.doc, &updated)?;
    }
    tracing::debug!(%action, tokens, "document patched");

    Ok(UpdateOutcome::Patched {
        action,
        payload,
        tokens,
    })
}

fn write_document(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| CodemapError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn run_update(args: &UpdateArgs) -> Result<()> {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    let outcome = update_document(args, &timestamp)?;
    let doc = args.doc.display();
    let success = |text: String| {
        if args.no_colors {
            text
        } else {
            Green.paint(text).to_string()
        }
    };

    match outcome {
        UpdateOutcome::NothingToRemove => println!("No map section found to remove"),
        UpdateOutcome::Removed if args.dry_run => println!("Would remove map section from {}", doc),
        UpdateOutcome::Removed => println!("{}", success(format!("Removed map section from {}", doc))),
        UpdateOutcome::Patched {
            action,
            payload,
            tokens,
        } => {
            println!("Map content: ~{} tokens estimated", tokens);
            if args.dry_run {
                println!("\nWould update {} ({})", doc, action);
                println!("Insert after: '{}'", args.insert_after);
                println!("\n--- Preview ---\n");
                println!("{}", START_MARKER);
                println!("{}", patcher::preview(&payload));
                println!("{}", END_MARKER);
            } else {
                println!("{}", success(format!("{} in {}", capitalize(&action.to_string()), doc)));
                println!("Re-run `codemap update` anytime to refresh the map.");
            }
        }
    }

    Ok(())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn run_init(args: &InitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        println!(
            "{}",
            Yellow.paint(format!("Configuration file already exists at: {}", args.path.display()))
        );
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    parser::create_default_config(&args.path)?;

    println!("Created default configuration file at: {}", args.path.display());
    println!("\nEvery setting is commented out. Uncomment a line to override its default:");
    println!("  - grammar: csharp, python or typescript");
    println!("  - depth: classes, methods or full");
    println!("  - exclude: extra names or glob patterns to skip");
    println!("  - output_format: text, json or csv");

    Ok(())
}
