//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::MapArgs;
use crate::error::Result;
use crate::models::config::{DepthPolicy, OutputFormat, PartialSettings};
use crate::models::grammar::Grammar;

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// Settings-relevant command-line arguments
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub grammar: Option<Grammar>,
    pub depth: Option<DepthPolicy>,
    pub exclude: Option<Vec<String>>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub follow_links: bool,
    pub no_colors: bool,
    pub no_progress: bool,
    pub quiet: bool,
    pub verbose: bool,
}

impl From<&MapArgs> for CliArgs {
    fn from(args: &MapArgs) -> Self {
        Self {
            root: args.root.clone(),
            grammar: args.lang.map(Grammar::from),
            depth: args.depth.map(DepthPolicy::from),
            exclude: if args.exclude.is_empty() {
                None
            } else {
                Some(args.exclude.clone())
            },
            output_format: args.format.map(OutputFormat::from),
            output_file: args.output.clone(),
            config: args.config.clone(),
            follow_links: args.follow_links,
            no_colors: args.no_colors,
            no_progress: args.no_progress,
            quiet: args.quiet,
            verbose: args.verbose,
        }
    }
}

impl CliConfig {
    /// Create a new CLI configuration source
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    /// Create a CLI configuration source from parsed `map` arguments
    pub fn from_args(args: &MapArgs) -> Self {
        Self::new(CliArgs::from(args))
    }

    /// Set the priority for this configuration source
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Get the config file path if specified
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }

    pub fn args(&self) -> &CliArgs {
        &self.args
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings {
            root: self.args.root.clone(),
            grammar: self.args.grammar,
            depth: self.args.depth,
            exclude: self.args.exclude.clone(),
            output_format: self.args.output_format,
            output_file: self.args.output_file.clone(),
            ..Default::default()
        };

        // Flags only ever override in one direction
        if self.args.follow_links {
            settings.follow_links = Some(true);
        }
        if self.args.no_colors {
            settings.use_colors = Some(false);
        }
        if self.args.no_progress {
            settings.show_progress = Some(false);
        }
        if self.args.quiet {
            settings.quiet = Some(true);
        }
        if self.args.verbose {
            settings.verbose = Some(true);
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{Depth, Lang, OutputFormat as CliOutputFormat};

    #[test]
    fn test_cli_config_source() {
        let args = CliArgs {
            root: Some(PathBuf::from("/cli/path")),
            exclude: Some(vec!["generated".to_string()]),
            depth: Some(DepthPolicy::Full),
            no_progress: true,
            verbose: true,
            ..Default::default()
        };

        let cli_config = CliConfig::new(args);
        assert!(cli_config.is_available());
        assert_eq!(cli_config.priority(), 30);

        let settings = cli_config.load().unwrap();

        assert_eq!(settings.root, Some(PathBuf::from("/cli/path")));
        assert_eq!(settings.exclude, Some(vec!["generated".to_string()]));
        assert_eq!(settings.depth, Some(DepthPolicy::Full));
        assert_eq!(settings.show_progress, Some(false));
        assert_eq!(settings.verbose, Some(true));
        assert_eq!(settings.quiet, None);
        assert_eq!(settings.use_colors, None);
    }

    #[test]
    fn test_from_args() {
        let map_args = MapArgs {
            lang: Some(Lang::Csharp),
            root: Some(PathBuf::from("/test/path")),
            depth: Some(Depth::Classes),
            exclude: vec!["Migrations".to_string()],
            format: Some(CliOutputFormat::Csv),
            output: Some(PathBuf::from("map.csv")),
            config: Some(PathBuf::from("custom.toml")),
            no_colors: true,
            quiet: true,
            ..Default::default()
        };

        let cli_config = CliConfig::from_args(&map_args);
        assert_eq!(cli_config.config_path(), Some(&PathBuf::from("custom.toml")));

        let settings = cli_config.load().unwrap();
        assert_eq!(settings.grammar, Some(Grammar::CSharp));
        assert_eq!(settings.depth, Some(DepthPolicy::Classes));
        assert_eq!(settings.exclude, Some(vec!["Migrations".to_string()]));
        assert_eq!(settings.output_format, Some(OutputFormat::Csv));
        assert_eq!(settings.output_file, Some(PathBuf::from("map.csv")));
        assert_eq!(settings.use_colors, Some(false));
        assert_eq!(settings.quiet, Some(true));
        assert_eq!(settings.follow_links, None);
    }

    #[test]
    fn test_empty_exclude_is_unset() {
        let settings = CliConfig::from_args(&MapArgs::default()).load().unwrap();
        assert_eq!(settings, PartialSettings::default());
    }
}
