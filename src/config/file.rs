//! Configuration file and environment sources

use std::path::{Path, PathBuf};

use super::parser::{self, DEFAULT_CONFIG_FILE};
use super::ConfigSource;
use crate::error::{CodemapError, Result};
use crate::models::config::PartialSettings;

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Create a new file configuration source for `./.codemap.toml`
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "project config file".to_string(),
            priority: 20, // above environment variables, below CLI
        }
    }

    /// Create a new file configuration source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 20,
        }
    }

    /// Set the priority for this configuration source
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Set a custom name for this configuration source
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the path of this configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a default configuration file at this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(CodemapError::ConfigNotFound {
                path: self.path.clone(),
            });
        }

        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Setting keys read from the environment, without the prefix
const ENV_KEYS: &[&str] = &[
    "ROOT",
    "GRAMMAR",
    "DEPTH",
    "EXCLUDE",
    "OUTPUT_FORMAT",
    "OUTPUT_FILE",
    "FOLLOW_LINKS",
    "USE_COLORS",
    "SHOW_PROGRESS",
    "QUIET",
    "VERBOSE",
];

/// Environment variable configuration source
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

impl EnvConfig {
    /// Create a new environment variable configuration source
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 10,
        }
    }

    /// Set the priority for this configuration source
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key)).ok()
    }

    /// Parse one variable, rejecting values that do not parse
    fn parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.var(key) {
            Some(raw) => raw.trim().parse().map(Some).map_err(|e| {
                CodemapError::config_error(format!("{}_{}: {}", self.prefix, key, e))
            }),
            None => Ok(None),
        }
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        settings.root = self.var("ROOT").map(PathBuf::from);
        settings.grammar = self.parsed("GRAMMAR")?;
        settings.depth = self.parsed("DEPTH")?;

        if let Some(exclude) = self.var("EXCLUDE") {
            settings.exclude = Some(
                exclude
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }

        settings.output_format = self.parsed("OUTPUT_FORMAT")?;
        settings.output_file = self.var("OUTPUT_FILE").map(PathBuf::from);
        settings.follow_links = self.parsed("FOLLOW_LINKS")?;
        settings.use_colors = self.parsed("USE_COLORS")?;
        settings.show_progress = self.parsed("SHOW_PROGRESS")?;
        settings.quiet = self.parsed("QUIET")?;
        settings.verbose = self.parsed("VERBOSE")?;

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
