//! Configuration management
//!
//! Settings are layered from, lowest precedence first: the per-user
//! `~/.codemap.toml`, the project `./.codemap.toml` (or `--config FILE`),
//! `CODEMAP_*` environment variables, and command-line flags.

pub mod cli;
pub mod file;
pub mod parser;
pub mod settings;
#[cfg(test)]
pub mod tests;

use crate::error::Result;
use crate::models::config::{PartialSettings, Settings};

pub use cli::{CliArgs, CliConfig};
pub use file::{EnvConfig, FileConfig};
pub use parser::{create_default_config, parse_config_content, parse_config_file, DEFAULT_CONFIG_FILE};
pub use settings::SettingsValidator;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "CODEMAP";

/// Trait for configuration sources
pub trait ConfigSource {
    /// Load configuration from this source
    fn load(&self) -> Result<PartialSettings>;

    /// Check if this configuration source is available
    fn is_available(&self) -> bool;

    /// Get the name of this configuration source for logging
    fn name(&self) -> &str;

    /// Get the priority of this source (higher numbers take precedence)
    fn priority(&self) -> u8 {
        10
    }
}

/// Configuration builder for merging multiple sources
pub struct ConfigBuilder {
    partial: PartialSettings,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self {
            partial: PartialSettings::default(),
        }
    }

    /// Merge settings from a partial configuration
    pub fn merge(mut self, partial: PartialSettings) -> Self {
        self.partial.merge_from(partial);
        self
    }

    /// Load and merge settings from a configuration source.
    /// Unavailable sources are skipped; load failures are returned.
    pub fn load_from<S: ConfigSource>(self, source: &S) -> Result<Self> {
        if !source.is_available() {
            tracing::trace!(source = source.name(), "config source not available");
            return Ok(self);
        }
        tracing::debug!(source = source.name(), priority = source.priority(), "loading config source");
        let partial = source.load()?;
        Ok(self.merge(partial))
    }

    /// Try to load from a source, ignoring load failures
    pub fn try_load_from<S: ConfigSource>(self, source: &S) -> Self {
        if !source.is_available() {
            return self;
        }
        match source.load() {
            Ok(partial) => self.merge(partial),
            Err(err) => {
                tracing::warn!(source = source.name(), "ignoring config source: {}", err);
                self
            }
        }
    }

    /// Add configuration from an explicitly named file, which must exist
    pub fn add_config_file(self, path: &std::path::Path) -> Result<Self> {
        let partial = FileConfig::with_path(path).load()?;
        Ok(self.merge(partial))
    }

    /// Build the final settings with validation
    pub fn build(self) -> Result<Settings> {
        let settings = self.partial.to_settings();
        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from every source with proper precedence handling
pub fn load_config(cli_args: CliArgs) -> Result<Settings> {
    load_config_with_env_prefix(cli_args, ENV_PREFIX)
}

/// Load configuration with a custom environment variable prefix
pub fn load_config_with_env_prefix(cli_args: CliArgs, env_prefix: &str) -> Result<Settings> {
    let mut builder = ConfigBuilder::new();

    if let Some(home) = parser::home_config_path() {
        builder = builder.load_from(&FileConfig::with_path(home).with_name("home config file"))?;
    }

    builder = match &cli_args.config {
        Some(path) => builder.add_config_file(path)?,
        None => builder.load_from(&FileConfig::new())?,
    };

    builder = builder.load_from(&EnvConfig::new(env_prefix))?;

    // Command-line flags win over everything else
    builder = builder.load_from(&CliConfig::new(cli_args))?;

    builder.build()
}
