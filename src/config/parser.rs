//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CodemapError, Result};
use crate::models::config::PartialSettings;

/// Default configuration file name, looked up in the home and current directories
pub const DEFAULT_CONFIG_FILE: &str = ".codemap.toml";

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CodemapError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| CodemapError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|e| CodemapError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Validate partial settings for obvious errors
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(root) = &settings.root {
        if root.as_os_str().is_empty() {
            return Err(CodemapError::config_error(format!(
                "Invalid empty root in config file: {}",
                path.display()
            )));
        }
    }

    if let Some(patterns) = &settings.exclude {
        for pattern in patterns {
            if pattern.is_empty() {
                return Err(CodemapError::config_error(format!(
                    "Empty exclude entry in config file: {}",
                    path.display()
                )));
            }

            glob::Pattern::new(pattern).map_err(|e| {
                CodemapError::config_error(format!(
                    "Invalid exclude pattern '{}' in config file: {}: {}",
                    pattern,
                    path.display(),
                    e
                ))
            })?;
        }
    }

    if let Some(output_file) = &settings.output_file {
        if output_file.as_os_str().is_empty() {
            return Err(CodemapError::config_error(format!(
                "Invalid empty output_file in config file: {}",
                path.display()
            )));
        }
    }

    Ok(())
}

/// Per-user configuration file, merged before the project one
pub fn home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE))
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let default_config = include_str!("default_config.toml");
    fs::write(path, default_config)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::DepthPolicy;
    use crate::models::grammar::Grammar;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
        root = "/test/path"
        grammar = "typescript"
        depth = "full"
        exclude = ["generated", "*.egg-info"]
        output_format = "json"
    "#;

    #[test]
    fn test_parse_config_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("codemap.toml");
        fs::write(&config_path, CONFIG).unwrap();

        let settings = parse_config_file(&config_path).unwrap();

        assert_eq!(settings.root, Some(PathBuf::from("/test/path")));
        assert_eq!(settings.grammar, Some(Grammar::TypeScript));
        assert_eq!(settings.depth, Some(DepthPolicy::Full));
        assert_eq!(
            settings.exclude,
            Some(vec!["generated".to_string(), "*.egg-info".to_string()])
        );
    }

    #[test]
    fn test_parse_config_content_rejects_bad_values() {
        assert!(matches!(
            parse_config_content("depth = \"deep\"", "virtual.toml"),
            Err(CodemapError::ConfigParse { .. })
        ));
        assert!(matches!(
            parse_config_content("exclude = [\"\"]", "virtual.toml"),
            Err(CodemapError::Config { .. })
        ));
        assert!(parse_config_content("exclude = [\"[oops\"]", "virtual.toml").is_err());
    }

    #[test]
    fn test_missing_file_is_config_not_found() {
        let temp_dir = tempdir().unwrap();
        assert!(matches!(
            parse_config_file(temp_dir.path().join("none.toml")),
            Err(CodemapError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_create_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join(DEFAULT_CONFIG_FILE);

        create_default_config(&config_path).unwrap();
        assert!(config_path.exists());

        // Everything is commented out, so nothing overrides the defaults
        let settings = parse_config_file(&config_path).unwrap();
        assert_eq!(settings, PartialSettings::default());
    }

    #[test]
    fn test_home_config_path_uses_default_name() {
        if let Some(path) = home_config_path() {
            assert!(path.ends_with(DEFAULT_CONFIG_FILE));
        }
    }
}
