//! Validation of merged settings

use std::path::Path;

use crate::error::{CodemapError, Result, ResultExt};
use crate::models::config::Settings;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return errors if invalid
    pub fn validate(settings: &Settings) -> Result<()> {
        if !settings.root.exists() {
            return Err(CodemapError::invalid_path(&settings.root));
        }

        for pattern in &settings.exclude {
            glob::Pattern::new(pattern).with_context(|| format!("Invalid exclude pattern: {}", pattern))?;
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// The output file's directory must already exist
    fn validate_output_path(path: &Path) -> Result<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        if !parent.is_dir() {
            return Err(CodemapError::OutputDirectoryNotFound {
                path: parent.to_path_buf(),
            });
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = std::fs::metadata(parent)?;
            if metadata.permissions().mode() & 0o200 == 0 {
                return Err(CodemapError::permission_denied(parent));
            }
        }

        Ok(())
    }
}
