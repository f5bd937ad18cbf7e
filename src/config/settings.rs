//! Validation of fully merged settings

use std::path::Path;

use crate::error::{IscopError, Result, ResultExt};
use crate::models::config::Settings;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings before anything is analysed
    pub fn validate(settings: &Settings) -> Result<()> {
        for pattern in &settings.package_filter {
            glob::Pattern::new(pattern)
                .with_context(|| format!("Invalid package filter: {}", pattern))?;
        }

        if settings.jobs == 0 {
            return Err(IscopError::config_error("jobs must be at least 1"));
        }
        if settings.script_cache_size == 0 {
            return Err(IscopError::config_error("script_cache_size must be at least 1"));
        }

        if let Some(path) = &settings.pattern_file {
            if !path.is_file() {
                return Err(IscopError::PatternSettingsNotFound { path: path.clone() });
            }
        }

        if let Some(path) = &settings.catalogue_file {
            if !path.is_file() {
                return Err(IscopError::config_error(format!(
                    "Component catalogue file not found: {}",
                    path.display()
                )));
            }
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// The output file's directory must already exist
    fn validate_output_path(path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                Err(IscopError::config_error(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )))
            }
            _ => Ok(()),
        }
    }
}
