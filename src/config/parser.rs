//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IscopError, Result};
use crate::models::config::PartialSettings;

/// Configuration file name looked up in the working and home directories
pub const CONFIG_FILE_NAME: &str = ".iscop.toml";

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(IscopError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| IscopError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|e| IscopError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Reject values that can never be valid, whatever the other layers say
pub fn validate_partial_settings<P: AsRef<Path>>(
    settings: &PartialSettings,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let invalid = |what: &str| IscopError::Config {
        message: format!("{} in config file: {}", what, path.display()),
    };

    let paths = [
        ("project_path", settings.project_path.as_ref()),
        ("output_file", settings.output_file.as_ref()),
        ("pattern_file", settings.pattern_file.as_ref()),
        ("catalogue_file", settings.catalogue_file.as_ref()),
    ];
    for (key, value) in paths {
        if value.is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(invalid(&format!("Invalid empty {}", key)));
        }
    }

    if let Some(patterns) = &settings.package_filter {
        for pattern in patterns {
            if pattern.is_empty() {
                return Err(invalid("Empty package filter"));
            }
            glob::Pattern::new(pattern)
                .map_err(|e| invalid(&format!("Invalid package filter '{}': {}", pattern, e)))?;
        }
    }

    if settings.jobs == Some(0) {
        return Err(invalid("Invalid jobs 0. Must be at least 1."));
    }
    if settings.script_cache_size == Some(0) {
        return Err(invalid("Invalid script_cache_size 0. Must be at least 1."));
    }

    Ok(())
}

/// Candidate configuration files, in lookup order
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(CONFIG_FILE_NAME));
    }
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("iscop").join("config.toml"));
    }
    paths
}

/// Load the first existing file among `candidates`
pub fn find_config_in(candidates: &[PathBuf]) -> Result<Option<PartialSettings>> {
    match candidates.iter().find(|path| path.is_file()) {
        Some(path) => {
            log::debug!("Using configuration file {}", path.display());
            Ok(Some(parse_config_file(path)?))
        }
        None => Ok(None),
    }
}

/// Find and load configuration from default locations
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    find_config_in(&default_config_paths())
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(IscopError::io_error)?;
        }
    }

    fs::write(path, include_str!("default_config.toml")).map_err(|e| IscopError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
