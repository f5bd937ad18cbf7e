//! Configuration file and environment sources

use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{IscopError, Result};
use crate::models::config::PartialSettings;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = parser::CONFIG_FILE_NAME;

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Create a new file configuration source with the default path
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 10,
        }
    }

    /// Create a new file configuration source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 10,
        }
    }

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
            return Err(IscopError::ConfigNotFound {
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

/// Keys read by [`EnvConfig`], without the prefix
const ENV_KEYS: &[&str] = &[
    "PROJECT",
    "PACKAGE",
    "OUTPUT_FORMAT",
    "OUTPUT_FILE",
    "PATTERN_FILE",
    "CATALOGUE_FILE",
    "RULE_FAILURE_POLICY",
    "INCLUDE_VALIDATION",
    "PARALLEL",
    "JOBS",
    "SCRIPT_CACHE_SIZE",
];

/// Environment variable configuration source (`<PREFIX>_PROJECT`, ...)
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 20,
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key)).ok()
    }

    /// Parse a variable, rejecting values that don't parse
    fn parsed<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.var(key) {
            Some(value) => value.trim().parse().map(Some).map_err(|_| IscopError::Config {
                message: format!("Invalid value '{}' for {}_{}", value, self.prefix, key),
            }),
            None => Ok(None),
        }
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings {
            project_path: self.var("PROJECT").map(PathBuf::from),
            output_file: self.var("OUTPUT_FILE").map(PathBuf::from),
            pattern_file: self.var("PATTERN_FILE").map(PathBuf::from),
            catalogue_file: self.var("CATALOGUE_FILE").map(PathBuf::from),
            include_validation: self.parsed("INCLUDE_VALIDATION")?,
            parallel: self.parsed("PARALLEL")?,
            jobs: self.parsed("JOBS")?,
            script_cache_size: self.parsed("SCRIPT_CACHE_SIZE")?,
            ..Default::default()
        };

        if let Some(packages) = self.var("PACKAGE") {
            settings.package_filter = Some(
                packages
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }

        if let Some(format) = self.var("OUTPUT_FORMAT") {
            settings.output_format = Some(format.parse().map_err(IscopError::config_error)?);
        }

        if let Some(policy) = self.var("RULE_FAILURE_POLICY") {
            settings.rule_failure_policy = Some(policy.parse().map_err(IscopError::config_error)?);
        }

        parser::validate_partial_settings(&settings, format!("${}_*", self.prefix))?;
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
