//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration settings for ISCop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Project file, or directory of project files, to audit
    pub project_path: PathBuf,

    /// Glob patterns selecting packages by stream name (empty = all)
    pub package_filter: Vec<String>,

    /// Output format (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Error-handling pattern settings for the script analysis rules
    pub pattern_file: Option<PathBuf>,

    /// Extra component catalogue entries
    pub catalogue_file: Option<PathBuf>,

    /// What to do when a rule fails while checking a package
    pub rule_failure_policy: RuleFailurePolicy,

    /// Whether to report the loader's own validation errors and warnings
    pub include_validation: bool,

    /// Whether to analyse multiple project files in parallel
    pub parallel: bool,

    /// Number of worker threads for parallel analysis
    pub jobs: usize,

    /// Number of parsed scripts kept in the script cache
    pub script_cache_size: usize,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed progress and debug information
    pub verbose: bool,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show progress bars
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_path: PathBuf::from("."),
            package_filter: Vec::new(),
            output_format: OutputFormat::Text,
            output_file: None,
            pattern_file: None,
            catalogue_file: None,
            rule_failure_policy: RuleFailurePolicy::Abort,
            include_validation: true,
            parallel: true,
            jobs: num_cpus::get(),
            script_cache_size: 64,
            quiet: false,
            verbose: false,
            use_colors: true,
            show_progress: true,
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated diagnostic lines
    Text,
    /// JSON report for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "tsv" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Policy applied when a rule returns an error for a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleFailurePolicy {
    /// Stop the run and report the failure
    #[default]
    Abort,
    /// Log a warning and continue with the next rule
    Skip,
}

impl std::str::FromStr for RuleFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(RuleFailurePolicy::Abort),
            "skip" => Ok(RuleFailurePolicy::Skip),
            _ => Err(format!("Invalid rule failure policy: {}", s)),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialSettings {
    pub project_path: Option<PathBuf>,
    pub package_filter: Option<Vec<String>>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub pattern_file: Option<PathBuf>,
    pub catalogue_file: Option<PathBuf>,
    pub rule_failure_policy: Option<RuleFailurePolicy>,
    pub include_validation: Option<bool>,
    pub parallel: Option<bool>,
    pub jobs: Option<usize>,
    pub script_cache_size: Option<usize>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        if other.project_path.is_some() {
            self.project_path = other.project_path;
        }
        if other.package_filter.is_some() {
            self.package_filter = other.package_filter;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        if other.pattern_file.is_some() {
            self.pattern_file = other.pattern_file;
        }
        if other.catalogue_file.is_some() {
            self.catalogue_file = other.catalogue_file;
        }
        if other.rule_failure_policy.is_some() {
            self.rule_failure_policy = other.rule_failure_policy;
        }
        if other.include_validation.is_some() {
            self.include_validation = other.include_validation;
        }
        if other.parallel.is_some() {
            self.parallel = other.parallel;
        }
        if other.jobs.is_some() {
            self.jobs = other.jobs;
        }
        if other.script_cache_size.is_some() {
            self.script_cache_size = other.script_cache_size;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.use_colors.is_some() {
            self.use_colors = other.use_colors;
        }
        if other.show_progress.is_some() {
            self.show_progress = other.show_progress;
        }
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(project_path) = &self.project_path {
            settings.project_path = project_path.clone();
        }
        if let Some(package_filter) = &self.package_filter {
            settings.package_filter = package_filter.clone();
        }
        if let Some(output_format) = self.output_format {
            settings.output_format = output_format;
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(pattern_file) = &self.pattern_file {
            settings.pattern_file = Some(pattern_file.clone());
        }
        if let Some(catalogue_file) = &self.catalogue_file {
            settings.catalogue_file = Some(catalogue_file.clone());
        }
        if let Some(policy) = self.rule_failure_policy {
            settings.rule_failure_policy = policy;
        }
        if let Some(include_validation) = self.include_validation {
            settings.include_validation = include_validation;
        }
        if let Some(parallel) = self.parallel {
            settings.parallel = parallel;
        }
        if let Some(jobs) = self.jobs {
            settings.jobs = jobs;
        }
        if let Some(script_cache_size) = self.script_cache_size {
            settings.script_cache_size = script_cache_size;
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(verbose) = self.verbose {
            settings.verbose = verbose;
        }
        if let Some(use_colors) = self.use_colors {
            settings.use_colors = use_colors;
        }
        if let Some(show_progress) = self.show_progress {
            settings.show_progress = show_progress;
        }

        settings
    }
}
