//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::{Args, OutputFormat as CliOutputFormat};
use crate::error::Result;
use crate::models::config::{OutputFormat, PartialSettings, RuleFailurePolicy};

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// The subset of command-line arguments that feed settings
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub project: Option<PathBuf>,
    pub packages: Vec<String>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub patterns: Option<PathBuf>,
    pub catalogue: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub skip_failing_rules: bool,
    pub no_validation: bool,
    pub no_parallel: bool,
    pub jobs: Option<usize>,
    pub no_colors: bool,
    pub no_progress: bool,
    pub quiet: bool,
    pub verbose: bool,
}

impl CliArgs {
    pub fn from_args(args: &Args) -> Self {
        Self {
            project: args.project.clone(),
            packages: args.packages.clone(),
            output_format: args.output.map(|format| match format {
                CliOutputFormat::Text => OutputFormat::Text,
                CliOutputFormat::Json => OutputFormat::Json,
                CliOutputFormat::Csv => OutputFormat::Csv,
            }),
            output_file: args.output_file.clone(),
            patterns: args.patterns.clone(),
            catalogue: args.catalogue.clone(),
            config: args.config.clone(),
            skip_failing_rules: args.skip_failing_rules,
            no_validation: args.no_validation,
            no_parallel: args.no_parallel,
            jobs: args.jobs,
            no_colors: args.no_colors,
            no_progress: args.no_progress,
            quiet: args.quiet,
            verbose: args.verbose,
        }
    }
}

impl CliConfig {
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    /// Create a CLI configuration source from parsed arguments
    pub fn from_args(args: &Args) -> Self {
        Self::new(CliArgs::from_args(args))
    }

    /// Get the config file path if specified
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }
}

impl ConfigSource for CliConfig {
    /// Flags only override lower layers when they were given
    fn load(&self) -> Result<PartialSettings> {
        let args = &self.args;
        let mut settings = PartialSettings {
            project_path: args.project.clone(),
            output_format: args.output_format,
            output_file: args.output_file.clone(),
            pattern_file: args.patterns.clone(),
            catalogue_file: args.catalogue.clone(),
            jobs: args.jobs,
            ..Default::default()
        };

        if !args.packages.is_empty() {
            settings.package_filter = Some(args.packages.clone());
        }
        if args.skip_failing_rules {
            settings.rule_failure_policy = Some(RuleFailurePolicy::Skip);
        }
        if args.no_validation {
            settings.include_validation = Some(false);
        }
        if args.no_parallel {
            settings.parallel = Some(false);
        }
        if args.no_colors {
            settings.use_colors = Some(false);
        }
        if args.no_progress {
            settings.show_progress = Some(false);
        }
        if args.quiet {
            settings.quiet = Some(true);
        }
        if args.verbose {
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
