//! Command implementations

use super::Args;
use crate::config::{self, file::DEFAULT_CONFIG_FILE, CliArgs};
use crate::core::Analyzer;
use crate::error::Result;
use crate::models::{AnalysisReport, Settings};
use crate::output::{create_formatter, create_progress_callback, create_writer, ProgressReporter};
use crate::rules::{self, RuleInfo};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Process exit code when no Error-severity diagnostic was emitted
pub const EXIT_CLEAN: i32 = 0;
/// Process exit code when at least one Error-severity diagnostic was emitted
pub const EXIT_DIAGNOSTIC_ERRORS: i32 = 1;
/// Process exit code when the run itself failed
pub const EXIT_FAILURE: i32 = 2;

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Audit the configured project(s)
    Analyze(Args),
    /// Print the rule catalogue
    ListRules,
    /// Initialize a default configuration file
    Init,
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            Command::Init
        } else if args.list_rules {
            Command::ListRules
        } else {
            Command::Analyze(args)
        }
    }

    /// Execute the command, returning the process exit code
    pub fn execute(&self) -> Result<i32> {
        match self {
            Command::Init => {
                init_config(PathBuf::from(DEFAULT_CONFIG_FILE))?;
                Ok(EXIT_CLEAN)
            }
            Command::ListRules => {
                print!("{}", format_rule_list(&rules::catalogue()));
                Ok(EXIT_CLEAN)
            }
            Command::Analyze(args) => {
                let settings = config::load_config(CliArgs::from_args(args))?;
                let report = analyze(&settings)?;
                write_report(&settings, &report)?;
                Ok(exit_code(&report))
            }
        }
    }
}

/// Exit code for a completed run
pub fn exit_code(report: &AnalysisReport) -> i32 {
    if report.has_errors() {
        EXIT_DIAGNOSTIC_ERRORS
    } else {
        EXIT_CLEAN
    }
}

/// Run the analysis described by `settings`, drawing a progress bar
/// on stderr when enabled
pub fn analyze(settings: &Settings) -> Result<AnalysisReport> {
    info!("Auditing {}", settings.project_path.display());
    if settings.verbose {
        log::debug!("Settings: {:#?}", settings);
    }

    let analyzer = Analyzer::new(settings)?;
    let reporter = Arc::new(ProgressReporter::new(
        settings.show_progress && !settings.quiet,
        settings.verbose,
    ));

    reporter.start(&format!("Auditing {}", settings.project_path.display()));
    let result = analyzer.analyze_path(
        &settings.project_path,
        create_progress_callback(reporter.clone()),
    );
    reporter.finish("Audit complete");
    result
}

/// Format the report and send it to stdout or the output file
pub fn write_report(settings: &Settings, report: &AnalysisReport) -> Result<()> {
    let use_colors = settings.use_colors && settings.output_file.is_none();
    let formatter = create_formatter(
        settings.output_format,
        use_colors,
        settings.verbose,
        settings.quiet,
    );
    let content = formatter.format(report)?;

    create_writer(settings.output_file.as_ref()).write(&content)?;

    if let Some(path) = &settings.output_file {
        if !settings.quiet {
            eprintln!("Report written to {}", path.display());
        }
    }
    Ok(())
}

/// One tab-separated line per rule: id, severity, name, description
pub fn format_rule_list(rules: &[RuleInfo]) -> String {
    rules
        .iter()
        .map(|rule| {
            format!(
                "{}\t{}\t{}\t{}\n",
                rule.id,
                rule.severity.tag(),
                rule.name,
                rule.description
            )
        })
        .collect()
}

/// Write the default configuration file unless one already exists
pub fn init_config(path: PathBuf) -> Result<bool> {
    if path.exists() {
        println!("Configuration file already exists at: {}", path.display());
        println!("To overwrite it, delete the file first and run this command again.");
        return Ok(false);
    }

    config::create_default_config(&path)?;
    println!("Created default configuration file at: {}", path.display());
    Ok(true)
}
