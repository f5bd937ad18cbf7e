//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// ISCop - rule-based auditor for SSIS workflow projects
#[derive(Parser, Debug)]
#[command(name = "iscop")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Audit SSIS workflow projects against a catalogue of best-practice rules")]
#[command(long_about = "ISCop opens a project of workflow packages, walks their control-flow trees and \
data-flow pipelines, analyses embedded C# scripts and reports every rule violation as a diagnostic. \
The exit code is 0 when no error-severity diagnostic was emitted, 1 otherwise, and 2 when the run \
itself failed.")]
#[command(after_help = "EXAMPLES:

Basic Usage:
    # Audit the project files in the current directory
    iscop

    # Audit one project file
    iscop --project ./Warehouse.json

    # Only audit packages whose name matches a glob
    iscop --project ./Warehouse.json --package 'Load*' --package Extract

Output Options:
    # JSON report written to a file
    iscop --output json --output-file report.json

    # CSV for spreadsheet analysis
    iscop --output csv --output-file report.csv

Rules:
    # List every rule with its id, severity and description
    iscop --list-rules

    # Use custom error-handling patterns for the script analysis rules
    iscop --patterns ./patterns.toml

    # Keep going when a rule fails on a package
    iscop --skip-failing-rules

Configuration:
    # Write a default .iscop.toml in the current directory
    iscop --init
")]
pub struct Args {
    /// Project file or directory of project files
    #[arg(short, long, value_name = "PATH", help = "Project file, or directory searched for *.json project files (defaults to the current directory)")]
    pub project: Option<PathBuf>,

    /// Package name filters
    #[arg(long = "package", value_name = "GLOB", help = "Only audit packages whose name matches this glob, with or without .dtsx (can be specified multiple times)")]
    pub packages: Vec<String>,

    /// Output format (text, json, csv)
    #[arg(short, long, value_enum, help = "Output format: 'text' for tab-separated lines, 'json' for a report, 'csv' for spreadsheets [default: text]")]
    pub output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(long, value_name = "FILE", help = "File to write output to (uses stdout if not specified)")]
    pub output_file: Option<PathBuf>,

    /// Error-handling pattern settings
    #[arg(long, value_name = "FILE", help = "TOML file with the error-handling patterns required in catch blocks of script methods")]
    pub patterns: Option<PathBuf>,

    /// Extra component catalogue entries
    #[arg(long, value_name = "FILE", help = "TOML file with component catalogue entries layered over the built-in ones")]
    pub catalogue: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to configuration file (defaults to .iscop.toml in the current directory, then the home directory)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Log and skip a rule that fails on a package instead of aborting the run")]
    pub skip_failing_rules: bool,

    #[arg(long, help = "Do not report the validation errors and warnings stored with each package")]
    pub no_validation: bool,

    /// Disable parallel processing
    #[arg(long, help = "Analyse project files one after another on a single thread")]
    pub no_parallel: bool,

    /// Number of worker threads
    #[arg(short, long, value_name = "N", help = "Number of worker threads for parallel analysis (defaults to the number of CPUs)")]
    pub jobs: Option<usize>,

    /// Disable colored output
    #[arg(long, help = "Disable colored output (useful for terminals that don't support ANSI colors or for piping output)")]
    pub no_colors: bool,

    /// Disable progress bars
    #[arg(long, help = "Disable progress bars (useful for CI environments or when redirecting output)")]
    pub no_progress: bool,

    /// Suppress non-essential output
    #[arg(short, long, help = "Suppress non-essential output (only diagnostics, no progress or summary)")]
    pub quiet: bool,

    /// Show detailed progress and debug information
    #[arg(short, long, help = "Show detailed progress and log run milestones")]
    pub verbose: bool,

    #[arg(long, help = "List the rules and exit")]
    pub list_rules: bool,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default configuration file (.iscop.toml) in the current directory")]
    pub init: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated diagnostic lines
    Text,
    /// JSON report for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
