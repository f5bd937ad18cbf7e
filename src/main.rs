use env_logger::Env;
use iscop::{
    cli::{commands::EXIT_FAILURE, Args, Command},
    error::IscopError,
};
use std::process;

fn main() {
    let args = Args::parse_args();
    init_logging(&args);

    let command = Command::from_args(args);
    let exit_code = match command.execute() {
        Ok(code) => code,
        Err(err) => report_error(&err),
    };

    process::exit(exit_code);
}

/// `warn` by default, `info` with --verbose, `error` with --quiet;
/// RUST_LOG takes precedence
fn init_logging(args: &Args) {
    let level = if args.quiet {
        "error"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Print a run-aborting error and return the exit code for it
fn report_error(err: &IscopError) -> i32 {
    eprintln!("Error: {}", err.user_message());
    if let Some(suggestion) = err.suggestion() {
        eprintln!("Suggestion: {}", suggestion);
    }
    log::debug!("{} error: {:?}", err.severity(), err);

    EXIT_FAILURE
}
