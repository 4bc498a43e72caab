use std::process;

use codemap::{
    cli::{Args, Command, Commands},
    error::{CodemapError, ErrorSeverity},
};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse_args();

    init_logging(&args);

    let command = Command::from_args(args);
    let exit_code = run_command(command);

    process::exit(exit_code);
}

/// Log to stderr; RUST_LOG wins over the verbosity flags
fn init_logging(args: &Args) {
    let default_level = match &args.command {
        Commands::Map(map) if map.quiet => "error",
        Commands::Map(map) if map.verbose => "info",
        _ => "warn",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("codemap={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Run the command and map its failure to an exit code
fn run_command(command: Command) -> i32 {
    match command.execute() {
        Ok(()) => 0,
        Err(err) => report_error(&err),
    }
}

fn report_error(err: &CodemapError) -> i32 {
    eprintln!("\nError: {}", err.user_message());

    if let Some(suggestion) = err.suggestion() {
        eprintln!("Suggestion: {}", suggestion);
    }

    let exit_code = match err.severity() {
        ErrorSeverity::Warning => 0,
        ErrorSeverity::Error => 1,
        ErrorSeverity::Critical => 2,
    };

    if exit_code > 0 {
        eprintln!("\nExiting with code {} due to {}", exit_code, err.severity());
    }

    exit_code
}
