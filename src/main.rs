use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use simpledb::sample::load_sample_data;
use simpledb::{Database, Shell};

#[derive(Parser)]
#[command(name = "simpledb")]
#[command(about = "A lightweight in-memory SQL database", long_about = None)]
struct Cli {
    /// Load the sample users and products tables
    #[arg(long, short, env = "SIMPLEDB_SAMPLE")]
    sample: bool,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, env = "SIMPLEDB_LOG_LEVEL", default_value = "warn")]
    log_level: tracing::Level,

    /// No banner and no prompt, for piping statements on stdin
    #[arg(long, short)]
    quiet: bool,
}

fn init_tracing(level: tracing::Level) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let mut db = Database::new();
    if cli.sample {
        if let Err(e) = load_sample_data(&mut db) {
            error!(error = %e, "failed to load sample data");
            eprintln!("Error loading sample data: {e}");
        }
    }

    let stdin = io::stdin();
    let mut shell = Shell::new(db, stdin.lock(), io::stdout().lock()).quiet(cli.quiet);
    let result = if cli.sample && !cli.quiet {
        shell.print_hints().and_then(|_| shell.run())
    } else {
        shell.run()
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "i/o failure");
            ExitCode::FAILURE
        }
    }
}
