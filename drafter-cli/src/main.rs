use clap::Parser;

use drafter_core::error::ConfigError;
use drafter_graphs::GraphError;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "drafter",
    version,
    about = "Execution graphs from Python source and UML diagrams from plain text"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Map an error chain to a process exit code.
///
///   0: success
///   1: general/unknown error
///   2: configuration error
///   3: unparseable or unsupported input
///   4: I/O error
fn classify_exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.is::<ConfigError>() {
            return 2;
        }
        if let Some(graph) = cause.downcast_ref::<GraphError>() {
            return match graph {
                GraphError::Syntax { .. } | GraphError::UnsupportedLanguage(_) => 3,
                GraphError::TreeSitter(_) => 1,
            };
        }
        if cause.is::<serde_json::Error>() {
            return 3;
        }
        if cause.is::<std::io::Error>() {
            return 4;
        }
    }
    1
}

fn main() {
    let cli = Cli::parse();

    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    // Logs go to stderr; stdout carries only JSON or notation.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to create runtime: {e}");
            std::process::exit(1);
        }
    };

    match runtime.block_on(commands::run(cli.command)) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    }
}
