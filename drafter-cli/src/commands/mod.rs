pub mod analyze;
pub mod generate;
pub mod render;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use clap::{Subcommand, ValueEnum};
use tracing::debug;

use drafter_core::config::DrafterConfig;

/// Looked up in the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "drafter.toml";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build an execution graph from source code
    Analyze(analyze::AnalyzeArgs),
    /// Generate a UML diagram from a plain-text description
    Generate(generate::GenerateArgs),
    /// Render notation for a stored diagram JSON document
    Render(render::RenderArgs),
}

pub async fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Analyze(args) => analyze::run(&args),
        Command::Generate(args) => generate::run(args).await,
        Command::Render(args) => render::run(&args),
    }
}

/// Output format for diagram commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Diagram document as JSON
    Json,
    /// Mermaid notation only
    Notation,
}

/// Read a whole input: a file path, or stdin for `None` / `-`.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Cannot read {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Cannot read standard input")?;
            Ok(buf)
        }
    }
}

/// Resolve configuration: an explicit file must exist, `./drafter.toml` is optional,
/// and `DRAFTER_LLM_*` variables override either.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<DrafterConfig> {
    let mut config = match explicit {
        Some(path) => DrafterConfig::load(path)
            .with_context(|| format!("Cannot load config: {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            DrafterConfig::load(Path::new(DEFAULT_CONFIG_FILE))
                .with_context(|| format!("Cannot load config: {DEFAULT_CONFIG_FILE}"))?
        }
        None => DrafterConfig::default(),
    };
    config
        .apply_env_overrides()
        .context("Invalid config from environment")?;
    debug!(
        remote = config.remote.endpoint().is_some(),
        model = %config.remote.model,
        "Configuration resolved"
    );
    Ok(config)
}

pub fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
