use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use drafter_core::pipeline::Drafter;
use drafter_core::render::render_notation;
use drafter_core::types::DiagramKind;

use super::OutputFormat;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Description text (reads --file or stdin when omitted)
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the description from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Diagram type: class, sequence, activity, usecase (unknown values mean class)
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,

    /// Configuration file (default: ./drafter.toml when present)
    #[arg(long, env = "DRAFTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Never call the remote model
    #[arg(long)]
    pub offline: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let config = super::load_config(args.config.as_deref())?;

    let text = match args.text {
        Some(text) => text,
        None => super::read_input(args.file.as_deref())?,
    };
    let kind = args
        .kind
        .as_deref()
        .map_or(config.generate.default_type, DiagramKind::parse_lenient);

    let drafter = if args.offline {
        Drafter::offline(config)
    } else {
        Drafter::new(config).context("Cannot set up remote model")?
    };

    let generation = drafter.generate(&text, kind).await;
    info!(
        source = ?generation.source,
        used_fallback = generation.used_fallback,
        kind = %generation.document.diagram.kind(),
        "Diagram generated"
    );

    match args.format {
        OutputFormat::Json => super::print_json(&generation.document, args.pretty),
        OutputFormat::Notation => {
            let notation = match generation.document.notation {
                Some(n) => n,
                None => render_notation(&generation.document.diagram)
                    .context("Diagram has nothing to render")?,
            };
            println!("{notation}");
            Ok(())
        }
    }
}
