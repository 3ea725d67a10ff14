use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use drafter_core::types::DiagramDocument;

use super::OutputFormat;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Diagram JSON document (`-` or omitted reads stdin)
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Notation)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub fn run(args: &RenderArgs) -> anyhow::Result<()> {
    let input = super::read_input(args.file.as_deref())?;
    let mut document =
        DiagramDocument::from_json_str(&input).context("Cannot parse diagram document")?;
    document.ensure_notation();

    match args.format {
        OutputFormat::Json => super::print_json(&document, args.pretty),
        OutputFormat::Notation => {
            let notation = document
                .notation
                .context("Diagram has nothing to render")?;
            println!("{notation}");
            Ok(())
        }
    }
}
