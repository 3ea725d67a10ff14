use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use drafter_core::config::DrafterConfig;
use drafter_core::pipeline::Drafter;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Source file to analyze (`-` or omitted reads stdin)
    pub file: Option<PathBuf>,

    /// Source language; inferred from the file extension when omitted
    #[arg(long)]
    pub language: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub fn run(args: &AnalyzeArgs) -> anyhow::Result<()> {
    let source = super::read_input(args.file.as_deref())?;
    let drafter = Drafter::offline(DrafterConfig::default());

    let language = match (&args.language, &args.file) {
        (Some(lang), _) => lang.clone(),
        (None, Some(path)) => drafter
            .languages()
            .for_file(path)
            .map_or_else(|| "python".to_string(), |l| l.id().to_string()),
        (None, None) => "python".to_string(),
    };

    let graph = drafter
        .analyze_code(&language, &source)
        .context("Cannot analyze input")?;
    info!(steps = graph.steps.len(), "Execution graph ready");

    super::print_json(&graph, args.pretty)
}
