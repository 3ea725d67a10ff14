// Entry points: code analysis and remote-first diagram generation.

use serde::Serialize;
use tracing::{debug, info, instrument};

use drafter_graphs::{ExecutionGraph, LanguageRegistry};

use crate::config::DrafterConfig;
use crate::error::Result;
use crate::extract::extract_diagram;
use crate::remote::{ChatCompletionProvider, RemoteModel, try_remote_generate};
use crate::types::{DiagramDocument, DiagramKind};

/// Where a generated diagram came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationSource {
    Remote,
    Local,
}

/// Outcome of [`Drafter::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub document: DiagramDocument,
    pub source: GenerationSource,
    /// Local extraction fell back to a template or placeholder. Always false for remote results.
    pub used_fallback: bool,
}

#[derive(Debug)]
pub struct Drafter {
    config: DrafterConfig,
    remote: Option<Box<dyn RemoteModel>>,
    languages: LanguageRegistry,
}

impl Drafter {
    /// Build from config, wiring a chat-completion provider when an endpoint is set.
    pub fn new(config: DrafterConfig) -> Result<Self> {
        config.validate()?;
        let remote = ChatCompletionProvider::from_config(&config.remote)?
            .map(|p| Box::new(p) as Box<dyn RemoteModel>);
        if let Some(model) = &remote {
            debug!(model = model.model_id(), "Remote model configured");
        }
        Ok(Self {
            config,
            remote,
            languages: LanguageRegistry::default(),
        })
    }

    /// Build without a remote model regardless of config.
    pub fn offline(config: DrafterConfig) -> Self {
        Self {
            config,
            remote: None,
            languages: LanguageRegistry::default(),
        }
    }

    #[must_use]
    pub fn with_remote(mut self, model: Box<dyn RemoteModel>) -> Self {
        self.remote = Some(model);
        self
    }

    pub fn config(&self) -> &DrafterConfig {
        &self.config
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn languages(&self) -> &LanguageRegistry {
        &self.languages
    }

    /// Build the execution graph for `source` written in `language`.
    pub fn analyze_code(&self, language: &str, source: &str) -> Result<ExecutionGraph> {
        let graph = drafter_graphs::analyze_code(&self.languages, language, source)?;
        info!(
            language,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Analyzed source"
        );
        Ok(graph)
    }

    /// Produce a diagram of `kind` for `text`: one remote attempt when configured,
    /// local extraction otherwise. Never fails.
    #[instrument(skip_all, fields(kind = %kind))]
    pub async fn generate(&self, text: &str, kind: DiagramKind) -> Generation {
        if let Some(model) = self.remote.as_deref() {
            if let Some(document) = try_remote_generate(model, text, kind).await {
                info!(source = "remote", "Generated diagram");
                return Generation {
                    document: self.finish(document),
                    source: GenerationSource::Remote,
                    used_fallback: false,
                };
            }
        }
        self.generate_local(text, kind)
    }

    /// Local pattern extraction only.
    pub fn generate_local(&self, text: &str, kind: DiagramKind) -> Generation {
        let extraction = extract_diagram(text, kind);
        info!(
            source = "local",
            used_fallback = extraction.used_fallback,
            "Generated diagram"
        );
        Generation {
            document: self.finish(DiagramDocument::from(extraction.diagram)),
            source: GenerationSource::Local,
            used_fallback: extraction.used_fallback,
        }
    }

    fn finish(&self, document: DiagramDocument) -> DiagramDocument {
        if self.config.generate.attach_notation {
            document.with_notation()
        } else {
            document
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
