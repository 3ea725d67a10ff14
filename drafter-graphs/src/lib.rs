pub mod execution;
pub mod languages;

use tracing::debug;

pub use execution::{ExecEdge, ExecNode, ExecStep, ExecutionGraph, ExecutionGraphBuilder, StepKind};
pub use languages::{LanguageRegistry, LanguageSupport};

/// Error type for the graph engine.
#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    /// Source text does not parse under the language grammar.
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;

/// Parse `source` with the given language and reject trees containing syntax errors.
pub fn parse_source(lang: &dyn LanguageSupport, source: &str) -> Result<tree_sitter::Tree> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&lang.tree_sitter_language())
        .map_err(|e| GraphError::TreeSitter(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| GraphError::TreeSitter("parser returned no tree".to_string()))?;

    if let Some(err) = languages::helpers::first_syntax_error(tree.root_node(), source) {
        debug!(language = lang.id(), error = %err, "Rejecting unparseable source");
        return Err(err);
    }

    Ok(tree)
}

/// Build the execution graph for a Python program.
pub fn build_execution_graph(source: &str) -> Result<ExecutionGraph> {
    let python = languages::python::PythonSupport;
    let tree = parse_source(&python, source)?;
    Ok(python.build_execution_graph(&tree, source))
}

/// Build the execution graph for `source` written in `language`.
///
/// Language ids are matched case-insensitively against the registry; anything
/// unregistered fails with [`GraphError::UnsupportedLanguage`].
pub fn analyze_code(registry: &LanguageRegistry, language: &str, source: &str) -> Result<ExecutionGraph> {
    let lang = registry
        .get(language)
        .ok_or_else(|| GraphError::UnsupportedLanguage(language.to_string()))?;
    let tree = parse_source(&*lang, source)?;
    Ok(lang.build_execution_graph(&tree, source))
}
