pub(crate) mod helpers;
pub mod python;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::ExecutionGraph;

/// Trait implemented by each language's execution-graph support.
pub trait LanguageSupport: Send + Sync + std::fmt::Debug {
    /// Language identifier (e.g., "python").
    fn id(&self) -> &'static str;

    /// File extensions this language handles.
    fn extensions(&self) -> &'static [&'static str];

    /// Tree-sitter language for parsing.
    fn tree_sitter_language(&self) -> tree_sitter::Language;

    /// Walk a parsed tree and emit one node per recognized construct.
    fn build_execution_graph(&self, tree: &tree_sitter::Tree, source: &str) -> ExecutionGraph;
}

/// Registry of all supported languages.
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: HashMap<String, Arc<dyn LanguageSupport>>,
    extension_map: HashMap<String, String>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        let mut reg = Self {
            languages: HashMap::new(),
            extension_map: HashMap::new(),
        };
        reg.register(Arc::new(python::PythonSupport));
        reg
    }

    fn register(&mut self, lang: Arc<dyn LanguageSupport>) {
        for ext in lang.extensions() {
            self.extension_map
                .insert((*ext).to_string(), lang.id().to_string());
        }
        self.languages.insert(lang.id().to_string(), lang);
    }

    /// Look up the language support for a file by its extension.
    pub fn for_file(&self, path: &Path) -> Option<Arc<dyn LanguageSupport>> {
        let ext = path.extension()?.to_str()?;
        let lang_id = self.extension_map.get(ext)?;
        self.languages.get(lang_id).cloned()
    }

    /// Get a language by its identifier (case-insensitive).
    pub fn get(&self, id: &str) -> Option<Arc<dyn LanguageSupport>> {
        self.languages.get(&id.trim().to_lowercase()).cloned()
    }

    /// List all registered language IDs, sorted.
    pub fn language_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_python_by_extension() {
        let reg = LanguageRegistry::new();
        let lang = reg.for_file(Path::new("scripts/job.py")).unwrap();
        assert_eq!(lang.id(), "python");
        assert!(reg.for_file(Path::new("main.rs")).is_none());
        assert!(reg.for_file(Path::new("Makefile")).is_none());
    }

    #[test]
    fn registry_lists_ids() {
        let reg = LanguageRegistry::default();
        assert_eq!(reg.language_ids(), vec!["python"]);
    }
}
