// Local text-to-diagram extraction: ordered pattern rules with template fallbacks.

mod activity;
mod class;
mod sequence;
pub mod templates;
mod usecase;

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

use crate::types::{Diagram, DiagramKind};

/// Result of one local extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub diagram: Diagram,
    /// True when a canned template or placeholder replaced pattern-derived content.
    pub used_fallback: bool,
}

/// Extract a structured diagram of `kind` from free text.
///
/// Total and deterministic: every input yields a minimally valid diagram.
pub fn extract_diagram(text: &str, kind: DiagramKind) -> Extraction {
    match kind {
        DiagramKind::Class => class::extract(text),
        DiagramKind::Sequence => sequence::extract(text),
        DiagramKind::Activity => activity::extract(text),
        DiagramKind::UseCase => usecase::extract(text),
    }
}

/// One recognizer: a pattern and what a match does to the builder state `S`.
pub(crate) struct Rule<S> {
    pub name: &'static str,
    pub pattern: &'static LazyLock<Regex>,
    pub apply: fn(&Captures<'_>, &mut S),
}

/// Try `rules` in order against `input`; the first match is applied and later rules are skipped.
pub(crate) fn apply_first<S>(rules: &[Rule<S>], input: &str, state: &mut S) -> Option<&'static str> {
    for rule in rules {
        if let Some(caps) = rule.pattern.captures(input) {
            (rule.apply)(&caps, state);
            trace!(rule = rule.name, input, "Rule matched");
            return Some(rule.name);
        }
    }
    None
}
