//! Textual notation for structured diagrams.
//!
//! Rendering is pure: the same diagram always produces the same Mermaid text.

mod mermaid;

use tracing::debug;

use crate::types::{Diagram, DiagramDocument};

/// Render `diagram` as Mermaid. `None` when there is nothing to draw
/// (an activity diagram without nodes).
pub fn render_notation(diagram: &Diagram) -> Option<String> {
    match diagram {
        Diagram::Class(d) => Some(mermaid::class(d)),
        Diagram::Sequence(d) => Some(mermaid::sequence(d)),
        Diagram::Activity(d) => mermaid::activity(d),
        Diagram::UseCase(d) => Some(mermaid::usecase(d)),
    }
}

impl DiagramDocument {
    /// Attach rendered notation unless the document already carries one.
    #[must_use]
    pub fn with_notation(mut self) -> Self {
        self.ensure_notation();
        self
    }

    /// In-place form of [`with_notation`](Self::with_notation). Returns true when notation was added.
    pub fn ensure_notation(&mut self) -> bool {
        if self.notation.is_some() {
            return false;
        }
        self.notation = render_notation(&self.diagram);
        if self.notation.is_none() {
            debug!(diagram = %self.diagram.kind(), "Nothing to render");
        }
        self.notation.is_some()
    }
}

// ── Tests ───────────────────────────────────────────────────────────
