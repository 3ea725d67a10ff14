use tracing::debug;

use super::{Extraction, templates};
use crate::patterns::mentions_library;
use crate::types::{ActivityDiagram, ActivityEdge, ActivityNode, ActivityNodeKind, Diagram};

pub(super) fn extract(text: &str) -> Extraction {
    if text.contains("->") {
        let steps: Vec<&str> = text
            .split("->")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if !steps.is_empty() {
            debug!(steps = steps.len(), "Extracted activity chain");
            return Extraction {
                diagram: Diagram::Activity(chain(&steps)),
                used_fallback: false,
            };
        }
    }

    if mentions_library(text) {
        return Extraction {
            diagram: Diagram::Activity(templates::library_activity()),
            used_fallback: true,
        };
    }

    let label = match text.trim() {
        "" => "Start",
        trimmed => trimmed,
    };
    Extraction {
        diagram: Diagram::Activity(ActivityDiagram {
            nodes: vec![ActivityNode {
                id: "n1".to_string(),
                label: label.to_string(),
                kind: ActivityNodeKind::Action,
            }],
            edges: Vec::new(),
        }),
        used_fallback: true,
    }
}

/// Action nodes `n1..nk` joined by unlabeled edges in order.
fn chain(steps: &[&str]) -> ActivityDiagram {
    let nodes: Vec<ActivityNode> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| ActivityNode {
            id: format!("n{}", i + 1),
            label: (*step).to_string(),
            kind: ActivityNodeKind::Action,
        })
        .collect();
    let edges = nodes
        .windows(2)
        .map(|pair| ActivityEdge {
            from: pair[0].id.clone(),
            to: pair[1].id.clone(),
            label: None,
        })
        .collect();
    ActivityDiagram { nodes, edges }
}
