use tree_sitter::Node;

use crate::GraphError;

/// Extract the source text for a tree-sitter node.
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}

/// Find a child by field name.
pub fn child_by_field<'a>(node: Node<'a>, field: &str) -> Option<Node<'a>> {
    node.child_by_field_name(field)
}

/// Statement forms the grammar still accepts but Python 3 rejects.
const LEGACY_STATEMENTS: &[(&str, &str)] = &[
    ("print_statement", "print"),
    ("exec_statement", "exec"),
];

/// Locate the first ERROR or MISSING node, or Python 2 statement, depth-first,
/// as a [`GraphError::Syntax`].
pub fn first_syntax_error(node: Node<'_>, source: &str) -> Option<GraphError> {
    let message = if node.is_missing() {
        Some(format!("missing `{}`", node.kind()))
    } else if node.is_error() {
        let snippet: String = node_text(node, source)
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(40)
            .collect();
        Some(format!("unexpected `{}`", snippet.trim()))
    } else {
        LEGACY_STATEMENTS
            .iter()
            .find(|(kind, _)| *kind == node.kind())
            .map(|(_, keyword)| format!("`{keyword}` statement is Python 2 syntax; call `{keyword}(...)` instead"))
    };

    if let Some(message) = message {
        let pos = node.start_position();
        return Some(GraphError::Syntax {
            line: pos.row + 1,
            column: pos.column + 1,
            message,
        });
    }

    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find_map(|child| first_syntax_error(child, source))
}
