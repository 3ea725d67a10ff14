use crate::{ExecutionGraph, ExecutionGraphBuilder, StepKind};

use super::LanguageSupport;
use super::helpers::{child_by_field, node_text};

#[derive(Debug)]
pub struct PythonSupport;

impl LanguageSupport for PythonSupport {
    fn id(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py", "pyi"]
    }

    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_python::LANGUAGE.into()
    }

    fn build_execution_graph(&self, tree: &tree_sitter::Tree, source: &str) -> ExecutionGraph {
        let mut builder = ExecutionGraphBuilder::new();
        walk_python_node(tree.root_node(), source, &mut builder);
        builder.build()
    }
}

fn walk_python_node(node: tree_sitter::Node<'_>, source: &str, builder: &mut ExecutionGraphBuilder) {
    match node.kind() {
        // Annotated assignments (`x: int = 1`) carry a `type` field and are not recorded.
        "assignment" if child_by_field(node, "type").is_none() => {
            let (targets, value) = assignment_chain(node);
            let names: Vec<String> = targets
                .iter()
                .map(|t| format_name(*t, source))
                .collect();
            let joined = names.join(", ");
            builder.record(
                format!("assign {joined}"),
                StepKind::Assign,
                format!("Assign to {joined}"),
            );

            // Chained targets collapse into this one node; walk their parts directly.
            for target in targets {
                walk_python_node(target, source, builder);
            }
            if let Some(value) = value {
                walk_python_node(value, source, builder);
            }
            return;
        }
        "call" => {
            let callee = child_by_field(node, "function")
                .map_or_else(|| "Call".to_string(), |f| format_name(f, source));
            builder.record(
                format!("call {callee}"),
                StepKind::Call,
                format!("Call {callee}"),
            );
        }
        "function_definition" => {
            if let Some(name_node) = child_by_field(node, "name") {
                let name = node_text(name_node, source);
                builder.record(
                    format!("def {name}"),
                    StepKind::Function,
                    format!("Define function {name}"),
                );
            }

            // Parameters and body first, the return annotation last.
            let returns = child_by_field(node, "return_type");
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if Some(child) != returns {
                    walk_python_node(child, source, builder);
                }
            }
            if let Some(returns) = returns {
                walk_python_node(returns, source, builder);
            }
            return;
        }
        // Decorators are visited after the definition they wrap.
        "decorated_definition" => {
            let definition = child_by_field(node, "definition");
            if let Some(definition) = definition {
                walk_python_node(definition, source, builder);
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if Some(child) != definition {
                    walk_python_node(child, source, builder);
                }
            }
            return;
        }
        "return_statement" => {
            builder.record(
                "return".to_string(),
                StepKind::Return,
                "Return from function".to_string(),
            );
        }
        _ => {}
    }

    walk_python_children(node, source, builder);
}

fn walk_python_children(node: tree_sitter::Node<'_>, source: &str, builder: &mut ExecutionGraphBuilder) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_python_node(child, source, builder);
    }
}

/// Flatten `a = b = value` into its targets (left to right) and the final value.
fn assignment_chain(node: tree_sitter::Node<'_>) -> (Vec<tree_sitter::Node<'_>>, Option<tree_sitter::Node<'_>>) {
    let mut targets = Vec::new();
    let mut current = node;
    loop {
        if let Some(left) = child_by_field(current, "left") {
            targets.push(left);
        }
        match child_by_field(current, "right") {
            Some(right) if right.kind() == "assignment" && child_by_field(right, "type").is_none() => {
                current = right;
            }
            other => return (targets, other),
        }
    }
}

/// Dotted name for identifiers and attribute chains; anything else is named by its construct.
fn format_name(node: tree_sitter::Node<'_>, source: &str) -> String {
    match node.kind() {
        "identifier" => node_text(node, source).to_string(),
        "attribute" => {
            let object = child_by_field(node, "object")
                .map_or_else(String::new, |o| format_name(o, source));
            let attr = child_by_field(node, "attribute").map_or("", |a| node_text(a, source));
            format!("{object}.{attr}")
        }
        "parenthesized_expression" => {
            let mut cursor = node.walk();
            let inner = node.named_children(&mut cursor).next();
            inner.map_or_else(|| "Tuple".to_string(), |inner| format_name(inner, source))
        }
        other => construct_name(other).to_string(),
    }
}

fn construct_name(kind: &str) -> &str {
    match kind {
        "pattern_list" | "tuple_pattern" | "tuple" | "expression_list" => "Tuple",
        "list_pattern" | "list" => "List",
        "list_splat_pattern" | "list_splat" => "Starred",
        "subscript" => "Subscript",
        "call" => "Call",
        "lambda" => "Lambda",
        "await" => "Await",
        "string" | "integer" | "float" | "true" | "false" | "none" => "Constant",
        "binary_operator" => "BinOp",
        "dictionary" => "Dict",
        _ => "Expr",
    }
}

// ── Tests ───────────────────────────────────────────────────────────
