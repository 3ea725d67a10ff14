// Mermaid text for each diagram family.

use std::collections::{HashMap, HashSet};

use crate::types::{
    ActivityDiagram, ActivityNode, ActivityNodeKind, ClassDiagram, SequenceDiagram,
    UseCaseDiagram,
};

/// Keywords that end or restructure a Mermaid block when used as a bare id.
const RESERVED: &[&str] = &[
    "end", "graph", "flowchart", "subgraph", "direction", "style", "classdef", "class",
    "click", "linkstyle", "namespace", "participant", "actor", "note", "loop", "alt", "else",
    "opt", "par", "and", "rect", "critical", "break", "activate", "deactivate", "autonumber",
    "box",
];

/// Mermaid identifiers cannot contain spaces or punctuation.
fn ident(name: &str) -> String {
    let cleaned: String = single_line(name)
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

/// Ids for the names of one diagram. The same name always maps to the same
/// id and distinct names never share one.
#[derive(Debug, Default)]
struct Idents<'a> {
    assigned: HashMap<&'a str, String>,
    taken: HashSet<String>,
}

impl<'a> Idents<'a> {
    /// Pin `name` to a fixed id unless it already has one.
    fn bind(&mut self, name: &'a str, id: String) {
        self.taken.insert(id.clone());
        self.assigned.entry(name.trim()).or_insert(id);
    }

    fn id(&mut self, name: &'a str) -> String {
        let name = name.trim();
        if let Some(id) = self.assigned.get(name) {
            return id.clone();
        }
        let mut base = ident(name);
        if RESERVED.contains(&base.to_ascii_lowercase().as_str()) {
            base.push('_');
        }
        let mut id = base.clone();
        let mut n = 2;
        while self.taken.contains(&id) {
            id = format!("{base}_{n}");
            n += 1;
        }
        self.taken.insert(id.clone());
        self.assigned.insert(name, id.clone());
        id
    }
}

fn quoted(label: &str) -> String {
    format!("\"{}\"", label.replace('"', "#quot;"))
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(super) fn class(diagram: &ClassDiagram) -> String {
    let mut lines = vec!["classDiagram".to_string()];
    let mut ids = Idents::default();

    for class in &diagram.classes {
        let id = ids.id(&class.name);
        let label = single_line(&class.name);
        let head = if id == label {
            format!("class {id}")
        } else {
            format!("class {id}[{}]", quoted(&label))
        };
        if class.attributes.is_empty() && class.methods.is_empty() {
            lines.push(format!("  {head}"));
            continue;
        }
        lines.push(format!("  {head} {{"));
        for attr in &class.attributes {
            lines.push(format!("    +{}", single_line(attr)));
        }
        for method in &class.methods {
            let method = single_line(method);
            if method.ends_with(')') {
                lines.push(format!("    +{method}"));
            } else {
                lines.push(format!("    +{method}()"));
            }
        }
        lines.push("  }".to_string());
    }

    for rel in &diagram.relationships {
        let (from, to) = (ids.id(&rel.from), ids.id(&rel.to));
        let arrow = match rel.kind.as_str() {
            "has_many" => format!("{from} \"1\" --> \"*\" {to}"),
            "belongs_to" => format!("{from} \"*\" --> \"1\" {to}"),
            _ => format!("{from} --> {to}"),
        };
        lines.push(format!("  {arrow} : {}", single_line(&rel.kind)));
    }

    lines.join("\n")
}

pub(super) fn sequence(diagram: &SequenceDiagram) -> String {
    let mut lines = vec!["sequenceDiagram".to_string()];
    let mut ids = Idents::default();

    for actor in &diagram.actors {
        let id = ids.id(actor);
        let label = single_line(actor);
        if id == label {
            lines.push(format!("  participant {id}"));
        } else {
            lines.push(format!("  participant {id} as {label}"));
        }
    }

    let mut messages: Vec<_> = diagram.messages.iter().collect();
    messages.sort_by_key(|m| m.order);
    for message in messages {
        lines.push(format!(
            "  {}->>{}: {}",
            ids.id(&message.from),
            ids.id(&message.to),
            single_line(&message.label)
        ));
    }

    lines.join("\n")
}

fn activity_node(id: &str, node: &ActivityNode) -> String {
    let label = quoted(&single_line(&node.label));
    match node.kind {
        ActivityNodeKind::Decision => format!("{id}{{{label}}}"),
        ActivityNodeKind::Start | ActivityNodeKind::End => format!("{id}([{label}])"),
        ActivityNodeKind::Action | ActivityNodeKind::Unknown => format!("{id}[{label}]"),
    }
}

/// Declared nodes render with their shape, unknown ids as bare ids.
fn edge_endpoint<'a>(shapes: &HashMap<&str, String>, ids: &mut Idents<'a>, id: &'a str) -> String {
    match shapes.get(id.trim()) {
        Some(shape) => shape.clone(),
        None => ids.id(id),
    }
}

pub(super) fn activity(diagram: &ActivityDiagram) -> Option<String> {
    if diagram.nodes.is_empty() {
        return None;
    }

    let mut ids = Idents::default();
    let mut shapes: HashMap<&str, String> = HashMap::new();
    let mut ordered = Vec::with_capacity(diagram.nodes.len());
    for node in &diagram.nodes {
        let shape = activity_node(&ids.id(&node.id), node);
        shapes.entry(node.id.trim()).or_insert_with(|| shape.clone());
        ordered.push(shape);
    }

    let mut lines = vec!["flowchart TD".to_string()];

    if diagram.edges.is_empty() {
        if let [only] = ordered.as_slice() {
            lines.push(format!("  {only}"));
        }
        for pair in ordered.windows(2) {
            lines.push(format!("  {} --> {}", pair[0], pair[1]));
        }
    } else {
        for edge in &diagram.edges {
            let arrow = match edge.label.as_deref().map(single_line) {
                Some(label) if !label.is_empty() => format!("-->|{label}|"),
                _ => "-->".to_string(),
            };
            let from = edge_endpoint(&shapes, &mut ids, &edge.from);
            let to = edge_endpoint(&shapes, &mut ids, &edge.to);
            lines.push(format!("  {from} {arrow} {to}"));
        }
    }

    Some(lines.join("\n"))
}

pub(super) fn usecase(diagram: &UseCaseDiagram) -> String {
    let mut lines = vec!["flowchart LR".to_string()];
    let mut ids = Idents::default();

    for (i, actor) in diagram.actors.iter().enumerate() {
        let id = format!("A{}", i + 1);
        lines.push(format!("  {id}(({}))", quoted(&single_line(actor))));
        ids.bind(actor, id);
    }
    for (i, use_case) in diagram.use_cases.iter().enumerate() {
        let id = format!("U{}", i + 1);
        lines.push(format!("  {id}([{}])", quoted(&single_line(&use_case.name))));
        ids.bind(&use_case.name, id);
    }

    for rel in &diagram.relationships {
        let (from, to) = (ids.id(&rel.from), ids.id(&rel.to));
        lines.push(format!("  {from} --> {to}"));
    }

    lines.join("\n")
}
