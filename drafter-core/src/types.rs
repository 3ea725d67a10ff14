// Structured diagram model shared by the extractor, remote bridge, and renderer.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Diagram kind ────────────────────────────────────────────────────

/// Requested diagram family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    #[default]
    Class,
    Sequence,
    Activity,
    #[serde(rename = "usecase")]
    UseCase,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 4] = [
        DiagramKind::Class,
        DiagramKind::Sequence,
        DiagramKind::Activity,
        DiagramKind::UseCase,
    ];

    /// Map a caller-supplied type name to a kind; unrecognized names mean `Class`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequence" => Self::Sequence,
            "activity" => Self::Activity,
            "usecase" | "use_case" | "use-case" => Self::UseCase,
            _ => Self::Class,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Sequence => "sequence",
            Self::Activity => "activity",
            Self::UseCase => "usecase",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Shared pieces ───────────────────────────────────────────────────

/// Directed, typed link between two named elements.
///
/// `kind` is an open vocabulary (`has_many`, `belongs_to`, `assigned_to`,
/// `has_one`, `uses`, …).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Relationship {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: kind.into(),
        }
    }
}

// ── Class ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            methods: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDiagram {
    #[serde(default)]
    pub classes: Vec<ClassDef>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl ClassDiagram {
    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.name == name)
    }
}

// ── Sequence ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceDiagram {
    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub lifelines: Vec<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

// ── Activity ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityNodeKind {
    Start,
    #[default]
    Action,
    Decision,
    End,
    /// Any other tag a remote model invents.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: ActivityNodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEdge {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Empty `edges` means the nodes form a linear chain in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDiagram {
    #[serde(default)]
    pub nodes: Vec<ActivityNode>,
    #[serde(default)]
    pub edges: Vec<ActivityEdge>,
}

// ── Use case ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseDiagram {
    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub use_cases: Vec<UseCase>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

// ── Diagram ─────────────────────────────────────────────────────────

/// One structured diagram, tagged on the wire by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Diagram {
    Class(ClassDiagram),
    Sequence(SequenceDiagram),
    Activity(ActivityDiagram),
    #[serde(rename = "usecase")]
    UseCase(UseCaseDiagram),
}

impl Diagram {
    pub fn kind(&self) -> DiagramKind {
        match self {
            Self::Class(_) => DiagramKind::Class,
            Self::Sequence(_) => DiagramKind::Sequence,
            Self::Activity(_) => DiagramKind::Activity,
            Self::UseCase(_) => DiagramKind::UseCase,
        }
    }
}

/// A diagram plus its derived notation, serialized as one flat object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramDocument {
    #[serde(flatten)]
    pub diagram: Diagram,
    #[serde(default, alias = "mermaid", skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
}

impl DiagramDocument {
    /// Decode a stored document; a missing `type` means class.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        Self::from_value_or_kind(serde_json::from_str(json)?, DiagramKind::Class)
    }

    /// Decode `value`, stamping `kind` as its `type` when absent.
    ///
    /// Sequence diagrams without lifelines get them from `actors`.
    pub fn from_value_or_kind(
        mut value: serde_json::Value,
        kind: DiagramKind,
    ) -> Result<Self, serde_json::Error> {
        if let serde_json::Value::Object(object) = &mut value {
            object
                .entry("type")
                .or_insert_with(|| serde_json::Value::String(kind.as_str().to_string()));
        }
        let mut document: Self = serde_json::from_value(value)?;
        if let Diagram::Sequence(sequence) = &mut document.diagram {
            if sequence.lifelines.is_empty() {
                sequence.lifelines.clone_from(&sequence.actors);
            }
        }
        Ok(document)
    }
}

impl From<Diagram> for DiagramDocument {
    fn from(diagram: Diagram) -> Self {
        Self {
            diagram,
            notation: None,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
