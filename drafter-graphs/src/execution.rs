use serde::{Deserialize, Serialize};

// ── Execution graph output ─────────────────────────────────────────

/// Construct that produced an execution node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Assign,
    Call,
    Function,
    Return,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
}

/// "Happened next" link between two consecutively visited nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecStep {
    pub description: String,
    pub node_id: Option<String>,
}

/// Node/edge/step walkthrough of one program, in visitation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionGraph {
    pub nodes: Vec<ExecNode>,
    pub edges: Vec<ExecEdge>,
    pub steps: Vec<ExecStep>,
}

impl ExecutionGraph {
    pub fn node(&self, id: &str) -> Option<&ExecNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

// ── Builder ─────────────────────────────────────────────────────────

/// Allocates node ids (`n1`, `n2`, …) and chains each new node to the previous one.
#[derive(Debug, Default)]
pub struct ExecutionGraphBuilder {
    nodes: Vec<ExecNode>,
    edges: Vec<ExecEdge>,
    steps: Vec<ExecStep>,
    last_node_id: Option<String>,
    next_id: u32,
}

impl ExecutionGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id.
    pub fn add_node(&mut self, label: String, kind: StepKind) -> String {
        self.next_id += 1;
        let id = format!("n{}", self.next_id);
        self.nodes.push(ExecNode {
            id: id.clone(),
            label,
            kind,
        });
        if let Some(prev) = self.last_node_id.replace(id.clone()) {
            self.edges.push(ExecEdge {
                from: prev,
                to: id.clone(),
            });
        }
        id
    }

    pub fn add_step(&mut self, description: String, node_id: Option<String>) {
        self.steps.push(ExecStep {
            description,
            node_id,
        });
    }

    /// Add a node together with the step that describes it.
    pub fn record(&mut self, label: String, kind: StepKind, description: String) -> String {
        let id = self.add_node(label, kind);
        self.add_step(description, Some(id.clone()));
        id
    }

    pub fn build(self) -> ExecutionGraph {
        ExecutionGraph {
            nodes: self.nodes,
            edges: self.edges,
            steps: self.steps,
        }
    }
}
