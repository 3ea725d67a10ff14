//! Canned diagrams for library-themed input.
//!
//! These are fixed fixtures kept for compatibility with existing demo input;
//! they are returned verbatim when pattern extraction finds nothing to build.

use crate::types::{
    ActivityDiagram, ActivityEdge, ActivityNode, ActivityNodeKind, ClassDef, ClassDiagram,
    Message, Relationship, SequenceDiagram, UseCase, UseCaseDiagram,
};

fn class(name: &str, attributes: &[&str], methods: &[&str]) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        attributes: attributes.iter().map(|a| (*a).to_string()).collect(),
        methods: methods.iter().map(|m| (*m).to_string()).collect(),
    }
}

pub fn library_class() -> ClassDiagram {
    ClassDiagram {
        classes: vec![
            class("Library", &["name", "address"], &["addBook", "registerMember"]),
            class("Book", &["title", "author", "isbn", "available"], &[]),
            class("Member", &["name", "member_id", "email"], &["borrow", "giveBack"]),
            class("Loan", &["loan_date", "due_date", "return_date"], &["isOverdue"]),
            class("Catalog", &["categories"], &["search"]),
            class("Librarian", &["name", "employee_id"], &["issueLoan"]),
        ],
        relationships: vec![
            Relationship::new("Library", "Catalog", "has_one"),
            Relationship::new("Catalog", "Book", "has_many"),
            Relationship::new("Member", "Loan", "has_many"),
            Relationship::new("Loan", "Book", "belongs_to"),
            Relationship::new("Librarian", "Library", "assigned_to"),
        ],
    }
}

pub fn library_sequence() -> SequenceDiagram {
    let steps = [
        ("Member", "LibrarySystem", "Search for book"),
        ("LibrarySystem", "Catalog", "Query by title"),
        ("Catalog", "Database", "Fetch records"),
        ("Database", "Catalog", "Matching records"),
        ("Catalog", "LibrarySystem", "Available copies"),
        ("LibrarySystem", "Member", "Show results"),
        ("Member", "Librarian", "Request loan"),
        ("Librarian", "LibrarySystem", "Create loan"),
        ("LibrarySystem", "Database", "Save loan"),
        ("LibrarySystem", "NotificationService", "Send confirmation"),
        ("NotificationService", "Member", "Loan confirmed"),
    ];

    let mut actors: Vec<String> = Vec::new();
    let mut messages = Vec::with_capacity(steps.len());
    for (order, (from, to, label)) in (1u32..).zip(steps) {
        for name in [from, to] {
            if !actors.iter().any(|a| a == name) {
                actors.push(name.to_string());
            }
        }
        messages.push(Message {
            from: from.to_string(),
            to: to.to_string(),
            label: label.to_string(),
            order,
        });
    }

    SequenceDiagram {
        lifelines: actors.clone(),
        actors,
        messages,
    }
}

pub fn library_activity() -> ActivityDiagram {
    let nodes = [
        ("Start", ActivityNodeKind::Start),
        ("Member searches catalog", ActivityNodeKind::Action),
        ("Book available?", ActivityNodeKind::Decision),
        ("Borrow book", ActivityNodeKind::Action),
        ("Reserve book", ActivityNodeKind::Action),
        ("Librarian records loan", ActivityNodeKind::Action),
        ("Notify member", ActivityNodeKind::Action),
        ("End", ActivityNodeKind::End),
    ];
    let edges = [
        ("n1", "n2", None),
        ("n2", "n3", None),
        ("n3", "n4", Some("yes")),
        ("n3", "n5", Some("no")),
        ("n4", "n6", None),
        ("n6", "n7", None),
        ("n5", "n7", None),
        ("n7", "n8", None),
    ];

    ActivityDiagram {
        nodes: nodes
            .iter()
            .enumerate()
            .map(|(i, (label, kind))| ActivityNode {
                id: format!("n{}", i + 1),
                label: (*label).to_string(),
                kind: *kind,
            })
            .collect(),
        edges: edges
            .iter()
            .map(|(from, to, label)| ActivityEdge {
                from: (*from).to_string(),
                to: (*to).to_string(),
                label: label.map(str::to_string),
            })
            .collect(),
    }
}

pub fn library_usecase() -> UseCaseDiagram {
    let links = [
        ("Member", "Search Catalog"),
        ("Member", "Borrow Book"),
        ("Member", "Return Book"),
        ("Member", "Reserve Book"),
        ("Librarian", "Manage Inventory"),
        ("Administrator", "Manage Members"),
    ];

    UseCaseDiagram {
        actors: vec![
            "Member".to_string(),
            "Librarian".to_string(),
            "Administrator".to_string(),
        ],
        use_cases: links
            .iter()
            .map(|(_, name)| UseCase {
                name: (*name).to_string(),
            })
            .collect(),
        relationships: links
            .iter()
            .map(|(actor, name)| Relationship::new(*actor, *name, "uses"))
            .collect(),
    }
}
