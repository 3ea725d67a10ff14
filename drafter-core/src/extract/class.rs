use std::collections::HashMap;

use regex::Captures;
use tracing::debug;

use super::{Extraction, Rule, apply_first, templates};
use crate::patterns::{
    ASSIGNED_TO, BELONGS_TO, CREATE_CLASS, HAS_MANY, SENTENCE_BREAK, first_word_title,
    mentions_library, split_list,
};
use crate::types::{ClassDef, ClassDiagram, Diagram, Relationship};

/// Insertion-ordered classes with name lookup; relationship endpoints are created on demand.
#[derive(Debug, Default)]
struct ClassDiagramBuilder {
    classes: Vec<ClassDef>,
    index: HashMap<String, usize>,
    relationships: Vec<Relationship>,
}

impl ClassDiagramBuilder {
    fn ensure_class(&mut self, name: &str) -> &mut ClassDef {
        let existing = self.index.get(name).copied();
        let idx = match existing {
            Some(idx) => idx,
            None => {
                self.classes.push(ClassDef::new(name));
                let idx = self.classes.len() - 1;
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.classes[idx]
    }

    fn add_attributes(&mut self, name: &str, attributes: Vec<String>) {
        let class = self.ensure_class(name);
        for attr in attributes {
            if !class.attributes.contains(&attr) {
                class.attributes.push(attr);
            }
        }
    }

    fn relate(&mut self, from: &str, to: &str, kind: &str) {
        self.ensure_class(from);
        self.ensure_class(to);
        self.relationships.push(Relationship::new(from, to, kind));
    }

    fn build(self) -> ClassDiagram {
        ClassDiagram {
            classes: self.classes,
            relationships: self.relationships,
        }
    }
}

fn apply_create(caps: &Captures<'_>, builder: &mut ClassDiagramBuilder) {
    let attributes = caps
        .name("attrs")
        .map(|m| split_list(&m.as_str().replace(" and ", ", ")))
        .unwrap_or_default();
    builder.add_attributes(&caps["name"], attributes);
}

fn apply_has_many(caps: &Captures<'_>, builder: &mut ClassDiagramBuilder) {
    builder.relate(&caps["left"], &caps["right"], "has_many");
}

fn apply_belongs_to(caps: &Captures<'_>, builder: &mut ClassDiagramBuilder) {
    builder.relate(&caps["left"], &caps["right"], "belongs_to");
}

fn apply_assigned_to(caps: &Captures<'_>, builder: &mut ClassDiagramBuilder) {
    builder.relate(&caps["left"], &caps["right"], "assigned_to");
}

// Order is significant: the first matching rule claims the sentence.
fn sentence_rules() -> [Rule<ClassDiagramBuilder>; 4] {
    [
        Rule {
            name: "create_class",
            pattern: &CREATE_CLASS,
            apply: apply_create,
        },
        Rule {
            name: "has_many",
            pattern: &HAS_MANY,
            apply: apply_has_many,
        },
        Rule {
            name: "belongs_to",
            pattern: &BELONGS_TO,
            apply: apply_belongs_to,
        },
        Rule {
            name: "assigned_to",
            pattern: &ASSIGNED_TO,
            apply: apply_assigned_to,
        },
    ]
}

pub(super) fn extract(text: &str) -> Extraction {
    let rules = sentence_rules();
    let mut builder = ClassDiagramBuilder::default();

    for sentence in SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        apply_first(&rules, sentence, &mut builder);
    }

    if !builder.classes.is_empty() {
        let diagram = builder.build();
        debug!(
            classes = diagram.classes.len(),
            relationships = diagram.relationships.len(),
            "Extracted class diagram"
        );
        return Extraction {
            diagram: Diagram::Class(diagram),
            used_fallback: false,
        };
    }

    let diagram = if mentions_library(text) {
        templates::library_class()
    } else {
        let name = first_word_title(text).unwrap_or_else(|| "Main".to_string());
        ClassDiagram {
            classes: vec![ClassDef::new(name)],
            relationships: Vec::new(),
        }
    };
    debug!("No class sentence matched, using fallback diagram");
    Extraction {
        diagram: Diagram::Class(diagram),
        used_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_diagram(text: &str) -> (ClassDiagram, bool) {
        let extraction = extract(text);
        match extraction.diagram {
            Diagram::Class(c) => (c, extraction.used_fallback),
            other => panic!("expected class diagram, got {other:?}"),
        }
    }

    #[test]
    fn create_with_and_separated_attributes() {
        let (diagram, fallback) = class_diagram("Create an Invoice class with total, tax and due_date.");
        assert!(!fallback);
        assert_eq!(diagram.classes[0].name, "Invoice");
        assert_eq!(diagram.classes[0].attributes, vec!["total", "tax", "due_date"]);
    }

    #[test]
    fn repeated_create_updates_existing_class() {
        let (diagram, _) =
            class_diagram("create a User class with email. create a User class with name, email");
        assert_eq!(diagram.classes.len(), 1);
        assert_eq!(diagram.classes[0].attributes, vec!["email", "name"]);
    }

    #[test]
    fn relationship_rules_in_one_text() {
        let text = "Team has many Player\nPlayer belongs to Team\nTask can be assigned to one Player";
        let (diagram, _) = class_diagram(text);
        let names: Vec<&str> = diagram.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Team", "Player", "Task"]);
        assert_eq!(
            diagram.relationships,
            vec![
                Relationship::new("Team", "Player", "has_many"),
                Relationship::new("Player", "Team", "belongs_to"),
                Relationship::new("Task", "Player", "assigned_to"),
            ]
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        // Matches both create_class and has_many; only the class is created.
        let (diagram, _) = class_diagram("create a Shelf class with slots where Shelf has many Book");
        assert_eq!(diagram.classes.len(), 1);
        assert!(diagram.relationships.is_empty());
    }

    #[test]
    fn library_text_without_rules_uses_template() {
        let (diagram, fallback) = class_diagram("I need a library management system");
        assert!(fallback);
        assert_eq!(diagram, templates::library_class());
    }

    #[test]
    fn library_text_with_rules_is_extracted() {
        let (diagram, fallback) = class_diagram("Library has many Shelf");
        assert!(!fallback);
        assert_eq!(diagram.classes.len(), 2);
    }

    #[test]
    fn unmatched_text_names_class_from_first_word() {
        let (diagram, fallback) = class_diagram("  inventory tracking for warehouses");
        assert!(fallback);
        assert_eq!(diagram.classes.len(), 1);
        assert_eq!(diagram.classes[0].name, "Inventory");
    }

    #[test]
    fn whitespace_only_is_main() {
        let (diagram, _) = class_diagram(" \n\t ");
        assert_eq!(diagram.classes[0].name, "Main");
    }
}
