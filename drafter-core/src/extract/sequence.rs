use regex::Captures;
use tracing::debug;

use super::{Extraction, Rule, apply_first, templates};
use crate::patterns::{ACTORS_LINE, MESSAGE_LINE, first_word_title, mentions_library, split_list};
use crate::types::{Diagram, Message, SequenceDiagram};

#[derive(Debug, Default)]
struct SequenceBuilder {
    actors: Vec<String>,
    messages: Vec<Message>,
}

impl SequenceBuilder {
    fn add_actor(&mut self, name: &str) {
        if !self.actors.iter().any(|a| a == name) {
            self.actors.push(name.to_string());
        }
    }
}

fn apply_actors(caps: &Captures<'_>, builder: &mut SequenceBuilder) {
    for actor in split_list(&caps["list"]) {
        builder.add_actor(&actor);
    }
}

fn apply_message(caps: &Captures<'_>, builder: &mut SequenceBuilder) {
    let from = &caps["from"];
    let to = &caps["to"];
    builder.add_actor(from);
    builder.add_actor(to);
    let order = u32::try_from(builder.messages.len() + 1).unwrap_or(u32::MAX);
    builder.messages.push(Message {
        from: from.to_string(),
        to: to.to_string(),
        label: caps["label"].to_string(),
        order,
    });
}

fn line_rules() -> [Rule<SequenceBuilder>; 2] {
    [
        Rule {
            name: "actors",
            pattern: &ACTORS_LINE,
            apply: apply_actors,
        },
        Rule {
            name: "message",
            pattern: &MESSAGE_LINE,
            apply: apply_message,
        },
    ]
}

pub(super) fn extract(text: &str) -> Extraction {
    if mentions_library(text) {
        return Extraction {
            diagram: Diagram::Sequence(templates::library_sequence()),
            used_fallback: true,
        };
    }

    let rules = line_rules();
    let mut builder = SequenceBuilder::default();
    for line in text.lines() {
        apply_first(&rules, line, &mut builder);
    }

    let used_fallback = builder.actors.is_empty();
    if used_fallback {
        builder
            .actors
            .push(first_word_title(text).unwrap_or_else(|| "Actor".to_string()));
    }

    debug!(
        actors = builder.actors.len(),
        messages = builder.messages.len(),
        "Extracted sequence diagram"
    );

    Extraction {
        diagram: Diagram::Sequence(SequenceDiagram {
            lifelines: builder.actors.clone(),
            actors: builder.actors,
            messages: builder.messages,
        }),
        used_fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(text: &str) -> (SequenceDiagram, bool) {
        let extraction = extract(text);
        match extraction.diagram {
            Diagram::Sequence(s) => (s, extraction.used_fallback),
            other => panic!("expected sequence diagram, got {other:?}"),
        }
    }

    #[test]
    fn declared_actors_come_first() {
        let text = "Actors: Browser, Api\nApi -> Db: select\nDb -> Api: rows";
        let (diagram, fallback) = sequence(text);
        assert!(!fallback);
        assert_eq!(diagram.actors, vec!["Browser", "Api", "Db"]);
        assert_eq!(diagram.messages.len(), 2);
        assert_eq!(diagram.messages[1].label, "rows");
        assert_eq!(diagram.messages[1].order, 2);
    }

    #[test]
    fn unrecognized_lines_are_ignored() {
        let (diagram, _) = sequence("The user logs in\nUser -> Auth: login\nthen it works");
        assert_eq!(diagram.messages.len(), 1);
        assert_eq!(diagram.messages[0].order, 1);
        assert_eq!(diagram.actors, vec!["User", "Auth"]);
    }

    #[test]
    fn no_actors_defaults_to_first_word() {
        let (diagram, fallback) = sequence("checkout flow");
        assert!(fallback);
        assert_eq!(diagram.actors, vec!["Checkout"]);
        assert_eq!(diagram.lifelines, vec!["Checkout"]);
        assert!(diagram.messages.is_empty());
    }

    #[test]
    fn empty_text_defaults_to_actor() {
        let (diagram, _) = sequence("");
        assert_eq!(diagram.actors, vec!["Actor"]);
    }

    #[test]
    fn library_uses_canned_sequence() {
        let (diagram, fallback) = sequence("Borrowing from the Library");
        assert!(fallback);
        assert_eq!(diagram.actors.len(), 6);
        assert_eq!(diagram.messages.len(), 11);
    }
}
