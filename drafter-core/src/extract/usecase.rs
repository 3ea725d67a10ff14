use regex::Captures;
use tracing::debug;

use super::{Extraction, Rule, apply_first, templates};
use crate::patterns::{ACTORS_LINE, USE_CASES_LINE, USES_LINE, mentions_library, split_list};
use crate::types::{Diagram, Relationship, UseCase, UseCaseDiagram};

#[derive(Debug, Default)]
struct UseCaseBuilder {
    actors: Vec<String>,
    use_cases: Vec<String>,
    relationships: Vec<Relationship>,
}

fn apply_actors(caps: &Captures<'_>, builder: &mut UseCaseBuilder) {
    builder.actors = split_list(&caps["list"]);
}

fn apply_use_cases(caps: &Captures<'_>, builder: &mut UseCaseBuilder) {
    builder.use_cases = split_list(&caps["list"]);
}

fn apply_uses(caps: &Captures<'_>, builder: &mut UseCaseBuilder) {
    builder
        .relationships
        .push(Relationship::new(&caps["actor"], &caps["use_case"], "uses"));
}

// List prefixes are checked before the free-form `uses` sentence.
fn line_rules() -> [Rule<UseCaseBuilder>; 3] {
    [
        Rule {
            name: "actors",
            pattern: &ACTORS_LINE,
            apply: apply_actors,
        },
        Rule {
            name: "use_cases",
            pattern: &USE_CASES_LINE,
            apply: apply_use_cases,
        },
        Rule {
            name: "uses",
            pattern: &USES_LINE,
            apply: apply_uses,
        },
    ]
}

pub(super) fn extract(text: &str) -> Extraction {
    if mentions_library(text) {
        return Extraction {
            diagram: Diagram::UseCase(templates::library_usecase()),
            used_fallback: true,
        };
    }

    let rules = line_rules();
    let mut builder = UseCaseBuilder::default();
    let matched = text
        .lines()
        .filter(|line| apply_first(&rules, line, &mut builder).is_some())
        .count();

    if builder.actors.is_empty() {
        builder.actors.push("Actor".to_string());
    }
    if builder.use_cases.is_empty() {
        let name = match text.trim() {
            "" => "Use Case",
            trimmed => trimmed,
        };
        builder.use_cases.push(name.to_string());
    }
    if builder.relationships.is_empty() {
        let link = Relationship::new(&builder.actors[0], &builder.use_cases[0], "uses");
        builder.relationships.push(link);
    }

    debug!(
        actors = builder.actors.len(),
        use_cases = builder.use_cases.len(),
        matched,
        "Extracted use case diagram"
    );

    Extraction {
        diagram: Diagram::UseCase(UseCaseDiagram {
            actors: builder.actors,
            use_cases: builder
                .use_cases
                .into_iter()
                .map(|name| UseCase { name })
                .collect(),
            relationships: builder.relationships,
        }),
        used_fallback: matched == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usecase(text: &str) -> (UseCaseDiagram, bool) {
        let extraction = extract(text);
        match extraction.diagram {
            Diagram::UseCase(u) => (u, extraction.used_fallback),
            other => panic!("expected use case diagram, got {other:?}"),
        }
    }

    #[test]
    fn parses_lists_and_uses_lines() {
        let text = "Actors: Student, Instructor\nUse cases: Enroll, Grade\nStudent uses Enroll\nInstructor USES Grade";
        let (diagram, fallback) = usecase(text);
        assert!(!fallback);
        assert_eq!(diagram.actors, vec!["Student", "Instructor"]);
        assert_eq!(
            diagram.use_cases,
            vec![
                UseCase {
                    name: "Enroll".into()
                },
                UseCase {
                    name: "Grade".into()
                }
            ]
        );
        assert_eq!(
            diagram.relationships,
            vec![
                Relationship::new("Student", "Enroll", "uses"),
                Relationship::new("Instructor", "Grade", "uses"),
            ]
        );
    }

    #[test]
    fn missing_relationships_link_first_actor_and_use_case() {
        let (diagram, _) = usecase("actors: Clerk\nuse cases: File report");
        assert_eq!(
            diagram.relationships,
            vec![Relationship::new("Clerk", "File report", "uses")]
        );
    }

    #[test]
    fn unmatched_text_becomes_the_use_case() {
        let (diagram, fallback) = usecase("Reset password");
        assert!(fallback);
        assert_eq!(diagram.actors, vec!["Actor"]);
        assert_eq!(diagram.use_cases[0].name, "Reset password");
        assert_eq!(
            diagram.relationships,
            vec![Relationship::new("Actor", "Reset password", "uses")]
        );
    }

    #[test]
    fn empty_text_defaults() {
        let (diagram, _) = usecase("");
        assert_eq!(diagram.use_cases[0].name, "Use Case");
    }

    #[test]
    fn library_uses_canned_usecase() {
        let (diagram, fallback) = usecase("library portal");
        assert!(fallback);
        assert_eq!(diagram.actors.len(), 3);
        assert_eq!(diagram.use_cases.len(), 6);
        assert_eq!(diagram.relationships.len(), 6);
        assert!(diagram.relationships.iter().all(|r| r.kind == "uses"));
    }
}
