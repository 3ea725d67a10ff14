// Remote-first diagram generation: prompt, single call, JSON repair, structural validation.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::RemoteError;
use crate::types::{DiagramDocument, DiagramKind};

use super::RemoteModel;

const SYSTEM_DIRECTIVE: &str = "You output UML as JSON.";

/// Keys a remote object must carry to be considered a diagram of `kind`.
pub fn required_keys(kind: DiagramKind) -> &'static [&'static str] {
    match kind {
        DiagramKind::Class => &["classes", "relationships"],
        DiagramKind::Sequence => &["actors", "messages"],
        DiagramKind::Activity => &["nodes"],
        DiagramKind::UseCase => &["actors", "use_cases"],
    }
}

pub fn build_prompt(text: &str, kind: DiagramKind) -> String {
    let shape = match kind {
        DiagramKind::Class => {
            "Return ONLY valid JSON with keys: type, classes, relationships. \
             Each class has name, attributes (list of strings), methods (list of strings). \
             Relationships include from, to, type (for example has_many, belongs_to, \
             assigned_to, has_one, uses)."
        }
        DiagramKind::Sequence => {
            "Return ONLY valid JSON with keys: type, actors, lifelines, messages. \
             actors and lifelines are lists of participant names. \
             Each message has from, to, label, order (integer starting at 1)."
        }
        DiagramKind::Activity => {
            "Return ONLY valid JSON with keys: type, nodes, edges. \
             Each node has id, label, type (start, action, decision or end). \
             Each edge has from, to and an optional label."
        }
        DiagramKind::UseCase => {
            "Return ONLY valid JSON with keys: type, actors, use_cases, relationships. \
             actors is a list of names, each use case has name, \
             each relationship has from, to, type (uses)."
        }
    };
    format!(
        "You are a UML generator producing a {kind} diagram. {shape} \
         Set type to \"{kind}\".\nText: {text}"
    )
}

/// Byte range of the first balanced `{ … }` object in `content`, ignoring braces inside strings.
fn first_object_span(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in content[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&content[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Turn raw model output into a diagram of the requested kind.
///
/// Direct JSON parse first, then the first embedded `{ … }` object. The object
/// must carry [`required_keys`]; a missing `type` is stamped with `kind` and
/// missing sequence lifelines are copied from `actors`.
pub fn parse_diagram_response(content: &str, kind: DiagramKind) -> Result<DiagramDocument, RemoteError> {
    let trimmed = content.trim();
    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(_) => {
            let span = first_object_span(trimmed)
                .ok_or_else(|| RemoteError::Malformed("no JSON object in content".to_string()))?;
            serde_json::from_str(span).map_err(|e| RemoteError::Malformed(e.to_string()))?
        }
    };

    let Value::Object(object) = value else {
        return Err(RemoteError::Malformed("content is not a JSON object".to_string()));
    };

    if let Some(missing) = required_keys(kind).iter().find(|k| !object.contains_key(**k)) {
        return Err(RemoteError::Malformed(format!("missing key `{missing}`")));
    }

    DiagramDocument::from_value_or_kind(Value::Object(object), kind)
        .map_err(|e| RemoteError::Malformed(e.to_string()))
}

/// Ask the remote model for a diagram. Exactly one attempt; any failure yields `None`.
#[instrument(skip_all, fields(kind = %kind, model = model.model_id()))]
pub async fn try_remote_generate(
    model: &dyn RemoteModel,
    text: &str,
    kind: DiagramKind,
) -> Option<DiagramDocument> {
    let prompt = build_prompt(text, kind);

    let content = match model.complete(SYSTEM_DIRECTIVE, &prompt).await {
        Ok(content) => content,
        Err(e) => {
            warn!(provider = model.name(), error = %e, "Remote model unavailable, using local extraction");
            return None;
        }
    };

    match parse_diagram_response(&content, kind) {
        Ok(doc) => {
            debug!(diagram = %doc.diagram.kind(), "Remote model produced diagram");
            Some(doc)
        }
        Err(e) => {
            warn!(provider = model.name(), error = %e, "Remote model output rejected, using local extraction");
            None
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Diagram, Relationship};

    #[derive(Debug)]
    struct CannedModel(Result<&'static str, u16>);

    #[async_trait::async_trait]
    #[allow(clippy::unnecessary_literal_bound)]
    impl RemoteModel for CannedModel {
        fn name(&self) -> &str {
            "canned"
        }

        fn model_id(&self) -> &str {
            "canned-1"
        }

        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, RemoteError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(RemoteError::ApiError {
                    status,
                    body: String::new(),
                }),
            }
        }
    }

    #[test]
    fn direct_json_is_accepted_and_stamped() {
        let doc = parse_diagram_response(
            r#"{"classes":[{"name":"User","attributes":["id"]}],"relationships":[]}"#,
            DiagramKind::Class,
        )
        .unwrap();
        let Diagram::Class(class) = doc.diagram else {
            panic!("expected class diagram");
        };
        assert_eq!(class.classes[0].name, "User");
        assert!(class.classes[0].methods.is_empty());
        assert!(doc.notation.is_none());
    }

    #[test]
    fn embedded_object_is_recovered() {
        let content = "Sure! Here is the diagram:\n```json\n{\"classes\": [{\"name\": \"A{1}\"}], \
                       \"relationships\": [{\"from\": \"A{1}\", \"to\": \"B\", \"type\": \"uses\"}]}\n```\nHope it helps {:}";
        let doc = parse_diagram_response(content, DiagramKind::Class).unwrap();
        let Diagram::Class(class) = doc.diagram else {
            panic!("expected class diagram");
        };
        assert_eq!(class.relationships, vec![Relationship::new("A{1}", "B", "uses")]);
    }

    #[test]
    fn sequence_without_lifelines_uses_actors() {
        let doc = parse_diagram_response(
            r#"{"actors":["User","Api"],"messages":[{"from":"User","to":"Api","label":"GET","order":1}]}"#,
            DiagramKind::Sequence,
        )
        .unwrap();
        let Diagram::Sequence(seq) = doc.diagram else {
            panic!("expected sequence diagram");
        };
        assert_eq!(seq.lifelines, vec!["User", "Api"]);
    }

    #[test]
    fn explicit_type_is_kept() {
        let doc = parse_diagram_response(
            r#"{"type":"class","classes":[],"relationships":[],"actors":[],"messages":[]}"#,
            DiagramKind::Sequence,
        )
        .unwrap();
        assert_eq!(doc.diagram.kind(), DiagramKind::Class);
    }

    #[test]
    fn missing_required_keys_rejected() {
        let err = parse_diagram_response(r#"{"classes":[]}"#, DiagramKind::Class).unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(ref m) if m.contains("relationships")));

        let err = parse_diagram_response(r#"{"actors":["A"]}"#, DiagramKind::UseCase).unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)));
    }

    #[test]
    fn non_object_and_garbage_rejected() {
        assert!(parse_diagram_response("[1,2,3]", DiagramKind::Class).is_err());
        assert!(parse_diagram_response("no json here", DiagramKind::Class).is_err());
        assert!(parse_diagram_response("{ unterminated", DiagramKind::Class).is_err());
    }

    #[test]
    fn wrongly_typed_fields_rejected() {
        let err = parse_diagram_response(
            r#"{"classes":"User","relationships":[]}"#,
            DiagramKind::Class,
        )
        .unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)));
    }

    #[test]
    fn prompts_name_required_keys() {
        for kind in DiagramKind::ALL {
            let prompt = build_prompt("Shop with carts", kind);
            assert!(prompt.ends_with("Text: Shop with carts"));
            for key in required_keys(kind) {
                assert!(prompt.contains(key), "{kind} prompt lacks {key}");
            }
        }
    }

    #[tokio::test]
    async fn remote_success_returns_document() {
        let model = CannedModel(Ok(
            r#"{"actors":["A","B"],"messages":[{"from":"A","to":"B","label":"hi","order":1}]}"#,
        ));
        let doc = try_remote_generate(&model, "A greets B", DiagramKind::Sequence)
            .await
            .unwrap();
        assert_eq!(doc.diagram.kind(), DiagramKind::Sequence);
    }

    #[tokio::test]
    async fn remote_failure_returns_none() {
        let model = CannedModel(Err(500));
        assert!(
            try_remote_generate(&model, "anything", DiagramKind::Class)
                .await
                .is_none()
        );

        let model = CannedModel(Ok("I cannot help with that."));
        assert!(
            try_remote_generate(&model, "anything", DiagramKind::Class)
                .await
                .is_none()
        );
    }
}
