//! JSON schema builders for MCP tools.

use schemars::{JsonSchema, schema_for};
use serde_json::{Map, Value};

/// Build the schema describing the `ingest-document` tool input.
pub(crate) fn ingest_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "text".into(),
        string_schema("Plain text already extracted from the paper"),
    );
    properties.insert(
        "filename".into(),
        string_schema("Original filename; sanitized before storage"),
    );
    properties.insert(
        "owner_id".into(),
        string_schema("Identifier of the user who owns the document"),
    );

    finalize_object_schema(properties, &["text", "owner_id"])
}

/// Build the schema for tools that only take a `doc_id`.
pub(crate) fn doc_id_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "doc_id".into(),
        string_schema("Document identifier returned by ingest-document"),
    );

    finalize_object_schema(properties, &["doc_id"])
}

/// Build the schema describing the `ask-paper` tool input.
pub(crate) fn ask_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "doc_id".into(),
        string_schema("Document identifier returned by ingest-document"),
    );

    let mut question_schema = Map::new();
    question_schema.insert("type".into(), Value::String("string".into()));
    question_schema.insert(
        "description".into(),
        Value::String("Question answered from the opening of the paper".into()),
    );
    question_schema.insert("minLength".into(), Value::Number(1.into()));
    properties.insert("question".into(), Value::Object(question_schema));

    finalize_object_schema(properties, &["doc_id", "question"])
}

/// Schema representing an empty object (used for parameterless tools).
pub(crate) fn empty_object_schema() -> Map<String, Value> {
    finalize_object_schema(Map::new(), &[])
}

/// Derive an output schema from a payload type.
pub(crate) fn output_schema<T: JsonSchema>() -> Map<String, Value> {
    match serde_json::to_value(schema_for!(T)) {
        Ok(Value::Object(mut schema)) => {
            schema.remove("$schema");
            schema
        }
        _ => empty_object_schema(),
    }
}

fn string_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn finalize_object_schema(properties: Map<String, Value>, required: &[&str]) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert(
            "required".into(),
            Value::Array(
                required
                    .iter()
                    .map(|&key| Value::String(key.into()))
                    .collect(),
            ),
        );
    }
    schema.insert("additionalProperties".into(), Value::Bool(false));
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::format::ProgressPayload;

    #[test]
    fn ingest_schema_requires_text_and_owner() {
        let schema = ingest_input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(
            schema["required"],
            Value::Array(vec!["text".into(), "owner_id".into()])
        );
        assert!(schema["properties"]["filename"].is_object());
    }

    #[test]
    fn empty_schema_has_no_required_fields() {
        let schema = empty_object_schema();
        assert!(!schema.contains_key("required"));
        assert_eq!(schema["additionalProperties"], false);
    }

    #[test]
    fn output_schema_reflects_payload_fields() {
        let schema = output_schema::<ProgressPayload>();
        assert_eq!(schema["type"], "object");
        let properties = schema["properties"].as_object().expect("properties");
        assert!(properties.contains_key("docId"));
        assert!(properties.contains_key("status"));
        assert!(properties.contains_key("progress"));
        assert!(!schema.contains_key("$schema"));
    }
}
