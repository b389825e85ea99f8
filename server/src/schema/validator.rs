//! @ai:module:intent Validate ACP JSON artifacts and map failures to diagnostics
//! @ai:module:layer application
//! @ai:module:public_api SchemaValidation, validate, JSON_SOURCE, SCHEMA_SOURCE
//! @ai:module:depends_on schema::registry, schema::types
//! @ai:module:stateless true

use crate::schema::registry::SchemaRegistry;
use crate::schema::types::{detect_schema_type, SchemaType};
use acp_parser::diagnostic;
use acp_parser::LineIndex;
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::ValidationError;
use lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range, Url};
use serde_json::Value;

/// Source and code for documents that are not valid JSON.
pub const JSON_SOURCE: &str = "acp-json";
/// Source for schema violations.
pub const SCHEMA_SOURCE: &str = "acp-schema";

/// Width of the fallback range when a schema error cannot be located; clients clamp it.
const FALLBACK_WIDTH: u32 = 100;

/// @ai:intent Outcome of validating one document against its schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaValidation {
    pub schema_type: Option<SchemaType>,
    /// False when no type matched or the matched type has no compiled validator.
    pub checked: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl SchemaValidation {
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// @ai:intent Classify, parse and schema-check one document
/// @ai:post invalid JSON yields exactly one acp-json diagnostic
/// @ai:post unmatched or uncompiled types yield zero diagnostics
/// @ai:effects pure
pub fn validate(registry: &SchemaRegistry, uri: &Url, text: &str) -> SchemaValidation {
    let Some(schema_type) = detect_schema_type(uri) else {
        return SchemaValidation::default();
    };
    validate_as(registry, schema_type, text)
}

/// @ai:intent Validate text against a known schema type
/// @ai:effects pure
pub fn validate_as(registry: &SchemaRegistry, schema_type: SchemaType, text: &str) -> SchemaValidation {
    let Some(validator) = registry.validator(schema_type) else {
        return SchemaValidation {
            schema_type: Some(schema_type),
            checked: false,
            diagnostics: Vec::new(),
        };
    };

    let index = LineIndex::new(text);

    let instance: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            return SchemaValidation {
                schema_type: Some(schema_type),
                checked: true,
                diagnostics: vec![json_syntax_diagnostic(&e, &index)],
            };
        }
    };

    let diagnostics = match validator.validate(&instance) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|error| schema_diagnostic(&error, text, &index))
            .collect(),
    };

    SchemaValidation {
        schema_type: Some(schema_type),
        checked: true,
        diagnostics,
    }
}

/// @ai:intent Place a JSON syntax error at the parser's reported line and column
/// @ai:edge_cases line 0 (no position known) falls back to document start
fn json_syntax_diagnostic(error: &serde_json::Error, index: &LineIndex) -> Diagnostic {
    let range = if error.line() == 0 {
        Range::new(Position::new(0, 0), Position::new(0, 1))
    } else {
        let line = (error.line() - 1) as u32;
        let line_start = index.offset(Position::new(line, 0));
        // serde_json reports a one-based byte column
        let start = line_start + error.column().saturating_sub(1);
        index.range(start, start + 1)
    };

    diagnostic::build(
        range,
        DiagnosticSeverity::ERROR,
        JSON_SOURCE,
        JSON_SOURCE,
        format!("Invalid JSON: {}", error),
    )
}

fn schema_diagnostic(error: &ValidationError, text: &str, index: &LineIndex) -> Diagnostic {
    let path = error.instance_path.to_string();
    let (code, message) = describe(error, &path);
    let range = locate(&path, text, index);

    diagnostic::build(range, DiagnosticSeverity::ERROR, SCHEMA_SOURCE, &code, message)
}

/// @ai:intent Human-readable message and keyword code for a validation error
/// @ai:effects pure
fn describe(error: &ValidationError, path: &str) -> (String, String) {
    let at = if path.is_empty() { "/" } else { path };

    match &error.kind {
        ValidationErrorKind::Required { property } => (
            "required".to_string(),
            format!("Missing required property: {}", plain(property)),
        ),
        ValidationErrorKind::Type { kind } => (
            "type".to_string(),
            format!("Invalid type at {}: expected {}", at, expected_type(kind)),
        ),
        ValidationErrorKind::Enum { options } => (
            "enum".to_string(),
            format!("Invalid value at {}: expected one of {}", at, list(options)),
        ),
        ValidationErrorKind::AdditionalProperties { unexpected } => (
            "additionalProperties".to_string(),
            format!("Unknown property: {}", unexpected.join(", ")),
        ),
        _ => (keyword(error), error.to_string()),
    }
}

fn keyword(error: &ValidationError) -> String {
    let schema_path = error.schema_path.to_string();
    schema_path
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("schema")
        .to_string()
}

fn expected_type(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Single(ty) => ty.to_string(),
        TypeKind::Multiple(_) => "one of the allowed types".to_string(),
    }
}

fn plain(value: &Value) -> String {
    value
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| value.to_string())
}

fn list(options: &Value) -> String {
    match options.as_array() {
        Some(items) => items.iter().map(plain).collect::<Vec<_>>().join(", "),
        None => plain(options),
    }
}

/// @ai:intent Best-effort range: the first occurrence of the quoted last path segment
/// @ai:edge_cases not found (or root path) falls back to (0,0)-(0,100) regardless of line 0's length
/// @ai:effects pure
fn locate(path: &str, text: &str, index: &LineIndex) -> Range {
    let found = path
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(|segment| format!("\"{}\"", unescape_pointer(segment)))
        .and_then(|needle| text.find(&needle).map(|at| (at, needle.len())));

    match found {
        Some((at, len)) => index.range(at, at + len),
        None => Range::new(Position::new(0, 0), Position::new(0, FALLBACK_WIDTH)),
    }
}

fn unescape_pointer(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;
    use acp_parser::diagnostic::code_of;
    use pretty_assertions::assert_eq;

    fn run(name: &str, text: &str) -> SchemaValidation {
        let registry = SchemaRegistry::bundled();
        let uri = Url::parse(&format!("file:///repo/{}", name)).unwrap();
        validate(&registry, &uri, text)
    }

    #[test]
    fn test_unrecognized_file_is_skipped() {
        let result = run("package.json", "{ not json");
        assert_eq!(result, SchemaValidation::default());
    }

    #[test]
    fn test_valid_config() {
        let result = run(".acp.config.json", r#"{ "version": "1.0.0", "include": ["src/**"] }"#);
        assert!(result.checked);
        assert!(result.is_valid(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_missing_version() {
        let result = run(".acp.config.json", r#"{ "include": ["src"] }"#);
        assert_eq!(result.schema_type, Some(SchemaType::Config));
        let missing = result
            .diagnostics
            .iter()
            .find(|d| d.message.contains("Missing required property: version"))
            .expect("missing-version diagnostic");
        assert_eq!(missing.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(code_of(missing).as_deref(), Some("required"));
        assert_eq!(missing.source.as_deref(), Some(SCHEMA_SOURCE));
        assert_eq!(missing.range.start, Position::new(0, 0));
        assert_eq!(missing.range.end, Position::new(0, FALLBACK_WIDTH));
    }

    #[test]
    fn test_fallback_range_ignores_short_first_line() {
        let result = run(".acp.config.json", "{\n  \"include\": []\n}\n");
        let missing = result
            .diagnostics
            .iter()
            .find(|d| code_of(d).as_deref() == Some("required"))
            .expect("missing-version diagnostic");
        assert_eq!(
            missing.range,
            Range::new(Position::new(0, 0), Position::new(0, 100))
        );
    }

    #[test]
    fn test_invalid_json_yields_one_diagnostic() {
        let result = run(".acp.config.json", "{\n  \"version\": 1,\n  \"bogus\": [\n}");
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.source.as_deref(), Some(JSON_SOURCE));
        assert_eq!(code_of(diag).as_deref(), Some(JSON_SOURCE));
        assert_eq!(diag.range.start.line, 3);
    }

    #[test]
    fn test_empty_document_is_invalid_json() {
        let result = run(".acp.vars.json", "");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].source.as_deref(), Some(JSON_SOURCE));
    }

    #[test]
    fn test_keyword_templates() {
        let text = r#"{
  "version": "1",
  "constraints": { "defaultLock": "loose" },
  "exclude": "tests",
  "extra": true
}"#;
        let result = run(".acp.config.json", text);
        let messages: Vec<_> = result.diagnostics.iter().map(|d| d.message.as_str()).collect();

        assert!(messages.iter().any(|m| m.starts_with("Invalid value at /constraints/defaultLock: expected one of frozen")));
        assert!(messages.contains(&"Invalid type at /exclude: expected array"));
        assert!(messages.contains(&"Unknown property: extra"));

        let type_error = result
            .diagnostics
            .iter()
            .find(|d| code_of(d).as_deref() == Some("type"))
            .unwrap();
        assert_eq!(type_error.range.start, Position::new(3, 2));
    }

    #[test]
    fn test_fallback_keyword_uses_raw_message() {
        let text = r#"{ "version": "1", "variables": { "lower": { "type": "symbol", "value": "x" } } }"#;
        let result = run(".acp.vars.json", text);
        assert_eq!(result.diagnostics.len(), 1);
        let code = code_of(&result.diagnostics[0]).unwrap();
        assert!(matches!(code.as_str(), "propertyNames" | "pattern"), "{}", code);
        assert!(result.diagnostics[0].message.contains("lower"));
    }

    #[test]
    fn test_uncompiled_type_is_fail_soft() {
        let registry = SchemaRegistry::compile([(SchemaType::Cache, r#"{"type": 12}"#)]);
        let uri = Url::parse("file:///repo/.acp.cache.json").unwrap();
        let result = validate(&registry, &uri, "{ definitely not json");
        assert!(!result.checked);
        assert!(result.diagnostics.is_empty());
    }
}
