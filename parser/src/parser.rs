//! @ai:module:intent Turn marker-bearing comment spans into structured annotations
//! @ai:module:layer application
//! @ai:module:public_api AnnotationParser, Directive, parse_directive
//! @ai:module:depends_on extractor, catalog, position, diagnostic, annotation
//! @ai:module:stateless true

use crate::annotation::{Annotation, Category, Modifier, ParsedDocument, VariableReference};
use crate::catalog::{self, MARKER};
use crate::diagnostic::{self, codes};
use crate::extractor::{extract_comments, CommentSpan};
use crate::language::Language;
use crate::position::LineIndex;
use regex::Regex;

/// @ai:intent Stateless annotation parser; compiled patterns are shared read-only across calls
#[derive(Debug, Clone)]
pub struct AnnotationParser {
    namespace: Regex,
    variable: Regex,
}

/// @ai:intent Value, description and metadata split out of a directive body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    pub value: Option<String>,
    pub description: Option<String>,
    pub metadata: Vec<String>,
}

impl Default for AnnotationParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationParser {
    /// @ai:intent Create a parser with its patterns compiled
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            namespace: Regex::new(r"^[A-Za-z0-9_-]+").expect("Invalid regex"),
            variable: Regex::new(r"\$([A-Z][A-Z0-9_]*)(?:\.(full|ref|signature)\b)?")
                .expect("Invalid regex"),
        }
    }

    /// @ai:intent Parse every annotation in a document snapshot
    /// @ai:post output depends only on (text, language)
    /// @ai:post result is empty when text has no marker
    /// @ai:effects pure
    pub fn parse(&self, text: &str, language: Language) -> ParsedDocument {
        let spans = extract_comments(text, language);
        if spans.is_empty() {
            return ParsedDocument::default();
        }

        let index = LineIndex::new(text);
        let annotations = spans
            .iter()
            .flat_map(|span| self.parse_span(text, span, &index))
            .collect();

        ParsedDocument { annotations }
    }

    /// @ai:intent Parse the sequential, non-overlapping annotations inside one comment span
    /// @ai:edge_cases a marker with no identifier after it yields nothing
    /// @ai:effects pure
    pub fn parse_span(&self, text: &str, span: &CommentSpan, index: &LineIndex) -> Vec<Annotation> {
        let comment = span.text(text);
        let markers: Vec<usize> = comment.match_indices(MARKER).map(|(i, _)| i).collect();
        let mut annotations = Vec::new();

        for (n, &at) in markers.iter().enumerate() {
            // bounded by the next marker so a directive never swallows its sibling
            let limit = markers.get(n + 1).copied().unwrap_or(comment.len());
            let after_marker = at + MARKER.len();

            let Some(ns) = self.namespace.find(&comment[after_marker..limit]) else {
                continue;
            };

            let segment = &comment[at..limit];
            let raw_len = content_end(segment).max(MARKER.len() + ns.end());
            let raw = &segment[..raw_len];
            let start = span.start + at;
            let range = index.range(start, start + raw_len);

            let namespace = ns.as_str();
            let body = join_lines(&raw[MARKER.len() + ns.end()..]);
            let directive = parse_directive(&body);

            let mut diagnostics = Vec::new();
            let category = match catalog::lookup(namespace) {
                Some(entry) => entry.category,
                None => {
                    diagnostics.push(diagnostic::warning(
                        range,
                        codes::UNKNOWN_NAMESPACE,
                        format!("Unknown ACP namespace: {}{}", MARKER, namespace),
                    ));
                    Category::Inline
                }
            };

            annotations.push(Annotation {
                raw: raw.to_string(),
                namespace: namespace.to_string(),
                category,
                value: directive.value,
                description: directive.description,
                metadata: directive.metadata,
                range,
                variable_references: self.variable_references(raw),
                diagnostics,
            });
        }

        annotations
    }

    /// @ai:intent Collect `$NAME` / `$NAME.modifier` tokens from raw annotation text
    /// @ai:post every reference has resolved == false
    /// @ai:effects pure
    pub fn variable_references(&self, raw: &str) -> Vec<VariableReference> {
        self.variable
            .captures_iter(raw)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?.as_str().to_string();
                Some(VariableReference {
                    raw: whole.as_str().to_string(),
                    name,
                    modifier: caps.get(2).and_then(|m| Modifier::parse(m.as_str())),
                    offset: whole.start(),
                    resolved: false,
                })
            })
            .collect()
    }
}

/// @ai:intent Split a directive body into value, description and metadata
/// @ai:example (" service - text") -> value "service", description "text"
/// @ai:example ("frozen | owner | ") -> value "frozen", metadata ["owner"]
/// @ai:effects pure
pub fn parse_directive(body: &str) -> Directive {
    let mut parts = body.split('|');
    let main = parts.next().unwrap_or("").trim_end();
    let metadata = parts
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();

    let (value, description) = match main.find(" - ") {
        Some(i) => (non_empty(&main[..i]), non_empty(&main[i + 3..])),
        None => (non_empty(main), None),
    };

    Directive {
        value,
        description,
        metadata,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// @ai:intent Length of a segment once trailing blank and `*`-only continuation lines are cut
/// @ai:effects pure
fn content_end(segment: &str) -> usize {
    let mut end = 0;
    let mut offset = 0;
    for line in segment.split_inclusive('\n') {
        if !strip_continuation(line).is_empty() {
            end = offset + line.trim_end().len();
        }
        offset += line.len();
    }
    end
}

/// @ai:intent Join a multi-line body into one line, dropping `*` continuation prefixes
/// @ai:post the first line keeps its leading whitespace so " - " at the start is still a separator
/// @ai:effects pure
fn join_lines(body: &str) -> String {
    let mut lines = body.lines();
    let mut joined = lines.next().unwrap_or("").trim_end().to_string();
    for line in lines {
        let line = strip_continuation(line);
        if line.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(line);
    }
    joined
}

fn strip_continuation(line: &str) -> &str {
    let line = line.trim();
    line.strip_prefix('*').map(str::trim).unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_types::{DiagnosticSeverity, Position};
    use pretty_assertions::assert_eq;

    fn parse(text: &str, language: Language) -> ParsedDocument {
        AnnotationParser::new().parse(text, language)
    }

    #[test]
    fn test_layer_with_description() {
        let doc = parse("// @acp:layer service - text\n", Language::Rust);
        assert_eq!(doc.annotations.len(), 1);

        let a = &doc.annotations[0];
        assert_eq!(a.namespace, "layer");
        assert_eq!(a.value.as_deref(), Some("service"));
        assert_eq!(a.description.as_deref(), Some("text"));
        assert_eq!(a.category, Category::FileLevel);
        assert!(a.diagnostics.is_empty());
        assert_eq!(a.raw, "@acp:layer service - text");
        assert_eq!(a.range.start, Position::new(0, 3));
        assert_eq!(a.range.end, Position::new(0, 28));
    }

    #[test]
    fn test_no_marker_no_annotations() {
        let doc = parse("fn main() {\n    // hello\n}\n", Language::Rust);
        assert!(doc.is_empty());
        assert!(doc.diagnostics().is_empty());
    }

    #[test]
    fn test_marker_outside_comment_is_ignored() {
        let doc = parse("let s = \"@acp:lock frozen\";\n", Language::Rust);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_glob_string_does_not_swallow_later_annotation() {
        let src = "const files = glob(\"src/*\");\n// @acp:lock frozen\nexport function pay() {}\n";
        let doc = crate::analyze(src, Language::TypeScript);

        assert_eq!(doc.annotations.len(), 1);
        let a = &doc.annotations[0];
        assert_eq!(a.value.as_deref(), Some("frozen"));
        assert_eq!(a.raw, "@acp:lock frozen");
        assert_eq!(a.range.start, Position::new(1, 3));
        assert!(doc.diagnostics().is_empty());
    }

    #[test]
    fn test_unknown_namespace_warns_and_defaults_inline() {
        let doc = parse("# @acp:mystery something\n", Language::Python);
        let a = &doc.annotations[0];
        assert_eq!(a.category, Category::Inline);
        assert_eq!(a.diagnostics.len(), 1);
        assert_eq!(a.diagnostics[0].severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(
            diagnostic::code_of(&a.diagnostics[0]).as_deref(),
            Some(codes::UNKNOWN_NAMESPACE)
        );
    }

    #[test]
    fn test_multiple_annotations_in_one_comment() {
        let doc = parse(
            "// @acp:lock frozen @acp:owner team-core | oncall\n",
            Language::Go,
        );
        let got: Vec<_> = doc
            .annotations
            .iter()
            .map(|a| (a.namespace.as_str(), a.value.as_deref()))
            .collect();
        assert_eq!(got, vec![("lock", Some("frozen")), ("owner", Some("team-core"))]);
        assert_eq!(doc.annotations[1].metadata, vec!["oncall".to_string()]);
    }

    #[test]
    fn test_block_comment_annotations() {
        let src = "/**\n * @acp:purpose Token parsing\n *   across lines\n * @acp:lock restricted - hot path\n */\n";
        let doc = parse(src, Language::TypeScript);
        assert_eq!(doc.annotations.len(), 2);

        let purpose = &doc.annotations[0];
        assert_eq!(purpose.value.as_deref(), Some("Token parsing across lines"));
        assert_eq!(purpose.range.start, Position::new(1, 3));
        assert_eq!(purpose.range.end, Position::new(2, 17));

        let lock = &doc.annotations[1];
        assert_eq!(lock.value.as_deref(), Some("restricted"));
        assert_eq!(lock.description.as_deref(), Some("hot path"));
        assert_eq!(lock.range.start, Position::new(3, 3));
    }

    #[test]
    fn test_marker_without_identifier_is_silent() {
        let doc = parse("// @acp: nothing here\n// @acp:\n", Language::Rust);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_namespace_only() {
        let doc = parse("// @acp:deprecated\n", Language::Rust);
        let a = &doc.annotations[0];
        assert_eq!(a.value, None);
        assert_eq!(a.description, None);
        assert!(a.metadata.is_empty());
    }

    #[test]
    fn test_variable_references() {
        let doc = parse(
            "// @acp:ref See $AUTH_SERVICE.signature and $DB and $X.other\n",
            Language::Rust,
        );
        let refs = &doc.annotations[0].variable_references;
        let got: Vec<_> = refs
            .iter()
            .map(|r| (r.name.as_str(), r.modifier, r.resolved))
            .collect();
        assert_eq!(
            got,
            vec![
                ("AUTH_SERVICE", Some(Modifier::Signature), false),
                ("DB", None, false),
                ("X", None, false),
            ]
        );
        assert_eq!(refs[0].raw, "$AUTH_SERVICE.signature");
        assert_eq!(&doc.annotations[0].raw[refs[1].offset..refs[1].offset + 3], "$DB");
    }

    #[test]
    fn test_lowercase_dollar_is_not_a_reference() {
        let doc = parse("// @acp:note costs $lots\n", Language::Rust);
        assert!(doc.annotations[0].variable_references.is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let src = "// @acp:lock frozen\n/* @acp:layer model @acp:bogus x */\n";
        assert_eq!(parse(src, Language::C), parse(src, Language::C));
    }

    #[test]
    fn test_parse_directive_variants() {
        assert_eq!(
            parse_directive(" frozen | owner |  | legacy "),
            Directive {
                value: Some("frozen".into()),
                description: None,
                metadata: vec!["owner".into(), "legacy".into()],
            }
        );
        assert_eq!(
            parse_directive(" - only a reason"),
            Directive {
                value: None,
                description: Some("only a reason".into()),
                metadata: vec![],
            }
        );
        assert_eq!(parse_directive("   "), Directive::default());
        assert_eq!(
            parse_directive(" a-b - c - d").description.as_deref(),
            Some("c - d")
        );
    }
}
