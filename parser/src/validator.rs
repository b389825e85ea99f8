//! @ai:module:intent Check constrained-namespace values against the catalog
//! @ai:module:layer application
//! @ai:module:public_api validate, check_document
//! @ai:module:depends_on catalog, diagnostic, annotation
//! @ai:module:stateless true

use crate::annotation::{Annotation, ParsedDocument};
use crate::catalog;
use crate::diagnostic;
use lsp_types::Diagnostic;

/// @ai:intent Diagnostics for one annotation's value
/// @ai:post empty unless the namespace is constrained and its value is outside the enumeration
/// @ai:effects pure
pub fn validate(annotation: &Annotation) -> Vec<Diagnostic> {
    let Some(value) = annotation.value.as_deref() else {
        return Vec::new();
    };
    let Some(allowed) = catalog::allowed_values(&annotation.namespace) else {
        return Vec::new();
    };

    if allowed.contains(value) {
        return Vec::new();
    }

    vec![diagnostic::error(
        annotation.range,
        allowed.code,
        format!(
            "Invalid {} '{}'. Expected one of: {}",
            allowed.label,
            value,
            allowed.values.join(", ")
        ),
    )]
}

/// @ai:intent Run the validator on every annotation independently, appending to its diagnostics
/// @ai:effects state:write (annotations only)
pub fn check_document(document: &mut ParsedDocument) {
    for annotation in &mut document.annotations {
        let found = validate(annotation);
        annotation.diagnostics.extend(found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{code_of, codes};
    use crate::language::Language;
    use crate::parser::AnnotationParser;
    use lsp_types::DiagnosticSeverity;

    fn check(text: &str) -> ParsedDocument {
        let mut doc = AnnotationParser::new().parse(text, Language::Rust);
        check_document(&mut doc);
        doc
    }

    fn codes_of(doc: &ParsedDocument) -> Vec<String> {
        doc.diagnostics().iter().filter_map(code_of).collect()
    }

    #[test]
    fn test_invalid_lock_level() {
        let doc = check("// @acp:lock not-a-level\n");
        let diags = doc.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(codes_of(&doc), vec![codes::INVALID_LOCK_LEVEL]);
        assert!(diags[0].message.contains("frozen"));
    }

    #[test]
    fn test_valid_lock_level() {
        assert!(check("// @acp:lock frozen\n").diagnostics().is_empty());
    }

    #[test]
    fn test_invalid_layer_and_stability() {
        let doc = check("// @acp:layer nowhere\n// @acp:stability shaky - maybe\n");
        assert_eq!(
            codes_of(&doc),
            vec![codes::INVALID_LAYER, codes::INVALID_STABILITY]
        );
    }

    #[test]
    fn test_missing_value_is_not_checked() {
        assert!(check("// @acp:lock - no level given\n").diagnostics().is_empty());
    }

    #[test]
    fn test_unconstrained_namespace_accepts_anything() {
        assert!(check("// @acp:purpose !!! anything ???\n").diagnostics().is_empty());
    }

    #[test]
    fn test_siblings_are_independent() {
        let doc = check("// @acp:lock bogus @acp:lock frozen @acp:unknown-ns x @acp:layer service\n");
        assert_eq!(doc.annotations.len(), 4);
        assert_eq!(doc.annotations[0].diagnostics.len(), 1);
        assert!(doc.annotations[1].diagnostics.is_empty());
        assert_eq!(
            code_of(&doc.annotations[2].diagnostics[0]).as_deref(),
            Some(codes::UNKNOWN_NAMESPACE)
        );
        assert!(doc.annotations[3].diagnostics.is_empty());
    }
}
