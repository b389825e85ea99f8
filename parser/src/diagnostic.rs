//! @ai:module:intent Build editor diagnostics with stable source tags and codes
//! @ai:module:layer domain
//! @ai:module:public_api SOURCE, codes, build, error, warning, code_of
//! @ai:module:stateless true

use lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Range};

/// Source tag for annotation diagnostics.
pub const SOURCE: &str = "acp";

pub mod codes {
    pub const UNKNOWN_NAMESPACE: &str = "unknown-namespace";
    pub const INVALID_LOCK_LEVEL: &str = "invalid-lock-level";
    pub const INVALID_LAYER: &str = "invalid-layer";
    pub const INVALID_STABILITY: &str = "invalid-stability";
}

/// @ai:intent Assemble a diagnostic with a string code
/// @ai:effects pure
pub fn build(
    range: Range,
    severity: DiagnosticSeverity,
    source: &str,
    code: &str,
    message: impl Into<String>,
) -> Diagnostic {
    Diagnostic {
        range,
        severity: Some(severity),
        code: Some(NumberOrString::String(code.to_string())),
        source: Some(source.to_string()),
        message: message.into(),
        ..Default::default()
    }
}

pub fn error(range: Range, code: &str, message: impl Into<String>) -> Diagnostic {
    build(range, DiagnosticSeverity::ERROR, SOURCE, code, message)
}

pub fn warning(range: Range, code: &str, message: impl Into<String>) -> Diagnostic {
    build(range, DiagnosticSeverity::WARNING, SOURCE, code, message)
}

/// @ai:intent Read back a diagnostic's code as text
/// @ai:effects pure
pub fn code_of(diagnostic: &Diagnostic) -> Option<String> {
    match diagnostic.code.as_ref()? {
        NumberOrString::String(s) => Some(s.clone()),
        NumberOrString::Number(n) => Some(n.to_string()),
    }
}

pub fn is_error(diagnostic: &Diagnostic) -> bool {
    diagnostic.severity == Some(DiagnosticSeverity::ERROR)
}

pub fn is_warning(diagnostic: &Diagnostic) -> bool {
    diagnostic.severity == Some(DiagnosticSeverity::WARNING)
}
