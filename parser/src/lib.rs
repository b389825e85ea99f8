//! @ai:module:intent ACP parser library for extracting and validating comment annotations
//! @ai:module:layer infrastructure
//! @ai:module:public_api annotation, catalog, diagnostic, extractor, language, output, parser, position, validator, error
//! @ai:module:stateless true
//!
//! # ACP Parser
//!
//! Finds `@acp:` annotations inside source comments across many languages,
//! splits them into namespace / value / description / metadata, and reports
//! catalog violations as editor diagnostics.
//!
//! ## Example
//!
//! ```rust
//! use acp_parser::{analyze, Language};
//!
//! let doc = analyze("// @acp:lock frozen - payment core\n", Language::Rust);
//! assert_eq!(doc.annotations[0].value.as_deref(), Some("frozen"));
//! assert!(doc.diagnostics().is_empty());
//! ```

pub mod annotation;
pub mod catalog;
pub mod diagnostic;
pub mod error;
pub mod extractor;
pub mod language;
pub mod output;
pub mod parser;
pub mod position;
pub mod validator;

pub use annotation::{
    Annotation, Category, Modifier, ParsedDocument, ParsedFile, VariableReference,
};
pub use catalog::MARKER;
pub use error::{Error, Result};
pub use extractor::{extract_comments, CommentSpan};
pub use language::{detect_language, is_supported_file, Language};
pub use output::{format_diagnostics, format_parsed_file, format_summary, to_json, OutputFormat};
pub use parser::AnnotationParser;
pub use position::LineIndex;

use std::path::Path;

/// @ai:intent Parse a document and run the value validator over every annotation
/// @ai:effects pure
pub fn analyze(text: &str, language: Language) -> ParsedDocument {
    let mut document = AnnotationParser::new().parse(text, language);
    validator::check_document(&mut document);
    document
}

/// @ai:intent Read a source file from disk and analyze its annotations
/// @ai:pre path exists and is a supported file type
/// @ai:effects fs:read
pub fn extract_file(path: &Path) -> Result<ParsedFile> {
    let language = detect_language(path)
        .ok_or_else(|| Error::UnsupportedFileType(path.display().to_string()))?;

    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let parsed = analyze(&content, language);

    Ok(ParsedFile {
        path: path.to_path_buf(),
        language: language.id().to_string(),
        annotations: parsed.annotations,
    })
}
