//! @ai:module:intent Define data structures for parsed ACP annotations
//! @ai:module:layer domain
//! @ai:module:public_api Annotation, Category, Modifier, VariableReference, ParsedDocument, ParsedFile
//! @ai:module:stateless true

use lsp_types::{Diagnostic, Range};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent Categorizes a namespace by the scope it annotates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    FileLevel,
    SymbolLevel,
    Constraint,
    Inline,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::FileLevel => "file-level",
            Category::SymbolLevel => "symbol-level",
            Category::Constraint => "constraint",
            Category::Inline => "inline",
        }
    }
}

/// @ai:intent How much of a referenced variable's target should be expanded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Full,
    Ref,
    Signature,
}

impl Modifier {
    /// @ai:example ("ref") -> Some(Ref)
    /// @ai:example ("REF") -> None
    /// @ai:effects pure
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "full" => Some(Modifier::Full),
            "ref" => Some(Modifier::Ref),
            "signature" => Some(Modifier::Signature),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Full => "full",
            Modifier::Ref => "ref",
            Modifier::Signature => "signature",
        }
    }
}

/// @ai:intent A `$NAME` token found inside an annotation, left for an external index to resolve
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VariableReference {
    pub raw: String,
    pub name: String,
    pub modifier: Option<Modifier>,
    /// Byte offset of `$` within the annotation's raw text.
    pub offset: usize,
    pub resolved: bool,
}

/// @ai:intent Represents a single parsed `@acp:` directive
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub raw: String,
    pub namespace: String,
    pub category: Category,
    pub value: Option<String>,
    pub description: Option<String>,
    pub metadata: Vec<String>,
    pub range: Range,
    pub variable_references: Vec<VariableReference>,
    pub diagnostics: Vec<Diagnostic>,
}

/// @ai:intent Annotations recovered from one snapshot of a document's text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ParsedDocument {
    pub annotations: Vec<Annotation>,
}

impl ParsedDocument {
    /// @ai:intent Flatten per-annotation diagnostics in source order
    /// @ai:effects pure
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.annotations
            .iter()
            .flat_map(|a| a.diagnostics.iter().cloned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

/// @ai:intent Complete parsed result for a file read from disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub language: String,
    pub annotations: Vec<Annotation>,
}
