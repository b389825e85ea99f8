//! @ai:module:intent Per-document snapshots and classification metadata
//! @ai:module:layer domain
//! @ai:module:public_api TextDocument, DocumentMetadata, LastValidated, DocumentStore
//! @ai:module:depends_on schema::types
//! @ai:module:stateless false

use crate::schema::{detect_schema_type, SchemaType};
use acp_parser::{Language, MARKER};
use chrono::{DateTime, Utc};
use lsp_types::Url;
use serde::Serialize;
use std::collections::{hash_map, HashMap};

/// @ai:intent Full-text snapshot handed over by the text-synchronization layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    pub uri: Url,
    pub language_id: String,
    pub version: i32,
    pub text: String,
}

impl TextDocument {
    pub fn new(uri: Url, language_id: impl Into<String>, version: i32, text: impl Into<String>) -> Self {
        Self {
            uri,
            language_id: language_id.into(),
            version,
            text: text.into(),
        }
    }
}

/// @ai:intent Which version was last validated, and when
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LastValidated {
    pub version: i32,
    pub at: DateTime<Utc>,
}

/// @ai:intent Classification flags derived from a document's URI, language and text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub uri: Url,
    pub language_id: String,
    pub version: i32,
    pub schema_type: Option<SchemaType>,
    pub is_acp_json: bool,
    pub supports_annotations: bool,
    pub has_annotations: bool,
    pub last_validated: Option<LastValidated>,
}

impl DocumentMetadata {
    /// @ai:intent Classify a snapshot from scratch
    /// @ai:effects pure
    pub fn classify(document: &TextDocument) -> Self {
        let mut metadata = Self {
            uri: document.uri.clone(),
            language_id: document.language_id.clone(),
            version: document.version,
            schema_type: None,
            is_acp_json: false,
            supports_annotations: false,
            has_annotations: false,
            last_validated: None,
        };
        metadata.refresh(document);
        metadata
    }

    /// @ai:intent Recompute every derived flag; keeps last_validated
    /// @ai:effects state:write
    pub fn refresh(&mut self, document: &TextDocument) {
        self.language_id = document.language_id.clone();
        self.version = document.version;
        self.schema_type = detect_schema_type(&document.uri);
        self.is_acp_json = self.schema_type.is_some();
        self.supports_annotations = self.language().is_some();
        self.has_annotations = self.supports_annotations && document.text.contains(MARKER);
    }

    pub fn language(&self) -> Option<Language> {
        Language::from_language_id(&self.language_id)
    }

    /// @ai:intent True when the current version has already been validated
    pub fn is_current(&self) -> bool {
        self.last_validated
            .map(|v| v.version == self.version)
            .unwrap_or(false)
    }
}

struct Entry {
    document: TextDocument,
    metadata: DocumentMetadata,
}

/// @ai:intent Open documents keyed by URI; entries are fully independent
#[derive(Default)]
pub struct DocumentStore {
    entries: HashMap<Url, Entry>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Insert or replace a document, reclassifying it
    /// @ai:post metadata(uri).version == document.version
    /// @ai:effects state:write
    pub fn upsert(&mut self, document: TextDocument) -> &DocumentMetadata {
        match self.entries.entry(document.uri.clone()) {
            hash_map::Entry::Occupied(occupied) => {
                let entry = occupied.into_mut();
                entry.metadata.refresh(&document);
                entry.document = document;
                &entry.metadata
            }
            hash_map::Entry::Vacant(vacant) => {
                let metadata = DocumentMetadata::classify(&document);
                &vacant.insert(Entry { document, metadata }).metadata
            }
        }
    }

    /// @ai:effects state:write
    pub fn remove(&mut self, uri: &Url) -> Option<DocumentMetadata> {
        self.entries.remove(uri).map(|e| e.metadata)
    }

    pub fn document(&self, uri: &Url) -> Option<&TextDocument> {
        self.entries.get(uri).map(|e| &e.document)
    }

    pub fn metadata(&self, uri: &Url) -> Option<&DocumentMetadata> {
        self.entries.get(uri).map(|e| &e.metadata)
    }

    /// @ai:intent Borrow the snapshot and its metadata together for validation
    pub fn get_mut(&mut self, uri: &Url) -> Option<(&TextDocument, &mut DocumentMetadata)> {
        self.entries
            .get_mut(uri)
            .map(|e| (&e.document, &mut e.metadata))
    }

    /// @ai:effects state:write
    pub fn mark_validated(&mut self, uri: &Url, version: i32) {
        if let Some(entry) = self.entries.get_mut(uri) {
            entry.metadata.last_validated = Some(LastValidated {
                version,
                at: Utc::now(),
            });
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, language_id: &str, version: i32, text: &str) -> TextDocument {
        TextDocument::new(
            Url::parse(&format!("file:///repo/{}", name)).unwrap(),
            language_id,
            version,
            text,
        )
    }

    #[test]
    fn test_classify_source_file() {
        let meta = DocumentMetadata::classify(&doc("a.ts", "typescript", 1, "// @acp:lock frozen"));
        assert!(meta.supports_annotations);
        assert!(meta.has_annotations);
        assert!(!meta.is_acp_json);
        assert_eq!(meta.schema_type, None);
    }

    #[test]
    fn test_classify_acp_json() {
        let meta = DocumentMetadata::classify(&doc(".acp.config.json", "json", 1, "{}"));
        assert!(meta.is_acp_json);
        assert_eq!(meta.schema_type, Some(SchemaType::Config));
        assert!(!meta.supports_annotations);
        assert!(!meta.has_annotations);
    }

    #[test]
    fn test_unknown_language_never_has_annotations() {
        let meta = DocumentMetadata::classify(&doc("notes.txt", "plaintext", 1, "@acp:lock frozen"));
        assert!(!meta.supports_annotations);
        assert!(!meta.has_annotations);
    }

    #[test]
    fn test_document_lifecycle() {
        let mut store = DocumentStore::new();
        let first = doc("a.rs", "rust", 1, "fn main() {}");
        let uri = first.uri.clone();

        assert!(!store.upsert(first).has_annotations);
        store.mark_validated(&uri, 1);
        assert!(store.metadata(&uri).unwrap().is_current());

        let meta = store.upsert(doc("a.rs", "rust", 2, "// @acp:todo later"));
        assert!(meta.has_annotations);
        assert_eq!(meta.version, 2);
        assert_eq!(meta.last_validated.map(|v| v.version), Some(1));
        assert!(!meta.is_current());
        assert_eq!(store.document(&uri).unwrap().text, "// @acp:todo later");

        assert!(store.remove(&uri).is_some());
        assert!(store.remove(&uri).is_none());
        assert!(store.is_empty());
    }
}
