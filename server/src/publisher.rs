//! @ai:module:intent Merge schema and annotation diagnostics and hand them to the editor
//! @ai:module:layer application
//! @ai:module:public_api DiagnosticsSink, Publication, MemorySink, Aggregator
//! @ai:module:depends_on documents, schema, settings
//! @ai:module:stateless false

use crate::documents::{DocumentMetadata, TextDocument};
use crate::schema::{self, SchemaRegistry};
use crate::settings::Settings;
use acp_parser::{validator, AnnotationParser};
use lsp_types::{Diagnostic, Url};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// @ai:intent Destination for per-document diagnostic sets
/// @ai:invariant each call wholly replaces the previous set for that URI
pub trait DiagnosticsSink: Send + Sync + 'static {
    fn publish(&self, uri: &Url, diagnostics: Vec<Diagnostic>, version: Option<i32>);
}

impl<T: DiagnosticsSink> DiagnosticsSink for Arc<T> {
    fn publish(&self, uri: &Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
        (**self).publish(uri, diagnostics, version)
    }
}

/// One published diagnostic set.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub uri: Url,
    pub version: Option<i32>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Forwards publications to a channel, e.g. the task writing to the client.
impl DiagnosticsSink for UnboundedSender<Publication> {
    fn publish(&self, uri: &Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
        let publication = Publication {
            uri: uri.clone(),
            version,
            diagnostics,
        };
        if self.send(publication).is_err() {
            warn!(%uri, "Diagnostics receiver dropped; publication discarded");
        }
    }
}

/// @ai:intent Records every publication in order; used by the batch checker and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    publications: Mutex<Vec<Publication>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publications(&self) -> Vec<Publication> {
        self.publications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// @ai:intent The set currently shown for a URI, if anything was ever published
    pub fn latest(&self, uri: &Url) -> Option<Publication> {
        self.publications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|p| &p.uri == uri)
            .cloned()
    }

    pub fn count_for(&self, uri: &Url) -> usize {
        self.publications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|p| &p.uri == uri)
            .count()
    }
}

impl DiagnosticsSink for MemorySink {
    fn publish(&self, uri: &Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
        self.publications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Publication {
                uri: uri.clone(),
                version,
                diagnostics,
            });
    }
}

/// @ai:intent Selects validators by document classification and publishes the merged result
pub struct Aggregator<S> {
    sink: S,
    schemas: Arc<SchemaRegistry>,
    annotations: AnnotationParser,
}

impl<S: DiagnosticsSink> Aggregator<S> {
    pub fn new(sink: S, schemas: Arc<SchemaRegistry>) -> Self {
        Self {
            sink,
            schemas,
            annotations: AnnotationParser::new(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// @ai:intent Refresh classification and run every applicable validator
    /// @ai:post schema diagnostics precede annotation diagnostics; each group keeps its own order
    /// @ai:effects state:write (metadata)
    pub fn collect(
        &self,
        document: &TextDocument,
        metadata: &mut DocumentMetadata,
        settings: &Settings,
    ) -> Vec<Diagnostic> {
        metadata.refresh(document);
        let mut diagnostics = Vec::new();

        if metadata.is_acp_json && settings.schemas_enabled {
            let result = schema::validate(&self.schemas, &document.uri, &document.text);
            diagnostics.extend(result.diagnostics);
        }

        if metadata.has_annotations && settings.annotations_enabled {
            if let Some(language) = metadata.language() {
                let mut parsed = self.annotations.parse(&document.text, language);
                validator::check_document(&mut parsed);
                diagnostics.extend(parsed.diagnostics());
            }
        }

        diagnostics
    }

    /// @ai:intent Collect and publish the full set for one document version
    /// @ai:effects publish
    pub fn validate(
        &self,
        document: &TextDocument,
        metadata: &mut DocumentMetadata,
        settings: &Settings,
    ) -> usize {
        let diagnostics = self.collect(document, metadata, settings);
        let count = diagnostics.len();
        debug!(uri = %document.uri, version = document.version, count, "Publishing diagnostics");
        self.sink
            .publish(&document.uri, diagnostics, Some(document.version));
        count
    }

    /// @ai:effects publish
    pub fn clear(&self, uri: &Url) {
        self.sink.publish(uri, Vec::new(), None);
    }
}
