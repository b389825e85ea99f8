//! @ai:module:intent Drive validation from document lifecycle notifications
//! @ai:module:layer application
//! @ai:module:public_api DiagnosticsEngine
//! @ai:module:depends_on documents, scheduler, publisher, settings, schema
//! @ai:module:stateless false

use crate::documents::{DocumentMetadata, DocumentStore, TextDocument};
use crate::publisher::{Aggregator, DiagnosticsSink};
use crate::scheduler::Scheduler;
use crate::schema::SchemaRegistry;
use crate::settings::Settings;
use lsp_types::Url;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::Duration;
use tracing::{debug, info};

struct EngineInner<S> {
    settings: RwLock<Settings>,
    documents: Mutex<DocumentStore>,
    scheduler: Scheduler,
    aggregator: Aggregator<S>,
}

impl<S: DiagnosticsSink> EngineInner<S> {
    fn settings(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn documents(&self) -> MutexGuard<'_, DocumentStore> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Holds the store lock through publish so a concurrent close cannot be overtaken.
    fn validate(&self, uri: &Url) -> Option<usize> {
        let settings = self.settings();
        let mut documents = self.documents();
        let (document, metadata) = documents.get_mut(uri)?;
        let version = document.version;
        let count = self.aggregator.validate(document, metadata, &settings);
        documents.mark_validated(uri, version);
        Some(count)
    }
}

/// @ai:intent Per-document Idle/Pending state machine over the store, scheduler and aggregator
/// @ai:pre lifecycle methods run inside a tokio runtime (timers are tokio tasks)
/// @ai:invariant at most one pending validation per URI; the latest edit always wins
pub struct DiagnosticsEngine<S> {
    inner: Arc<EngineInner<S>>,
}

impl<S> Clone for DiagnosticsEngine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: DiagnosticsSink> DiagnosticsEngine<S> {
    pub fn new(sink: S, schemas: Arc<SchemaRegistry>, settings: Settings) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                settings: RwLock::new(settings),
                documents: Mutex::new(DocumentStore::new()),
                scheduler: Scheduler::new(),
                aggregator: Aggregator::new(sink, schemas),
            }),
        }
    }

    /// @ai:intent Track a newly opened document; schedule a debounced validation when enabled
    /// @ai:effects state:write, spawn
    pub fn did_open(&self, document: TextDocument) {
        let uri = document.uri.clone();
        let metadata = self.inner.documents().upsert(document).clone();
        debug!(%uri, language = %metadata.language_id, is_acp_json = metadata.is_acp_json, "Document opened");

        let settings = self.inner.settings();
        if settings.validate_on_open {
            self.schedule(uri, settings.debounce());
        }
    }

    /// @ai:intent Replace the snapshot and restart the debounce timer
    /// @ai:effects state:write, spawn
    pub fn did_change(&self, document: TextDocument) {
        let uri = document.uri.clone();
        self.inner.documents().upsert(document);
        self.schedule(uri, self.inner.settings().debounce());
    }

    /// @ai:intent Cancel any pending timer and validate synchronously when enabled
    /// @ai:effects state:write, publish
    pub fn did_save(&self, document: TextDocument) {
        let uri = document.uri.clone();
        self.inner.documents().upsert(document);
        self.inner.scheduler.cancel(&uri);

        if self.inner.settings().validate_on_save {
            self.inner.validate(&uri);
        }
    }

    /// @ai:intent Terminal transition: cancel, forget the document, clear its diagnostics
    /// @ai:effects state:write, publish
    pub fn did_close(&self, uri: &Url) {
        self.inner.scheduler.cancel(uri);
        let removed = self.inner.documents().remove(uri);
        if removed.is_some() {
            self.inner.aggregator.clear(uri);
            debug!(%uri, "Document closed");
        }
    }

    /// @ai:intent Validate the stored snapshot now, cancelling any pending timer
    /// @ai:post returns the number of published diagnostics, None for unknown documents
    pub fn validate_now(&self, uri: &Url) -> Option<usize> {
        self.inner.scheduler.cancel(uri);
        self.inner.validate(uri)
    }

    /// @ai:intent Apply an editor configuration payload; malformed payloads are ignored
    /// @ai:effects state:write, log
    pub fn update_settings(&self, value: &serde_json::Value) {
        let mut settings = self
            .inner
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        settings.merge_json(value);
        info!(debounce_ms = settings.debounce_ms, "Settings updated");
    }

    pub fn settings(&self) -> Settings {
        self.inner.settings()
    }

    pub fn metadata(&self, uri: &Url) -> Option<DocumentMetadata> {
        self.inner.documents().metadata(uri).cloned()
    }

    pub fn document_count(&self) -> usize {
        self.inner.documents().len()
    }

    pub fn is_pending(&self, uri: &Url) -> bool {
        self.inner.scheduler.is_pending(uri)
    }

    pub fn pending_count(&self) -> usize {
        self.inner.scheduler.pending_count()
    }

    pub fn sink(&self) -> &S {
        self.inner.aggregator.sink()
    }

    fn schedule(&self, uri: Url, delay: Duration) {
        let engine: Weak<EngineInner<S>> = Arc::downgrade(&self.inner);
        let target = uri.clone();

        self.inner.scheduler.schedule(uri, delay, move |generation| {
            let Some(inner) = engine.upgrade() else {
                return;
            };
            if inner.scheduler.claim(&target, generation) {
                inner.validate(&target);
            }
        });
    }
}
