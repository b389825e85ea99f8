//! @ai:module:intent Editor-facing diagnostics core: schema checks, annotation checks, debounced revalidation
//! @ai:module:layer application
//! @ai:module:public_api check, documents, engine, error, publisher, scheduler, schema, settings
//! @ai:module:depends_on acp_parser
//! @ai:module:stateless false
//!
//! # ACP Diagnostics Server
//!
//! Feeds editor lifecycle notifications (open, change, save, close) through
//! a per-document debounce scheduler, validates ACP JSON artifacts against
//! bundled JSON Schemas and source files against the annotation catalog,
//! and publishes one merged diagnostic set per document.
//!
//! ## Example
//!
//! ```rust
//! use acp_server::{Aggregator, DocumentMetadata, MemorySink, SchemaRegistry, Settings, TextDocument};
//! use lsp_types::Url;
//! use std::sync::Arc;
//!
//! let aggregator = Aggregator::new(MemorySink::new(), Arc::new(SchemaRegistry::bundled()));
//! let uri = Url::parse("file:///repo/.acp.config.json").unwrap();
//! let document = TextDocument::new(uri.clone(), "json", 1, r#"{ "version": "1.0.0" }"#);
//! let mut metadata = DocumentMetadata::classify(&document);
//!
//! assert_eq!(aggregator.validate(&document, &mut metadata, &Settings::default()), 0);
//! assert_eq!(aggregator.sink().count_for(&uri), 1);
//! ```

pub mod check;
pub mod documents;
pub mod engine;
pub mod error;
pub mod publisher;
pub mod scheduler;
pub mod schema;
pub mod settings;

pub use check::{check_file, check_path, is_checkable, CheckReport, FileReport};
pub use documents::{DocumentMetadata, DocumentStore, LastValidated, TextDocument};
pub use engine::DiagnosticsEngine;
pub use error::{Error, Result};
pub use publisher::{Aggregator, DiagnosticsSink, MemorySink, Publication};
pub use scheduler::Scheduler;
pub use schema::{SchemaRegistry, SchemaType};
pub use settings::Settings;
