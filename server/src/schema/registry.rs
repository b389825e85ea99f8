//! @ai:module:intent Compile one JSON Schema validator per artifact type at start-up
//! @ai:module:layer infrastructure
//! @ai:module:public_api SchemaRegistry
//! @ai:module:depends_on schema::types, error
//! @ai:module:stateless false

use crate::error::{Error, Result};
use crate::schema::types::SchemaType;
use jsonschema::{Draft, JSONSchema};
use std::collections::HashMap;
use tracing::{debug, error};

/// @ai:intent Immutable set of compiled validators; a type that failed to compile stays unavailable
pub struct SchemaRegistry {
    validators: HashMap<SchemaType, JSONSchema>,
    failures: HashMap<SchemaType, String>,
}

impl SchemaRegistry {
    /// @ai:intent Compile every bundled schema
    /// @ai:effects log
    pub fn bundled() -> Self {
        Self::compile(
            SchemaType::ALL
                .into_iter()
                .map(|ty| (ty, ty.bundled_schema())),
        )
    }

    /// @ai:intent Compile schema sources, logging and recording any that fail
    /// @ai:post never fails as a whole; failed types are absent from validators
    /// @ai:effects log
    pub fn compile<'a>(sources: impl IntoIterator<Item = (SchemaType, &'a str)>) -> Self {
        let mut validators = HashMap::new();
        let mut failures = HashMap::new();

        for (schema_type, source) in sources {
            match compile_one(schema_type, source) {
                Ok(validator) => {
                    debug!(%schema_type, "Compiled schema");
                    validators.insert(schema_type, validator);
                }
                Err(e) => {
                    error!(%schema_type, error = %e, "Schema compilation failed; type will not be validated");
                    failures.insert(schema_type, e.to_string());
                }
            }
        }

        Self {
            validators,
            failures,
        }
    }

    pub fn validator(&self, schema_type: SchemaType) -> Option<&JSONSchema> {
        self.validators.get(&schema_type)
    }

    pub fn is_available(&self, schema_type: SchemaType) -> bool {
        self.validators.contains_key(&schema_type)
    }

    pub fn failure(&self, schema_type: SchemaType) -> Option<&str> {
        self.failures.get(&schema_type).map(String::as_str)
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut available: Vec<_> = self.validators.keys().map(|t| t.name()).collect();
        available.sort_unstable();
        f.debug_struct("SchemaRegistry")
            .field("available", &available)
            .field("failures", &self.failures)
            .finish()
    }
}

fn compile_one(schema_type: SchemaType, source: &str) -> Result<JSONSchema> {
    let document: serde_json::Value =
        serde_json::from_str(source).map_err(|e| Error::SchemaCompile {
            schema_type,
            message: e.to_string(),
        })?;

    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&document)
        .map_err(|e| Error::SchemaCompile {
            schema_type,
            message: e.to_string(),
        })
}
