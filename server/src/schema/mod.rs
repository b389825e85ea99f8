//! @ai:module:intent JSON Schema validation for ACP companion artifacts
//! @ai:module:layer application
//! @ai:module:public_api SchemaRegistry, SchemaType, SchemaValidation, detect_schema_type, validate

pub mod registry;
pub mod types;
pub mod validator;

pub use registry::SchemaRegistry;
pub use types::{detect_schema_type, detect_schema_type_for_path, SchemaType};
pub use validator::{validate, validate_as, SchemaValidation, JSON_SOURCE, SCHEMA_SOURCE};
