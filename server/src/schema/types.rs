//! @ai:module:intent Recognized ACP JSON artifact kinds and their filename rules
//! @ai:module:layer domain
//! @ai:module:public_api SchemaType, detect_schema_type, detect_schema_type_for_path
//! @ai:module:stateless true

use lsp_types::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Config,
    Cache,
    Vars,
    Attempts,
    Sync,
    Primer,
}

impl SchemaType {
    /// Fixed precedence order used for filename classification.
    pub const ALL: [SchemaType; 6] = [
        SchemaType::Config,
        SchemaType::Cache,
        SchemaType::Vars,
        SchemaType::Attempts,
        SchemaType::Sync,
        SchemaType::Primer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SchemaType::Config => "config",
            SchemaType::Cache => "cache",
            SchemaType::Vars => "vars",
            SchemaType::Attempts => "attempts",
            SchemaType::Sync => "sync",
            SchemaType::Primer => "primer",
        }
    }

    /// @ai:intent Filename suffix that selects this schema type
    /// @ai:invariant no suffix is a suffix of another, so classification is exclusive
    pub fn file_suffix(&self) -> &'static str {
        match self {
            SchemaType::Config => ".acp.config.json",
            SchemaType::Cache => ".acp.cache.json",
            SchemaType::Vars => ".acp.vars.json",
            SchemaType::Attempts => "acp.attempts.json",
            SchemaType::Sync => "acp.sync.json",
            SchemaType::Primer => "acp.primer.json",
        }
    }

    /// @ai:intent Bundled schema document embedded at build time
    pub fn bundled_schema(&self) -> &'static str {
        match self {
            SchemaType::Config => include_str!("../../schemas/config.schema.json"),
            SchemaType::Cache => include_str!("../../schemas/cache.schema.json"),
            SchemaType::Vars => include_str!("../../schemas/vars.schema.json"),
            SchemaType::Attempts => include_str!("../../schemas/attempts.schema.json"),
            SchemaType::Sync => include_str!("../../schemas/sync.schema.json"),
            SchemaType::Primer => include_str!("../../schemas/primer.schema.json"),
        }
    }

    /// @ai:intent Classify a bare file name
    /// @ai:effects pure
    pub fn from_file_name(name: &str) -> Option<SchemaType> {
        SchemaType::ALL
            .into_iter()
            .find(|ty| name.ends_with(ty.file_suffix()))
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// @ai:intent Classify a document by the last segment of its URI path
/// @ai:example ("file:///repo/.acp.config.json") -> Some(Config)
/// @ai:example ("file:///repo/package.json") -> None
/// @ai:effects pure
pub fn detect_schema_type(uri: &Url) -> Option<SchemaType> {
    let name = uri.path().rsplit('/').next()?;
    SchemaType::from_file_name(name)
}

pub fn detect_schema_type_for_path(path: &Path) -> Option<SchemaType> {
    SchemaType::from_file_name(path.file_name()?.to_str()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(uri: &str) -> Option<SchemaType> {
        detect_schema_type(&Url::parse(uri).unwrap())
    }

    #[test]
    fn test_detect_each_type() {
        assert_eq!(detect("file:///r/.acp.config.json"), Some(SchemaType::Config));
        assert_eq!(detect("file:///r/.acp.cache.json"), Some(SchemaType::Cache));
        assert_eq!(detect("file:///r/.acp.vars.json"), Some(SchemaType::Vars));
        assert_eq!(detect("file:///r/.acp/acp.attempts.json"), Some(SchemaType::Attempts));
        assert_eq!(detect("file:///r/.acp/acp.sync.json"), Some(SchemaType::Sync));
        assert_eq!(detect("file:///r/acp.primer.json"), Some(SchemaType::Primer));
    }

    #[test]
    fn test_unrelated_json() {
        assert_eq!(detect("file:///r/package.json"), None);
        assert_eq!(detect("file:///r/acp.config.json.bak"), None);
        assert_eq!(detect("file:///r/.acp.config.json/readme.md"), None);
    }

    #[test]
    fn test_classification_is_exclusive() {
        for ty in SchemaType::ALL {
            let name = format!("project{}", ty.file_suffix());
            let matches: Vec<_> = SchemaType::ALL
                .into_iter()
                .filter(|other| name.ends_with(other.file_suffix()))
                .collect();
            assert_eq!(matches, vec![ty], "{}", name);
        }
    }

    #[test]
    fn test_path_detection() {
        assert_eq!(
            detect_schema_type_for_path(Path::new("/tmp/x/.acp.vars.json")),
            Some(SchemaType::Vars)
        );
    }
}
