//! @ai:module:intent Batch-validate a file or directory tree with the live aggregator
//! @ai:module:layer application
//! @ai:module:public_api CheckReport, FileReport, check_path, check_file
//! @ai:module:depends_on publisher, documents, schema, settings
//! @ai:module:stateless true

use crate::documents::{DocumentMetadata, TextDocument};
use crate::error::{Error, Result};
use crate::publisher::{Aggregator, MemorySink};
use crate::schema::{detect_schema_type_for_path, SchemaRegistry};
use crate::settings::Settings;
use acp_parser::diagnostic::{is_error, is_warning};
use acp_parser::{detect_language, is_supported_file};
use lsp_types::{Diagnostic, Url};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

const SKIPPED_DIRS: &[&str] = &[".git", "target", "node_modules"];

/// @ai:intent Diagnostics for one checked file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

/// @ai:intent Result of a batch run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub files: Vec<FileReport>,
    pub files_checked: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.errors == 0
    }

    fn record(&mut self, path: PathBuf, diagnostics: Vec<Diagnostic>) {
        self.files_checked += 1;
        self.errors += diagnostics.iter().filter(|d| is_error(d)).count();
        self.warnings += diagnostics.iter().filter(|d| is_warning(d)).count();
        if !diagnostics.is_empty() {
            self.files.push(FileReport { path, diagnostics });
        }
    }
}

/// @ai:intent True for files the aggregator would validate: annotated sources or ACP JSON artifacts
/// @ai:effects pure
pub fn is_checkable(path: &Path) -> bool {
    is_supported_file(path) || detect_schema_type_for_path(path).is_some()
}

/// @ai:intent Walk a path and validate every checkable file
/// @ai:pre path exists
/// @ai:post files that cannot be read are logged and skipped
/// @ai:effects fs:read, log
pub fn check_path(path: &Path, schemas: Arc<SchemaRegistry>, settings: &Settings) -> Result<CheckReport> {
    if !path.exists() {
        return Err(Error::InvalidPath(path.to_path_buf()));
    }

    let aggregator = Aggregator::new(MemorySink::new(), schemas);
    let mut report = CheckReport::default();

    for entry in WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let file_path = entry.path();
        if !is_checkable(file_path) {
            continue;
        }

        match check_one(&aggregator, file_path, settings) {
            Ok(diagnostics) => report.record(file_path.to_path_buf(), diagnostics),
            Err(e) => warn!(path = %file_path.display(), error = %e, "Skipping file"),
        }
    }

    debug!(files = report.files_checked, errors = report.errors, "Check finished");
    Ok(report)
}

/// @ai:intent Validate a single file
/// @ai:effects fs:read
pub fn check_file(path: &Path, schemas: Arc<SchemaRegistry>, settings: &Settings) -> Result<Vec<Diagnostic>> {
    let aggregator = Aggregator::new(MemorySink::new(), schemas);
    check_one(&aggregator, path, settings)
}

fn check_one(aggregator: &Aggregator<MemorySink>, path: &Path, settings: &Settings) -> Result<Vec<Diagnostic>> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let absolute = path.canonicalize()?;
    let uri = Url::from_file_path(&absolute).map_err(|_| Error::InvalidPath(absolute.clone()))?;
    let language_id = detect_language(path).map(|l| l.id()).unwrap_or("json");

    let document = TextDocument::new(uri.clone(), language_id, 0, text);
    let mut metadata = DocumentMetadata::classify(&document);
    aggregator.validate(&document, &mut metadata, settings);

    Ok(aggregator
        .sink()
        .latest(&uri)
        .map(|p| p.diagnostics)
        .unwrap_or_default())
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| SKIPPED_DIRS.contains(&name))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn registry() -> Arc<SchemaRegistry> {
        Arc::new(SchemaRegistry::bundled())
    }

    #[test]
    fn test_check_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ok.rs"), "// @acp:lock frozen\nfn a() {}\n").unwrap();
        fs::write(dir.path().join("bad.py"), "# @acp:layer kitchen\n# @acp:colour red\n").unwrap();
        fs::write(dir.path().join(".acp.config.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "@acp:lock nope").unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target").join("gen.rs"), "// @acp:lock nope").unwrap();

        let report = check_path(dir.path(), registry(), &Settings::default()).unwrap();

        assert_eq!(report.files_checked, 3);
        assert_eq!(report.errors, 2);
        assert_eq!(report.warnings, 1);
        assert_eq!(report.files.len(), 2);
        assert!(!report.passed());
    }

    #[test]
    fn test_check_single_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mod.ts");
        fs::write(&path, "/** @acp:stability stable */\nexport const x = 1;\n").unwrap();

        let report = check_path(&path, registry(), &Settings::default()).unwrap();
        assert_eq!(report.files_checked, 1);
        assert!(report.passed());
        assert!(report.files.is_empty());
    }

    #[test]
    fn test_settings_apply_to_batch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".acp.vars.json");
        fs::write(&path, "{ not json").unwrap();

        let off = Settings {
            schemas_enabled: false,
            ..Settings::default()
        };
        assert!(check_file(&path, registry(), &off).unwrap().is_empty());
        assert_eq!(check_file(&path, registry(), &Settings::default()).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_path() {
        let result = check_path(Path::new("/definitely/not/here"), registry(), &Settings::default());
        assert!(matches!(result, Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_is_checkable() {
        assert!(is_checkable(Path::new("src/lib.rs")));
        assert!(is_checkable(Path::new(".acp/acp.sync.json")));
        assert!(!is_checkable(Path::new("package.json")));
    }
}
