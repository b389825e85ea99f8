//! @ai:module:intent Format diagnostics and annotations for terminal or JSON output
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_diagnostics, format_summary, format_parsed_file, to_json
//! @ai:module:depends_on annotation, diagnostic
//! @ai:module:stateless true

use crate::annotation::ParsedFile;
use crate::diagnostic::code_of;
use colored::Colorize;
use lsp_types::{Diagnostic, DiagnosticSeverity};
use serde::Serialize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

#[derive(Serialize)]
struct FileDiagnostics<'a> {
    file: &'a str,
    diagnostics: &'a [Diagnostic],
}

/// @ai:intent Format one file's diagnostics
/// @ai:effects pure
pub fn format_diagnostics(file: &str, diagnostics: &[Diagnostic], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&FileDiagnostics { file, diagnostics }, false),
        OutputFormat::JsonPretty => to_json(&FileDiagnostics { file, diagnostics }, true),
        OutputFormat::Text => format_diagnostics_text(file, diagnostics),
    }
}

/// @ai:intent Format diagnostics as human-readable text, one per line
/// @ai:effects pure
fn format_diagnostics_text(file: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = String::new();

    for diag in diagnostics {
        let severity_str = match diag.severity {
            Some(DiagnosticSeverity::ERROR) => "ERROR".red().bold(),
            Some(DiagnosticSeverity::WARNING) => "WARN".yellow().bold(),
            Some(DiagnosticSeverity::HINT) => "HINT".cyan(),
            _ => "INFO".blue(),
        };

        // editors count from zero, terminals from one
        let location = format!(
            "{}:{}:{}",
            file,
            diag.range.start.line + 1,
            diag.range.start.character + 1
        );

        output.push_str(&format!(
            "{} {} - {} ({})\n",
            severity_str,
            location.dimmed(),
            diag.message,
            code_of(diag).unwrap_or_default().dimmed()
        ));
    }

    output
}

/// @ai:intent Format the closing summary line for a batch run
/// @ai:effects pure
pub fn format_summary(files_checked: usize, errors: usize, warnings: usize) -> String {
    let mut output = format!("Checked {} files\n", files_checked);

    if errors > 0 {
        output.push_str(&format!(
            "{} errors, {} warnings\n",
            errors.to_string().red().bold(),
            warnings.to_string().yellow()
        ));
    } else if warnings > 0 {
        output.push_str(&format!(
            "{} {} warnings\n",
            "OK".green().bold(),
            warnings.to_string().yellow()
        ));
    } else {
        output.push_str(&format!("{} No issues found\n", "OK".green().bold()));
    }

    output
}

/// @ai:intent Format a parsed file's annotations
/// @ai:effects pure
pub fn format_parsed_file(file: &ParsedFile, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(file, false),
        OutputFormat::JsonPretty => to_json(file, true),
        OutputFormat::Text => format_parsed_file_text(file),
    }
}

fn format_parsed_file_text(file: &ParsedFile) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} ({})\n",
        file.path.display().to_string().bold(),
        file.language
    ));
    output.push_str(&format!("  Annotations ({}):\n", file.annotations.len()));

    for annotation in &file.annotations {
        output.push_str(&format!(
            "    {} [{}] (line {})\n",
            annotation.namespace.cyan(),
            annotation.category.name(),
            annotation.range.start.line + 1
        ));

        if let Some(value) = &annotation.value {
            output.push_str(&format!("      value: {}\n", value));
        }

        if let Some(description) = &annotation.description {
            output.push_str(&format!("      description: {}\n", description));
        }

        if !annotation.metadata.is_empty() {
            output.push_str(&format!("      metadata: {}\n", annotation.metadata.join(", ")));
        }

        if !annotation.variable_references.is_empty() {
            let names: Vec<_> = annotation
                .variable_references
                .iter()
                .map(|r| r.raw.as_str())
                .collect();
            output.push_str(&format!("      refs: {}\n", names.join(", ")));
        }
    }

    output
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}
