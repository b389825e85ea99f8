//! @ai:module:intent CLI entry point: batch checks, annotation extraction, schema status
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on check, schema, settings

use acp_parser::{format_diagnostics, format_parsed_file, format_summary, to_json, OutputFormat};
use acp_server::{check_path, SchemaRegistry, SchemaType, Settings};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "acp-server")]
#[command(author, version, about = "ACP annotation and schema diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate annotations and ACP JSON files
    Check {
        /// Path to file or directory to check
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,

        /// TOML settings file (validation toggles)
        #[arg(long, short)]
        settings: Option<PathBuf>,
    },

    /// Print the annotations found in one source file
    Extract {
        /// Path to file
        path: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show which bundled schemas compiled
    Schemas,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("Error: {}", e);
        return ExitCode::from(2);
    }

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("acp_server=info".parse()?),
        )
        .init();
    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Check {
            path,
            format,
            settings,
        } => {
            let settings = settings
                .map(|file| Settings::load_or_default(&file))
                .unwrap_or_default();

            let registry = Arc::new(SchemaRegistry::bundled());
            let report = check_path(&path, registry, &settings)?;

            match OutputFormat::from(format) {
                OutputFormat::Text => {
                    for file in &report.files {
                        print!(
                            "{}",
                            format_diagnostics(&file.path.display().to_string(), &file.diagnostics, OutputFormat::Text)
                        );
                    }
                    print!("{}", format_summary(report.files_checked, report.errors, report.warnings));
                }
                OutputFormat::Json => println!("{}", to_json(&report, false)),
                OutputFormat::JsonPretty => println!("{}", to_json(&report, true)),
            }

            Ok(if report.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }

        Commands::Extract { path, format } => {
            if !path.is_file() {
                bail!("extract command requires a file path");
            }
            let parsed = acp_parser::extract_file(&path)?;
            println!("{}", format_parsed_file(&parsed, format.into()));
            Ok(ExitCode::SUCCESS)
        }

        Commands::Schemas => {
            let registry = SchemaRegistry::bundled();
            for schema_type in SchemaType::ALL {
                let status = match registry.failure(schema_type) {
                    None => "ok".to_string(),
                    Some(reason) => format!("unavailable ({})", reason),
                };
                println!("{:<10} *{:<20} {}", schema_type.name(), schema_type.file_suffix(), status);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
