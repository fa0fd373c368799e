//! The dsforge Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::Parser;
use miette::{Diagnostic, Report};
use serde::Deserialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::cli::args::{Command, DsforgeArgs, StyleArgs};
use crate::config::Preferences;
use crate::errors::{ConfigError, DsError};
use crate::generator::Generator;
use crate::importer;
use crate::model::{FieldTree, Header};

pub mod args;
pub mod output;

/// Source extensions picked up by `scan` when walking a directory.
const SOURCE_EXTENSIONS: &[&str] = &["rpgle", "sqlrpgle", "rpgleinc"];

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Ds(#[from] DsError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not read '{path}'")]
    #[diagnostic(code(dsforge::cli::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Structure document '{path}' is malformed: {message}")]
    #[diagnostic(
        code(dsforge::cli::document),
        help("expected a mapping with `header` and `fields` keys")
    )]
    Document { path: String, message: String },

    #[error("Could not encode the result as JSON")]
    #[diagnostic(code(dsforge::cli::json))]
    Json(#[from] serde_json::Error),
}

/// A structure description read by `generate`.
#[derive(Debug, Deserialize)]
pub struct StructureDocument {
    pub header: Header,
    #[serde(default)]
    pub fields: Vec<crate::model::Field>,
}

/// The main entry point for the CLI.
pub fn run() {
    let args = DsforgeArgs::parse();
    crate::logging::init(args.verbose);

    let result = Preferences::discover(args.config.as_deref())
        .map_err(CliError::from)
        .and_then(|prefs| dispatch(args.command, prefs));

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            let report = Report::new(e);
            eprintln!("{report:?}");
            process::exit(1);
        }
    }
}

/// Runs one subcommand; `Ok(false)` means it completed but found problems.
fn dispatch(command: Command, prefs: Preferences) -> Result<bool, CliError> {
    match command {
        Command::Generate {
            file,
            base_indent,
            style,
        } => handle_generate(&file, &base_indent, apply_style(prefs, &style)?),
        Command::Import { file, line } => handle_import(&file, line),
        Command::Scan { path } => handle_scan(&path),
        Command::Check { file, style } => handle_check(&file, &style, apply_style(prefs, &style)?),
    }
}

fn apply_style(mut prefs: Preferences, style: &StyleArgs) -> Result<Preferences, CliError> {
    if let Some(format) = style.format {
        prefs.format = format;
    }
    if let Some(indent) = style.indent {
        prefs.indent_width = indent;
    }
    prefs.validate()?;
    Ok(prefs)
}

fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_document(path: &Path) -> Result<StructureDocument, CliError> {
    let text = read_source(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let document = if is_json {
        serde_json::from_str(&text).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(&text).map_err(|e| e.to_string())
    };
    document.map_err(|message| CliError::Document {
        path: path.display().to_string(),
        message,
    })
}

// ============================================================================
// SUBCOMMAND HANDLERS
// ============================================================================

fn handle_generate(path: &Path, base_indent: &str, prefs: Preferences) -> Result<bool, CliError> {
    let document = load_document(path)?;
    let tree = FieldTree::from_fields(document.fields);
    let text = Generator::from_preferences(&prefs)?.generate(
        &document.header,
        tree.fields(),
        base_indent,
    )?;
    println!("{}", text);
    Ok(true)
}

fn handle_import(path: &Path, line: usize) -> Result<bool, CliError> {
    let source = read_source(path)?;
    let result = importer::locate_and_parse_at_cursor(&source, line);
    output::print_diagnostics(&path.display().to_string(), &result.errors);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(result.success)
}

fn handle_scan(path: &Path) -> Result<bool, CliError> {
    let mut ok = true;
    for file in source_files(path) {
        let source = read_source(&file)?;
        let results = importer::parse_all_top_level(&source);
        let display = file.display().to_string();
        output::print_listing(&display, &results);
        for result in &results {
            output::print_diagnostics(&display, &result.errors);
            ok &= result.success;
        }
    }
    Ok(ok)
}

fn handle_check(path: &Path, style: &StyleArgs, prefs: Preferences) -> Result<bool, CliError> {
    let source = read_source(path)?;
    let lines: Vec<&str> = source.lines().collect();
    let display = path.display().to_string();
    let mut clean = true;

    for result in importer::parse_all_top_level(&source) {
        output::print_diagnostics(&display, &result.errors);
        if !result.success {
            clean = false;
            continue;
        }
        let Some(span) = result.span else { continue };

        let original = lines[span.start_line..=span.end_line].join("\n");
        let first = lines[span.start_line];
        let base_indent = &first[..first.len() - first.trim_start().len()];
        let format = style.format.or(result.format).unwrap_or(prefs.format);

        let regenerated = Generator::new(format, prefs.indent_unit())?.generate(
            &result.header,
            &result.fields,
            base_indent,
        )?;
        let title = format!("{}:{} {}", display, span.start_line, result.header.name);
        if output::print_diff(&title, &original, &regenerated) {
            clean = false;
        }
    }
    Ok(clean)
}

fn source_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|file| {
            file.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    SOURCE_EXTENSIONS
                        .iter()
                        .any(|known| known.eq_ignore_ascii_case(ext))
                })
        })
        .collect()
}
