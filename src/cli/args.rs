//! Defines the command-line arguments and subcommands for the dsforge CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::format::FormatKey;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "dsforge",
    version,
    about = "Generate and import free-format data structure declarations."
)]
pub struct DsforgeArgs {
    /// Preferences file; defaults to ./dsforge.yaml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for the generation preferences.
#[derive(Debug, Args)]
pub struct StyleArgs {
    /// Keyword convention: dcl-ds, DCL-DS or Dcl-Ds.
    #[arg(long, value_parser = parse_format)]
    pub format: Option<FormatKey>,

    /// Spaces per nesting level.
    #[arg(long)]
    pub indent: Option<usize>,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the declaration described by a YAML or JSON structure file.
    Generate {
        /// Structure document with `header` and `fields`.
        #[arg(required = true)]
        file: PathBuf,

        /// Indentation of the first line.
        #[arg(long, default_value = "")]
        base_indent: String,

        #[command(flatten)]
        style: StyleArgs,
    },
    /// Parse the declaration at a cursor line and print it as JSON.
    Import {
        /// Source file to read.
        #[arg(required = true)]
        file: PathBuf,

        /// Zero-based cursor line.
        #[arg(long, short)]
        line: usize,
    },
    /// List the top-level declarations of a file or directory tree.
    Scan {
        /// Source file or directory.
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Regenerate every declaration in a file and diff it against the source.
    Check {
        /// Source file to check.
        #[arg(required = true)]
        file: PathBuf,

        #[command(flatten)]
        style: StyleArgs,
    },
}

fn parse_format(key: &str) -> Result<FormatKey, String> {
    key.parse::<FormatKey>().map_err(|e| e.to_string())
}
