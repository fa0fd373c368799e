//! Handles all user-facing output for the CLI.
//!
//! Colorized diagnostics and diffs go through `termcolor`; machine-readable
//! results are printed as JSON.

use std::io::Write;

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::DsError;
use crate::importer::ParseResult;

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// Prints importer diagnostics to stderr: warnings in yellow, others in red.
pub fn print_diagnostics(path: &str, errors: &[DsError]) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    for error in errors {
        let (label, color) = if error.is_warning() {
            ("warning", Color::Yellow)
        } else {
            ("error", Color::Red)
        };
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(stderr, "{}", label);
        let _ = stderr.reset();
        let _ = writeln!(stderr, ": {}: {}", path, error);
    }
}

// ============================================================================
// LISTINGS
// ============================================================================

/// One line per structure: `path:start-end name (N fields)`.
pub fn print_listing(path: &str, results: &[ParseResult]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for result in results {
        let (start, end) = result
            .span
            .map(|span| (span.start_line, span.end_line))
            .unwrap_or_default();
        let _ = write!(stdout, "{}:{}-{} ", path, start, end);
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
        let _ = write!(stdout, "{}", result.header.name);
        let _ = stdout.reset();
        let count: usize = result.fields.iter().map(|f| f.subtree_len()).sum();
        let format = result.format.map(|f| f.as_str()).unwrap_or("?");
        let _ = writeln!(stdout, " [{} {}] ({} fields)", format, result.header.kind, count);
    }
}

// ============================================================================
// DIFFS
// ============================================================================

/// Prints a line diff between `original` and `regenerated`. Returns whether
/// the texts differ.
pub fn print_diff(title: &str, original: &str, regenerated: &str) -> bool {
    let changeset = Changeset::new(original, regenerated, "\n");
    if changeset.distance == 0 {
        return false;
    }

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
    let _ = writeln!(stdout, "--- {} ---", title);
    let _ = stdout.reset();

    for diff in &changeset.diffs {
        match diff {
            Difference::Same(x) => {
                let _ = stdout.reset();
                for line in x.lines() {
                    let _ = writeln!(stdout, " {}", line);
                }
            }
            Difference::Add(x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                for line in x.lines() {
                    let _ = writeln!(stdout, "+{}", line);
                }
            }
            Difference::Rem(x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                for line in x.lines() {
                    let _ = writeln!(stdout, "-{}", line);
                }
            }
        }
    }
    let _ = stdout.reset();
    true
}
