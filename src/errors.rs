//! dsforge Error Handling
//!
//! Every failure the core can report is a variant of [`DsError`]. Generator
//! failures abort the call with `Err`; importer failures are collected into
//! [`ParseResult::errors`](crate::importer::ParseResult) so that one bad line
//! never hides the rest of a structure.

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// CORE ERROR TYPE
// ============================================================================

/// The error taxonomy shared by the generator, the importer and the session.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DsError {
    /// Malformed input to the generator, the field tree or the session.
    #[error("Validation error: {message}")]
    #[diagnostic(code(dsforge::validation))]
    Validation { message: String },

    #[error("Unknown format '{key}'")]
    #[diagnostic(
        code(dsforge::unknown_format),
        help("expected one of: dcl-ds, DCL-DS, Dcl-Ds")
    )]
    UnknownFormat { key: String },

    #[error("No structure found{}", at_line(.line))]
    #[diagnostic(
        code(dsforge::no_structure),
        help("place the cursor on or inside a dcl-ds ... end-ds block")
    )]
    NoStructureFound { line: Option<usize> },

    /// A field line whose length or initializer breaks its type's grammar.
    #[error("Malformed field '{field}'{}: {reason}", at_line(.line))]
    #[diagnostic(code(dsforge::malformed_field), severity(Warning))]
    MalformedField {
        field: String,
        line: Option<usize>,
        reason: String,
    },

    #[error("Aggregate '{name}' opened at line {line} has no matching close")]
    #[diagnostic(code(dsforge::unmatched_aggregate))]
    UnmatchedAggregate { name: String, line: usize },

    /// A line inside a structure body that is neither a field nor an aggregate.
    #[error("Skipped unrecognized line {line}: {text}")]
    #[diagnostic(code(dsforge::unrecognized_line), severity(Warning))]
    UnrecognizedLine { line: usize, text: String },
}

impl DsError {
    pub fn validation(message: impl Into<String>) -> Self {
        DsError::Validation {
            message: message.into(),
        }
    }

    pub fn unknown_format(key: impl Into<String>) -> Self {
        DsError::UnknownFormat { key: key.into() }
    }

    /// Warnings are reported alongside a successful parse and never abort it.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            DsError::MalformedField { .. } | DsError::UnrecognizedLine { .. }
        )
    }

    /// The zero-based source line the error refers to, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            DsError::NoStructureFound { line } | DsError::MalformedField { line, .. } => *line,
            DsError::UnmatchedAggregate { line, .. } | DsError::UnrecognizedLine { line, .. } => {
                Some(*line)
            }
            DsError::Validation { .. } | DsError::UnknownFormat { .. } => None,
        }
    }
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {}", line),
        None => String::new(),
    }
}

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

/// Failures while loading [`Preferences`](crate::config::Preferences).
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Could not read preferences from '{path}'")]
    #[diagnostic(code(dsforge::config::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Preferences are not valid YAML")]
    #[diagnostic(code(dsforge::config::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid preference: {0}")]
    #[diagnostic(code(dsforge::config::invalid))]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_are_classified() {
        let skipped = DsError::UnrecognizedLine {
            line: 4,
            text: "foo".into(),
        };
        assert!(skipped.is_warning());
        assert_eq!(skipped.line(), Some(4));
        assert!(!DsError::validation("bad").is_warning());
    }

    #[test]
    fn messages_mention_the_line() {
        let err = DsError::NoStructureFound { line: Some(7) };
        assert_eq!(err.to_string(), "No structure found at line 7");
        let err = DsError::NoStructureFound { line: None };
        assert_eq!(err.to_string(), "No structure found");
    }
}
