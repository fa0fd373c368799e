//! The Importer: locates `dcl-ds ... end-ds` declarations in source text and
//! rebuilds their [`Header`] and field tree.
//!
//! Two entry points share one boundary-detection pass:
//!
//! - [`locate_and_parse_at_cursor`] parses the declaration a cursor line refers
//!   to, and
//! - [`parse_all_top_level`] parses every top-level declaration of a document.
//!
//! Problems never abort an import. They are collected into
//! [`ParseResult::errors`]; `success` tells the caller whether the header and
//! fields can be trusted.

use serde::Serialize;

use crate::errors::DsError;
use crate::format::{Format, FormatKey};
use crate::model::{Field, Header};

mod body;
mod boundary;
mod header;
mod lines;

pub use boundary::LineSpan;

use body::BodyParser;
use boundary::Boundary;
use lines::Line;

// ============================================================================
// PARSE RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub header: Header,
    pub fields: Vec<Field>,
    /// The convention whose open keyword spelling was found, if any.
    pub format: Option<FormatKey>,
    pub success: bool,
    pub errors: Vec<DsError>,
    /// Lines of the parsed declaration, open and close included.
    pub span: Option<LineSpan>,
}

impl ParseResult {
    fn failure(error: DsError) -> Self {
        Self {
            header: Header::default(),
            fields: Vec::new(),
            format: None,
            success: false,
            errors: vec![error],
            span: None,
        }
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DsError> {
        self.errors.iter().filter(|e| e.is_warning())
    }

    /// Errors that are not mere warnings.
    pub fn failures(&self) -> impl Iterator<Item = &DsError> {
        self.errors.iter().filter(|e| !e.is_warning())
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses the declaration that `cursor_line` (zero-based) points at.
pub fn locate_and_parse_at_cursor(text: &str, cursor_line: usize) -> ParseResult {
    let lines = lines::scan(text);
    let boundaries = boundary::detect(&lines);
    log::debug!(
        "{} declaration(s), {} unclosed, cursor at line {}",
        boundaries.spans.len(),
        boundaries.unmatched.len(),
        cursor_line
    );

    match boundaries.select(cursor_line) {
        Some(found) => {
            log::debug!(
                "selected '{}' at lines {}..={} (level {})",
                found.open.name,
                found.span.start_line,
                found.span.end_line,
                found.level
            );
            parse_boundary(&lines, &found)
        }
        None => match boundaries.unmatched_before(cursor_line) {
            Some((line, open)) => ParseResult::failure(DsError::UnmatchedAggregate {
                name: open.name.to_string(),
                line,
            }),
            None => ParseResult::failure(DsError::NoStructureFound {
                line: Some(cursor_line),
            }),
        },
    }
}

/// Parses every top-level declaration, in document order. Nested aggregates
/// appear only as children of their parent.
pub fn parse_all_top_level(text: &str) -> Vec<ParseResult> {
    let lines = lines::scan(text);
    let boundaries = boundary::detect(&lines);
    for (line, open) in &boundaries.unmatched {
        log::warn!("'{}' opened at line {} is never closed", open.name, line);
    }

    let top = boundaries.top_level();
    log::debug!("{} top-level declaration(s)", top.len());
    top.iter().map(|found| parse_boundary(&lines, found)).collect()
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn parse_boundary(lines: &[Line<'_>], found: &Boundary<'_>) -> ParseResult {
    let format = Format::detect(found.open.keyword);
    // Type keywords are matched case-insensitively, so any table resolves them.
    let table = format.unwrap_or_default().table();

    let mut parser = BodyParser::new(lines, table);
    let fields = parser.parse_range(found.span.start_line + 1, found.span.end_line);

    let mut result = ParseResult {
        header: header::parse_header(&found.open),
        fields,
        format,
        success: false,
        errors: parser.finish(),
        span: Some(found.span),
    };
    validate_result(&mut result, found.open.keyword);
    result
}

fn validate_result(result: &mut ParseResult, keyword: &str) {
    let mut problems = Vec::new();
    if result.header.name.trim().is_empty() {
        problems.push("structure has no name".to_string());
    }
    if result.format.is_none() {
        problems.push(format!(
            "open keyword '{}' does not match a known format",
            keyword
        ));
    }
    check_fields(&result.fields, &mut problems);

    result.success = problems.is_empty();
    result
        .errors
        .extend(problems.into_iter().map(DsError::validation));
}

fn check_fields(fields: &[Field], problems: &mut Vec<String>) {
    for field in fields {
        if field.name.trim().is_empty() {
            problems.push(format!("field {} has no name", field.id));
        }
        if !field.is_aggregate && field.type_tag.is_none() {
            problems.push(format!("field '{}' has no type", field.name));
        }
        check_fields(&field.children, problems);
    }
}
