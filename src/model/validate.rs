//! Value grammar checks for headers and fields.
//!
//! Shape checks ([`check_forest`]) guard the tree structure and abort
//! generation. Content checks ([`check_field`]) describe a single bad field and
//! are rendered in place by the generator or reported as warnings by the
//! importer.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::DsError;
use crate::model::{Field, FieldType, Header, StructureKind};

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_@#]*$").unwrap();
    static ref POSITIVE_INT: Regex = Regex::new(r"^[0-9]+$").unwrap();
    static ref DECIMAL_LENGTH: Regex = Regex::new(r"^([0-9]+)\s*:\s*([0-9]+)$").unwrap();
    static ref QUOTED: Regex = Regex::new(r"^'(?:[^']|'')*'$").unwrap();
    static ref INDICATOR: Regex = Regex::new(r"(?i)^(?:1|0|\*on|\*off|'1'|'0')$").unwrap();
    static ref NUMERIC: Regex = Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").unwrap();
    static ref SIGNED_INT: Regex = Regex::new(r"^[+-]?[0-9]+$").unwrap();
}

pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

fn is_positive_int(text: &str) -> bool {
    POSITIVE_INT.is_match(text) && text.bytes().any(|b| b != b'0')
}

/// Indentation may only contain spaces and tabs.
pub fn is_indentation(text: &str) -> bool {
    text.chars().all(|c| c == ' ' || c == '\t')
}

// ============================================================================
// HEADER
// ============================================================================

pub fn validate_header(header: &Header) -> Result<(), DsError> {
    if header.name.trim().is_empty() {
        return Err(DsError::validation("structure name must not be empty"));
    }
    if !is_identifier(&header.name) {
        return Err(DsError::validation(format!(
            "structure name '{}' is not a valid identifier",
            header.name
        )));
    }

    match (header.kind, header.dimension()) {
        // Templates never carry a dimension; any supplied value is ignored.
        (StructureKind::Template, _) => Ok(()),
        (StructureKind::VarLength | StructureKind::AutoLength, Some(d)) if is_positive_int(d) => {
            Ok(())
        }
        (StructureKind::VarLength | StructureKind::AutoLength, dim) => {
            Err(DsError::validation(format!(
                "{} structure '{}' needs a numeric dimension, got '{}'",
                header.kind,
                header.name,
                dim.unwrap_or("")
            )))
        }
        (StructureKind::Default, Some(d)) if !is_positive_int(d) && !is_identifier(d) => {
            Err(DsError::validation(format!(
                "dimension '{}' of '{}' is neither a number nor a constant name",
                d, header.name
            )))
        }
        (StructureKind::Default, _) => Ok(()),
    }
}

// ============================================================================
// FOREST SHAPE
// ============================================================================

/// Checks the structural invariants of a field forest: aggregates carry no
/// type tag, scalars carry no children, ids are unique tree-wide.
pub fn check_forest(fields: &[Field]) -> Result<(), DsError> {
    let mut seen = HashSet::new();
    check_forest_inner(fields, &mut seen)
}

fn check_forest_inner(fields: &[Field], seen: &mut HashSet<usize>) -> Result<(), DsError> {
    for field in fields {
        if !seen.insert(field.id) {
            return Err(DsError::validation(format!(
                "duplicate field id {} ('{}')",
                field.id, field.name
            )));
        }
        if field.is_aggregate && field.type_tag.is_some() {
            return Err(DsError::validation(format!(
                "aggregate '{}' must not carry a type tag",
                field.name
            )));
        }
        if !field.is_aggregate && !field.children.is_empty() {
            return Err(DsError::validation(format!(
                "scalar field '{}' must not have children",
                field.name
            )));
        }
        check_forest_inner(&field.children, seen)?;
    }
    Ok(())
}

// ============================================================================
// FIELD CONTENT
// ============================================================================

/// Describes what is wrong with one field, ignoring its children.
pub fn check_field(field: &Field) -> Result<(), String> {
    if field.name.trim().is_empty() {
        return Err("name must not be empty".to_string());
    }
    if !is_identifier(&field.name) {
        return Err(format!("'{}' is not a valid identifier", field.name));
    }
    if field.repeat_count == Some(0) {
        return Err("repeat count must be positive".to_string());
    }

    if field.is_aggregate {
        // An aggregate repeats through its length; it has no initializer.
        if field.init().is_some() {
            return Err("an aggregate takes no initializer".to_string());
        }
        if field.repeat_count.is_some() {
            return Err("an aggregate repeats through its length, not a repeat count".to_string());
        }
        return match field.length() {
            Some(len) if !is_positive_int(len) && !is_identifier(len) => {
                Err(format!("aggregate dimension '{}' is not a count", len))
            }
            _ => Ok(()),
        };
    }

    let ty = field
        .type_tag
        .ok_or_else(|| "scalar field needs a type".to_string())?;
    check_length(ty, field.length())?;
    match field.init() {
        Some(init) => check_init(ty, init),
        None => Ok(()),
    }
}

pub fn check_length(ty: FieldType, length: Option<&str>) -> Result<(), String> {
    match ty {
        FieldType::PackedDecimal | FieldType::ZonedDecimal => {
            let len = length.ok_or_else(|| format!("{} needs a whole:decimal length", ty))?;
            check_decimal_length(len)
        }
        FieldType::Character
        | FieldType::VariableCharacter
        | FieldType::Integer
        | FieldType::Unsigned
        | FieldType::Binary => match length {
            Some(len) if is_positive_int(len) => Ok(()),
            Some(len) => Err(format!("length '{}' must be a positive integer", len)),
            None => Err(format!("{} needs a length", ty)),
        },
        FieldType::Timestamp => match length {
            Some(len) if !POSITIVE_INT.is_match(len) => {
                Err(format!("timestamp precision '{}' must be an integer", len))
            }
            _ => Ok(()),
        },
        FieldType::Date | FieldType::Time | FieldType::Indicator | FieldType::Pointer => {
            match length {
                Some(len) => Err(format!("{} takes no length, got '{}'", ty, len)),
                None => Ok(()),
            }
        }
    }
}

/// `whole:decimal` with the decimal part strictly below the whole part.
pub fn check_decimal_length(length: &str) -> Result<(), String> {
    let caps = DECIMAL_LENGTH
        .captures(length)
        .ok_or_else(|| format!("length '{}' must look like whole:decimal", length))?;
    let whole: u64 = caps[1]
        .parse()
        .map_err(|_| format!("whole part of '{}' is too large", length))?;
    let decimal: u64 = caps[2]
        .parse()
        .map_err(|_| format!("decimal part of '{}' is too large", length))?;
    if whole == 0 {
        return Err(format!("length '{}' needs at least one digit", length));
    }
    if decimal >= whole {
        return Err(format!(
            "decimal positions {} must be less than total digits {}",
            decimal, whole
        ));
    }
    Ok(())
}

pub fn check_init(ty: FieldType, init: &str) -> Result<(), String> {
    let ok = match ty {
        FieldType::Character | FieldType::VariableCharacter => QUOTED.is_match(init),
        FieldType::Indicator => INDICATOR.is_match(init),
        FieldType::PackedDecimal | FieldType::ZonedDecimal => NUMERIC.is_match(init),
        FieldType::Integer | FieldType::Binary => SIGNED_INT.is_match(init),
        FieldType::Unsigned => POSITIVE_INT.is_match(init),
        FieldType::Date | FieldType::Time | FieldType::Timestamp | FieldType::Pointer => {
            return Err(format!("{} takes no initializer", ty));
        }
    };
    if ok {
        Ok(())
    } else {
        Err(format!("initializer {} does not fit {}", init, ty))
    }
}
