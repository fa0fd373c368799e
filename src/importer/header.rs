//! Recovers a [`Header`] from the modifier text of an open line.

use lazy_static::lazy_static;
use regex::Regex;

use crate::importer::lines::OpenLine;
use crate::model::{Header, StructureKind};

lazy_static! {
    static ref TEMPLATE_MARKER: Regex = Regex::new(r"(?i)(?:^|\s)template(?:\s|$)").unwrap();
    static ref DIM_CLAUSE: Regex = Regex::new(r"(?i)\bdim\s*\(\s*([^)]*?)\s*\)").unwrap();
    static ref VAR_PREFIX: Regex = Regex::new(r"(?i)^\*var\s*:\s*(.*)$").unwrap();
    static ref AUTO_PREFIX: Regex = Regex::new(r"(?i)^\*auto\s*:\s*(.*)$").unwrap();
}

pub(crate) fn parse_header(open: &OpenLine<'_>) -> Header {
    let mut header = Header::new(open.name, StructureKind::Default);

    if TEMPLATE_MARKER.is_match(open.modifiers) {
        header.kind = StructureKind::Template;
        return header;
    }

    let Some(dim) = DIM_CLAUSE
        .captures(open.modifiers)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|dim| !dim.is_empty())
    else {
        return header;
    };

    if let Some(bound) = VAR_PREFIX.captures(dim).and_then(|caps| caps.get(1)) {
        header.kind = StructureKind::VarLength;
        header.dimension = Some(bound.as_str().trim().to_string());
    } else if let Some(bound) = AUTO_PREFIX.captures(dim).and_then(|caps| caps.get(1)) {
        header.kind = StructureKind::AutoLength;
        header.dimension = Some(bound.as_str().trim().to_string());
    } else {
        header.dimension = Some(dim.to_string());
    }
    header
}
