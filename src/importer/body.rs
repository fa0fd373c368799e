//! Field-body parsing.
//!
//! Recursive descent over the indexed line array. Each step receives the
//! position to start from and returns the position after what it consumed;
//! the only mutable state is the preorder id counter and the diagnostics list
//! held by [`BodyParser`] for one top-level structure.

use crate::errors::DsError;
use crate::format::Format;
use crate::importer::header::parse_header;
use crate::importer::lines::{FieldLine, Line, LineKind, OpenLine, SubstructureLine};
use crate::model::validate;
use crate::model::{Field, StructureKind};

pub(crate) struct BodyParser<'l, 'a> {
    lines: &'l [Line<'a>],
    format: &'static Format,
    next_id: usize,
    errors: Vec<DsError>,
}

impl<'l, 'a> BodyParser<'l, 'a> {
    pub fn new(lines: &'l [Line<'a>], format: &'static Format) -> Self {
        Self {
            lines,
            format,
            next_id: 0,
            errors: Vec::new(),
        }
    }

    /// Diagnostics collected so far, in line order of discovery.
    pub fn finish(self) -> Vec<DsError> {
        self.errors
    }

    fn allocate_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Parses the fields on lines `start..end`.
    pub fn parse_range(&mut self, start: usize, end: usize) -> Vec<Field> {
        let mut fields = Vec::new();
        let mut at = start;

        while at < end {
            let line = self.lines[at];
            let (field, next) = match line.kind {
                LineKind::Blank => (None, at + 1),
                LineKind::Open(open) => self.parse_nested(at, end, open),
                LineKind::Substructure(sub) => self.parse_substructure(at, end, sub),
                LineKind::Field(field) => (self.parse_field(at, field), at + 1),
                LineKind::SelfContained(_) | LineKind::Close | LineKind::Other => {
                    self.skip(at, line.text);
                    (None, at + 1)
                }
            };
            fields.extend(field);
            at = next;
        }

        fields
    }

    fn skip(&mut self, at: usize, text: &str) {
        log::trace!("skipping line {}: {}", at, text.trim());
        self.errors.push(DsError::UnrecognizedLine {
            line: at,
            text: text.trim().to_string(),
        });
    }

    /// A nested `dcl-ds` block. Its close is found by depth tracking inside
    /// the enclosing range.
    fn parse_nested(&mut self, at: usize, end: usize, open: OpenLine<'_>) -> (Option<Field>, usize) {
        let Some(close) = self.matching_close(at, end) else {
            log::warn!("nested aggregate '{}' at line {} is never closed", open.name, at);
            self.errors.push(DsError::UnmatchedAggregate {
                name: open.name.to_string(),
                line: at,
            });
            return (None, at + 1);
        };

        let header = parse_header(&open);
        if header.kind != StructureKind::Default {
            self.errors.push(DsError::MalformedField {
                field: open.name.to_string(),
                line: Some(at),
                reason: format!(
                    "nested aggregate cannot be {}; only its plain dimension is kept",
                    header.kind
                ),
            });
        }
        let mut aggregate = Field::aggregate(open.name, Vec::new());
        aggregate.id = self.allocate_id();
        aggregate.length = header.dimension;
        aggregate.children = self.parse_range(at + 1, close);
        self.report_content(&aggregate, at);
        (Some(aggregate), close + 1)
    }

    fn matching_close(&self, at: usize, end: usize) -> Option<usize> {
        let mut depth = 0usize;
        for index in at + 1..end {
            match self.lines[index].kind {
                LineKind::Open(_) => depth += 1,
                LineKind::Close if depth == 0 => return Some(index),
                LineKind::Close => depth -= 1,
                _ => {}
            }
        }
        None
    }

    /// The `likeds` shorthand: its children are the following lines until one
    /// at the same or a shallower indentation starts something new.
    fn parse_substructure(
        &mut self,
        at: usize,
        end: usize,
        sub: SubstructureLine<'_>,
    ) -> (Option<Field>, usize) {
        let own_indent = self.lines[at].indent;
        let stop = (at + 1..end)
            .find(|&index| {
                let line = &self.lines[index];
                line.indent <= own_indent && line.kind.ends_substructure()
            })
            .unwrap_or(end);

        let mut aggregate = Field::aggregate(sub.name, Vec::new());
        aggregate.id = self.allocate_id();
        aggregate.length = sub.length.map(str::to_string);
        aggregate.children = self.parse_range(at + 1, stop);
        self.report_content(&aggregate, at);
        (Some(aggregate), stop)
    }

    fn parse_field(&mut self, at: usize, line: FieldLine<'_>) -> Option<Field> {
        let Some(ty) = self.format.type_from_keyword(line.type_keyword) else {
            let text = self.lines[at].text;
            self.skip(at, text);
            return None;
        };

        let mut field = Field::scalar(line.name, ty);
        field.id = self.allocate_id();
        field.length = line.length.map(str::to_string);
        field.init = line.init.map(str::to_string);
        if let Some(dim) = line.dim {
            match dim.trim().parse::<u32>() {
                Ok(count) => field.repeat_count = Some(count),
                Err(_) => self.errors.push(DsError::MalformedField {
                    field: line.name.to_string(),
                    line: Some(at),
                    reason: format!("repeat count '{}' is not a number", dim),
                }),
            }
        }
        self.report_content(&field, at);
        Some(field)
    }

    fn report_content(&mut self, field: &Field, at: usize) {
        if let Err(reason) = validate::check_field(field) {
            self.errors.push(DsError::MalformedField {
                field: field.name.clone(),
                line: Some(at),
                reason,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatKey;
    use crate::importer::lines::scan;
    use crate::model::FieldType;

    fn parse(text: &str) -> (Vec<Field>, Vec<DsError>) {
        let lines = scan(text);
        let mut parser = BodyParser::new(&lines, FormatKey::Lower.table());
        let fields = parser.parse_range(0, lines.len());
        (fields, parser.finish())
    }

    #[test]
    fn ids_are_preorder() {
        let (fields, errors) = parse(
            "a char(1);\n\
             dcl-ds grp dim(2);\n\
               b char(1);\n\
               c char(1);\n\
             end-ds;\n\
             d char(1);",
        );
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[1].name, "grp");
        assert_eq!(fields[1].length.as_deref(), Some("2"));
        let ids: Vec<_> = [&fields[0], &fields[1], &fields[1].children[0], &fields[1].children[1], &fields[2]]
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn substructure_ends_at_shallower_field() {
        let (fields, _) = parse(
            "  addr likeds(2);\n\
             \x20     street char(30);\n\
             \x20     city char(20);\n\
             \x20 zip char(5);",
        );
        assert_eq!(fields.len(), 2);
        assert!(fields[0].is_aggregate);
        assert_eq!(fields[0].length.as_deref(), Some("2"));
        assert_eq!(fields[0].children.len(), 2);
        assert_eq!(fields[1].name, "zip");
    }

    #[test]
    fn unknown_type_is_skipped_with_warning() {
        let (fields, errors) = parse("a char(1);\nb widget(3);\nc int(5);");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].id, 1);
        assert_eq!(
            errors,
            vec![DsError::UnrecognizedLine {
                line: 1,
                text: "b widget(3);".into()
            }]
        );
    }

    #[test]
    fn malformed_values_are_kept_and_reported() {
        let (fields, errors) = parse("amt packed(2:13);");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].type_tag, Some(FieldType::PackedDecimal));
        assert!(matches!(&errors[0], DsError::MalformedField { field, .. } if field == "amt"));
    }

    #[test]
    fn unclosed_nested_open_is_reported() {
        let (fields, errors) = parse("dcl-ds grp;\n  b char(1);");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "b");
        assert_eq!(
            errors,
            vec![DsError::UnmatchedAggregate {
                name: "grp".into(),
                line: 0
            }]
        );
    }

    fn shape(fields: &[Field]) -> Vec<(&str, usize)> {
        fields.iter().map(|f| (f.name.as_str(), f.children.len())).collect()
    }

    #[test]
    fn substructure_ends_at_nested_open() {
        let (fields, errors) = parse(
            "  addr likeds(2);\n     street char(30);\n  dcl-ds g;\n     b char(1);\n  end-ds;",
        );
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(shape(&fields), vec![("addr", 1), ("g", 1)]);
        assert_eq!(fields[1].id, 2);
    }

    #[test]
    fn substructure_ends_at_close() {
        // The close ends 'addr'; the deeper line after it is not a child.
        let (fields, errors) = parse("  addr likeds;\n     a char(1);\n  end-ds;\n     b char(1);");
        assert_eq!(shape(&fields), vec![("addr", 1), ("b", 0)]);
        assert_eq!(
            errors,
            vec![DsError::UnrecognizedLine {
                line: 2,
                text: "end-ds;".into()
            }]
        );
    }

    #[test]
    fn substructure_ends_at_next_substructure() {
        let (fields, errors) = parse(
            "  addr likeds(2);\n     a char(1);\n  home likeds(3);\n     b char(1);\n     c char(1);",
        );
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(shape(&fields), vec![("addr", 1), ("home", 2)]);
        assert_eq!(fields[1].length.as_deref(), Some("3"));
    }

    #[test]
    fn nested_var_and_auto_markers_are_reported() {
        for (modifier, kind) in [("dim(*var:5)", "var-length"), ("dim(*auto:5)", "auto-length")] {
            let text = format!("dcl-ds g {};\n  b char(1);\nend-ds;", modifier);
            let (fields, errors) = parse(&text);
            assert_eq!(fields[0].length.as_deref(), Some("5"));
            match errors.as_slice() {
                [DsError::MalformedField { field, line, reason }] => {
                    assert_eq!(field, "g");
                    assert_eq!(*line, Some(0));
                    assert!(reason.contains(kind), "{}", reason);
                }
                other => panic!("expected one warning, got {:?}", other),
            }
        }

        let (_, errors) = parse("dcl-ds g dim(5);\n  b char(1);\nend-ds;");
        assert!(errors.is_empty(), "{:?}", errors);
    }
}
