//! Line classification.
//!
//! A document is scanned once into an indexed, immutable array of [`Line`]s.
//! Boundary detection and body parsing both work from that array by index.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref OPEN: Regex =
        Regex::new(r"(?i)^\s*(dcl-ds)\s+([A-Za-z_][A-Za-z0-9_@#]*)([^;]*);?\s*$").unwrap();
    static ref SELF_CONTAINED: Regex = Regex::new(r"(?i)\blike(?:ds|rec)\s*\(").unwrap();
    static ref CLOSE: Regex = Regex::new(r"(?i)^\s*end-ds(?:\s+[A-Za-z_][A-Za-z0-9_@#]*)?\s*;?\s*$").unwrap();
    static ref SUBSTRUCTURE: Regex = Regex::new(
        r"(?i)^\s*([A-Za-z_][A-Za-z0-9_@#]*)\s+(?:likeds|template)(?:\s*\(\s*([^)]*?)\s*\))?\s*;?\s*$"
    )
    .unwrap();
    static ref FIELD: Regex = Regex::new(
        r"(?i)^\s*(?:dcl-subf\s+)?([A-Za-z_][A-Za-z0-9_@#]*)\s+([A-Za-z]+)(?:\s*\(\s*([^)]*?)\s*\))?((?:\s+[A-Za-z]+\s*\((?:'(?:[^']|'')*'|[^)'])*\))*)\s*;\s*$"
    )
    .unwrap();
    static ref OPTION: Regex =
        Regex::new(r"(?i)([A-Za-z]+)\s*\(\s*((?:'(?:[^']|'')*'|[^)'])*?)\s*\)").unwrap();
}

/// An aggregate-open line: `dcl-ds <name> <modifiers>;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpenLine<'a> {
    /// The open keyword exactly as written; its casing selects the format.
    pub keyword: &'a str,
    pub name: &'a str,
    pub modifiers: &'a str,
}

/// The shorthand `<name> likeds(<len>);` whose children follow indented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SubstructureLine<'a> {
    pub name: &'a str,
    pub length: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldLine<'a> {
    pub name: &'a str,
    pub type_keyword: &'a str,
    pub length: Option<&'a str>,
    pub init: Option<&'a str>,
    pub dim: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    /// Blank or comment-only.
    Blank,
    Open(OpenLine<'a>),
    /// An open that references another structure and needs no close.
    SelfContained(OpenLine<'a>),
    Close,
    Substructure(SubstructureLine<'a>),
    Field(FieldLine<'a>),
    Other,
}

impl LineKind<'_> {
    /// Lines that end an indentation-scoped substructure.
    pub fn ends_substructure(&self) -> bool {
        matches!(
            self,
            LineKind::Open(_)
                | LineKind::SelfContained(_)
                | LineKind::Close
                | LineKind::Substructure(_)
                | LineKind::Field(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    pub text: &'a str,
    pub indent: usize,
    pub kind: LineKind<'a>,
}

pub(crate) fn scan(text: &str) -> Vec<Line<'_>> {
    text.lines().map(classify_line).collect()
}

fn classify_line(text: &str) -> Line<'_> {
    let indent = text.len() - text.trim_start().len();
    let kind = classify(strip_comment(text));
    log::trace!("{:?} <- {:?}", kind, text.trim());
    Line { text, indent, kind }
}

/// Cuts a trailing `//` comment that is not inside a quoted literal.
pub(crate) fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_quote = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => in_quote = !in_quote,
            b'/' if !in_quote && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            _ => {}
        }
        i += 1;
    }
    line
}

pub(crate) fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    if let Some(caps) = OPEN.captures(line) {
        let open = OpenLine {
            keyword: caps.get(1).map_or("", |m| m.as_str()),
            name: caps.get(2).map_or("", |m| m.as_str()),
            modifiers: caps.get(3).map_or("", |m| m.as_str().trim()),
        };
        if SELF_CONTAINED.is_match(open.modifiers) {
            return LineKind::SelfContained(open);
        }
        return LineKind::Open(open);
    }

    if CLOSE.is_match(line) {
        return LineKind::Close;
    }

    if let Some(caps) = SUBSTRUCTURE.captures(line) {
        return LineKind::Substructure(SubstructureLine {
            name: caps.get(1).map_or("", |m| m.as_str()),
            length: caps.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty()),
        });
    }

    if let Some(caps) = FIELD.captures(line) {
        let mut field = FieldLine {
            name: caps.get(1).map_or("", |m| m.as_str()),
            type_keyword: caps.get(2).map_or("", |m| m.as_str()),
            length: caps.get(3).map(|m| m.as_str()).filter(|s| !s.is_empty()),
            init: None,
            dim: None,
        };
        let options = caps.get(4).map_or("", |m| m.as_str());
        for option in OPTION.captures_iter(options) {
            let value = option.get(2).map(|m| m.as_str());
            let keyword = option.get(1).map_or("", |m| m.as_str());
            if keyword.eq_ignore_ascii_case("inz") {
                field.init = value;
            } else if keyword.eq_ignore_ascii_case("dim") {
                field.dim = value;
            }
        }
        return LineKind::Field(field);
    }

    LineKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_lines_capture_name_and_modifiers() {
        match classify("  Dcl-Ds order Qualified Dim(10);") {
            LineKind::Open(open) => {
                assert_eq!(open.keyword, "Dcl-Ds");
                assert_eq!(open.name, "order");
                assert_eq!(open.modifiers, "Qualified Dim(10)");
            }
            other => panic!("expected open, got {:?}", other),
        }
    }

    #[test]
    fn likeds_open_is_self_contained() {
        assert!(matches!(
            classify("dcl-ds copy likeds(cust);"),
            LineKind::SelfContained(_)
        ));
    }

    #[test]
    fn close_lines() {
        assert_eq!(classify("end-ds;"), LineKind::Close);
        assert_eq!(classify("   END-DS cust;"), LineKind::Close);
        assert_eq!(classify("end-dsx;"), LineKind::Other);
    }

    #[test]
    fn field_options_in_any_order() {
        match classify("amt packed(13:2) dim(4) inz(0.50);") {
            LineKind::Field(field) => {
                assert_eq!(field.name, "amt");
                assert_eq!(field.type_keyword, "packed");
                assert_eq!(field.length, Some("13:2"));
                assert_eq!(field.init, Some("0.50"));
                assert_eq!(field.dim, Some("4"));
            }
            other => panic!("expected field, got {:?}", other),
        }
    }

    #[test]
    fn quoted_initializer_may_hold_parens() {
        match classify("msg char(20) inz('a (b) c');") {
            LineKind::Field(field) => assert_eq!(field.init, Some("'a (b) c'")),
            other => panic!("expected field, got {:?}", other),
        }
    }

    #[test]
    fn substructure_shorthand() {
        assert_eq!(
            classify("addr likeds(3);"),
            LineKind::Substructure(SubstructureLine {
                name: "addr",
                length: Some("3")
            })
        );
        assert!(matches!(classify("tmpl template;"), LineKind::Substructure(_)));
    }

    #[test]
    fn comments_are_stripped_outside_quotes() {
        assert_eq!(strip_comment("id int(10); // key"), "id int(10); ");
        assert_eq!(strip_comment("u char(9) inz('a//b');"), "u char(9) inz('a//b');");
        let lines = scan("// header\n\nid int(10); // key");
        assert_eq!(lines[0].kind, LineKind::Blank);
        assert_eq!(lines[1].kind, LineKind::Blank);
        assert!(matches!(lines[2].kind, LineKind::Field(_)));
    }
}
