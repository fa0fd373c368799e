//! The Generator: serializes a [`Header`] and its field tree into declaration
//! text in one [`Format`].
//!
//! Output is a pure function of the inputs and the generator's configuration,
//! newline-joined with no trailing newline.

use crate::config::Preferences;
use crate::errors::DsError;
use crate::format::{Format, FormatKey};
use crate::model::validate;
use crate::model::{Field, Header, StructureKind};

#[derive(Debug, Clone)]
pub struct Generator {
    format: &'static Format,
    indent_unit: String,
}

impl Generator {
    /// `indent_unit` is the text added per nesting level.
    pub fn new(format: FormatKey, indent_unit: impl Into<String>) -> Result<Self, DsError> {
        let indent_unit = indent_unit.into();
        if indent_unit.is_empty() || !validate::is_indentation(&indent_unit) {
            return Err(DsError::validation(format!(
                "indent unit {:?} must be one or more spaces or tabs",
                indent_unit
            )));
        }
        Ok(Self {
            format: format.table(),
            indent_unit,
        })
    }

    pub fn from_preferences(prefs: &Preferences) -> Result<Self, DsError> {
        Self::new(prefs.format, prefs.indent_unit())
    }

    pub fn format(&self) -> FormatKey {
        self.format.key
    }

    /// Renders the declaration. `base_indent` is the indentation of the line
    /// the text will be inserted at.
    ///
    /// Field ids must be unique tree-wide. The [`Field`] builders leave every
    /// id at 0, so renumber hand-built forests through
    /// [`FieldTree::from_fields`](crate::model::FieldTree::from_fields) first.
    pub fn generate(
        &self,
        header: &Header,
        fields: &[Field],
        base_indent: &str,
    ) -> Result<String, DsError> {
        validate::validate_header(header)?;
        validate::check_forest(fields)?;
        if !validate::is_indentation(base_indent) {
            return Err(DsError::validation(format!(
                "base indent {:?} must contain only spaces or tabs",
                base_indent
            )));
        }

        log::debug!(
            "generating '{}' ({}, {} top-level field(s)) as {}",
            header.name,
            header.kind,
            fields.len(),
            self.format.key
        );

        let mut out = Vec::new();
        self.emit_structure(
            &header.name,
            header.kind,
            header.dimension(),
            fields,
            0,
            base_indent,
            &mut out,
        );
        Ok(out.join("\n"))
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_structure(
        &self,
        name: &str,
        kind: StructureKind,
        dimension: Option<&str>,
        fields: &[Field],
        level: usize,
        base_indent: &str,
        out: &mut Vec<String>,
    ) {
        let words = self.format.spellings;
        let indent = self.indent(base_indent, level);

        let mut open = format!("{}{} {}", indent, words.open, name);
        if level == 0 {
            open.push(' ');
            open.push_str(words.qualified);
        }
        let clause = match (kind, dimension) {
            (StructureKind::Template, _) | (_, None) => None,
            (StructureKind::Default, Some(d)) => Some(self.format.dim_clause(None, d)),
            (StructureKind::VarLength, Some(d)) => {
                Some(self.format.dim_clause(Some(words.var_marker), d))
            }
            (StructureKind::AutoLength, Some(d)) => {
                Some(self.format.dim_clause(Some(words.auto_marker), d))
            }
        };
        if let Some(clause) = clause {
            open.push(' ');
            open.push_str(&clause);
        }
        if kind == StructureKind::Template && level == 0 {
            open.push(' ');
            open.push_str(words.template);
        }
        open.push(';');
        out.push(open);

        let field_indent = self.indent(base_indent, level + 1);
        for field in fields {
            if let Err(reason) = validate::check_field(field) {
                log::debug!("field '{}' rendered as comment: {}", field.name, reason);
                out.push(invalid_marker(&field_indent, field, &reason));
                continue;
            }
            if field.is_aggregate {
                self.emit_structure(
                    &field.name,
                    StructureKind::Default,
                    field.length(),
                    &field.children,
                    level + 1,
                    base_indent,
                    out,
                );
            } else {
                out.push(format!("{}{}", field_indent, self.field_line(field)));
            }
        }

        out.push(format!("{}{};", indent, words.close));
    }

    /// `<name> <type>[(len)][ inz(init)][ dim(n)];` for a checked scalar.
    fn field_line(&self, field: &Field) -> String {
        let words = self.format.spellings;
        let mut line = field.name.clone();
        if let Some(ty) = field.type_tag {
            line.push(' ');
            line.push_str(self.format.type_keyword(ty));
        }
        if let Some(length) = field.length() {
            line.push_str(&format!("({})", length));
        }
        if let Some(init) = field.init() {
            line.push_str(&format!(" {}({})", words.inz, init));
        }
        if let Some(count) = field.repeat_count {
            line.push_str(&format!(" {}({})", words.dim, count));
        }
        line.push(';');
        line
    }

    fn indent(&self, base_indent: &str, level: usize) -> String {
        format!("{}{}", base_indent, self.indent_unit.repeat(level))
    }
}

fn invalid_marker(indent: &str, field: &Field, reason: &str) -> String {
    let name = if field.name.trim().is_empty() {
        "<unnamed>"
    } else {
        field.name.as_str()
    };
    format!("{}// invalid field '{}': {}", indent, name, reason)
}

/// Generates with the default three-space indent unit. Ids must already be
/// unique, as for [`Generator::generate`].
pub fn generate(
    header: &Header,
    fields: &[Field],
    format: FormatKey,
    base_indent: &str,
) -> Result<String, DsError> {
    Generator::from_preferences(&Preferences {
        format,
        ..Preferences::default()
    })?
    .generate(header, fields, base_indent)
}
