//! One editing session: the structure a user is currently working on.
//!
//! The session is owned by the caller and passed to the stateless generator
//! and importer; nothing in the crate keeps a structure alive between calls.

use crate::config::Preferences;
use crate::errors::DsError;
use crate::format::FormatKey;
use crate::generator::Generator;
use crate::importer::{LineSpan, ParseResult};
use crate::model::{FieldTree, Header};

#[derive(Debug, Clone)]
pub struct Session {
    pub header: Header,
    pub tree: FieldTree,
    pub format: FormatKey,
    prefs: Preferences,
    span: Option<LineSpan>,
}

impl Session {
    pub fn new(prefs: &Preferences) -> Self {
        Self {
            header: Header::default(),
            tree: FieldTree::new(),
            format: prefs.format,
            prefs: prefs.clone(),
            span: None,
        }
    }

    /// Where the loaded structure came from, for in-place replacement.
    pub fn span(&self) -> Option<LineSpan> {
        self.span
    }

    pub fn set_format(&mut self, format: FormatKey) {
        self.format = format;
    }

    pub fn reset(&mut self) {
        self.header = Header::default();
        self.tree.clear();
        self.span = None;
    }

    /// Replaces the session contents with an imported structure.
    pub fn load(&mut self, result: ParseResult) -> Result<(), DsError> {
        self.reset();
        if !result.success {
            let reason = result
                .failures()
                .next()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "import was not successful".to_string());
            return Err(DsError::validation(format!(
                "cannot load structure: {}",
                reason
            )));
        }

        self.header = result.header;
        self.tree.replace(result.fields);
        if let Some(format) = result.format {
            self.format = format;
        }
        self.span = result.span;
        Ok(())
    }

    pub fn generate(&self, base_indent: &str) -> Result<String, DsError> {
        Generator::new(self.format, self.prefs.indent_unit())?.generate(
            &self.header,
            self.tree.fields(),
            base_indent,
        )
    }
}
