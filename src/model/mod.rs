//! The in-memory description of one structure: its [`Header`] and its
//! ordered, possibly nested list of [`Field`]s.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DsError;

pub mod tree;
pub mod validate;

pub use tree::FieldTree;

// ============================================================================
// HEADER
// ============================================================================

/// How the structure's dimension clause is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureKind {
    #[default]
    Default,
    Template,
    VarLength,
    AutoLength,
}

impl StructureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructureKind::Default => "default",
            StructureKind::Template => "template",
            StructureKind::VarLength => "var-length",
            StructureKind::AutoLength => "auto-length",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name, kind and dimension of a top-level structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    #[serde(default)]
    pub kind: StructureKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
}

impl Header {
    pub fn new(name: impl Into<String>, kind: StructureKind) -> Self {
        Self {
            name: name.into(),
            kind,
            dimension: None,
        }
    }

    pub fn with_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = Some(dimension.into());
        self
    }

    /// The dimension as written, ignoring empty text.
    pub fn dimension(&self) -> Option<&str> {
        self.dimension
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

// ============================================================================
// FIELD TYPES
// ============================================================================

/// The fixed type vocabulary of scalar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Character,
    VariableCharacter,
    Integer,
    PackedDecimal,
    ZonedDecimal,
    Unsigned,
    Date,
    Time,
    Timestamp,
    Binary,
    Indicator,
    Pointer,
}

impl FieldType {
    pub const ALL: [FieldType; 12] = [
        FieldType::Character,
        FieldType::VariableCharacter,
        FieldType::Integer,
        FieldType::PackedDecimal,
        FieldType::ZonedDecimal,
        FieldType::Unsigned,
        FieldType::Date,
        FieldType::Time,
        FieldType::Timestamp,
        FieldType::Binary,
        FieldType::Indicator,
        FieldType::Pointer,
    ];

    /// Canonical tag, independent of any format's spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Character => "character",
            FieldType::VariableCharacter => "variable-character",
            FieldType::Integer => "integer",
            FieldType::PackedDecimal => "packed-decimal",
            FieldType::ZonedDecimal => "zoned-decimal",
            FieldType::Unsigned => "unsigned",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Timestamp => "timestamp",
            FieldType::Binary => "binary",
            FieldType::Indicator => "indicator",
            FieldType::Pointer => "pointer",
        }
    }

    pub fn is_character(&self) -> bool {
        matches!(self, FieldType::Character | FieldType::VariableCharacter)
    }

    pub fn is_decimal(&self) -> bool {
        matches!(self, FieldType::PackedDecimal | FieldType::ZonedDecimal)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = DsError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == tag)
            .ok_or_else(|| DsError::validation(format!("unknown type tag '{}'", tag)))
    }
}

// ============================================================================
// FIELDS
// ============================================================================

/// One node of the field tree: a typed scalar or a nested aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default)]
    pub id: usize,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_count: Option<u32>,
    #[serde(default)]
    pub is_aggregate: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Field>,
}

impl Field {
    pub fn scalar(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            type_tag: Some(ty),
            ..Self::default()
        }
    }

    pub fn aggregate(name: impl Into<String>, children: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            is_aggregate: true,
            children,
            ..Self::default()
        }
    }

    pub fn with_length(mut self, length: impl Into<String>) -> Self {
        self.length = Some(length.into());
        self
    }

    pub fn with_init(mut self, init: impl Into<String>) -> Self {
        self.init = Some(init.into());
        self
    }

    pub fn with_repeat(mut self, count: u32) -> Self {
        self.repeat_count = Some(count);
        self
    }

    pub fn length(&self) -> Option<&str> {
        non_empty(&self.length)
    }

    pub fn init(&self) -> Option<&str> {
        non_empty(&self.init)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Field::subtree_len).sum::<usize>()
    }

    /// Depth of the subtree; a scalar has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Field::depth).max().unwrap_or(0)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
