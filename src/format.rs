//! Format tables: the three keyword-casing conventions for the same grammar.
//!
//! A [`Format`] is a spelling-only view of one canonical structure. Adding a
//! convention means adding one more [`Spellings`] table and a [`FormatKey`]
//! variant; nothing in the generator or importer changes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::DsError;
use crate::model::FieldType;

// ============================================================================
// FORMAT KEYS
// ============================================================================

/// Canonical key of a surface convention, spelled as its open keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FormatKey {
    #[default]
    #[serde(rename = "dcl-ds")]
    Lower,
    #[serde(rename = "DCL-DS")]
    Upper,
    #[serde(rename = "Dcl-Ds")]
    Title,
}

impl FormatKey {
    pub const ALL: [FormatKey; 3] = [FormatKey::Lower, FormatKey::Upper, FormatKey::Title];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKey::Lower => "dcl-ds",
            FormatKey::Upper => "DCL-DS",
            FormatKey::Title => "Dcl-Ds",
        }
    }

    pub fn table(&self) -> &'static Format {
        &TABLES[*self as usize]
    }
}

impl fmt::Display for FormatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatKey {
    type Err = DsError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        FormatKey::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == key)
            .ok_or_else(|| DsError::unknown_format(key))
    }
}

// ============================================================================
// SPELLING TABLES
// ============================================================================

/// Raw keyword spellings of one convention.
pub struct Spellings {
    pub open: &'static str,
    pub close: &'static str,
    pub template: &'static str,
    pub qualified: &'static str,
    pub var_marker: &'static str,
    pub auto_marker: &'static str,
    pub dim: &'static str,
    pub inz: &'static str,
    pub likeds: &'static str,
    pub types: [(FieldType, &'static str); 12],
}

static LOWER: Spellings = Spellings {
    open: "dcl-ds",
    close: "end-ds",
    template: "template",
    qualified: "qualified",
    var_marker: "*var",
    auto_marker: "*auto",
    dim: "dim",
    inz: "inz",
    likeds: "likeds",
    types: [
        (FieldType::Character, "char"),
        (FieldType::VariableCharacter, "varchar"),
        (FieldType::Integer, "int"),
        (FieldType::PackedDecimal, "packed"),
        (FieldType::ZonedDecimal, "zoned"),
        (FieldType::Unsigned, "uns"),
        (FieldType::Date, "date"),
        (FieldType::Time, "time"),
        (FieldType::Timestamp, "timestamp"),
        (FieldType::Binary, "bindec"),
        (FieldType::Indicator, "ind"),
        (FieldType::Pointer, "pointer"),
    ],
};

static UPPER: Spellings = Spellings {
    open: "DCL-DS",
    close: "END-DS",
    template: "TEMPLATE",
    qualified: "QUALIFIED",
    var_marker: "*VAR",
    auto_marker: "*AUTO",
    dim: "DIM",
    inz: "INZ",
    likeds: "LIKEDS",
    types: [
        (FieldType::Character, "CHAR"),
        (FieldType::VariableCharacter, "VARCHAR"),
        (FieldType::Integer, "INT"),
        (FieldType::PackedDecimal, "PACKED"),
        (FieldType::ZonedDecimal, "ZONED"),
        (FieldType::Unsigned, "UNS"),
        (FieldType::Date, "DATE"),
        (FieldType::Time, "TIME"),
        (FieldType::Timestamp, "TIMESTAMP"),
        (FieldType::Binary, "BINDEC"),
        (FieldType::Indicator, "IND"),
        (FieldType::Pointer, "POINTER"),
    ],
};

static TITLE: Spellings = Spellings {
    open: "Dcl-Ds",
    close: "End-Ds",
    template: "Template",
    qualified: "Qualified",
    var_marker: "*Var",
    auto_marker: "*Auto",
    dim: "Dim",
    inz: "Inz",
    likeds: "LikeDs",
    types: [
        (FieldType::Character, "Char"),
        (FieldType::VariableCharacter, "VarChar"),
        (FieldType::Integer, "Int"),
        (FieldType::PackedDecimal, "Packed"),
        (FieldType::ZonedDecimal, "Zoned"),
        (FieldType::Unsigned, "Uns"),
        (FieldType::Date, "Date"),
        (FieldType::Time, "Time"),
        (FieldType::Timestamp, "Timestamp"),
        (FieldType::Binary, "BinDec"),
        (FieldType::Indicator, "Ind"),
        (FieldType::Pointer, "Pointer"),
    ],
};

/// Indexed by `FormatKey as usize`.
static TABLES: Lazy<[Format; 3]> = Lazy::new(|| {
    [
        Format::build(FormatKey::Lower, &LOWER),
        Format::build(FormatKey::Upper, &UPPER),
        Format::build(FormatKey::Title, &TITLE),
    ]
});

// ============================================================================
// FORMAT
// ============================================================================

/// A resolved convention: keyword spellings plus the two-way type map.
pub struct Format {
    pub key: FormatKey,
    pub spellings: &'static Spellings,
    forward: HashMap<FieldType, &'static str>,
    // Keyed by lowercased spelling.
    reverse: HashMap<String, FieldType>,
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Format").field("key", &self.key).finish()
    }
}

impl Format {
    fn build(key: FormatKey, spellings: &'static Spellings) -> Self {
        let mut forward = HashMap::new();
        let mut reverse = HashMap::new();
        for (ty, spelling) in spellings.types.iter() {
            forward.insert(*ty, *spelling);
            // First canonical tag wins on a spelling collision.
            reverse.entry(spelling.to_ascii_lowercase()).or_insert(*ty);
        }
        Self {
            key,
            spellings,
            forward,
            reverse,
        }
    }

    /// Looks up a table by its key text, e.g. `"DCL-DS"`.
    pub fn lookup(key: &str) -> Result<&'static Format, DsError> {
        key.parse::<FormatKey>().map(|key| key.table())
    }

    /// The format whose open keyword is spelled exactly `open_keyword`.
    pub fn detect(open_keyword: &str) -> Option<FormatKey> {
        FormatKey::ALL
            .into_iter()
            .find(|key| key.table().spellings.open == open_keyword)
    }

    pub fn type_keyword(&self, ty: FieldType) -> &'static str {
        // Every table lists all twelve types.
        self.forward.get(&ty).copied().unwrap_or_else(|| ty.as_str())
    }

    /// Reverse-maps a type keyword in any casing to its canonical tag.
    pub fn type_from_keyword(&self, keyword: &str) -> Option<FieldType> {
        self.reverse.get(&keyword.to_ascii_lowercase()).copied()
    }

    /// The dimension clause for a `*var:`/`*auto:` or plain bound.
    pub fn dim_clause(&self, marker: Option<&str>, bound: &str) -> String {
        match marker {
            Some(marker) => format!("{}({}:{})", self.spellings.dim, marker, bound),
            None => format!("{}({})", self.spellings.dim, bound),
        }
    }
}
