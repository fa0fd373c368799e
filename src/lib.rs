//! dsforge: a round-trip transducer between free-format data structure
//! declarations (`dcl-ds ... end-ds`) and a typed in-memory description.
//!
//! - [`generator`] renders a [`Header`] and its fields as declaration text.
//! - [`importer`] finds declarations in source text and rebuilds the
//!   description, including the [`FormatKey`] it was written in.
//! - [`session`] holds the structure a caller is editing.

pub use crate::config::Preferences;
pub use crate::errors::{ConfigError, DsError};
pub use crate::format::{Format, FormatKey};
pub use crate::generator::{generate, Generator};
pub use crate::importer::{locate_and_parse_at_cursor, parse_all_top_level, LineSpan, ParseResult};
pub use crate::model::{Field, FieldTree, FieldType, Header, StructureKind};
pub use crate::session::Session;

pub mod cli;
pub mod config;
pub mod errors;
pub mod format;
pub mod generator;
pub mod importer;
pub mod logging;
pub mod model;
pub mod session;
