//! User preferences: which format to generate and how wide one indent is.
//!
//! ```yaml
//! format: DCL-DS
//! indent-width: 2
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::format::FormatKey;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_FILE: &str = "dsforge.yaml";

pub const MAX_INDENT_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Preferences {
    pub format: FormatKey,
    pub indent_width: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            format: FormatKey::Lower,
            indent_width: 3,
        }
    }
}

impl Preferences {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let prefs: Preferences = serde_yaml::from_str(text)?;
        prefs.validate()?;
        Ok(prefs)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let prefs = Self::from_yaml_str(&text)?;
        log::debug!("loaded preferences from {}: {:?}", path.display(), prefs);
        Ok(prefs)
    }

    /// Loads `path` if given, else [`DEFAULT_FILE`] when it exists, else
    /// defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_FILE).is_file() => Self::load(Path::new(DEFAULT_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent_width == 0 || self.indent_width > MAX_INDENT_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "indent-width must be between 1 and {}, got {}",
                MAX_INDENT_WIDTH, self.indent_width
            )));
        }
        Ok(())
    }

    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let prefs = Preferences::from_yaml_str("format: Dcl-Ds\n").unwrap();
        assert_eq!(prefs.format, FormatKey::Title);
        assert_eq!(prefs.indent_width, 3);
        assert_eq!(Preferences::from_yaml_str("").unwrap(), Preferences::default());
    }

    #[test]
    fn indent_width_is_bounded() {
        let err = Preferences::from_yaml_str("indent-width: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(Preferences::from_yaml_str("indent-width: 9").is_err());
        assert_eq!(
            Preferences::from_yaml_str("indent-width: 2").unwrap().indent_unit(),
            "  "
        );
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = Preferences::from_yaml_str("format: dcl-DS").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
