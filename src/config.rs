//! Generation options. Every field has a default so a config file only
//! needs the keys it changes.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::inference::DEFAULT_IDENTIFIER_SUFFIX;
use crate::path_de::{PathedError, from_str_with_path};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenOptions {
    /// Package used when the input carries no `package` header.
    pub default_package: Option<String>,
    /// Case-insensitive suffix marking identifier fields.
    pub identifier_suffix: String,
    /// Emit Update/Delete with the store mutation commented out.
    pub legacy_placeholders: bool,
    /// Treat unparseable field lines as an error.
    pub strict_fields: bool,
    /// Prepend a `Code generated ... DO NOT EDIT.` banner.
    pub stamp: bool,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            default_package: None,
            identifier_suffix: DEFAULT_IDENTIFIER_SUFFIX.to_string(),
            legacy_placeholders: false,
            strict_fields: false,
            stamp: false,
        }
    }
}

impl GenOptions {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let options = Self::parse(&source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded options from {}", path.display());
        Ok(options)
    }

    pub fn parse(source: &str) -> Result<Self, PathedError> {
        let options: Self = from_str_with_path(source)?;
        if options.identifier_suffix.trim().is_empty() {
            return Err(PathedError::new("identifier_suffix", "must not be empty"));
        }
        Ok(options)
    }
}
