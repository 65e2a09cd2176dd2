//! Module names.
//!
//! A module name is a dotted identifier such as `Data.Map.Strict`. It maps
//! to a relative file path by substituting path separators for the dots;
//! the extension is supplied by the file resolver.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::Symbol;

/// A validated dotted module identifier.
///
/// Validation happens at construction; a `ModuleName` in hand is always
/// well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleName(Symbol);

impl ModuleName {
    /// Parse and validate a dotted module name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, InvalidModuleName> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(InvalidModuleName(name.to_owned()));
        }
        for component in name.split('.') {
            if component.is_empty()
                || !component
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '\'')
            {
                return Err(InvalidModuleName(name.to_owned()));
            }
        }
        Ok(ModuleName(Symbol::intern(name)))
    }

    pub fn as_str(&self) -> &'static str {
        self.0.as_str()
    }

    /// The relative path this module maps to, without an extension:
    /// `Data.Map.Strict` becomes `Data/Map/Strict`.
    pub fn to_path(&self) -> PathBuf {
        self.0.as_str().split('.').collect()
    }
}

/// Error for a malformed module name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid module name `{0}`")]
pub struct InvalidModuleName(String);

impl FromStr for ModuleName {
    type Err = InvalidModuleName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleName::new(s)
    }
}

impl TryFrom<String> for ModuleName {
    type Error = InvalidModuleName;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ModuleName::new(s)
    }
}

impl From<ModuleName> for String {
    fn from(name: ModuleName) -> String {
        name.as_str().to_owned()
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
