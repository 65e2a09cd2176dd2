//! Dependency declarations.
//!
//! A dependency pairs a package name with a version range. Ranges are
//! opaque to this crate: they are stored and aggregated, never solved.

use semver::VersionReq;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::util::Symbol;

/// A library dependency declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dependency {
    /// Package name
    pub name: Symbol,

    /// Version requirement
    pub version: VersionReq,
}

impl Dependency {
    /// Create a dependency with an explicit version requirement.
    pub fn new(name: impl Into<Symbol>, version: VersionReq) -> Self {
        Dependency {
            name: name.into(),
            version,
        }
    }

    /// Create a dependency that accepts any version.
    pub fn any(name: impl Into<Symbol>) -> Self {
        Dependency {
            name: name.into(),
            version: VersionReq::STAR,
        }
    }

    /// Parse a compact spec: a name optionally followed by a range,
    /// e.g. `"bytestring"` or `"bytestring >=0.11, <0.13"`.
    pub fn parse_spec(spec: &str) -> Result<Self, semver::Error> {
        match spec.split_once(char::is_whitespace) {
            Some((name, range)) => Ok(Dependency {
                name: Symbol::intern(name),
                version: range.trim().parse()?,
            }),
            None => Ok(Dependency::any(spec)),
        }
    }
}

impl<'de> Deserialize<'de> for Dependency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            /// Compact form: `"aeson >=2.0"`
            Simple(String),
            /// Detailed form: `{ name = "aeson", version = ">=2.0" }`
            Detailed {
                name: Symbol,
                #[serde(default = "any_version")]
                version: VersionReq,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Simple(spec) => Dependency::parse_spec(&spec).map_err(D::Error::custom),
            Repr::Detailed { name, version } => Ok(Dependency { name, version }),
        }
    }
}

fn any_version() -> VersionReq {
    VersionReq::STAR
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if self.version != VersionReq::STAR {
            write!(f, " {}", self.version)?;
        }
        Ok(())
    }
}

/// A build-tool dependency: an executable needed at build time, distinct
/// from a library dependency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDependency {
    /// Tool (executable) name
    pub name: Symbol,

    /// Version requirement
    pub version: VersionReq,
}

impl ToolDependency {
    /// Create a tool dependency with an explicit version requirement.
    pub fn new(name: impl Into<Symbol>, version: VersionReq) -> Self {
        ToolDependency {
            name: name.into(),
            version,
        }
    }

    /// Create a tool dependency that accepts any version.
    pub fn any(name: impl Into<Symbol>) -> Self {
        ToolDependency {
            name: name.into(),
            version: VersionReq::STAR,
        }
    }
}

impl<'de> Deserialize<'de> for ToolDependency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let dep = Dependency::deserialize(deserializer)?;
        Ok(ToolDependency {
            name: dep.name,
            version: dep.version,
        })
    }
}

impl std::fmt::Display for ToolDependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if self.version != VersionReq::STAR {
            write!(f, " {}", self.version)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spec_with_range() {
        let dep = Dependency::parse_spec("bytestring >=0.11, <0.13").unwrap();
        assert_eq!(dep.name.as_str(), "bytestring");
        assert!(dep.version.matches(&semver::Version::new(0, 11, 2)));
        assert!(!dep.version.matches(&semver::Version::new(0, 13, 0)));
    }

    #[test]
    fn test_parse_spec_bare_name() {
        let dep = Dependency::parse_spec("base").unwrap();
        assert_eq!(dep.name.as_str(), "base");
        assert_eq!(dep.version, VersionReq::STAR);
    }

    #[test]
    fn test_deserialize_both_forms() {
        #[derive(Deserialize)]
        struct Holder {
            deps: Vec<Dependency>,
        }

        let holder: Holder = toml::from_str(
            r#"
deps = ["base >=4.9", { name = "aeson", version = ">=2.0" }, { name = "text" }]
"#,
        )
        .unwrap();

        assert_eq!(holder.deps.len(), 3);
        assert_eq!(holder.deps[0].name.as_str(), "base");
        assert_eq!(holder.deps[1].name.as_str(), "aeson");
        assert_eq!(holder.deps[2].version, VersionReq::STAR);
    }

    #[test]
    fn test_display_hides_wildcard() {
        assert_eq!(Dependency::any("base").to_string(), "base");
        let dep = Dependency::new("aeson", ">=2.0".parse().unwrap());
        assert_eq!(dep.to_string(), "aeson >=2.0");
    }
}
