//! The package descriptor - the final resolution output.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use semver::{Version, VersionReq};
use serde::Serialize;

use crate::core::dependency::ToolDependency;
use crate::core::environment::FlagAssignment;
use crate::util::Symbol;

/// The effective configuration of one package, resolved against one
/// environment.
///
/// Immutable once built; each resolution call produces a fresh descriptor
/// owned exclusively by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct PackageDescriptor {
    name: Symbol,
    version: Version,
    root: PathBuf,
    files: BTreeSet<PathBuf>,
    dependencies: BTreeMap<Symbol, VersionReq>,
    tools: Vec<ToolDependency>,
    flags: FlagAssignment,
}

impl PackageDescriptor {
    /// Create a descriptor. Callers are expected to have removed the
    /// package's own name from `dependencies` already.
    pub fn new(
        name: Symbol,
        version: Version,
        root: PathBuf,
        files: BTreeSet<PathBuf>,
        dependencies: BTreeMap<Symbol, VersionReq>,
        tools: Vec<ToolDependency>,
        flags: FlagAssignment,
    ) -> Self {
        PackageDescriptor {
            name,
            version,
            root,
            files,
            dependencies,
            tools,
            flags,
        }
    }

    /// Get the package name.
    pub fn name(&self) -> Symbol {
        self.name
    }

    /// Get the package version.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Get the package root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every file the package depends on, including its metadata file.
    pub fn files(&self) -> &BTreeSet<PathBuf> {
        &self.files
    }

    /// Dependency name to version range; never contains this package's name.
    pub fn dependencies(&self) -> &BTreeMap<Symbol, VersionReq> {
        &self.dependencies
    }

    /// Build-tool dependencies, in declaration order, duplicates kept.
    pub fn tools(&self) -> &[ToolDependency] {
        &self.tools
    }

    /// The flag assignment this resolution ran with.
    pub fn flags(&self) -> &FlagAssignment {
        &self.flags
    }
}

impl std::fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_display() {
        let descriptor = PackageDescriptor::new(
            Symbol::intern("demo"),
            Version::new(1, 2, 0),
            PathBuf::from("/pkg"),
            BTreeSet::new(),
            BTreeMap::new(),
            Vec::new(),
            FlagAssignment::new(),
        );
        assert_eq!(descriptor.to_string(), "demo v1.2.0");
    }
}
