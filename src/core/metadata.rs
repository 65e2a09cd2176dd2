//! Package metadata - the already-parsed conditional description.
//!
//! `Metadata` is the structure the resolver consumes: package identity,
//! flag declarations, one conditional tree per target, and resource-file
//! glob lists. It is produced from a `Capstan.toml` file through serde;
//! there is no hand-written syntax here, and a failed deserialization
//! surfaces as [`ResolveError::InvalidMetadata`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::core::condition::ConditionNode;
use crate::core::environment::FlagAssignment;
use crate::core::target::{Benchmark, Executable, Library, TestSuite};
use crate::resolver::errors::ResolveError;
use crate::util::Symbol;

/// Canonical metadata file name.
pub const METADATA_NAME: &str = "Capstan.toml";

/// A flag declaration: a named boolean toggle with a default value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagDecl {
    /// Flag name
    pub name: Symbol,

    /// Value used when the configuration does not set the flag
    #[serde(default)]
    pub default: bool,

    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
}

/// The parsed package metadata.
#[derive(Debug, Clone)]
pub struct Metadata {
    /// Package name
    pub name: Symbol,

    /// Package version
    pub version: Version,

    /// Declared flags; every flag referenced by a condition must appear here
    pub flags: Vec<FlagDecl>,

    /// The library target, if any
    pub library: Option<ConditionNode<Library>>,

    /// Executable targets, in declaration order
    pub executables: Vec<ConditionNode<Executable>>,

    /// Test-suite targets, in declaration order
    pub test_suites: Vec<ConditionNode<TestSuite>>,

    /// Benchmark targets, in declaration order
    pub benchmarks: Vec<ConditionNode<Benchmark>>,

    /// Glob patterns for runtime data files
    pub data_files: Vec<String>,

    /// Glob patterns for extra files shipped with the source
    pub extra_source_files: Vec<String>,

    /// Glob patterns for generated files cleaned between builds
    pub extra_tmp_files: Vec<String>,

    /// Glob patterns for documentation files
    pub extra_doc_files: Vec<String>,
}

/// Raw metadata as deserialized from TOML.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawMetadata {
    package: RawPackage,

    #[serde(default)]
    flags: Vec<FlagDecl>,

    #[serde(default)]
    library: Option<ConditionNode<Library>>,

    #[serde(default, rename = "executable")]
    executables: Vec<ConditionNode<Executable>>,

    #[serde(default, rename = "test-suite")]
    test_suites: Vec<ConditionNode<TestSuite>>,

    #[serde(default, rename = "benchmark")]
    benchmarks: Vec<ConditionNode<Benchmark>>,

    #[serde(default)]
    data_files: Vec<String>,

    #[serde(default)]
    extra_source_files: Vec<String>,

    #[serde(default)]
    extra_tmp_files: Vec<String>,

    #[serde(default)]
    extra_doc_files: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    name: Symbol,
    version: String,
}

impl Metadata {
    /// Load metadata from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read metadata: {}", path.display()))?;
        Ok(Self::parse(&content, path)?)
    }

    /// Parse metadata content.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ResolveError> {
        let raw: RawMetadata = toml::from_str(content).map_err(|err| {
            ResolveError::InvalidMetadata {
                path: path.to_path_buf(),
                source: anyhow::Error::new(err),
            }
        })?;

        let version: Version = raw.package.version.parse().map_err(|err| {
            ResolveError::InvalidMetadata {
                path: path.to_path_buf(),
                source: anyhow!("invalid package version `{}`: {}", raw.package.version, err),
            }
        })?;

        let metadata = Metadata {
            name: raw.package.name,
            version,
            flags: raw.flags,
            library: raw.library,
            executables: raw.executables,
            test_suites: raw.test_suites,
            benchmarks: raw.benchmarks,
            data_files: raw.data_files,
            extra_source_files: raw.extra_source_files,
            extra_tmp_files: raw.extra_tmp_files,
            extra_doc_files: raw.extra_doc_files,
        };

        metadata.validate().map_err(|err| ResolveError::InvalidMetadata {
            path: path.to_path_buf(),
            source: err,
        })?;

        Ok(metadata)
    }

    /// Structural validation beyond what the schema enforces. Flag
    /// references resolve here, at construction time, never during
    /// flattening.
    fn validate(&self) -> Result<()> {
        let mut declared = BTreeSet::new();
        for flag in &self.flags {
            if !declared.insert(flag.name) {
                return Err(anyhow!("flag `{}` is declared twice", flag.name));
            }
        }

        let mut referenced = BTreeSet::new();
        if let Some(library) = &self.library {
            library.collect_flags(&mut referenced);
        }
        for node in &self.executables {
            node.collect_flags(&mut referenced);
        }
        for node in &self.test_suites {
            node.collect_flags(&mut referenced);
        }
        for node in &self.benchmarks {
            node.collect_flags(&mut referenced);
        }
        if let Some(unknown) = referenced.difference(&declared).next() {
            return Err(anyhow!(
                "condition references undeclared flag `{}`",
                unknown
            ));
        }

        for node in &self.executables {
            if node.value.name.is_empty() {
                return Err(anyhow!("executable is missing a name"));
            }
        }
        for node in &self.test_suites {
            if node.value.name.is_empty() {
                return Err(anyhow!("test suite is missing a name"));
            }
        }
        for node in &self.benchmarks {
            if node.value.name.is_empty() {
                return Err(anyhow!("benchmark is missing a name"));
            }
        }

        Ok(())
    }

    /// Compute the effective flag assignment: declared defaults overridden
    /// by the configuration's explicit values.
    pub fn effective_flags(&self, config: &PackageConfig) -> FlagAssignment {
        let mut assignment = FlagAssignment::new();
        for flag in &self.flags {
            assignment.set(flag.name, flag.default);
        }
        for (&name, &value) in &config.flags {
            if assignment.get(name).is_none() {
                tracing::warn!(
                    "flag `{}` is not declared by package `{}`",
                    name,
                    self.name
                );
            }
            assignment.set(name, value);
        }
        assignment
    }
}

/// Configuration options recognized for one resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageConfig {
    /// Mark test suites as build-enabled
    #[serde(default)]
    pub enable_tests: bool,

    /// Mark benchmarks as build-enabled
    #[serde(default)]
    pub enable_benchmarks: bool,

    /// Explicit flag values; these win over declared defaults
    #[serde(default)]
    pub flags: BTreeMap<Symbol, bool>,
}

/// Find the metadata file in `start` or the nearest ancestor directory.
pub fn find_metadata(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let candidate = dir.join(METADATA_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}
