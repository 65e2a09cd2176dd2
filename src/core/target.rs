//! Build-target variants - what a package can build.
//!
//! A package has at most one library and any number of executables, test
//! suites, and benchmarks. The variant set is closed; each variant embeds a
//! shared [`BuildInfo`] and supplies its own merge semantics for tree
//! flattening.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::condition::Mergeable;
use crate::core::dependency::{Dependency, ToolDependency};
use crate::core::module::ModuleName;
use crate::util::Symbol;

/// Build configuration shared by every target variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildInfo {
    /// Directories searched for module sources, in declaration order
    #[serde(default)]
    pub source_dirs: Vec<PathBuf>,

    /// Modules this target compiles
    #[serde(default)]
    pub modules: Vec<ModuleName>,

    /// C-like source files, listed as extension-complete relative paths
    #[serde(default)]
    pub c_sources: Vec<PathBuf>,

    /// Library dependencies, filled in while the tree is flattened
    #[serde(skip)]
    pub dependencies: Vec<Dependency>,

    /// Build-tool dependencies
    #[serde(default)]
    pub tools: Vec<ToolDependency>,
}

impl BuildInfo {
    /// The merge identity: no directories, modules, sources, or dependencies.
    pub fn empty() -> Self {
        BuildInfo::default()
    }

    /// Concatenating merge; `self`'s fields come first.
    pub fn merge(mut self, other: BuildInfo) -> Self {
        self.source_dirs.extend(other.source_dirs);
        self.modules.extend(other.modules);
        self.c_sources.extend(other.c_sources);
        self.dependencies.extend(other.dependencies);
        self.tools.extend(other.tools);
        self
    }
}

/// The library target. A package has at most one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    #[serde(flatten)]
    pub build: BuildInfo,
}

impl Mergeable for Library {
    fn empty() -> Self {
        Library {
            build: BuildInfo::empty(),
        }
    }

    fn merge(self, other: Self) -> Self {
        Library {
            build: self.build.merge(other.build),
        }
    }

    fn push_dependencies(&mut self, deps: &[Dependency]) {
        self.build.dependencies.extend_from_slice(deps);
    }
}

/// An executable target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Executable {
    /// Executable name
    #[serde(default = "Symbol::empty")]
    pub name: Symbol,

    /// Entry-point source file, extension-complete, relative to a source dir
    #[serde(default)]
    pub main: Option<PathBuf>,

    #[serde(flatten)]
    pub build: BuildInfo,
}

impl Mergeable for Executable {
    fn empty() -> Self {
        Executable {
            name: Symbol::empty(),
            main: None,
            build: BuildInfo::empty(),
        }
    }

    fn merge(self, other: Self) -> Self {
        Executable {
            name: merge_names(self.name, other.name),
            main: self.main.or(other.main),
            build: self.build.merge(other.build),
        }
    }

    fn push_dependencies(&mut self, deps: &[Dependency]) {
        self.build.dependencies.extend_from_slice(deps);
    }
}

/// A test-suite target.
///
/// Test suites are always structurally present; `enabled` only records
/// whether the configuration asked for them to be built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSuite {
    /// Test-suite name
    #[serde(default = "Symbol::empty")]
    pub name: Symbol,

    /// Entry-point source file
    #[serde(default)]
    pub main: Option<PathBuf>,

    /// Build-enabled bit, stamped from the package configuration
    #[serde(skip)]
    pub enabled: bool,

    #[serde(flatten)]
    pub build: BuildInfo,
}

impl Mergeable for TestSuite {
    fn empty() -> Self {
        TestSuite {
            name: Symbol::empty(),
            main: None,
            enabled: false,
            build: BuildInfo::empty(),
        }
    }

    fn merge(self, other: Self) -> Self {
        TestSuite {
            name: merge_names(self.name, other.name),
            main: self.main.or(other.main),
            // `false` is the identity for the enabled bit
            enabled: self.enabled || other.enabled,
            build: self.build.merge(other.build),
        }
    }

    fn push_dependencies(&mut self, deps: &[Dependency]) {
        self.build.dependencies.extend_from_slice(deps);
    }
}

/// A benchmark target. Same shape and semantics as a test suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    /// Benchmark name
    #[serde(default = "Symbol::empty")]
    pub name: Symbol,

    /// Entry-point source file
    #[serde(default)]
    pub main: Option<PathBuf>,

    /// Build-enabled bit, stamped from the package configuration
    #[serde(skip)]
    pub enabled: bool,

    #[serde(flatten)]
    pub build: BuildInfo,
}

impl Mergeable for Benchmark {
    fn empty() -> Self {
        Benchmark {
            name: Symbol::empty(),
            main: None,
            enabled: false,
            build: BuildInfo::empty(),
        }
    }

    fn merge(self, other: Self) -> Self {
        Benchmark {
            name: merge_names(self.name, other.name),
            main: self.main.or(other.main),
            enabled: self.enabled || other.enabled,
            build: self.build.merge(other.build),
        }
    }

    fn push_dependencies(&mut self, deps: &[Dependency]) {
        self.build.dependencies.extend_from_slice(deps);
    }
}

/// First non-empty name wins; branch subtrees carry empty names.
fn merge_names(first: Symbol, second: Symbol) -> Symbol {
    if first.is_empty() {
        second
    } else {
        first
    }
}
