//! The resolution environment.
//!
//! An Environment fixes the target OS, CPU architecture, compiler, and
//! enabled flag set for the duration of one resolution. It is immutable;
//! variations are produced by the builder-style `with_*` methods.

use std::collections::{BTreeMap, BTreeSet};

use semver::Version;
use serde::Serialize;

use crate::util::Symbol;

/// The compiler identity: implementation name plus concrete version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiler {
    /// Implementation name, e.g. `ghc`
    pub name: Symbol,

    /// Concrete version of the installed compiler
    pub version: Version,
}

impl Compiler {
    /// Create a compiler identity.
    pub fn new(name: impl Into<Symbol>, version: Version) -> Self {
        Compiler {
            name: name.into(),
            version,
        }
    }
}

impl std::fmt::Display for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// The fixed environment a conditional tree is evaluated against.
#[derive(Debug, Clone)]
pub struct Environment {
    os: Symbol,
    arch: Symbol,
    compiler: Compiler,
    flags: BTreeSet<Symbol>,
}

impl Environment {
    /// Create an environment with an empty flag set.
    pub fn new(os: impl Into<Symbol>, arch: impl Into<Symbol>, compiler: Compiler) -> Self {
        Environment {
            os: os.into(),
            arch: arch.into(),
            compiler,
            flags: BTreeSet::new(),
        }
    }

    /// Create an environment for the host platform.
    pub fn host(compiler: Compiler) -> Self {
        Environment::new(std::env::consts::OS, std::env::consts::ARCH, compiler)
    }

    /// Replace the target OS.
    pub fn with_os(mut self, os: impl Into<Symbol>) -> Self {
        self.os = os.into();
        self
    }

    /// Replace the target architecture.
    pub fn with_arch(mut self, arch: impl Into<Symbol>) -> Self {
        self.arch = arch.into();
        self
    }

    /// Replace the enabled flag set.
    pub fn with_flags(mut self, flags: BTreeSet<Symbol>) -> Self {
        self.flags = flags;
        self
    }

    /// Get the target OS.
    pub fn os(&self) -> Symbol {
        self.os
    }

    /// Get the target architecture.
    pub fn arch(&self) -> Symbol {
        self.arch
    }

    /// Get the compiler identity.
    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Check whether a flag is in the enabled set.
    pub fn has_flag(&self, name: Symbol) -> bool {
        self.flags.contains(&name)
    }
}

/// The flag assignment a resolution ran with: every declared flag mapped to
/// its effective value (defaults overridden by explicit configuration).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlagAssignment(BTreeMap<Symbol, bool>);

impl FlagAssignment {
    /// Create an empty assignment.
    pub fn new() -> Self {
        FlagAssignment(BTreeMap::new())
    }

    /// Set a flag's value, overwriting any previous value.
    pub fn set(&mut self, name: impl Into<Symbol>, value: bool) {
        self.0.insert(name.into(), value);
    }

    /// Look up a flag's value.
    pub fn get(&self, name: Symbol) -> Option<bool> {
        self.0.get(&name).copied()
    }

    /// The set of flags assigned `true`.
    pub fn enabled(&self) -> BTreeSet<Symbol> {
        self.0
            .iter()
            .filter(|(_, &on)| on)
            .map(|(&name, _)| name)
            .collect()
    }

    /// Iterate over (flag, value) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, bool)> + '_ {
        self.0.iter().map(|(&name, &on)| (name, on))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
