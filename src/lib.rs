//! Capstan - a build-configuration resolver for conditional package metadata.
//!
//! Capstan flattens a conditional metadata tree (clauses gated by build
//! flags, target OS, CPU architecture, and compiler identity/version) into
//! concrete build targets for a fixed environment, then maps the result
//! onto the files on disk the package depends on.

pub mod core;
pub mod resolver;
pub mod util;

pub use core::{
    condition::{flatten, ConditionExpr, ConditionNode},
    dependency::{Dependency, ToolDependency},
    descriptor::PackageDescriptor,
    environment::{Compiler, Environment, FlagAssignment},
    metadata::{Metadata, PackageConfig},
    module::ModuleName,
};

pub use resolver::{assemble, ResolveError};
pub use util::Symbol;
