//! Core data structures for Capstan.
//!
//! This module contains the foundational types used throughout Capstan:
//! - The resolution environment (OS, arch, compiler, flags)
//! - Condition expressions and conditional trees
//! - Build-target variants and their merge semantics
//! - Package metadata and the final package descriptor

pub mod condition;
pub mod dependency;
pub mod descriptor;
pub mod environment;
pub mod metadata;
pub mod module;
pub mod target;

pub use condition::{flatten, ConditionExpr, ConditionNode, Mergeable};
pub use dependency::{Dependency, ToolDependency};
pub use descriptor::PackageDescriptor;
pub use environment::{Compiler, Environment, FlagAssignment};
pub use metadata::{find_metadata, Metadata, PackageConfig, METADATA_NAME};
pub use module::ModuleName;
pub use target::{Benchmark, BuildInfo, Executable, Library, TestSuite};
