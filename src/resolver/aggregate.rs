//! Dependency aggregation across build targets.

use std::collections::BTreeMap;

use semver::VersionReq;

use crate::core::dependency::ToolDependency;
use crate::core::target::BuildInfo;
use crate::resolver::errors::ResolveError;
use crate::util::Symbol;

/// The combined dependency view of every target in a package.
#[derive(Debug, Clone, Default)]
pub struct AggregatedDependencies {
    /// Dependency name to version range, self-reference removed
    pub dependencies: BTreeMap<Symbol, VersionReq>,

    /// Tool dependencies concatenated across targets, duplicates kept
    pub tools: Vec<ToolDependency>,
}

/// Fold the flattened targets' dependency lists into one mapping.
///
/// Targets are processed in the order given; when the same name is declared
/// with different ranges, the later declaration overwrites the earlier one.
/// Ranges are never intersected. A declared dependency on the package
/// itself is removed from the aggregate. An empty map after self-removal is
/// an error, even for packages that legitimately declare nothing.
pub fn aggregate<'a, I>(package: Symbol, targets: I) -> Result<AggregatedDependencies, ResolveError>
where
    I: IntoIterator<Item = &'a BuildInfo>,
{
    let mut dependencies = BTreeMap::new();
    let mut tools = Vec::new();

    for info in targets {
        for dep in &info.dependencies {
            dependencies.insert(dep.name, dep.version.clone());
        }
        tools.extend(info.tools.iter().cloned());
    }

    if dependencies.remove(&package).is_some() {
        tracing::debug!("removed self-dependency on `{}` from aggregate", package);
    }

    if dependencies.is_empty() {
        return Err(ResolveError::NoDependencies { package });
    }

    Ok(AggregatedDependencies {
        dependencies,
        tools,
    })
}
