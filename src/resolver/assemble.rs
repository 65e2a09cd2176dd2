//! Package assembly - one resolution from metadata to descriptor.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::core::condition::flatten;
use crate::core::descriptor::PackageDescriptor;
use crate::core::environment::Environment;
use crate::core::metadata::{Metadata, PackageConfig};
use crate::core::target::{BuildInfo, Executable};
use crate::resolver::aggregate::aggregate;
use crate::resolver::errors::ResolveError;
use crate::resolver::files::{resolve_globs, resolve_modules, SourceEntry};
use crate::util::fs::absolutize;

/// Extensions probed for module sources, in priority order.
pub const SOURCE_EXTENSIONS: &[&str] = &["hs", "lhs"];

/// Resolve one package against one environment.
///
/// Flattens every target's conditional tree under the effective flag set,
/// aggregates dependencies, discovers source and resource files, and
/// returns a fresh immutable descriptor. On failure nothing partial is
/// returned and nothing is retried.
pub fn assemble(
    env: &Environment,
    config: &PackageConfig,
    metadata: &Metadata,
    root: &Path,
    metadata_path: &Path,
) -> Result<PackageDescriptor, ResolveError> {
    let flags = metadata.effective_flags(config);
    let env = env.clone().with_flags(flags.enabled());

    tracing::debug!(
        "resolving `{}` for {}/{} with {}",
        metadata.name,
        env.os(),
        env.arch(),
        env.compiler()
    );

    let library = metadata.library.as_ref().map(|node| flatten(node, &env));
    let executables: Vec<Executable> = metadata
        .executables
        .iter()
        .map(|node| flatten(node, &env))
        .collect();

    let mut test_suites: Vec<_> = metadata
        .test_suites
        .iter()
        .map(|node| flatten(node, &env))
        .collect();
    for suite in &mut test_suites {
        suite.enabled = config.enable_tests;
    }

    let mut benchmarks: Vec<_> = metadata
        .benchmarks
        .iter()
        .map(|node| flatten(node, &env))
        .collect();
    for bench in &mut benchmarks {
        bench.enabled = config.enable_benchmarks;
    }

    // Aggregation covers every flattened target, build-enabled or not.
    let infos = library
        .iter()
        .map(|lib| &lib.build)
        .chain(executables.iter().map(|exe| &exe.build))
        .chain(test_suites.iter().map(|suite| &suite.build))
        .chain(benchmarks.iter().map(|bench| &bench.build));
    let aggregated = aggregate(metadata.name, infos)?;

    let mut files = BTreeSet::new();
    files.insert(absolutize(root, metadata_path));

    if let Some(library) = &library {
        files.extend(discover_sources(root, &library.build, None));
    }
    for exe in &executables {
        files.extend(discover_sources(root, &exe.build, exe.main.as_deref()));
    }

    for patterns in [
        &metadata.data_files,
        &metadata.extra_source_files,
        &metadata.extra_tmp_files,
        &metadata.extra_doc_files,
    ] {
        files.extend(resolve_globs(root, patterns)?);
    }

    tracing::debug!(
        "`{}`: {} dependencies, {} files",
        metadata.name,
        aggregated.dependencies.len(),
        files.len()
    );

    Ok(PackageDescriptor::new(
        metadata.name,
        metadata.version.clone(),
        root.to_path_buf(),
        files,
        aggregated.dependencies,
        aggregated.tools,
        flags,
    ))
}

/// Probe one target's declared sources: every module, the entry point if
/// present, and C-like sources verbatim, searched under the target's
/// source directories followed by the package root.
fn discover_sources(root: &Path, build: &BuildInfo, main: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = build
        .source_dirs
        .iter()
        .map(|dir| absolutize(root, dir))
        .collect();
    dirs.push(root.to_path_buf());

    let mut entries = Vec::new();
    if let Some(main) = main {
        entries.push(SourceEntry::Literal(main.to_path_buf()));
    }
    entries.extend(build.modules.iter().map(|name| SourceEntry::Module(*name)));
    entries.extend(
        build
            .c_sources
            .iter()
            .map(|path| SourceEntry::Literal(path.clone())),
    );

    resolve_modules(&dirs, &entries, SOURCE_EXTENSIONS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use semver::Version;
    use tempfile::TempDir;

    use crate::core::environment::Compiler;
    use crate::core::metadata::METADATA_NAME;
    use crate::util::Symbol;

    fn env() -> Environment {
        Environment::new("linux", "x86_64", Compiler::new("ghc", Version::new(9, 4, 8)))
    }

    fn write_package(root: &Path, metadata: &str, files: &[&str]) -> PathBuf {
        let metadata_path = root.join(METADATA_NAME);
        fs::write(&metadata_path, metadata).unwrap();
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
        }
        metadata_path
    }

    fn resolve(
        root: &Path,
        metadata_path: &Path,
        config: &PackageConfig,
    ) -> Result<PackageDescriptor, ResolveError> {
        let metadata = Metadata::parse(&fs::read_to_string(metadata_path).unwrap(), metadata_path)?;
        assemble(&env(), config, &metadata, root, metadata_path)
    }

    const BASIC: &str = r#"
[package]
name = "demo"
version = "1.0.0"

[library]
source-dirs = ["src"]
modules = ["Foo.Bar"]
dependencies = ["base >=4.9"]
"#;

    #[test]
    fn test_module_and_metadata_in_file_set() {
        let tmp = TempDir::new().unwrap();
        let metadata_path = write_package(tmp.path(), BASIC, &["src/Foo/Bar.hs"]);

        let descriptor = resolve(tmp.path(), &metadata_path, &PackageConfig::default()).unwrap();

        assert!(descriptor.files().contains(&tmp.path().join("src/Foo/Bar.hs")));
        assert!(descriptor.files().contains(&metadata_path));
        assert!(descriptor.dependencies().contains_key("base"));
    }

    #[test]
    fn test_missing_module_dropped_but_resolution_succeeds() {
        let tmp = TempDir::new().unwrap();
        let metadata_path = write_package(tmp.path(), BASIC, &[]);

        let descriptor = resolve(tmp.path(), &metadata_path, &PackageConfig::default()).unwrap();

        // Only the metadata file remains.
        assert_eq!(descriptor.files().len(), 1);
    }

    #[test]
    fn test_zero_dependencies_fails() {
        let tmp = TempDir::new().unwrap();
        let metadata = r#"
[package]
name = "standalone"
version = "1.0.0"

[library]
source-dirs = ["src"]
modules = []
"#;
        let metadata_path = write_package(tmp.path(), metadata, &[]);

        let err = resolve(tmp.path(), &metadata_path, &PackageConfig::default()).unwrap_err();
        assert!(matches!(err, ResolveError::NoDependencies { .. }));
    }

    #[test]
    fn test_self_dependency_only_fails() {
        let tmp = TempDir::new().unwrap();
        let metadata = r#"
[package]
name = "selfish"
version = "1.0.0"

[library]
dependencies = ["selfish"]
"#;
        let metadata_path = write_package(tmp.path(), metadata, &[]);

        let err = resolve(tmp.path(), &metadata_path, &PackageConfig::default()).unwrap_err();
        assert!(matches!(err, ResolveError::NoDependencies { .. }));
    }

    #[test]
    fn test_gated_test_suite_deps_excluded_when_flag_off() {
        let tmp = TempDir::new().unwrap();
        let metadata = r#"
[package]
name = "demo"
version = "1.0.0"

[[flags]]
name = "dev"
default = false

[library]
dependencies = ["base"]

[[test-suite]]
name = "spec"
main = "Spec.hs"

[[test-suite.branches]]
condition = { flag = "dev" }
[test-suite.branches.then]
dependencies = ["hspec"]
"#;
        let metadata_path = write_package(tmp.path(), metadata, &[]);

        let descriptor = resolve(tmp.path(), &metadata_path, &PackageConfig::default()).unwrap();
        assert!(!descriptor.dependencies().contains_key("hspec"));

        let config = PackageConfig {
            flags: [(Symbol::intern("dev"), true)].into_iter().collect(),
            ..PackageConfig::default()
        };
        let descriptor = resolve(tmp.path(), &metadata_path, &config).unwrap();
        assert!(descriptor.dependencies().contains_key("hspec"));
    }

    #[test]
    fn test_disabled_test_suite_still_contributes_dependencies() {
        let tmp = TempDir::new().unwrap();
        let metadata = r#"
[package]
name = "demo"
version = "1.0.0"

[library]
dependencies = ["base"]

[[test-suite]]
name = "spec"
dependencies = ["hspec"]
"#;
        let metadata_path = write_package(tmp.path(), metadata, &[]);

        // enable_tests stays false; the suite's deps aggregate anyway.
        let descriptor = resolve(tmp.path(), &metadata_path, &PackageConfig::default()).unwrap();
        assert!(descriptor.dependencies().contains_key("hspec"));
    }

    #[test]
    fn test_os_branch_selects_dependencies() {
        let tmp = TempDir::new().unwrap();
        let metadata = r#"
[package]
name = "demo"
version = "1.0.0"

[library]
dependencies = ["base"]

[[library.branches]]
condition = { os = "windows" }
[library.branches.then]
dependencies = ["Win32"]
[library.branches.else]
dependencies = ["unix"]
"#;
        let metadata_path = write_package(tmp.path(), metadata, &[]);

        let descriptor = resolve(tmp.path(), &metadata_path, &PackageConfig::default()).unwrap();
        assert!(descriptor.dependencies().contains_key("unix"));
        assert!(!descriptor.dependencies().contains_key("Win32"));
    }

    #[test]
    fn test_executable_main_and_c_sources_resolved() {
        let tmp = TempDir::new().unwrap();
        let metadata = r#"
[package]
name = "demo"
version = "1.0.0"

[[executable]]
name = "demo-cli"
source-dirs = ["app"]
main = "Main.hs"
c-sources = ["cbits/fast.c"]
dependencies = ["base"]
"#;
        let metadata_path = write_package(tmp.path(), metadata, &["app/Main.hs"]);

        let descriptor = resolve(tmp.path(), &metadata_path, &PackageConfig::default()).unwrap();

        assert!(descriptor.files().contains(&tmp.path().join("app/Main.hs")));
        // Literal entries resolve against the first directory, unchecked.
        assert!(descriptor
            .files()
            .contains(&tmp.path().join("app/cbits/fast.c")));
    }

    #[test]
    fn test_data_file_globs_and_literals() {
        let tmp = TempDir::new().unwrap();
        let metadata = r#"
data-files = ["data/*.json"]
extra-doc-files = ["CHANGELOG.md"]

[package]
name = "demo"
version = "1.0.0"

[library]
dependencies = ["base"]
"#;
        let metadata_path =
            write_package(tmp.path(), metadata, &["data/a.json", "data/b.json"]);

        let descriptor = resolve(tmp.path(), &metadata_path, &PackageConfig::default()).unwrap();

        assert!(descriptor.files().contains(&tmp.path().join("data/a.json")));
        assert!(descriptor.files().contains(&tmp.path().join("data/b.json")));
        // Non-glob patterns appear without an existence check.
        assert!(descriptor.files().contains(&tmp.path().join("CHANGELOG.md")));
    }

    #[test]
    fn test_flag_assignment_recorded() {
        let tmp = TempDir::new().unwrap();
        let metadata = r#"
[package]
name = "demo"
version = "1.0.0"

[[flags]]
name = "dev"
default = true

[library]
dependencies = ["base"]
"#;
        let metadata_path = write_package(tmp.path(), metadata, &[]);

        let config = PackageConfig {
            flags: [(Symbol::intern("dev"), false)].into_iter().collect(),
            ..PackageConfig::default()
        };
        let descriptor = resolve(tmp.path(), &metadata_path, &config).unwrap();

        assert_eq!(descriptor.flags().get(Symbol::intern("dev")), Some(false));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let tmp = TempDir::new().unwrap();
        let metadata_path = write_package(tmp.path(), BASIC, &["src/Foo/Bar.hs"]);

        let first = resolve(tmp.path(), &metadata_path, &PackageConfig::default()).unwrap();
        let second = resolve(tmp.path(), &metadata_path, &PackageConfig::default()).unwrap();

        assert_eq!(first.files(), second.files());
        assert_eq!(first.dependencies(), second.dependencies());
    }
}
