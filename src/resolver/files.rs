//! File discovery - mapping declared sources onto the filesystem.
//!
//! Two procedures: an ordered probe that locates module sources under
//! candidate directories, and a glob expansion for resource-file patterns.
//! Output order follows input order and is never sorted.

use std::path::{Path, PathBuf};

use crate::core::module::ModuleName;
use crate::resolver::errors::ResolveError;

/// Characters that mark a pattern as a glob.
const GLOB_METACHARS: &[char] = &['*', '?', '['];

/// One searchable source declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEntry {
    /// A dotted module name; the probe supplies directory and extension
    Module(ModuleName),

    /// An extension-complete relative path, matched verbatim
    Literal(PathBuf),
}

/// Locate source files for the given entries.
///
/// For each entry, directories are probed in the given order and, for
/// module names, extensions in the given order; the first candidate that
/// exists as a regular file ends the search for that entry. Literal entries
/// accept the first candidate without an existence check, so they resolve
/// against the first directory. A module with no existing candidate is
/// dropped from the result, not reported.
pub fn resolve_modules(
    dirs: &[PathBuf],
    entries: &[SourceEntry],
    extensions: &[&str],
) -> Vec<PathBuf> {
    let mut found = Vec::new();

    'entries: for entry in entries {
        for dir in dirs {
            match entry {
                SourceEntry::Module(name) => {
                    let stem = dir.join(name.to_path());
                    for ext in extensions {
                        let candidate = stem.with_extension(ext);
                        if candidate.is_file() {
                            found.push(candidate);
                            continue 'entries;
                        }
                    }
                }
                SourceEntry::Literal(path) => {
                    found.push(dir.join(path));
                    continue 'entries;
                }
            }
        }

        if let SourceEntry::Module(name) = entry {
            tracing::debug!("module `{}` not found under any source directory", name);
        }
    }

    found
}

/// Expand resource-file patterns against a root directory.
///
/// A pattern containing a glob metacharacter expands to every matching
/// file under `root`. A pattern without one yields exactly one candidate,
/// `root/pattern`, with no existence check. Pattern and expansion failures
/// are fatal.
pub fn resolve_globs(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, ResolveError> {
    let mut found = Vec::new();

    for pattern in patterns {
        if !pattern.contains(GLOB_METACHARS) {
            found.push(root.join(pattern));
            continue;
        }

        let full = root.join(pattern);
        let matches = glob::glob(&full.to_string_lossy()).map_err(|source| {
            ResolveError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            }
        })?;

        let before = found.len();
        for entry in matches {
            let path = entry.map_err(|source| ResolveError::GlobExpansion {
                pattern: pattern.clone(),
                source,
            })?;
            if path.is_file() {
                found.push(path);
            }
        }
        tracing::debug!(
            "glob `{}` matched {} file(s)",
            pattern,
            found.len() - before
        );
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn module(name: &str) -> SourceEntry {
        SourceEntry::Module(ModuleName::new(name).unwrap())
    }

    #[test]
    fn test_directory_order_dominates_extension_order() {
        let tmp = TempDir::new().unwrap();
        let d1 = tmp.path().join("d1");
        let d2 = tmp.path().join("d2");
        touch(&d1.join("Name.y"));
        touch(&d2.join("Name.x"));

        let found = resolve_modules(
            &[d1.clone(), d2],
            &[module("Name")],
            &["x", "y"],
        );

        assert_eq!(found, vec![d1.join("Name.y")]);
    }

    #[test]
    fn test_extension_order_within_one_directory() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        touch(&src.join("Name.x"));
        touch(&src.join("Name.y"));

        let found = resolve_modules(&[src.clone()], &[module("Name")], &["y", "x"]);
        assert_eq!(found, vec![src.join("Name.y")]);
    }

    #[test]
    fn test_dotted_module_maps_to_nested_path() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        touch(&src.join("Data/Demo/Internal.hs"));

        let found = resolve_modules(&[src.clone()], &[module("Data.Demo.Internal")], &["hs"]);
        assert_eq!(found, vec![src.join("Data/Demo/Internal.hs")]);
    }

    #[test]
    fn test_missing_module_is_silently_dropped() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        touch(&src.join("Present.hs"));

        let found = resolve_modules(
            &[src.clone()],
            &[module("Missing"), module("Present")],
            &["hs"],
        );

        assert_eq!(found, vec![src.join("Present.hs")]);
    }

    #[test]
    fn test_literal_entry_skips_existence_check() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();

        let found = resolve_modules(
            &[src.clone(), tmp.path().to_path_buf()],
            &[SourceEntry::Literal(PathBuf::from("cbits/fast.c"))],
            &["hs"],
        );

        // One candidate, anchored at the first directory, never checked.
        assert_eq!(found, vec![src.join("cbits/fast.c")]);
    }

    #[test]
    fn test_output_follows_input_order() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        touch(&src.join("B.hs"));
        touch(&src.join("A.hs"));

        let found = resolve_modules(
            &[src.clone()],
            &[module("B"), module("A")],
            &["hs"],
        );

        assert_eq!(found, vec![src.join("B.hs"), src.join("A.hs")]);
    }

    #[test]
    fn test_glob_pattern_expands_to_existing_files() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("data/a.json"));
        touch(&tmp.path().join("data/b.json"));
        touch(&tmp.path().join("data/notes.txt"));

        let found = resolve_globs(tmp.path(), &["data/*.json".to_owned()]).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().unwrap() == "json"));
    }

    #[test]
    fn test_literal_pattern_is_unconditional() {
        let tmp = TempDir::new().unwrap();

        let found = resolve_globs(tmp.path(), &["README.md".to_owned()]).unwrap();
        assert_eq!(found, vec![tmp.path().join("README.md")]);
    }

    #[test]
    fn test_glob_skips_directories() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("extra/keep.txt"));
        fs::create_dir_all(tmp.path().join("extra/subdir")).unwrap();

        let found = resolve_globs(tmp.path(), &["extra/*".to_owned()]).unwrap();
        assert_eq!(found, vec![tmp.path().join("extra/keep.txt")]);
    }

    #[test]
    fn test_recursive_glob() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("docs/guide/intro.md"));
        touch(&tmp.path().join("docs/ref.md"));

        let found = resolve_globs(tmp.path(), &["docs/**/*.md".to_owned()]).unwrap();
        assert_eq!(found.len(), 2);
    }
}
