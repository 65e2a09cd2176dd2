//! Resolution error types and diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;
use crate::util::Symbol;

/// Error during package resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The aggregated, self-filtered dependency map came out empty. Raised
    /// even for packages that genuinely declare nothing.
    #[error("package `{package}` resolved with no dependencies")]
    NoDependencies { package: Symbol },

    /// The metadata could not be deserialized or failed structural
    /// validation; carried through unchanged from the parse step.
    #[error("invalid metadata in {}", path.display())]
    InvalidMetadata {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// A declared file pattern is not a valid glob.
    #[error("invalid glob pattern `{pattern}`")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Expanding a glob failed while reading the filesystem. Fatal; the
    /// resolution is abandoned, never retried.
    #[error("failed to expand glob `{pattern}`")]
    GlobExpansion {
        pattern: String,
        #[source]
        source: glob::GlobError,
    },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::NoDependencies { package } => {
                Diagnostic::error(format!(
                    "package `{}` resolved with no dependencies",
                    package
                ))
                .with_context(
                    "every target was flattened and the aggregate map is empty \
                     after removing the package's own name",
                )
                .with_suggestion("declare at least one dependency in Capstan.toml")
            }

            ResolveError::InvalidMetadata { path, source } => {
                Diagnostic::error("invalid package metadata")
                    .with_location(path.clone())
                    .with_context(format!("{:#}", source))
                    .with_suggestion("check the metadata file against the Capstan.toml schema")
            }

            ResolveError::InvalidGlob { pattern, source } => {
                Diagnostic::error(format!("invalid glob pattern `{}`", pattern))
                    .with_context(source.to_string())
                    .with_suggestion("use `*`, `?`, and `[...]` glob syntax in file patterns")
            }

            ResolveError::GlobExpansion { pattern, source } => {
                Diagnostic::error(format!("failed to expand glob `{}`", pattern))
                    .with_context(source.to_string())
                    .with_suggestion("check directory permissions under the package root")
            }
        }
    }
}
