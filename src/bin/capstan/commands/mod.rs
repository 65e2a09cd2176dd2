//! CLI command implementations.

pub mod files;
pub mod resolve;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use capstan::core::environment::{Compiler, Environment};
use capstan::core::metadata::{find_metadata, Metadata, PackageConfig, METADATA_NAME};
use capstan::resolver::assemble;
use capstan::util::diagnostic;
use capstan::{PackageDescriptor, Symbol};

use crate::cli::EnvArgs;

/// Everything a command needs to run one resolution.
pub struct Prepared {
    pub metadata: Metadata,
    pub root: PathBuf,
    pub metadata_path: PathBuf,
    pub env: Environment,
    pub config: PackageConfig,
}

/// Locate and load the metadata, then build the environment and
/// configuration from the shared arguments.
pub fn prepare(args: &EnvArgs) -> Result<Prepared> {
    let metadata_path = match &args.manifest_path {
        Some(path) => path.clone(),
        None => {
            let cwd = std::env::current_dir()?;
            find_metadata(&cwd).with_context(|| {
                format!(
                    "could not find {} in {} or any parent directory",
                    METADATA_NAME,
                    cwd.display()
                )
            })?
        }
    };

    let metadata_path = metadata_path
        .canonicalize()
        .with_context(|| format!("metadata file not found: {}", metadata_path.display()))?;
    let root = metadata_path
        .parent()
        .context("metadata file has no parent directory")?
        .to_path_buf();

    let metadata = Metadata::load(&metadata_path)?;

    let compiler_version = args.compiler_version.parse().with_context(|| {
        format!("invalid compiler version `{}`", args.compiler_version)
    })?;
    let mut env = Environment::host(Compiler::new(args.compiler.as_str(), compiler_version));
    if let Some(os) = &args.os {
        env = env.with_os(os.as_str());
    }
    if let Some(arch) = &args.arch {
        env = env.with_arch(arch.as_str());
    }

    let mut flags = BTreeMap::new();
    for spec in &args.flags {
        let (name, value) = parse_flag_spec(spec)?;
        flags.insert(name, value);
    }

    let config = PackageConfig {
        enable_tests: args.enable_tests,
        enable_benchmarks: args.enable_benchmarks,
        flags,
    };

    Ok(Prepared {
        metadata,
        root,
        metadata_path,
        env,
        config,
    })
}

/// Parse a `--flag` value: `name`, `name=true`, or `name=false`.
pub fn parse_flag_spec(spec: &str) -> Result<(Symbol, bool)> {
    match spec.split_once('=') {
        None => Ok((Symbol::intern(spec), true)),
        Some((name, "true")) => Ok((Symbol::intern(name), true)),
        Some((name, "false")) => Ok((Symbol::intern(name), false)),
        Some((_, other)) => bail!("invalid flag value `{}` (expected `true` or `false`)", other),
    }
}

/// Run the resolution, printing a diagnostic and exiting on failure.
pub fn run_resolution(prepared: &Prepared) -> Result<PackageDescriptor> {
    match assemble(
        &prepared.env,
        &prepared.config,
        &prepared.metadata,
        &prepared.root,
        &prepared.metadata_path,
    ) {
        Ok(descriptor) => Ok(descriptor),
        Err(err) => {
            diagnostic::emit(&err.to_diagnostic(), false);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_spec() {
        assert_eq!(
            parse_flag_spec("dev").unwrap(),
            (Symbol::intern("dev"), true)
        );
        assert_eq!(
            parse_flag_spec("dev=true").unwrap(),
            (Symbol::intern("dev"), true)
        );
        assert_eq!(
            parse_flag_spec("dev=false").unwrap(),
            (Symbol::intern("dev"), false)
        );
        assert!(parse_flag_spec("dev=maybe").is_err());
    }
}
