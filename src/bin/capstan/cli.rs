//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Capstan - a build-configuration resolver for conditional package metadata
#[derive(Parser)]
#[command(name = "capstan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the effective build configuration
    Resolve(ResolveArgs),

    /// List the files the package depends on
    Files(FilesArgs),
}

/// Arguments describing the package and resolution environment.
#[derive(Args)]
pub struct EnvArgs {
    /// Path to the metadata file (defaults to Capstan.toml in the current
    /// directory or an ancestor)
    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// Target operating system (defaults to the host)
    #[arg(long)]
    pub os: Option<String>,

    /// Target architecture (defaults to the host)
    #[arg(long)]
    pub arch: Option<String>,

    /// Compiler implementation name
    #[arg(long, default_value = "ghc")]
    pub compiler: String,

    /// Compiler version
    #[arg(long, default_value = "9.4.8")]
    pub compiler_version: String,

    /// Flag overrides: `--flag dev` enables, `--flag dev=false` disables
    #[arg(long = "flag", value_name = "NAME[=BOOL]")]
    pub flags: Vec<String>,

    /// Mark test suites as build-enabled
    #[arg(long)]
    pub enable_tests: bool,

    /// Mark benchmarks as build-enabled
    #[arg(long)]
    pub enable_benchmarks: bool,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub env: EnvArgs,

    /// Emit the descriptor as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct FilesArgs {
    #[command(flatten)]
    pub env: EnvArgs,
}
