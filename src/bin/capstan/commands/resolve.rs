//! `capstan resolve` command

use anyhow::Result;
use semver::VersionReq;

use crate::cli::ResolveArgs;
use crate::commands::{prepare, run_resolution};

pub fn execute(args: ResolveArgs) -> Result<()> {
    let prepared = prepare(&args.env)?;
    let descriptor = run_resolution(&prepared)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(());
    }

    println!("{}", descriptor);
    println!("  root: {}", descriptor.root().display());

    if !descriptor.flags().is_empty() {
        let flags: Vec<String> = descriptor
            .flags()
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        println!("  flags: {}", flags.join(" "));
    }

    println!("  dependencies:");
    for (name, range) in descriptor.dependencies() {
        if *range == VersionReq::STAR {
            println!("    {}", name);
        } else {
            println!("    {} {}", name, range);
        }
    }

    if !descriptor.tools().is_empty() {
        println!("  tools:");
        for tool in descriptor.tools() {
            println!("    {}", tool);
        }
    }

    println!("  files: {}", descriptor.files().len());

    Ok(())
}
