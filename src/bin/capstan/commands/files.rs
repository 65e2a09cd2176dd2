//! `capstan files` command

use anyhow::Result;

use crate::cli::FilesArgs;
use crate::commands::{prepare, run_resolution};

pub fn execute(args: FilesArgs) -> Result<()> {
    let prepared = prepare(&args.env)?;
    let descriptor = run_resolution(&prepared)?;

    for path in descriptor.files() {
        println!("{}", path.display());
    }

    Ok(())
}
