//! # Hash Subcommand
//!
//! Content hash of a value document.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

/// Arguments for the hash subcommand.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// The JSON value document to hash.
    pub file: PathBuf,
}

pub fn run(args: HashArgs) -> anyhow::Result<()> {
    let instance = crate::load_json(&args.file)?;
    let value = podkit_schema::validate_value(&instance)?;
    let hash = value.hash().context("value cannot be canonicalized")?;
    println!("{hash}");
    Ok(())
}
