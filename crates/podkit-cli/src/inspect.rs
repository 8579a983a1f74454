//! # Inspect Subcommand
//!
//! One-screen summary of a validated POD or value document.

use std::path::PathBuf;

use clap::Args;

use crate::validate::Kind;

/// Arguments for the inspect subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Document kind to inspect as.
    #[arg(long, value_enum, default_value = "value")]
    pub kind: Kind,

    /// The JSON document to inspect.
    pub file: PathBuf,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let instance = crate::load_json(&args.file)?;
    match args.kind {
        Kind::Value => {
            let value = podkit_schema::validate_value(&instance)?;
            println!("kind:  {}", value.kind());
            println!("hash:  {}", value.hash()?);
        }
        Kind::Signed => {
            let pod = podkit_schema::validate_signed_pod(&instance)?;
            println!("id:       {}", pod.id);
            println!("podType:  {} ({})", pod.pod_type.1, pod.pod_type.0);
            println!("entries:  {}", pod.entries.len());
            for (key, value) in pod.entries.kvs() {
                println!("  {key} = {value}");
            }
        }
        Kind::Main => {
            let pod = podkit_schema::validate_main_pod(&instance)?;
            println!("id:         {}", pod.id);
            println!("podType:    {} ({})", pod.pod_type.1, pod.pod_type.0);
            println!("vdSet root: {}", pod.vd_set.root());
            println!("statements: {}", pod.public_statements.len());
            for st in &pod.public_statements {
                println!("  {st}");
            }
        }
        Kind::Batch => {
            let batch = podkit_schema::validate_custom_predicate_batch(&instance)?;
            println!("batch: {}", batch.name);
            println!("id:    {}", batch.id()?);
            for p in &batch.predicates {
                let shape = if p.conjunction { "and" } else { "or" };
                println!(
                    "  {} ({} args, {} templates, {shape})",
                    p.name,
                    p.args_len,
                    p.statements.len()
                );
            }
        }
    }
    Ok(())
}
