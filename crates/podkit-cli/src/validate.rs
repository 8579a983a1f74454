//! # Validate Subcommand
//!
//! Schema validation plus structural integrity checks for POD documents.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, ValueEnum};
use podkit_core::Params;
use podkit_schema::SchemaError;

/// What kind of document the file claims to be.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A bare value.
    Value,
    /// A SignedPod wrapper.
    Signed,
    /// A MainPod wrapper.
    Main,
    /// A custom-predicate batch.
    Batch,
}

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document kind to validate as.
    #[arg(long, value_enum, default_value = "value")]
    pub kind: Kind,

    /// Circuit parameters as JSON; defaults apply when omitted.
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// The JSON document to validate.
    pub file: PathBuf,
}

/// Unwrap a schema-boundary result, printing the full violation list on
/// failure.
fn schema_checked<T>(result: Result<T, SchemaError>, file: &Path) -> anyhow::Result<T> {
    match result {
        Ok(t) => Ok(t),
        Err(SchemaError::ValidationFailed { violations, .. }) => {
            eprintln!("{}: {} violation(s)", file.display(), violations.len());
            eprintln!("{violations}");
            bail!("validation failed");
        }
        Err(err) => bail!("{err}"),
    }
}

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let instance = crate::load_json(&args.file)?;
    let params: Params = match &args.params {
        Some(path) => serde_json::from_value(crate::load_json(path)?)
            .with_context(|| format!("{} is not a valid parameter set", path.display()))?,
        None => Params::default(),
    };

    match args.kind {
        Kind::Value => {
            let value = schema_checked(podkit_schema::validate_value(&instance), &args.file)?;
            tracing::debug!(kind = value.kind(), "value decoded");
        }
        Kind::Signed => {
            let pod = schema_checked(podkit_schema::validate_signed_pod(&instance), &args.file)?;
            pod.check_integrity(&params).context("integrity check failed")?;
        }
        Kind::Main => {
            let pod = schema_checked(podkit_schema::validate_main_pod(&instance), &args.file)?;
            pod.check_integrity().context("integrity check failed")?;
        }
        Kind::Batch => {
            let batch = schema_checked(
                podkit_schema::validate_custom_predicate_batch(&instance),
                &args.file,
            )?;
            batch
                .validate(&params)
                .with_context(|| format!("batch '{}' is malformed", batch.name))?;
        }
    }

    println!("{}: OK", args.file.display());
    Ok(())
}
