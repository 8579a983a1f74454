//! # podkit-cli — POD Command-Line Interface
//!
//! Thin handlers over the library crates, for working with POD wire
//! documents from the shell.
//!
//! ## Subcommands
//!
//! - `validate` — Run a JSON document through the schema trust boundary
//!   and the structural integrity checks
//! - `hash` — Content hash of a value document
//! - `inspect` — Summarize a validated POD or value
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to domain crates — no POD semantics here.

pub mod hash;
pub mod inspect;
pub mod validate;

use std::path::Path;

use anyhow::Context;

/// Read and parse a JSON document from disk.
pub(crate) fn load_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not JSON", path.display()))
}
