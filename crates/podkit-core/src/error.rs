//! Shared error types for the podkit core primitives.
//!
//! All errors use `thiserror` and are returned as typed results — nothing
//! in the data-model layer panics across the crate boundary. Callers decide
//! user-visible messaging.

use thiserror::Error;

/// Error during canonical (JCS) serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values have non-deterministic canonical encodings across
    /// language bindings; integers travel as i64 or decimal strings.
    #[error("float values are not permitted in canonical encodings: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error decoding a hex-encoded 32-byte quantity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    /// The string was not exactly 64 hex characters.
    #[error("expected 64 hex chars, got {0}")]
    BadLength(usize),

    /// A character outside `[0-9a-fA-F]` was found.
    #[error("invalid hex character at offset {0}")]
    BadCharacter(usize),
}
