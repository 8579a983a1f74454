//! Seams to the cryptographic backends.
//!
//! Signing, proving, and verification live outside this crate; the pods
//! carry their payloads opaquely. These traits are the contract a
//! backend implements to plug in.

use podkit_core::Params;
use podkit_value::Dictionary;
use thiserror::Error;

use crate::error::PodError;
use crate::main_pod::MainPod;
use crate::signed::SignedPod;
use crate::statement::Statement;
use crate::vdset::VDSet;

/// Backend failure, structural or cryptographic.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The inputs fail structural checks before the backend even runs.
    #[error(transparent)]
    Pod(#[from] PodError),

    /// The backend itself failed.
    #[error("backend error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Produces SignedPods from entry dictionaries.
pub trait PodSigner {
    fn sign(&self, params: &Params, entries: Dictionary) -> Result<SignedPod, BackendError>;
}

/// Produces MainPods proving a set of statements.
pub trait PodProver {
    fn prove(
        &self,
        params: &Params,
        vd_set: &VDSet,
        statements: Vec<Statement>,
        input_signed_pods: &[SignedPod],
        input_main_pods: &[MainPod],
    ) -> Result<MainPod, BackendError>;
}

/// Checks a MainPod's proof payload against its public statements.
pub trait PodVerifier {
    fn verify(&self, pod: &MainPod) -> Result<(), BackendError>;
}
