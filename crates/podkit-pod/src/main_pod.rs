//! MainPod: public statements backed by an opaque recursive proof.

use podkit_core::{Params, PodId};
use serde::{Deserialize, Serialize};

use crate::error::PodError;
use crate::statement::Statement;
use crate::vdset::VDSet;

/// A POD whose trust comes from a zero-knowledge proof over its public
/// statements, possibly referencing other PODs.
///
/// The `data` payload is the prover backend's proof blob; verifying it is
/// a [`crate::backend::PodVerifier`] concern. [`MainPod::check_integrity`]
/// covers the structural side only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainPod {
    /// Content id assigned by the prover backend.
    pub id: PodId,
    /// Circuit bounds the proof was generated under.
    pub params: Params,
    /// Backend type code and name, e.g. `(2, "Main")`.
    pub pod_type: (i64, String),
    /// The statements the proof establishes, in order.
    pub public_statements: Vec<Statement>,
    /// Verifier data the proof may reference.
    pub vd_set: VDSet,
    /// Opaque proof payload.
    pub data: serde_json::Value,
}

impl MainPod {
    /// Check the structural constraints: the statement count fits the
    /// declared bounds, every statement is arity-correct, and the
    /// verifier-data set has the declared depth.
    pub fn check_integrity(&self) -> Result<(), PodError> {
        if self.public_statements.len() > self.params.max_public_statements {
            return Err(PodError::TooManyPublicStatements {
                count: self.public_statements.len(),
                max: self.params.max_public_statements,
            });
        }
        for st in &self.public_statements {
            st.validate()?;
        }
        self.vd_set.check_depth(&self.params)?;
        Ok(())
    }
}
