//! Error taxonomy for rotation runs.
//!
//! Every variant except [`RollError::WaitTimeout`] is fatal and aborts the
//! run, leaving the group in its current partial state. `WaitTimeout` is
//! fatal too unless the caller re-checks and finds an acceptable state (the
//! terminator does this for already-terminated instances). Soft conditions
//! — drain budget elapsed, capacity deadline elapsed — are not errors; they
//! are explicit outcome values logged by the controller.

use std::time::Duration;

use thiserror::Error;

use crate::types::InstanceState;

/// Errors that can occur during a rotation run.
#[derive(Debug, Error)]
pub enum RollError {
    #[error("autoscaling group not found: {0}")]
    GroupNotFound(String),

    #[error("could not find {instance} in cluster {cluster} ({region})")]
    HostNotFound {
        instance: String,
        cluster: String,
        region: String,
    },

    #[error("drain request rejected for {instance}: {failures}")]
    DrainRejected { instance: String, failures: String },

    #[error("instance {instance} in unexpected state {state} after termination")]
    UnexpectedState {
        instance: String,
        state: InstanceState,
    },

    #[error("timed out after {elapsed:?} waiting for {subject}")]
    WaitTimeout { subject: String, elapsed: Duration },

    #[error("provider error: {0}")]
    Provider(#[from] anyhow::Error),
}

pub type RollResult<T> = Result<T, RollError>;
