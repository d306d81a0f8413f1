//! Instance termination with an idempotent confirmation wait.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::{RollError, RollResult};
use crate::provider::ScalingProvider;
use crate::types::InstanceState;

/// Delay between requesting termination and polling for it, so we do not
/// race the provider's own state propagation.
pub const TERMINATION_GRACE: Duration = Duration::from_secs(10);

/// Terminates a single instance and confirms it is gone.
pub struct Terminator<'a> {
    scaling: &'a dyn ScalingProvider,
    grace: Duration,
}

impl<'a> Terminator<'a> {
    pub fn new(scaling: &'a dyn ScalingProvider) -> Self {
        Self {
            scaling,
            grace: TERMINATION_GRACE,
        }
    }

    /// Override the grace delay (tests).
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Request termination and block until the instance reaches the
    /// terminated state.
    ///
    /// If the confirmation wait times out, the state is re-queried
    /// directly: an instance that is already terminated counts as success
    /// (the provider's own health-check replacement can beat us to it).
    /// Any other observed state is fatal. Non-timeout wait errors
    /// re-raise unchanged.
    pub async fn terminate(&self, instance_id: &str) -> RollResult<()> {
        info!(instance = %instance_id, "terminating");
        self.scaling.terminate_instance(instance_id).await?;
        tokio::time::sleep(self.grace).await;

        match self.scaling.wait_until_terminated(instance_id).await {
            Ok(()) => {
                info!(instance = %instance_id, "terminated");
                Ok(())
            }
            Err(RollError::WaitTimeout { subject, elapsed }) => {
                warn!(
                    instance = %instance_id,
                    wait = %subject,
                    ?elapsed,
                    "termination wait timed out; re-checking instance state"
                );
                let state = self.scaling.instance_state(instance_id).await?;
                if state == InstanceState::Terminated {
                    info!(instance = %instance_id, "already terminated");
                    Ok(())
                } else {
                    error!(
                        instance = %instance_id,
                        %state,
                        "instance in unexpected state after termination"
                    );
                    Err(RollError::UnexpectedState {
                        instance: instance_id.to_string(),
                        state,
                    })
                }
            }
            Err(e) => Err(e),
        }
    }
}
