//! Wait for a group to return to full healthy capacity.
//!
//! Membership is re-fetched on every tick — intentional self-correction
//! against concurrent external changes to the group, never a cached
//! working set. Only once every subgroup's in-service count equals its
//! desired capacity does the bounded instance-health wait start.

use std::time::Duration;

use tracing::{info, warn};

use crate::error::{RollError, RollResult};
use crate::inspector;
use crate::poll::{PollConfig, PollOutcome, poll_until};
use crate::provider::ScalingProvider;

/// Seconds between membership-count probes.
pub const CAPACITY_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Default budget for the membership count to match desired capacity.
pub const DEFAULT_CAPACITY_DEADLINE: Duration = Duration::from_secs(600);
/// Delay between instance-health probes.
pub const HEALTH_CHECK_DELAY: Duration = Duration::from_secs(15);
/// Maximum instance-health probes before the wait fails.
pub const HEALTH_CHECK_ATTEMPTS: u32 = 100;

/// How a capacity wait ended. A `DeadlineExceeded` is not an error here;
/// the rotation controller decides whether it is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityOutcome {
    /// Every subgroup is at desired capacity and all members pass the
    /// provider's health check.
    Healthy,
    /// The membership count never matched within the deadline.
    DeadlineExceeded,
}

/// Waits for a group to contain exactly its desired number of healthy
/// members.
pub struct CapacityWaiter<'a> {
    scaling: &'a dyn ScalingProvider,
    poll: PollConfig,
    health_attempts: u32,
    health_delay: Duration,
}

impl<'a> CapacityWaiter<'a> {
    pub fn new(scaling: &'a dyn ScalingProvider) -> Self {
        Self {
            scaling,
            poll: PollConfig {
                interval: CAPACITY_POLL_INTERVAL,
                deadline: DEFAULT_CAPACITY_DEADLINE,
            },
            health_attempts: HEALTH_CHECK_ATTEMPTS,
            health_delay: HEALTH_CHECK_DELAY,
        }
    }

    /// Override the count-wait deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.poll.deadline = deadline;
        self
    }

    /// Poll membership until every subgroup is at desired capacity, then
    /// wait for all members to pass health checks.
    ///
    /// Never returns [`CapacityOutcome::Healthy`] while any subgroup's
    /// in-service count differs from its desired capacity. A health-wait
    /// timeout propagates as a fatal error; the count deadline is soft
    /// and reported as [`CapacityOutcome::DeadlineExceeded`].
    pub async fn wait_for_capacity(&self, group: &str) -> RollResult<CapacityOutcome> {
        info!(group = %group, "waiting for group to return to capacity");

        let scaling = self.scaling;
        let outcome = poll_until(self.poll, move || async move {
            let groups = inspector::list_members(scaling, group).await?;
            for g in &groups {
                if g.instance_ids.len() != g.desired_capacity as usize {
                    info!(
                        group = %group,
                        found = g.instance_ids.len(),
                        desired = g.desired_capacity,
                        "waiting for members"
                    );
                    return Ok(None);
                }
            }
            Ok::<_, RollError>(Some(groups))
        })
        .await?;

        let groups = match outcome {
            PollOutcome::Completed(groups) => groups,
            PollOutcome::DeadlineExceeded => {
                warn!(
                    group = %group,
                    deadline = ?self.poll.deadline,
                    "deadline exceeded waiting for group to reach desired capacity"
                );
                return Ok(CapacityOutcome::DeadlineExceeded);
            }
        };

        for g in &groups {
            info!(
                group = %group,
                members = g.instance_ids.len(),
                "waiting for members to pass health checks"
            );
            scaling
                .wait_until_healthy(&g.instance_ids, self.health_attempts, self.health_delay)
                .await?;
            info!(group = %group, members = g.instance_ids.len(), "all members healthy");
        }
        Ok(CapacityOutcome::Healthy)
    }
}
