//! Workload drain — move scheduler tasks off an instance before it is
//! terminated.
//!
//! Resolution cross-references the compute instance id against the
//! cluster's full host listing; the listing is paginated and every page
//! must be consumed before deciding the instance is absent. The drain
//! wait itself is soft: if tasks are still running when the budget
//! elapses, the drain logs a warning and lets the subsequent termination
//! stop the stragglers rather than blocking the rotation indefinitely.

use std::cell::Cell;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{RollError, RollResult};
use crate::poll::{PollConfig, PollOutcome, poll_until};
use crate::provider::ContainerProvider;

/// Seconds between running-task probes.
pub const DRAIN_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Total budget for a drain wait before giving up softly.
pub const DRAIN_WAIT_BUDGET: Duration = Duration::from_secs(600);

/// How a drain ended. Both variants allow the rotation to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The host reached zero running tasks.
    Drained,
    /// The budget elapsed with tasks still running; termination will
    /// stop them.
    TimedOut { remaining_tasks: i64 },
}

/// Drains a single instance's container host.
pub struct Drainer<'a> {
    containers: &'a dyn ContainerProvider,
    region: String,
    poll: PollConfig,
}

impl<'a> Drainer<'a> {
    pub fn new(containers: &'a dyn ContainerProvider, region: &str) -> Self {
        Self {
            containers,
            region: region.to_string(),
            poll: PollConfig {
                interval: DRAIN_POLL_INTERVAL,
                deadline: DRAIN_WAIT_BUDGET,
            },
        }
    }

    /// Override the poll cadence (tests).
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Mark the host backing `instance_id` as DRAINING and wait for its
    /// running-task count to reach zero.
    pub async fn drain(&self, instance_id: &str, cluster: &str) -> RollResult<DrainOutcome> {
        let arn = self.resolve(instance_id, cluster).await?;
        debug!(instance = %instance_id, host = %arn, "resolved container host");

        let failures = self.containers.set_draining(cluster, &arn).await?;
        if !failures.is_empty() {
            let detail = failures
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(RollError::DrainRejected {
                instance: instance_id.to_string(),
                failures: detail,
            });
        }

        let containers = self.containers;
        let arn_list = std::slice::from_ref(&arn);
        let remaining = Cell::new(0i64);
        let remaining_ref = &remaining;
        let outcome = poll_until(self.poll, move || async move {
            let hosts = containers.describe_container_hosts(cluster, arn_list).await?;
            let running = match hosts.first() {
                Some(host) => host.running_tasks,
                None => {
                    // The record can be deregistered while we wait; nothing
                    // is left to drain, but tell the operator which it was.
                    warn!(
                        instance = %instance_id,
                        "container host record no longer present; treating as drained"
                    );
                    remaining_ref.set(0);
                    return Ok::<_, RollError>(Some(()));
                }
            };
            remaining_ref.set(running);
            if running == 0 {
                Ok(Some(()))
            } else {
                info!(instance = %instance_id, active_tasks = running, "waiting for tasks to drain");
                Ok(None)
            }
        })
        .await?;

        match outcome {
            PollOutcome::Completed(()) => Ok(DrainOutcome::Drained),
            PollOutcome::DeadlineExceeded => {
                let remaining_tasks = remaining.get();
                warn!(
                    instance = %instance_id,
                    remaining_tasks,
                    "timed out waiting for instance to drain; proceeding to termination"
                );
                Ok(DrainOutcome::TimedOut { remaining_tasks })
            }
        }
    }

    /// Resolve a compute instance id to its container-host identifier,
    /// consuming every page of the cluster listing first.
    async fn resolve(&self, instance_id: &str, cluster: &str) -> RollResult<String> {
        let mut arns = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self
                .containers
                .list_container_hosts(cluster, token.as_deref())
                .await?;
            arns.extend(page.arns);
            token = page.next_token;
            if token.is_none() {
                break;
            }
        }

        let not_found = || RollError::HostNotFound {
            instance: instance_id.to_string(),
            cluster: cluster.to_string(),
            region: self.region.clone(),
        };

        if arns.is_empty() {
            return Err(not_found());
        }

        let hosts = self
            .containers
            .describe_container_hosts(cluster, &arns)
            .await?;
        hosts
            .into_iter()
            .find(|h| h.instance_id == instance_id)
            .map(|h| h.arn)
            .ok_or_else(not_found)
    }
}
