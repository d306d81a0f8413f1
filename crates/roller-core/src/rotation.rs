//! The rolling-replacement controller.
//!
//! Iterates group members in discovery order: drain (when a cluster is
//! configured), terminate, wait for the replacement to be in service and
//! healthy, then move on. The safety invariant is that at most one member
//! of the group is ever out of service because of the rotation; the
//! strictly sequential control flow is what guarantees it.

use std::time::Duration;

use anyhow::anyhow;
use tokio::time::Instant;
use tracing::info;

use crate::capacity::{CapacityOutcome, CapacityWaiter, DEFAULT_CAPACITY_DEADLINE};
use crate::drain::Drainer;
use crate::error::{RollError, RollResult};
use crate::inspector;
use crate::provider::{ContainerProvider, ScalingProvider};
use crate::report::{NodeOutcome, RunSummary};
use crate::terminate::{TERMINATION_GRACE, Terminator};

/// Configuration for one rotation run.
#[derive(Debug, Clone)]
pub struct RotationConfig {
    pub group: String,
    /// Region, for diagnostics only — the provider clients are already
    /// bound to it.
    pub region: String,
    /// Container cluster to drain each member from; `None` disables the
    /// drain step.
    pub cluster: Option<String>,
    pub capacity_deadline: Duration,
    pub termination_grace: Duration,
    /// When true, a capacity-wait deadline aborts the run instead of
    /// being logged and tolerated.
    pub fail_on_capacity_timeout: bool,
}

impl RotationConfig {
    pub fn new(group: &str, region: &str) -> Self {
        Self {
            group: group.to_string(),
            region: region.to_string(),
            cluster: None,
            capacity_deadline: DEFAULT_CAPACITY_DEADLINE,
            termination_grace: TERMINATION_GRACE,
            fail_on_capacity_timeout: false,
        }
    }

    pub fn with_cluster(mut self, cluster: Option<String>) -> Self {
        self.cluster = cluster;
        self
    }
}

/// Drives one rotation run over a group.
pub struct RotationController<'a> {
    scaling: &'a dyn ScalingProvider,
    containers: Option<&'a dyn ContainerProvider>,
    config: RotationConfig,
}

impl<'a> RotationController<'a> {
    pub fn new(
        scaling: &'a dyn ScalingProvider,
        containers: Option<&'a dyn ContainerProvider>,
        config: RotationConfig,
    ) -> Self {
        Self {
            scaling,
            containers,
            config,
        }
    }

    /// Replace every member enumerated at inspection time, one at a time.
    ///
    /// Members that join the group after the run starts are not
    /// retroactively included. Any fatal error aborts immediately,
    /// leaving the group in its current partial state; re-invocation
    /// starts from a fresh inspection.
    pub async fn run(&self) -> RollResult<RunSummary> {
        let containers = match (&self.config.cluster, self.containers) {
            (Some(_), None) => {
                return Err(RollError::Provider(anyhow!(
                    "container cluster configured but no container provider supplied"
                )));
            }
            (Some(_), Some(c)) => Some(c),
            (None, _) => None,
        };

        let started = Instant::now();
        let groups = inspector::list_members(self.scaling, &self.config.group).await?;
        let before: Vec<Vec<String>> = groups.iter().map(|g| g.instance_ids.clone()).collect();

        let mut outcomes = Vec::new();
        for group in &groups {
            info!(
                group = %self.config.group,
                active = group.instance_ids.len(),
                desired = group.desired_capacity,
                "rotating group members"
            );
            let total = group.instance_ids.len();
            for (idx, instance_id) in group.instance_ids.iter().enumerate() {
                let drain = match (containers, &self.config.cluster) {
                    (Some(containers), Some(cluster)) => {
                        info!(instance = %instance_id, cluster = %cluster, "draining");
                        let drainer = Drainer::new(containers, &self.config.region);
                        let outcome = drainer.drain(instance_id, cluster).await?;
                        info!(instance = %instance_id, "drained");
                        Some(outcome)
                    }
                    _ => None,
                };

                let terminator =
                    Terminator::new(self.scaling).with_grace(self.config.termination_grace);
                terminator.terminate(instance_id).await?;

                let waiter =
                    CapacityWaiter::new(self.scaling).with_deadline(self.config.capacity_deadline);
                let capacity = waiter.wait_for_capacity(&self.config.group).await?;
                if capacity == CapacityOutcome::DeadlineExceeded
                    && self.config.fail_on_capacity_timeout
                {
                    return Err(RollError::WaitTimeout {
                        subject: format!("group {} to reach desired capacity", self.config.group),
                        elapsed: self.config.capacity_deadline,
                    });
                }

                info!(completed = idx + 1, total, "completed instance rotation");
                outcomes.push(NodeOutcome {
                    instance_id: instance_id.clone(),
                    drain,
                    capacity,
                });
            }
        }

        let after: Vec<Vec<String>> = inspector::list_members(self.scaling, &self.config.group)
            .await?
            .into_iter()
            .map(|g| g.instance_ids)
            .collect();

        Ok(RunSummary {
            before,
            after,
            outcomes,
            elapsed: started.elapsed(),
        })
    }
}
