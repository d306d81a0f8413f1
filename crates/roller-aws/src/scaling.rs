//! Autoscaling-group and EC2 client.
//!
//! The terminated/healthy waits poll the describe APIs through the shared
//! poll primitive with the provider's standard waiter cadences (15 s
//! probes, 600 s termination budget) instead of ad hoc sleep loops.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::SdkConfig;
use tracing::debug;

use roller_core::error::{RollError, RollResult};
use roller_core::poll::{PollConfig, PollOutcome, poll_until};
use roller_core::provider::ScalingProvider;
use roller_core::types::{GroupInstance, GroupSnapshot, InstanceState, LifecycleState};

use crate::provider_err;

const TERMINATION_POLL_INTERVAL: Duration = Duration::from_secs(15);
const TERMINATION_POLL_BUDGET: Duration = Duration::from_secs(600);

/// Scaling provider backed by the AWS autoscaling and EC2 APIs.
pub struct AwsScaling {
    autoscaling: aws_sdk_autoscaling::Client,
    ec2: aws_sdk_ec2::Client,
}

impl AwsScaling {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            autoscaling: aws_sdk_autoscaling::Client::new(config),
            ec2: aws_sdk_ec2::Client::new(config),
        }
    }

    async fn fetch_instance_state(&self, id: &str) -> RollResult<InstanceState> {
        let resp = self
            .ec2
            .describe_instances()
            .instance_ids(id)
            .send()
            .await
            .map_err(provider_err)?;
        resp.reservations()
            .iter()
            .flat_map(|r| r.instances().iter())
            .find(|i| i.instance_id() == Some(id))
            .and_then(|i| i.state())
            .and_then(|s| s.name())
            .map(|n| InstanceState::parse(n.as_str()))
            .ok_or_else(|| RollError::Provider(anyhow::anyhow!("no state reported for {id}")))
    }
}

#[async_trait]
impl ScalingProvider for AwsScaling {
    async fn describe_group(&self, name: &str) -> RollResult<Vec<GroupSnapshot>> {
        let resp = self
            .autoscaling
            .describe_auto_scaling_groups()
            .auto_scaling_group_names(name)
            .send()
            .await
            .map_err(provider_err)?;

        Ok(resp
            .auto_scaling_groups()
            .iter()
            .map(|g| GroupSnapshot {
                name: g.auto_scaling_group_name().unwrap_or_default().to_string(),
                desired_capacity: g.desired_capacity().unwrap_or(0).max(0) as u32,
                instances: g
                    .instances()
                    .iter()
                    .map(|i| GroupInstance {
                        id: i.instance_id().unwrap_or_default().to_string(),
                        lifecycle_state: i
                            .lifecycle_state()
                            .map(|s| LifecycleState::parse(s.as_str()))
                            .unwrap_or_else(|| LifecycleState::Other(String::new())),
                    })
                    .collect(),
            })
            .collect())
    }

    async fn terminate_instance(&self, id: &str) -> RollResult<()> {
        self.ec2
            .terminate_instances()
            .instance_ids(id)
            .send()
            .await
            .map_err(provider_err)?;
        Ok(())
    }

    async fn wait_until_terminated(&self, id: &str) -> RollResult<()> {
        let poll = PollConfig {
            interval: TERMINATION_POLL_INTERVAL,
            deadline: TERMINATION_POLL_BUDGET,
        };
        let outcome = poll_until(poll, move || async move {
            let state = self.fetch_instance_state(id).await?;
            debug!(instance = %id, %state, "polling for termination");
            Ok::<_, RollError>((state == InstanceState::Terminated).then_some(()))
        })
        .await?;

        match outcome {
            PollOutcome::Completed(()) => Ok(()),
            PollOutcome::DeadlineExceeded => Err(RollError::WaitTimeout {
                subject: format!("instance {id} to terminate"),
                elapsed: poll.deadline,
            }),
        }
    }

    async fn instance_state(&self, id: &str) -> RollResult<InstanceState> {
        self.fetch_instance_state(id).await
    }

    async fn wait_until_healthy(
        &self,
        ids: &[String],
        max_attempts: u32,
        delay: Duration,
    ) -> RollResult<()> {
        let poll = PollConfig {
            interval: delay,
            deadline: delay * max_attempts,
        };
        let outcome = poll_until(poll, move || async move {
            let resp = self
                .ec2
                .describe_instance_status()
                .set_instance_ids(Some(ids.to_vec()))
                .include_all_instances(true)
                .send()
                .await
                .map_err(provider_err)?;

            let statuses = resp.instance_statuses();
            let all_ok = statuses.len() == ids.len()
                && statuses.iter().all(|s| {
                    s.instance_status()
                        .and_then(|d| d.status())
                        .map(|st| st.as_str() == "ok")
                        .unwrap_or(false)
                });
            debug!(requested = ids.len(), reported = statuses.len(), all_ok, "health probe");
            Ok::<_, RollError>(all_ok.then_some(()))
        })
        .await?;

        match outcome {
            PollOutcome::Completed(()) => Ok(()),
            PollOutcome::DeadlineExceeded => Err(RollError::WaitTimeout {
                subject: format!("{} instances to pass health checks", ids.len()),
                elapsed: poll.deadline,
            }),
        }
    }
}
