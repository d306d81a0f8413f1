//! Capability traits for the cloud providers.
//!
//! The rotation logic is written entirely against these traits. Concrete
//! clients are constructed once per region and injected into each
//! component; there is no hidden global connection state.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::RollResult;
use crate::types::{ContainerHost, DrainFailure, GroupSnapshot, HostPage, InstanceState};

/// The autoscaling-group and compute provider.
#[async_trait]
pub trait ScalingProvider: Send + Sync {
    /// Describe all groups matching `name` (normally exactly one).
    /// An empty response means the group does not exist.
    async fn describe_group(&self, name: &str) -> RollResult<Vec<GroupSnapshot>>;

    /// Request termination of one instance.
    async fn terminate_instance(&self, id: &str) -> RollResult<()>;

    /// Block until the instance reaches the terminated state.
    ///
    /// Fails with [`RollError::WaitTimeout`] when the provider's wait
    /// budget runs out; callers may then re-check the state directly.
    ///
    /// [`RollError::WaitTimeout`]: crate::error::RollError::WaitTimeout
    async fn wait_until_terminated(&self, id: &str) -> RollResult<()>;

    /// Current machine-level state of one instance.
    async fn instance_state(&self, id: &str) -> RollResult<InstanceState>;

    /// Block until every listed instance passes the provider's
    /// instance-level health check, probing every `delay` for up to
    /// `max_attempts` probes.
    async fn wait_until_healthy(
        &self,
        ids: &[String],
        max_attempts: u32,
        delay: Duration,
    ) -> RollResult<()>;
}

/// The container-orchestration provider.
#[async_trait]
pub trait ContainerProvider: Send + Sync {
    /// One page of the cluster's host listing. Callers must follow
    /// `next_token` until it is `None`.
    async fn list_container_hosts(
        &self,
        cluster: &str,
        next_token: Option<&str>,
    ) -> RollResult<HostPage>;

    /// Describe the listed hosts.
    async fn describe_container_hosts(
        &self,
        cluster: &str,
        arns: &[String],
    ) -> RollResult<Vec<ContainerHost>>;

    /// Transition one host to DRAINING. Returns the provider's per-item
    /// failures; an empty list means the request was accepted.
    async fn set_draining(&self, cluster: &str, arn: &str) -> RollResult<Vec<DrainFailure>>;
}
