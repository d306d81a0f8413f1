//! Group membership queries.

use tracing::debug;

use crate::error::{RollError, RollResult};
use crate::provider::ScalingProvider;
use crate::types::GroupMembers;

/// Current membership of every group matching `group`, filtered to
/// in-service instances in discovery order.
///
/// Read-only; callers re-invoke this before every readiness decision
/// rather than caching membership across a wait boundary.
pub async fn list_members(
    provider: &dyn ScalingProvider,
    group: &str,
) -> RollResult<Vec<GroupMembers>> {
    let groups = provider.describe_group(group).await?;
    if groups.is_empty() {
        return Err(RollError::GroupNotFound(group.to_string()));
    }

    let members = groups
        .into_iter()
        .map(|g| {
            let instance_ids: Vec<String> = g
                .instances
                .into_iter()
                .filter(|i| i.lifecycle_state.is_in_service())
                .map(|i| i.id)
                .collect();
            debug!(
                group = %g.name,
                desired = g.desired_capacity,
                in_service = instance_ids.len(),
                "inspected group"
            );
            GroupMembers {
                desired_capacity: g.desired_capacity,
                instance_ids,
            }
        })
        .collect();
    Ok(members)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::types::{GroupInstance, GroupSnapshot, InstanceState, LifecycleState};

    struct FixedGroups(Vec<GroupSnapshot>);

    #[async_trait]
    impl ScalingProvider for FixedGroups {
        async fn describe_group(&self, _name: &str) -> RollResult<Vec<GroupSnapshot>> {
            Ok(self.0.clone())
        }

        async fn terminate_instance(&self, _id: &str) -> RollResult<()> {
            panic!("not used by the inspector");
        }

        async fn wait_until_terminated(&self, _id: &str) -> RollResult<()> {
            panic!("not used by the inspector");
        }

        async fn instance_state(&self, _id: &str) -> RollResult<InstanceState> {
            panic!("not used by the inspector");
        }

        async fn wait_until_healthy(
            &self,
            _ids: &[String],
            _max_attempts: u32,
            _delay: Duration,
        ) -> RollResult<()> {
            panic!("not used by the inspector");
        }
    }

    fn instance(id: &str, state: LifecycleState) -> GroupInstance {
        GroupInstance {
            id: id.to_string(),
            lifecycle_state: state,
        }
    }

    #[tokio::test]
    async fn filters_to_in_service_members() {
        let provider = FixedGroups(vec![GroupSnapshot {
            name: "web-asg".to_string(),
            desired_capacity: 3,
            instances: vec![
                instance("i-1", LifecycleState::InService),
                instance("i-2", LifecycleState::Pending),
                instance("i-3", LifecycleState::InService),
                instance("i-4", LifecycleState::Terminating),
            ],
        }]);

        let members = list_members(&provider, "web-asg").await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].desired_capacity, 3);
        assert_eq!(members[0].instance_ids, vec!["i-1", "i-3"]);
    }

    #[tokio::test]
    async fn preserves_discovery_order() {
        let provider = FixedGroups(vec![GroupSnapshot {
            name: "web-asg".to_string(),
            desired_capacity: 3,
            instances: vec![
                instance("i-c", LifecycleState::InService),
                instance("i-a", LifecycleState::InService),
                instance("i-b", LifecycleState::InService),
            ],
        }]);

        let members = list_members(&provider, "web-asg").await.unwrap();
        assert_eq!(members[0].instance_ids, vec!["i-c", "i-a", "i-b"]);
    }

    #[tokio::test]
    async fn missing_group_is_a_lookup_error() {
        let provider = FixedGroups(vec![]);
        let err = list_members(&provider, "no-such-asg").await.unwrap_err();
        assert!(matches!(err, RollError::GroupNotFound(name) if name == "no-such-asg"));
    }
}
