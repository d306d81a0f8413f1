//! Shared data types for group membership and container hosts.

use std::fmt;

/// Group-membership lifecycle of an instance, as the scaling provider
/// reports it. Only in-service members are valid rotation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    InService,
    Pending,
    Terminating,
    Standby,
    Other(String),
}

impl LifecycleState {
    /// Parse the provider's string form ("InService", "Pending", ...).
    ///
    /// Qualified states like "Pending:Wait" fall through to `Other`;
    /// they are not in service either way.
    pub fn parse(s: &str) -> Self {
        match s {
            "InService" => Self::InService,
            "Pending" => Self::Pending,
            "Terminating" => Self::Terminating,
            "Standby" => Self::Standby,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_in_service(&self) -> bool {
        matches!(self, Self::InService)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InService => write!(f, "InService"),
            Self::Pending => write!(f, "Pending"),
            Self::Terminating => write!(f, "Terminating"),
            Self::Standby => write!(f, "Standby"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Machine-level state of a compute instance, used for the
/// post-termination recheck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Stopping,
    Stopped,
    Terminated,
    Other(String),
}

impl InstanceState {
    /// Parse the provider's string form ("running", "terminated", ...).
    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "shutting-down" => Self::ShuttingDown,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            "terminated" => Self::Terminated,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::ShuttingDown => write!(f, "shutting-down"),
            Self::Stopping => write!(f, "stopping"),
            Self::Stopped => write!(f, "stopped"),
            Self::Terminated => write!(f, "terminated"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One autoscaling group as the provider reports it.
#[derive(Debug, Clone)]
pub struct GroupSnapshot {
    pub name: String,
    pub desired_capacity: u32,
    pub instances: Vec<GroupInstance>,
}

/// A single member of a group, with its lifecycle state.
#[derive(Debug, Clone)]
pub struct GroupInstance {
    pub id: String,
    pub lifecycle_state: LifecycleState,
}

/// The inspector's filtered view of a group: in-service members only,
/// in discovery order.
#[derive(Debug, Clone)]
pub struct GroupMembers {
    pub desired_capacity: u32,
    pub instance_ids: Vec<String>,
}

/// One container-scheduler host record.
#[derive(Debug, Clone)]
pub struct ContainerHost {
    /// The scheduler's identifier for the host.
    pub arn: String,
    /// The underlying compute instance the host runs on.
    pub instance_id: String,
    /// Tasks currently running on the host.
    pub running_tasks: i64,
}

/// One page of a container-host listing. `next_token` continues the
/// enumeration; `None` means the listing is exhausted.
#[derive(Debug, Clone)]
pub struct HostPage {
    pub arns: Vec<String>,
    pub next_token: Option<String>,
}

/// A per-item failure reported for a drain request.
#[derive(Debug, Clone)]
pub struct DrainFailure {
    pub arn: Option<String>,
    pub reason: Option<String>,
}

impl fmt::Display for DrainFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.arn.as_deref().unwrap_or("<unknown host>"),
            self.reason.as_deref().unwrap_or("<no reason given>"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_state_parses_known_values() {
        assert_eq!(LifecycleState::parse("InService"), LifecycleState::InService);
        assert_eq!(LifecycleState::parse("Pending"), LifecycleState::Pending);
        assert_eq!(
            LifecycleState::parse("Terminating"),
            LifecycleState::Terminating
        );
        assert!(LifecycleState::parse("InService").is_in_service());
        assert!(!LifecycleState::parse("Pending").is_in_service());
    }

    #[test]
    fn lifecycle_state_qualified_values_are_not_in_service() {
        let state = LifecycleState::parse("Pending:Wait");
        assert_eq!(state, LifecycleState::Other("Pending:Wait".to_string()));
        assert!(!state.is_in_service());
    }

    #[test]
    fn instance_state_round_trips_display() {
        for s in [
            "pending",
            "running",
            "shutting-down",
            "stopping",
            "stopped",
            "terminated",
        ] {
            assert_eq!(InstanceState::parse(s).to_string(), s);
        }
    }

    #[test]
    fn drain_failure_display_handles_missing_fields() {
        let failure = DrainFailure {
            arn: None,
            reason: Some("MISSING".to_string()),
        };
        assert_eq!(failure.to_string(), "<unknown host>: MISSING");
    }
}
