//! Rolling restarts for cloud autoscaling groups.
//!
//! Terminates group members one at a time, optionally draining container
//! workloads off each member first, and waits for the group to return to
//! full healthy capacity before touching the next member. At most one
//! member is ever out of service because of a rotation, so aggregate
//! serving capacity is preserved throughout the run.
//!
//! All cloud access goes through the capability traits in [`provider`];
//! the orchestration logic never talks to a provider SDK directly.
//!
//! # Components
//!
//! - **`provider`** — capability traits for the scaling and container providers
//! - **`inspector`** — group membership queries (in-service members only)
//! - **`drain`** — workload drain with pagination-safe host resolution
//! - **`terminate`** — idempotent instance termination
//! - **`capacity`** — wait for the group to return to healthy capacity
//! - **`rotation`** — the rolling-replacement controller
//! - **`report`** — before/after run summary
//! - **`poll`** — the shared poll-until-deadline primitive

pub mod capacity;
pub mod drain;
pub mod error;
pub mod inspector;
pub mod poll;
pub mod provider;
pub mod report;
pub mod rotation;
pub mod terminate;
pub mod types;

pub use capacity::{CapacityOutcome, CapacityWaiter};
pub use drain::{DrainOutcome, Drainer};
pub use error::{RollError, RollResult};
pub use poll::{PollConfig, PollOutcome, poll_until};
pub use provider::{ContainerProvider, ScalingProvider};
pub use report::{NodeOutcome, RunSummary};
pub use rotation::{RotationConfig, RotationController};
pub use terminate::Terminator;
pub use types::{
    ContainerHost, DrainFailure, GroupInstance, GroupMembers, GroupSnapshot, HostPage,
    InstanceState, LifecycleState,
};
