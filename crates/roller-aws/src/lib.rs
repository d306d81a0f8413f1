//! AWS implementations of the roller-core provider traits.
//!
//! Clients are built once per region from a shared [`aws_config::SdkConfig`]
//! and injected into the rotation components; nothing here holds global
//! connection state.

use aws_config::{BehaviorVersion, Region, SdkConfig};

pub mod containers;
pub mod scaling;

pub use containers::AwsContainers;
pub use scaling::AwsScaling;

/// Load the shared SDK configuration for one region.
pub async fn sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// Wrap an SDK error as an opaque provider error.
pub(crate) fn provider_err<E>(err: E) -> roller_core::RollError
where
    E: std::error::Error + Send + Sync + 'static,
{
    roller_core::RollError::Provider(anyhow::Error::new(err))
}
