//! ECS container-instance client.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ecs::types::ContainerInstanceStatus;

use roller_core::error::RollResult;
use roller_core::provider::ContainerProvider;
use roller_core::types::{ContainerHost, DrainFailure, HostPage};

use crate::provider_err;

/// DescribeContainerInstances accepts at most 100 instances per call.
const DESCRIBE_BATCH: usize = 100;

/// Container provider backed by the AWS ECS API.
pub struct AwsContainers {
    ecs: aws_sdk_ecs::Client,
}

impl AwsContainers {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            ecs: aws_sdk_ecs::Client::new(config),
        }
    }
}

#[async_trait]
impl ContainerProvider for AwsContainers {
    async fn list_container_hosts(
        &self,
        cluster: &str,
        next_token: Option<&str>,
    ) -> RollResult<HostPage> {
        let resp = self
            .ecs
            .list_container_instances()
            .cluster(cluster)
            .set_next_token(next_token.map(str::to_string))
            .send()
            .await
            .map_err(provider_err)?;
        Ok(HostPage {
            arns: resp.container_instance_arns().to_vec(),
            next_token: resp.next_token().map(str::to_string),
        })
    }

    async fn describe_container_hosts(
        &self,
        cluster: &str,
        arns: &[String],
    ) -> RollResult<Vec<ContainerHost>> {
        let mut hosts = Vec::with_capacity(arns.len());
        for chunk in arns.chunks(DESCRIBE_BATCH) {
            let resp = self
                .ecs
                .describe_container_instances()
                .cluster(cluster)
                .set_container_instances(Some(chunk.to_vec()))
                .send()
                .await
                .map_err(provider_err)?;
            hosts.extend(resp.container_instances().iter().map(|ci| ContainerHost {
                arn: ci.container_instance_arn().unwrap_or_default().to_string(),
                instance_id: ci.ec2_instance_id().unwrap_or_default().to_string(),
                running_tasks: i64::from(ci.running_tasks_count()),
            }));
        }
        Ok(hosts)
    }

    async fn set_draining(&self, cluster: &str, arn: &str) -> RollResult<Vec<DrainFailure>> {
        let resp = self
            .ecs
            .update_container_instances_state()
            .cluster(cluster)
            .container_instances(arn)
            .status(ContainerInstanceStatus::Draining)
            .send()
            .await
            .map_err(provider_err)?;
        Ok(resp
            .failures()
            .iter()
            .map(|f| DrainFailure {
                arn: f.arn().map(str::to_string),
                reason: f.reason().map(str::to_string),
            })
            .collect())
    }
}
