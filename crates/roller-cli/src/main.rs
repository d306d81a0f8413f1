use clap::Parser;

use roller_aws::{AwsContainers, AwsScaling};
use roller_core::provider::ContainerProvider;
use roller_core::rotation::{RotationConfig, RotationController};

/// Restart an autoscaling group, one instance at a time.
///
/// Waits for the group to return to full healthy capacity before
/// restarting the next instance, so at most one instance is ever out of
/// service. With --ecs-cluster, each instance is drained in ECS before
/// it is terminated.
#[derive(Parser)]
#[command(name = "asg-roller", version)]
struct Cli {
    /// Name of the autoscaling group to restart
    group: String,
    /// Region the group lives in
    region: String,
    /// ECS cluster to drain each instance from before terminating it
    #[arg(long)]
    ecs_cluster: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roller_core=info".parse()?)
                .add_directive("roller_aws=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let sdk = roller_aws::sdk_config(&cli.region).await;
    let scaling = AwsScaling::new(&sdk);
    let containers = cli.ecs_cluster.as_ref().map(|_| AwsContainers::new(&sdk));

    let config =
        RotationConfig::new(&cli.group, &cli.region).with_cluster(cli.ecs_cluster.clone());
    let controller = RotationController::new(
        &scaling,
        containers.as_ref().map(|c| c as &dyn ContainerProvider),
        config,
    );

    let summary = controller.run().await?;
    println!("{}", summary.render());
    Ok(())
}
