mod cli;

use clap::Parser;
use coco_assert::assertions::{
    adaptor_pod_for_node, authenticated_image_status, container_id, find_pod,
    first_warning_event, image_pull_duration, is_pulled_with_snapshotter, job_pod_tally,
    log_contains, node_name_for_pod,
};
use coco_assert::providers::{LibvirtManager, ProviderRegistry};
use coco_assert::utils::node_name;
use coco_assert::{AssertConfig, ExpectedStatus, KubeCluster};
use std::time::Duration;
use tracing::{error, info};

use cli::{Cli, ClusterCommand, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AssertConfig {
        adaptor_namespace: cli.adaptor_namespace.clone(),
        adaptor_selector: cli.adaptor_selector.clone(),
        watch_timeout: (cli.watch_timeout > 0).then(|| Duration::from_secs(cli.watch_timeout)),
        log_settle_delay: Duration::from_secs(cli.settle_delay),
    };

    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(LibvirtManager::new(cli.libvirt.clone())));

    if let Err(e) = run(&cli, &config, &registry).await {
        error!("Assertion failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: &Cli, config: &AssertConfig, registry: &ProviderRegistry) -> anyhow::Result<()> {
    match &cli.command {
        Command::Providers => {
            for name in registry.names() {
                println!("{}", name);
            }
            Ok(())
        }
        Command::ProviderConfig { name } => {
            let manager = registry
                .get(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown cloud provider: {}", name))?;
            print!("{}", manager.render_config()?);
            Ok(())
        }
        Command::Cluster(command) => {
            let cluster = KubeCluster::connect(cli.context.as_deref()).await?;
            run_cluster_command(&cluster, config, &cli.namespace, command).await
        }
    }
}

async fn run_cluster_command(
    cluster: &KubeCluster,
    config: &AssertConfig,
    ns: &str,
    command: &ClusterCommand,
) -> anyhow::Result<()> {
    match command {
        ClusterCommand::PullTime { pod } => {
            let workload = find_pod(cluster, ns, pod).await?;
            let node = node_name(&workload)
                .ok_or_else(|| anyhow::anyhow!("Pod {} is not scheduled", pod))?;
            let adaptor = adaptor_pod_for_node(cluster, config, node).await?;
            let elapsed = image_pull_duration(cluster, &adaptor, &workload).await?;
            println!("{:?}", elapsed);
        }
        ClusterCommand::Snapshotter { pod } => {
            let workload = find_pod(cluster, ns, pod).await?;
            let node = node_name(&workload)
                .ok_or_else(|| anyhow::anyhow!("Pod {} is not scheduled", pod))?;
            let cid = container_id(&workload)
                .ok_or_else(|| anyhow::anyhow!("Pod {} has no running container", pod))?;
            let guest_pull = is_pulled_with_snapshotter(cluster, config, node, cid).await?;
            println!("{}", guest_pull);
        }
        ClusterCommand::Auth { pod, expected } => {
            let expected: ExpectedStatus = expected.parse()?;
            authenticated_image_status(cluster, config, ns, pod, expected).await?;
            info!("Pod {} reached the expected authentication outcome", pod);
        }
        ClusterCommand::JobTally { job } => {
            let tally = job_pod_tally(cluster, config, ns, job).await?;
            println!(
                "success={} error={}\n{}",
                tally.success_count, tally.error_count, tally.last_log
            );
        }
        ClusterCommand::LogContains { pod, expected } => {
            let log = log_contains(cluster, config, ns, pod, expected).await?;
            println!("{}", log);
        }
        ClusterCommand::NodeName { pod } => {
            println!("{}", node_name_for_pod(cluster, ns, pod).await?);
        }
        ClusterCommand::Warning { pod } => {
            let warning = first_warning_event(cluster, config, ns, pod).await?;
            println!(
                "{} {}: {}",
                warning.event_type, warning.reason, warning.description
            );
        }
    }
    Ok(())
}
