use crate::config::AssertConfig;
use crate::error::{AssertError, Result};
use crate::kubernetes::ClusterApi;
use crate::patterns::{GUEST_PULL, snapshotter_patterns};
use crate::types::{LogText, PodTarget};
use crate::utils::node_name;
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use tracing::info;

/// Decide from an adaptor log how the container's image was pulled.
///
/// `true` when the newest relevant line shows a guest-pull mount, `false` when
/// it shows an explicit PullImage call.
pub fn snapshotter_verdict(log: &LogText, container_id: &str) -> Result<bool> {
    let patterns = snapshotter_patterns(container_id)?;
    match patterns.newest_match(log) {
        Some(m) if m.label == GUEST_PULL => {
            info!("Pulled with nydus-snapshotter driver: {}", m.line);
            Ok(true)
        }
        Some(m) => {
            info!("Called PullImage explicitly, not using nydus-snapshotter: {}", m.line);
            Ok(false)
        }
        None => Err(AssertError::NoMatchFound(container_id.to_string())),
    }
}

/// Check whether `container_id` on `node` was pulled through the snapshotter,
/// using the logs of the cloud-api-adaptor pod scheduled on that node.
pub async fn is_pulled_with_snapshotter<C: ClusterApi>(
    cluster: &C,
    config: &AssertConfig,
    node: &str,
    container_id: &str,
) -> Result<bool> {
    let adaptor = adaptor_pod_for_node(cluster, config, node).await?;
    let target = PodTarget::new(config.adaptor_namespace.as_str(), adaptor.name_any());
    let log = cluster.pod_log(&target).await?;
    snapshotter_verdict(&log, container_id)
}

/// The cloud-api-adaptor pod scheduled on `node`.
pub async fn adaptor_pod_for_node<C: ClusterApi>(
    cluster: &C,
    config: &AssertConfig,
    node: &str,
) -> Result<Pod> {
    let pods = cluster
        .list_pods(&config.adaptor_namespace, Some(&config.adaptor_selector))
        .await?;
    pods.into_iter()
        .find(|p| node_name(p) == Some(node))
        .ok_or_else(|| {
            AssertError::PodNotFound(format!(
                "no cloud-api-adaptor pod on node {} in {}",
                node, config.adaptor_namespace
            ))
        })
}

/// Bare id of the pod's first container, without the runtime prefix.
pub fn container_id(pod: &Pod) -> Option<&str> {
    let raw = pod
        .status
        .as_ref()
        .and_then(|s| s.container_statuses.as_ref())
        .and_then(|statuses| statuses.first())
        .and_then(|cs| cs.container_id.as_deref())?;
    Some(raw.split_once("://").map_or(raw, |(_, id)| id))
}
