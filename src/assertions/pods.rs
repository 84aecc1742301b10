use crate::config::AssertConfig;
use crate::error::{AssertError, Result};
use crate::kubernetes::{ClusterApi, involved_object_selector};
use crate::types::{EventType, PodTarget, PodWarning};
use crate::utils::node_name;
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;

/// Look a pod up by name in its namespace.
pub async fn find_pod<C: ClusterApi>(cluster: &C, namespace: &str, name: &str) -> Result<Pod> {
    cluster
        .list_pods(namespace, None)
        .await?
        .into_iter()
        .find(|p| p.name_any() == name)
        .ok_or_else(|| AssertError::PodNotFound(format!("{}/{}", namespace, name)))
}

/// Check that a pod's log contains `expected`, returning the trimmed log.
pub async fn log_contains<C: ClusterApi>(
    cluster: &C,
    config: &AssertConfig,
    namespace: &str,
    pod_name: &str,
    expected: &str,
) -> Result<String> {
    let pod = find_pod(cluster, namespace, pod_name).await?;
    // give the container time to start logging
    tokio::time::sleep(config.log_settle_delay).await;

    let target = PodTarget::new(namespace, pod.name_any());
    let log = cluster.pod_log(&target).await?.trimmed();
    if log.contains(expected) {
        Ok(log)
    } else {
        Err(AssertError::UnexpectedLog {
            expected: expected.to_string(),
            log,
        })
    }
}

pub async fn node_name_for_pod<C: ClusterApi>(
    cluster: &C,
    namespace: &str,
    pod_name: &str,
) -> Result<String> {
    let pod = find_pod(cluster, namespace, pod_name).await?;
    node_name(&pod)
        .map(str::to_string)
        .ok_or_else(|| {
            AssertError::PodNotFound(format!("{}/{} is not scheduled", namespace, pod_name))
        })
}

/// First warning event about a pod.
pub async fn first_warning_event<C: ClusterApi>(
    cluster: &C,
    config: &AssertConfig,
    namespace: &str,
    pod_name: &str,
) -> Result<PodWarning> {
    let fields = involved_object_selector(pod_name);
    let mut events = cluster
        .watch_events(namespace, Some(&fields))
        .await?
        .with_deadline(config.watch_timeout);

    while let Some(event) = events.next_event().await? {
        if event.event_type == EventType::Warning {
            return Ok(PodWarning {
                event_type: event.event_type,
                reason: event.reason,
                description: event.message,
            });
        }
    }
    Err(AssertError::NoEventsFound(pod_name.to_string()))
}
