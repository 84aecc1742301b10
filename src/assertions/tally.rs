use crate::config::AssertConfig;
use crate::error::{AssertError, Result};
use crate::kubernetes::{ClusterApi, involved_object_selector};
use crate::types::{PodTally, PodTarget};
use crate::utils::{first_container_state, pod_phase};
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use tracing::{debug, info, warn};

/// Where a job pod stands, judged from its first container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodOutcome {
    /// Pending with the container still being created: the pod VM never came up.
    Provisioning,
    StartError,
    Completed,
    Other,
}

pub fn classify_pod(pod: &Pod) -> PodOutcome {
    let state = first_container_state(pod);
    let waiting = state
        .and_then(|s| s.waiting.as_ref())
        .and_then(|w| w.reason.as_deref());
    if pod_phase(pod) == "Pending" && waiting == Some("ContainerCreating") {
        return PodOutcome::Provisioning;
    }
    match state
        .and_then(|s| s.terminated.as_ref())
        .and_then(|t| t.reason.as_deref())
    {
        Some("StartError") => PodOutcome::StartError,
        Some("Completed") => PodOutcome::Completed,
        _ => PodOutcome::Other,
    }
}

/// Count completed and failed-to-start pods of a job.
///
/// A pod still provisioning aborts the tally. For completed pods the log is
/// captured once their `Started` event shows up; that capture is best effort.
pub async fn job_pod_tally<C: ClusterApi>(
    cluster: &C,
    config: &AssertConfig,
    namespace: &str,
    job_name: &str,
) -> Result<PodTally> {
    let pods = cluster.list_job_pods(namespace, job_name).await?;
    let mut tally = PodTally::default();

    for pod in &pods {
        let name = pod.name_any();
        match classify_pod(pod) {
            PodOutcome::Provisioning => return Err(AssertError::ProvisionError(name)),
            PodOutcome::StartError => {
                tally.error_count += 1;
                warn!("WARNING: {} - StartError", name);
            }
            PodOutcome::Completed => {
                tally.success_count += 1;
                if let Some(log) = capture_started_log(cluster, config, namespace, &name).await? {
                    tally.last_log = log;
                }
                info!("SUCCESS: {} - Completed - LOG: {}", name, tally.last_log);
            }
            PodOutcome::Other => debug!("Skipping pod {} ({})", name, pod_phase(pod)),
        }
    }
    Ok(tally)
}

/// Wait for the pod's `Started` event and grab its log.
///
/// Only a failure to open the watch is returned; everything after that is
/// logged and reported as `None`.
async fn capture_started_log<C: ClusterApi>(
    cluster: &C,
    config: &AssertConfig,
    namespace: &str,
    pod_name: &str,
) -> Result<Option<String>> {
    let fields = involved_object_selector(pod_name);
    let mut events = cluster
        .watch_events(namespace, Some(&fields))
        .await?
        .with_deadline(config.watch_timeout);

    loop {
        match events.next_event().await {
            Ok(Some(event))
                if event.reason == "Started" && event.involved_object_name == pod_name =>
            {
                break;
            }
            Ok(Some(_)) => continue,
            Ok(None) => {
                warn!("No Started event seen for pod {}", pod_name);
                return Ok(None);
            }
            Err(e) => {
                warn!("Waiting for Started event of pod {} failed: {}", pod_name, e);
                return Ok(None);
            }
        }
    }
    events.stop();

    match cluster.pod_log(&PodTarget::new(namespace, pod_name)).await {
        Ok(log) => Ok(Some(log.trimmed())),
        Err(e) => {
            warn!("Could not capture log of pod {}: {}", pod_name, e);
            Ok(None)
        }
    }
}
