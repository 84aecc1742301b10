use crate::error::{AssertError, Result};
use crate::kubernetes::ClusterApi;
use crate::timestamp::parse_time_of_day;
use crate::types::{LogText, PodTarget, TimingWindow};
use crate::utils::{first_container_image, pod_phase};
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use std::time::Duration;
use tracing::{debug, info};

/// Locate the most recent pull of `image` in an adaptor log.
///
/// Lines are scanned newest first. An end marker records the end time and the
/// scan goes on; the first start marker records the start time and ends the
/// scan, so a stale pull of the same image further back is never used.
pub fn pull_window(log: &LogText, image: &str) -> Result<TimingWindow> {
    let start_marker = format!("calling PullImage for \"{}\"", image);
    let end_marker = format!("successfully pulled image \"{}\"", image);

    let incomplete = |detail| AssertError::IncompleteWindow {
        image: image.to_string(),
        detail,
    };
    if log.is_empty() {
        return Err(incomplete("pod log is empty"));
    }

    let mut start = None;
    let mut end = None;
    for line in log.newest_first() {
        if line.contains(&start_marker) {
            start = Some(parse_time_of_day(line)?);
            break;
        }
        if line.contains(&end_marker) {
            end = Some(parse_time_of_day(line)?);
        }
    }

    match (start, end) {
        (Some(start), Some(end)) => Ok(TimingWindow { start, end }),
        (None, _) => Err(incomplete("start marker not found")),
        (Some(_), None) => Err(incomplete("end marker not found")),
    }
}

/// How long the adaptor took to pull the image of `workload`'s first container.
pub async fn image_pull_duration<C: ClusterApi>(
    cluster: &C,
    adaptor_pod: &Pod,
    workload: &Pod,
) -> Result<Duration> {
    let phase = pod_phase(workload);
    if phase != "Running" {
        return Err(AssertError::PodNotRunning {
            pod: workload.name_any(),
            phase: phase.to_string(),
        });
    }
    let image = first_container_image(workload).ok_or_else(|| {
        AssertError::InvalidArgument(format!("pod {} has no container image", workload.name_any()))
    })?;

    let target = PodTarget::new(
        adaptor_pod.namespace().unwrap_or_default(),
        adaptor_pod.name_any(),
    );
    let log = cluster.pod_log(&target).await?;
    let window = pull_window(&log, image)?;
    debug!("Pull window for {}: {} -> {}", image, window.start, window.end);

    let elapsed = window.duration()?;
    info!("Image {} pulled in {:?}", image, elapsed);
    Ok(elapsed)
}
