use crate::config::AssertConfig;
use crate::error::{AssertError, Result};
use crate::kubernetes::{ClusterApi, involved_object_selector};
use crate::types::{EventType, ExpectedStatus, PodEvent};
use tracing::{debug, info};

const CREDENTIAL_FAILURES: [&str; 3] = [
    "failed to authorize",
    "illegal base64 data at input byte",
    "401 UNAUTHORIZED",
];
const IMAGE_NOT_FOUND: &str = "not found";
const PULL_SECRET_FAILURE: &str = "failed to pull manifest Not authorized";

/// Apply one event to the authentication state machine.
///
/// Returns `None` while still waiting, or the final outcome once the event
/// resolves it. A "not found" warning always fails; the other warning kinds
/// only fail when the pod was expected to complete.
pub fn resolve_auth_event(
    event: &PodEvent,
    pod_name: &str,
    expected: ExpectedStatus,
) -> Option<Result<()>> {
    if event.involved_object_name != pod_name {
        return None;
    }
    let message = event.message.as_str();
    match event.event_type {
        EventType::Normal if event.reason == "Started" => Some(Ok(())),
        EventType::Warning if CREDENTIAL_FAILURES.iter().any(|m| message.contains(m)) => {
            Some(rejection(expected, AssertError::InvalidCredentials(message.to_string())))
        }
        EventType::Warning if message.contains(IMAGE_NOT_FOUND) => {
            Some(Err(AssertError::InvalidImageName(message.to_string())))
        }
        EventType::Warning if message.contains(PULL_SECRET_FAILURE) => {
            Some(rejection(expected, AssertError::InvalidPullSecret(message.to_string())))
        }
        _ => None,
    }
}

fn rejection(expected: ExpectedStatus, err: AssertError) -> Result<()> {
    match expected {
        ExpectedStatus::Completed => Err(err),
        ExpectedStatus::Failed => Ok(()),
    }
}

/// Watch the pod's events until one decides whether the image could be pulled
/// with the configured credentials as `expected`.
pub async fn authenticated_image_status<C: ClusterApi>(
    cluster: &C,
    config: &AssertConfig,
    namespace: &str,
    pod_name: &str,
    expected: ExpectedStatus,
) -> Result<()> {
    let fields = involved_object_selector(pod_name);
    let mut events = cluster
        .watch_events(namespace, Some(&fields))
        .await?
        .with_deadline(config.watch_timeout);

    while let Some(event) = events.next_event().await? {
        debug!(
            "Event for {}: {} {} {}",
            event.involved_object_name, event.event_type, event.reason, event.message
        );
        if let Some(outcome) = resolve_auth_event(&event, pod_name, expected) {
            events.stop();
            info!("Authentication status of {} resolved: {:?}", pod_name, outcome);
            return outcome;
        }
    }
    Err(AssertError::NoEventsFound(pod_name.to_string()))
}
