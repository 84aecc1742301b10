//! Evaluators turning pod logs and cluster events into verdicts.
//!
//! Every evaluator fetches its signals fresh from the cluster when called and
//! keeps nothing between calls.

mod auth;
mod image_pull;
mod pods;
mod snapshotter;
mod tally;

pub use auth::{authenticated_image_status, resolve_auth_event};
pub use image_pull::{image_pull_duration, pull_window};
pub use pods::{find_pod, first_warning_event, log_contains, node_name_for_pod};
pub use snapshotter::{
    adaptor_pod_for_node, container_id, is_pulled_with_snapshotter, snapshotter_verdict,
};
pub use tally::{PodOutcome, classify_pod, job_pod_tally};
