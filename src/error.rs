use std::time::Duration;

/// Errors produced by the assertion evaluators.
#[derive(Debug, thiserror::Error)]
pub enum AssertError {
    #[error("Failed to fetch logs for pod {pod}: {reason}")]
    Fetch { pod: String, reason: String },

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Failed to list pods: {0}")]
    List(String),

    #[error("No HH:MM:SS timestamp found in line: {0:?}")]
    NoTimestampFound(String),

    #[error("Timing window for image {image:?} is incomplete: {detail}")]
    IncompleteWindow { image: String, detail: &'static str },

    #[error("Timing window is inverted: end {end} precedes start {start}")]
    InvertedWindow {
        start: chrono::NaiveTime,
        end: chrono::NaiveTime,
    },

    #[error("Pod {pod} is not running (phase: {phase})")]
    PodNotRunning { pod: String, phase: String },

    #[error("Pod not found: {0}")]
    PodNotFound(String),

    #[error("No pattern matched any log line for container {0}")]
    NoMatchFound(String),

    #[error("Failed to create PodVM for pod {0}: stuck in ContainerCreating")]
    ProvisionError(String),

    #[error("Invalid Credentials: {0}")]
    InvalidCredentials(String),

    #[error("Invalid Image Name: {0}")]
    InvalidImageName(String),

    #[error("Invalid auth-json-secret: {0}")]
    InvalidPullSecret(String),

    #[error("No events found for pod {0}")]
    NoEventsFound(String),

    #[error("Timed out after {0:?} waiting for events")]
    Timeout(Duration),

    #[error("Pod log doesn't contain expected string {expected:?}")]
    UnexpectedLog { expected: String, log: String },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T, E = AssertError> = std::result::Result<T, E>;
