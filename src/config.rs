use std::time::Duration;

pub const DEFAULT_ADAPTOR_NAMESPACE: &str = "confidential-containers-system";
pub const DEFAULT_ADAPTOR_SELECTOR: &str = "app=cloud-api-adaptor";
pub const DEFAULT_WATCH_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_LOG_SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Knobs shared by the evaluators. Built once and passed by reference.
#[derive(Debug, Clone)]
pub struct AssertConfig {
    /// Namespace the cloud-api-adaptor daemonset runs in.
    pub adaptor_namespace: String,
    /// Label selector identifying cloud-api-adaptor pods.
    pub adaptor_selector: String,
    /// Total time to wait for a deciding event, measured from when the watch
    /// opens; `None` waits forever.
    pub watch_timeout: Option<Duration>,
    /// Pause before reading a freshly started pod's log.
    pub log_settle_delay: Duration,
}

impl Default for AssertConfig {
    fn default() -> Self {
        Self {
            adaptor_namespace: DEFAULT_ADAPTOR_NAMESPACE.to_string(),
            adaptor_selector: DEFAULT_ADAPTOR_SELECTOR.to_string(),
            watch_timeout: Some(DEFAULT_WATCH_TIMEOUT),
            log_settle_delay: DEFAULT_LOG_SETTLE_DELAY,
        }
    }
}
