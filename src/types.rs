use crate::error::AssertError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Full log text of one container, oldest line first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogText {
    lines: Vec<String>,
}

impl LogText {
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    /// Lines in the order they were produced.
    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Lines newest first, the order most evaluators scan in.
    pub fn newest_first(&self) -> impl Iterator<Item = &str> {
        self.lines().rev()
    }

    /// The whole log with surrounding whitespace removed.
    pub fn trimmed(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

impl From<&str> for LogText {
    fn from(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }
}

impl From<Vec<String>> for LogText {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

/// Identity of a pod (and optionally one of its containers) to read logs from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodTarget {
    pub namespace: String,
    pub name: String,
    pub container: Option<String>,
}

impl PodTarget {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            container: None,
        }
    }

    pub fn container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }
}

impl fmt::Display for PodTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.container {
            Some(c) => write!(f, "{}/{}/{}", self.namespace, self.name, c),
            None => write!(f, "{}/{}", self.namespace, self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    Normal,
    Warning,
    Other(String),
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s {
            "Normal" => EventType::Normal,
            "Warning" => EventType::Warning,
            other => EventType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Normal => f.write_str("Normal"),
            EventType::Warning => f.write_str("Warning"),
            EventType::Other(s) => f.write_str(s),
        }
    }
}

/// A cluster event, flattened to the fields the evaluators look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodEvent {
    pub event_type: EventType,
    pub reason: String,
    pub message: String,
    pub involved_object_name: String,
    pub namespace: String,
}

impl From<k8s_openapi::api::core::v1::Event> for PodEvent {
    fn from(ev: k8s_openapi::api::core::v1::Event) -> Self {
        PodEvent {
            event_type: EventType::from(ev.type_.as_deref().unwrap_or("")),
            reason: ev.reason.unwrap_or_default(),
            message: ev.message.unwrap_or_default(),
            involved_object_name: ev.involved_object.name.unwrap_or_default(),
            namespace: ev.metadata.namespace.unwrap_or_default(),
        }
    }
}

/// First warning seen for a pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodWarning {
    pub event_type: EventType,
    pub reason: String,
    pub description: String,
}

/// Start/end of a measured operation, both taken from log timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingWindow {
    pub start: chrono::NaiveTime,
    pub end: chrono::NaiveTime,
}

impl TimingWindow {
    pub fn duration(&self) -> Result<Duration, AssertError> {
        (self.end - self.start)
            .to_std()
            .map_err(|_| AssertError::InvertedWindow {
                start: self.start,
                end: self.end,
            })
    }
}

/// Outcome counts for the pods of one job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodTally {
    pub success_count: usize,
    pub error_count: usize,
    pub last_log: String,
}

/// Status the caller expects an authenticated-image pod to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedStatus {
    Completed,
    Failed,
}

impl FromStr for ExpectedStatus {
    type Err = AssertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "completed" => Ok(ExpectedStatus::Completed),
            "failed" => Ok(ExpectedStatus::Failed),
            _ => Err(AssertError::InvalidArgument(format!(
                "unknown expected status: {}",
                s
            ))),
        }
    }
}
