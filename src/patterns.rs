use crate::error::Result;
use crate::types::LogText;
use regex::Regex;

/// Ordered list of labelled patterns. Earlier entries win ties on the same line.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<(&'static str, Regex)>,
}

/// A line accepted by a [`PatternSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch<'a> {
    pub label: &'static str,
    pub line: &'a str,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: &'static str, pattern: &str) -> Result<Self> {
        self.patterns.push((label, Regex::new(pattern)?));
        Ok(self)
    }

    /// Label of the first pattern matching `line`.
    pub fn match_line(&self, line: &str) -> Option<&'static str> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(line))
            .map(|(label, _)| *label)
    }

    /// Newest log line matched by any pattern.
    pub fn newest_match<'a>(&self, log: &'a LogText) -> Option<PatternMatch<'a>> {
        for line in log.newest_first() {
            if let Some(label) = self.match_line(line) {
                return Some(PatternMatch { label, line });
            }
        }
        None
    }
}

/// Patterns distinguishing a guest-pull (snapshotter) image pull from an
/// explicit PullImage call for one container.
pub fn snapshotter_patterns(container_id: &str) -> Result<PatternSet> {
    let cid = regex::escape(container_id);
    PatternSet::new()
        .with(
            GUEST_PULL,
            &format!(r"mount_point:/run/kata-containers.*{}.*driver:image_guest_pull", cid),
        )?
        .with(
            LEGACY_PULL,
            &format!(r"CreateContainer: calling PullImage.*before CreateContainer.*{}", cid),
        )
}

pub const GUEST_PULL: &str = "guest-pull";
pub const LEGACY_PULL: &str = "legacy";
