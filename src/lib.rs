//! Log- and event-based assertions about confidential-container pods.
//!
//! The evaluators in [`assertions`] read pod logs and cluster events through
//! [`ClusterApi`] and turn them into verdicts, durations or tallies.

pub mod assertions;
pub mod config;
pub mod error;
pub mod kubernetes;
pub mod patterns;
pub mod providers;
pub mod timestamp;
pub mod types;
pub mod utils;
pub mod watch;


pub use config::AssertConfig;
pub use error::{AssertError, Result};
pub use kubernetes::{ClusterApi, KubeCluster};
pub use types::{EventType, ExpectedStatus, LogText, PodEvent, PodTally, PodTarget, TimingWindow};
pub use watch::EventSubscription;
