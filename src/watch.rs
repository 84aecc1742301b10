use crate::error::{AssertError, Result};
use crate::types::PodEvent;
use futures::stream::{BoxStream, StreamExt};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

type StopHook = Box<dyn FnOnce() + Send>;

/// A live feed of cluster events.
///
/// The underlying stream is released exactly once: on [`stop`](Self::stop),
/// or when the subscription is dropped, whichever comes first.
pub struct EventSubscription {
    stream: Option<BoxStream<'static, Result<PodEvent>>>,
    deadline: Option<(Instant, Duration)>,
    on_stop: Option<StopHook>,
}

impl EventSubscription {
    pub fn new(stream: BoxStream<'static, Result<PodEvent>>) -> Self {
        Self {
            stream: Some(stream),
            deadline: None,
            on_stop: None,
        }
    }

    /// Fail [`next_event`](Self::next_event) with `Timeout` once `timeout`
    /// has elapsed from now. `None` keeps the wait unbounded.
    pub fn with_deadline(mut self, timeout: Option<Duration>) -> Self {
        self.deadline = timeout.map(|t| (Instant::now() + t, t));
        self
    }

    /// Run `hook` when the stream is released.
    pub fn on_stop(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_stop = Some(Box::new(hook));
        self
    }

    /// Next event in delivery order, or `None` once the feed is closed.
    pub async fn next_event(&mut self) -> Result<Option<PodEvent>> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(None);
        };
        let item = match self.deadline {
            Some((at, timeout)) => tokio::time::timeout_at(at, stream.next())
                .await
                .map_err(|_| AssertError::Timeout(timeout))?,
            None => stream.next().await,
        };
        item.transpose()
    }

    pub fn is_stopped(&self) -> bool {
        self.stream.is_none()
    }

    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            debug!("Stopping event subscription");
            if let Some(hook) = self.on_stop.take() {
                hook();
            }
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.stop();
    }
}
