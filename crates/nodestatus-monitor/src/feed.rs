//! Asynchronous delivery of status events to a monitor.
//!
//! Producers that should not touch the monitor directly publish through an
//! [`EventFeed`]. The feed is unbounded: delivery is assumed reliable and
//! the subscriber only folds events into state, so there is nothing to push
//! back against. Events from one publisher arrive in publish order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::error::FeedError;
use crate::events::StatusEvent;
use crate::monitor::StatusMonitor;

/// Publishing half of a feed. Cheap to clone; one clone per producer.
#[derive(Debug, Clone)]
pub struct EventFeed {
    sender: mpsc::UnboundedSender<StatusEvent>,
}

/// Consuming half of a feed.
#[derive(Debug)]
pub struct FeedSubscription {
    receiver: mpsc::UnboundedReceiver<StatusEvent>,
}

/// Create a connected feed and subscription.
pub fn event_feed() -> (EventFeed, FeedSubscription) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (EventFeed { sender }, FeedSubscription { receiver })
}

impl EventFeed {
    pub fn publish(&self, event: impl Into<StatusEvent>) -> Result<(), FeedError> {
        self.sender
            .send(event.into())
            .map_err(|_| FeedError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl FeedSubscription {
    /// Apply events to `monitor` until every publisher has been dropped.
    ///
    /// Returns the number of events applied.
    pub async fn run(mut self, monitor: Arc<StatusMonitor>) -> u64 {
        info!("status event feed started");
        let mut applied = 0u64;
        while let Some(event) = self.receiver.recv().await {
            monitor.process(event);
            applied += 1;
        }
        info!(applied, "status event feed drained");
        applied
    }

    /// Run the subscription on its own task.
    pub fn spawn(self, monitor: Arc<StatusMonitor>) -> JoinHandle<u64> {
        tokio::spawn(self.run(monitor))
    }
}
