use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::gateway::{MessagesGateway, NotificationsGateway};

/// A scalar unread count the poller can watch. Both gateway flavors provide
/// one; the adapters below pick which.
#[async_trait]
pub trait UnreadSource: Send + Sync {
    /// Current unread count for the actor.
    async fn unread_count(&self) -> Result<u64, ApiError>;
}

/// Watch the unread direct-message count.
#[derive(Clone)]
pub struct MessageUnread(pub Arc<dyn MessagesGateway>);

#[async_trait]
impl UnreadSource for MessageUnread {
    async fn unread_count(&self) -> Result<u64, ApiError> {
        MessagesGateway::unread_count(&*self.0).await
    }
}

/// Watch the unread notification count.
#[derive(Clone)]
pub struct NotificationUnread(pub Arc<dyn NotificationsGateway>);

#[async_trait]
impl UnreadSource for NotificationUnread {
    async fn unread_count(&self) -> Result<u64, ApiError> {
        NotificationsGateway::unread_count(&*self.0).await
    }
}

/// The badge rendering rule: nothing while loading and nothing at zero.
/// Absence of a badge is meaningful state, not an error.
#[must_use]
pub fn badge(latest: Option<u64>) -> Option<u64> {
    match latest {
        None | Some(0) => None,
        some => some,
    }
}

/// Periodic unread-count poller.
///
/// `start()` fetches immediately and then once per interval until `stop()`,
/// which cancels the task deterministically. Fetch failures are logged and
/// swallowed; the previous published value stays in place and the next tick is
/// the only retry. The latest value is published through a watch channel,
/// `None` until the first successful fetch.
pub struct UnreadPoller {
    source: Arc<dyn UnreadSource>,
    interval: Duration,
    tx: watch::Sender<Option<u64>>,
    task: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl UnreadPoller {
    /// Create a poller. Nothing runs until [`UnreadPoller::start`].
    #[must_use]
    pub fn new(source: Arc<dyn UnreadSource>, interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            source,
            interval,
            tx,
            task: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<(CancellationToken, JoinHandle<()>)>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Observe the latest published count.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<u64>> {
        self.tx.subscribe()
    }

    /// Start polling. A second `start` while running is a no-op.
    pub fn start(&self) {
        let mut task = self.lock();
        if task.is_some() {
            return;
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            self.source.clone(),
            self.interval,
            self.tx.clone(),
            token.clone(),
        ));
        *task = Some((token, handle));
        debug!(interval_secs = self.interval.as_secs(), "unread poller started");
    }

    /// Stop polling. No further fetches occur after this returns.
    pub fn stop(&self) {
        if let Some((token, handle)) = self.lock().take() {
            token.cancel();
            handle.abort();
            debug!("unread poller stopped");
        }
    }

    /// Whether the polling task is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock().is_some()
    }
}

impl Drop for UnreadPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for UnreadPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnreadPoller")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

async fn poll_loop(
    source: Arc<dyn UnreadSource>,
    period: Duration,
    tx: watch::Sender<Option<u64>>,
    token: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = token.cancelled() => break,
            _ = interval.tick() => {}
        }

        tokio::select! {
            () = token.cancelled() => break,
            result = source.unread_count() => match result {
                Ok(count) => {
                    let _ = tx.send(Some(count));
                }
                Err(err) => {
                    // Swallowed on purpose; the next tick is the retry.
                    warn!(error = %err, "unread-count poll failed");
                }
            },
        }
    }
}
