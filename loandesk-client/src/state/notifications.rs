use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::models::{Notification, NotificationFilter};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::gateway::NotificationsGateway;

/// Confirmation collaborator for destructive actions. The CLI backs this with
/// a y/N prompt; a UI backs it with a blocking dialog.
pub trait ConfirmPrompt: Send + Sync {
    /// Ask the user to confirm; `false` aborts the action.
    fn confirm(&self, message: &str) -> bool;
}

/// Failures surfaced by [`NotificationCenter`] mutations.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// A `mark_all_read` is already in flight.
    #[error("a mark-all-read is already in flight")]
    BulkMarkInFlight,

    /// The server rejected the mutation or the request failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Default)]
struct CenterState {
    notifications: Vec<Notification>,
    loading: bool,
    marking_all: bool,
    error: Option<String>,
    load_seq: u64,
}

/// State of the notification list.
///
/// Read-state mutations are success-gated: the local flip happens only after
/// the server accepted the call, for the single-item and bulk paths alike.
/// This is a known, documented consistency trade: a failure leaves local state
/// untouched and surfaces a non-blocking error instead of rolling anything
/// back. Derived counts are computed from the list, never stored.
pub struct NotificationCenter {
    gateway: Arc<dyn NotificationsGateway>,
    inner: Mutex<CenterState>,
}

impl NotificationCenter {
    /// Create a notification controller.
    #[must_use]
    pub fn new(gateway: Arc<dyn NotificationsGateway>) -> Self {
        Self {
            gateway,
            inner: Mutex::new(CenterState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CenterState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the full notification set, replace wholesale, clear prior error.
    pub async fn load(&self) {
        let seq = {
            let mut inner = self.lock();
            inner.load_seq += 1;
            inner.loading = true;
            inner.load_seq
        };

        debug!("loading notifications");
        let result = self.gateway.notifications().await;

        let mut inner = self.lock();
        if inner.load_seq != seq {
            debug!("discarding stale notification list response");
            return;
        }
        inner.loading = false;
        match result {
            Ok(notifications) => {
                inner.notifications = notifications;
                inner.error = None;
            }
            Err(err) => {
                warn!(error = %err, "notification list load failed");
                inner.error = Some(err.to_string());
            }
        }
    }

    /// Mark one notification read.
    ///
    /// The server call is issued first; on success only the matching entry is
    /// flipped. Idempotent from the caller's perspective: re-marking a read id
    /// still issues the call and never double-flips.
    pub async fn mark_read(&self, id: Uuid) -> Result<(), NotificationError> {
        match self.gateway.mark_read(id).await {
            Ok(()) => {
                let mut inner = self.lock();
                if let Some(notification) =
                    inner.notifications.iter_mut().find(|n| n.id == id)
                {
                    notification.is_read = true;
                }
                inner.error = None;
                Ok(())
            }
            Err(err) => {
                warn!(%id, error = %err, "mark-read failed");
                self.lock().error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Mark every notification read with a single server call.
    ///
    /// Guarded by a single-flight flag: a second call while one is in flight
    /// returns [`NotificationError::BulkMarkInFlight`] without touching the
    /// network.
    pub async fn mark_all_read(&self) -> Result<(), NotificationError> {
        {
            let mut inner = self.lock();
            if inner.marking_all {
                return Err(NotificationError::BulkMarkInFlight);
            }
            inner.marking_all = true;
        }

        let result = self.gateway.mark_all_read().await;

        let mut inner = self.lock();
        inner.marking_all = false;
        match result {
            Ok(()) => {
                for notification in &mut inner.notifications {
                    notification.is_read = true;
                }
                inner.error = None;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "mark-all-read failed");
                inner.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Delete one notification after explicit confirmation.
    ///
    /// A declined prompt issues no network call and returns `Ok(false)`.
    /// Removal of the local entry is strictly success-gated; on failure the
    /// item remains and the error is recorded. Returns `Ok(true)` when the
    /// entry was deleted.
    pub async fn delete(
        &self,
        id: Uuid,
        prompt: &dyn ConfirmPrompt,
    ) -> Result<bool, NotificationError> {
        if !prompt.confirm("Delete this notification?") {
            debug!(%id, "delete declined");
            return Ok(false);
        }

        match self.gateway.delete(id).await {
            Ok(()) => {
                let mut inner = self.lock();
                inner.notifications.retain(|n| n.id != id);
                inner.error = None;
                Ok(true)
            }
            Err(err) => {
                warn!(%id, error = %err, "delete failed");
                self.lock().error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Notifications visible under `filter`, in server order. Pure local
    /// predicate; never fetches.
    #[must_use]
    pub fn filter(&self, filter: NotificationFilter) -> Vec<Notification> {
        self.lock()
            .notifications
            .iter()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect()
    }

    /// Number of unread notifications. Computed, not stored.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.lock().notifications.iter().filter(|n| !n.is_read).count()
    }

    /// Number of read notifications. Computed, not stored.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.lock().notifications.iter().filter(|n| n.is_read).count()
    }

    /// Whether a load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Whether a bulk mark-read is in flight.
    #[must_use]
    pub fn is_marking_all(&self) -> bool {
        self.lock().marking_all
    }

    /// The last error, if the most recent operation failed.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter").finish_non_exhaustive()
    }
}
