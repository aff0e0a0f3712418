use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::models::{Message, SendMessageRequest};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::gateway::MessagesGateway;
use crate::state::ActorContext;

/// Failures surfaced by [`MessageThread`].
///
/// The first three are local validation failures and never reach the network
/// layer; callers prevent them by disabling the input affordance.
#[derive(Debug, Error)]
pub enum ThreadError {
    /// The draft was empty or whitespace-only.
    #[error("draft is empty")]
    EmptyDraft,

    /// A send is already in flight.
    #[error("a send is already in flight")]
    SendInFlight,

    /// No peer is currently selected.
    #[error("no peer selected")]
    NoPeerSelected,

    /// The server rejected the send or the request failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Messages exchanged with one peer, grouped by calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    /// Day key (`YYYY-MM-DD`).
    pub day: String,
    /// Messages of that day, in input order.
    pub messages: Vec<Message>,
}

/// Group messages by calendar day, preserving overall order.
///
/// Group order is the first-seen order of each day key in the input, not a
/// sort of the keys; intra-group order is the input order. Pure transform.
#[must_use]
pub fn group_by_day(messages: &[Message]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    for message in messages {
        let day = message.created_at.day_key();
        match groups.iter_mut().find(|group| group.day == day) {
            Some(group) => group.messages.push(message.clone()),
            None => groups.push(DayGroup {
                day,
                messages: vec![message.clone()],
            }),
        }
    }
    groups
}

#[derive(Debug, Default)]
struct ThreadState {
    peer_id: Option<Uuid>,
    messages: Vec<Message>,
    loading: bool,
    sending: bool,
    error: Option<String>,
    fetch_seq: u64,
}

/// State of the message thread with the currently selected peer.
///
/// The thread belongs to exactly one peer pairing at a time. Every fetch is
/// tagged with a sequence number; a response whose tag is no longer current
/// (the selection moved on while it was in flight) is discarded.
pub struct MessageThread {
    gateway: Arc<dyn MessagesGateway>,
    actor: ActorContext,
    inner: Mutex<ThreadState>,
}

impl MessageThread {
    /// Create a thread controller for the given actor.
    #[must_use]
    pub fn new(gateway: Arc<dyn MessagesGateway>, actor: ActorContext) -> Self {
        Self {
            gateway,
            actor,
            inner: Mutex::new(ThreadState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ThreadState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the thread with the history for `peer`.
    ///
    /// `None` clears the thread and suppresses fetches until a peer is chosen
    /// again. On failure the error is recorded for the caller to render with a
    /// retry affordance; [`MessageThread::retry`] re-issues the same fetch.
    pub async fn load_for(&self, peer: Option<Uuid>) {
        let (seq, peer_id) = {
            let mut inner = self.lock();
            inner.fetch_seq += 1;
            inner.peer_id = peer;
            inner.messages.clear();
            inner.error = None;
            match peer {
                None => {
                    inner.loading = false;
                    return;
                }
                Some(id) => {
                    inner.loading = true;
                    (inner.fetch_seq, id)
                }
            }
        };

        debug!(peer = %peer_id, "loading thread");
        let result = self.gateway.thread(peer_id).await;

        let mut inner = self.lock();
        if inner.fetch_seq != seq {
            debug!(peer = %peer_id, "discarding stale thread response");
            return;
        }
        inner.loading = false;
        match result {
            Ok(messages) => {
                inner.messages = messages;
            }
            Err(err) => {
                warn!(peer = %peer_id, error = %err, "thread load failed");
                inner.error = Some(err.to_string());
            }
        }
    }

    /// Re-issue the last `load_for` with the same peer.
    pub async fn retry(&self) {
        let peer = self.lock().peer_id;
        self.load_for(peer).await;
    }

    /// Send `content` to the selected peer.
    ///
    /// Rejected locally, with zero network calls, when the draft is
    /// empty/whitespace-only, no peer is selected, or a send is already in
    /// flight. On success the server-returned message is appended to the tail
    /// of the thread (no refetch) unless the selection changed while the send
    /// was in flight. The draft is caller-owned and never cleared here.
    pub async fn send(&self, content: &str) -> Result<Message, ThreadError> {
        let draft = content.trim();
        if draft.is_empty() {
            return Err(ThreadError::EmptyDraft);
        }

        let (peer_id, seq) = {
            let mut inner = self.lock();
            let Some(peer_id) = inner.peer_id else {
                return Err(ThreadError::NoPeerSelected);
            };
            if inner.sending {
                return Err(ThreadError::SendInFlight);
            }
            inner.sending = true;
            (peer_id, inner.fetch_seq)
        };

        let request = SendMessageRequest {
            receiver_id: peer_id,
            content: draft.to_string(),
        };
        let result = self.gateway.send_message(request).await;

        let mut inner = self.lock();
        inner.sending = false;
        match result {
            Ok(message) => {
                if inner.fetch_seq == seq {
                    inner.messages.push(message.clone());
                } else {
                    debug!(peer = %peer_id, "selection changed during send; not appending");
                }
                Ok(message)
            }
            Err(err) => {
                warn!(peer = %peer_id, error = %err, "send failed");
                Err(ThreadError::Api(err))
            }
        }
    }

    /// Whether `message` was sent by the current actor.
    #[must_use]
    pub fn is_own(&self, message: &Message) -> bool {
        message.sender_id == self.actor.id()
    }

    /// The currently selected peer, if any.
    #[must_use]
    pub fn peer_id(&self) -> Option<Uuid> {
        self.lock().peer_id
    }

    /// Snapshot of the current messages, in thread order.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    /// Current messages grouped by calendar day.
    #[must_use]
    pub fn grouped_by_day(&self) -> Vec<DayGroup> {
        group_by_day(&self.lock().messages)
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Whether a send is in flight. Callers disable the input while true.
    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.lock().sending
    }

    /// The last load error, if the most recent fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }
}

impl std::fmt::Debug for MessageThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageThread")
            .field("actor", &self.actor.id())
            .finish_non_exhaustive()
    }
}
