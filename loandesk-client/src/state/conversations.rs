use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::models::Conversation;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::gateway::MessagesGateway;

/// Callback invoked when the user picks a conversation.
pub type SelectCallback = Box<dyn Fn(Uuid) + Send + Sync>;

#[derive(Default)]
struct ListState {
    conversations: Vec<Conversation>,
    loading: bool,
    error: Option<String>,
    active_peer: Option<Uuid>,
    load_seq: u64,
}

/// State of the conversation list.
///
/// The list is replaced wholesale on every load; there is no local merge and
/// no client-side re-sort — conversations render in server order. Unread
/// counts are not decremented locally on selection; callers refresh them with
/// a subsequent [`ConversationList::load`].
pub struct ConversationList {
    gateway: Arc<dyn MessagesGateway>,
    on_select: SelectCallback,
    inner: Mutex<ListState>,
}

impl ConversationList {
    /// Create a list controller. `on_select` receives the peer id whenever
    /// [`ConversationList::select`] is invoked.
    #[must_use]
    pub fn new(gateway: Arc<dyn MessagesGateway>, on_select: SelectCallback) -> Self {
        Self {
            gateway,
            on_select,
            inner: Mutex::new(ListState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch all conversations for the current actor.
    ///
    /// On success the state is replaced wholesale and any prior error cleared;
    /// on failure the error is recorded and the list left empty. A load
    /// superseded by a newer one is discarded on resolution.
    pub async fn load(&self) {
        let seq = {
            let mut inner = self.lock();
            inner.load_seq += 1;
            inner.loading = true;
            inner.load_seq
        };

        debug!("loading conversations");
        let result = self.gateway.conversations().await;

        let mut inner = self.lock();
        if inner.load_seq != seq {
            debug!("discarding stale conversation list response");
            return;
        }
        inner.loading = false;
        match result {
            Ok(conversations) => {
                inner.conversations = conversations;
                inner.error = None;
            }
            Err(err) => {
                warn!(error = %err, "conversation list load failed");
                inner.conversations.clear();
                inner.error = Some(err.to_string());
            }
        }
    }

    /// Record `peer_id` as active (for highlighting) and invoke the selection
    /// callback. Side-effect only: the list itself is not mutated.
    pub fn select(&self, peer_id: Uuid) {
        self.lock().active_peer = Some(peer_id);
        (self.on_select)(peer_id);
    }

    /// Clear the active highlight without touching the list.
    pub fn clear_selection(&self) {
        self.lock().active_peer = None;
    }

    /// Snapshot of the conversations, in server order.
    #[must_use]
    pub fn conversations(&self) -> Vec<Conversation> {
        self.lock().conversations.clone()
    }

    /// The peer currently highlighted, if any.
    #[must_use]
    pub fn active_peer(&self) -> Option<Uuid> {
        self.lock().active_peer
    }

    /// Whether `peer_id` is the highlighted conversation.
    #[must_use]
    pub fn is_active(&self, peer_id: Uuid) -> bool {
        self.lock().active_peer == Some(peer_id)
    }

    /// Whether a load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// The last load error, if the most recent fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }
}

impl std::fmt::Debug for ConversationList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationList").finish_non_exhaustive()
    }
}
