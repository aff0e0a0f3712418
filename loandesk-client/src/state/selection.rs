use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use uuid::Uuid;

/// Which view the messaging page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    /// The conversation list.
    List,
    /// The thread with the selected peer.
    Thread,
}

/// Width class of the hosting viewport. Pure rendering input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    Narrow,
    Wide,
}

/// Which panes are visible, per the viewport policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneVisibility {
    /// Whether the conversation list renders.
    pub list: bool,
    /// Whether the thread renders.
    pub thread: bool,
}

/// Route of the messaging page. The URL is a derived view of selection state;
/// hydration at construction is the only URL→state direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagesRoute {
    /// `/messages`
    Index,
    /// `/messages/{peer_id}`
    Conversation(Uuid),
}

impl MessagesRoute {
    /// Path form of the route.
    #[must_use]
    pub fn as_path(&self) -> String {
        match self {
            Self::Index => "/messages".to_string(),
            Self::Conversation(peer_id) => format!("/messages/{peer_id}"),
        }
    }

    /// Parse a path into a route. Returns `None` for paths outside the
    /// messaging page.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.strip_prefix("/messages")?;
        match rest.trim_matches('/') {
            "" => Some(Self::Index),
            segment => Uuid::parse_str(segment).ok().map(Self::Conversation),
        }
    }
}

/// The routing facility is a collaborator: selection changes push the derived
/// route out through this seam.
pub trait RouteSink: Send + Sync {
    /// Replace the current route.
    fn navigate(&self, route: MessagesRoute);
}

/// Callback invoked whenever the selected peer changes (including hydration
/// and clearing). Applications wire this to `MessageThread::load_for`.
pub type SelectionCallback = Box<dyn Fn(Option<Uuid>) + Send + Sync>;

/// Page-level coordinator owning "which peer is selected".
///
/// Two-state machine: `List` (no selection) and `Thread` (a peer selected).
/// Selecting triggers the thread fetch via the callback and updates the route;
/// `back()` clears both. The initial state hydrates from the mounting route.
pub struct SelectionController {
    sink: Arc<dyn RouteSink>,
    on_change: SelectionCallback,
    selected: Mutex<Option<Uuid>>,
}

impl SelectionController {
    /// Create the controller, hydrating from `initial` route. When the route
    /// carries a peer id the controller starts in `Thread` and fires the
    /// callback once; the route is not re-navigated during hydration.
    #[must_use]
    pub fn new(
        initial: MessagesRoute,
        sink: Arc<dyn RouteSink>,
        on_change: SelectionCallback,
    ) -> Self {
        let selected = match initial {
            MessagesRoute::Index => None,
            MessagesRoute::Conversation(peer_id) => Some(peer_id),
        };
        if let Some(peer_id) = selected {
            debug!(peer = %peer_id, "hydrating selection from route");
            on_change(Some(peer_id));
        }
        Self {
            sink,
            on_change,
            selected: Mutex::new(selected),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Uuid>> {
        self.selected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Select `peer_id`: fire the callback and push the derived route.
    /// Re-selecting the already-selected peer is a no-op.
    pub fn select(&self, peer_id: Uuid) {
        {
            let mut selected = self.lock();
            if *selected == Some(peer_id) {
                return;
            }
            *selected = Some(peer_id);
        }
        (self.on_change)(Some(peer_id));
        self.sink.navigate(MessagesRoute::Conversation(peer_id));
    }

    /// Return to the list: clear the selection and push the index route.
    pub fn back(&self) {
        {
            let mut selected = self.lock();
            if selected.is_none() {
                return;
            }
            *selected = None;
        }
        (self.on_change)(None);
        self.sink.navigate(MessagesRoute::Index);
    }

    /// The selected peer, if any.
    #[must_use]
    pub fn selected_peer(&self) -> Option<Uuid> {
        *self.lock()
    }

    /// Current pane, derived from the selection.
    #[must_use]
    pub fn pane(&self) -> Pane {
        if self.lock().is_some() {
            Pane::Thread
        } else {
            Pane::List
        }
    }

    /// Route corresponding to the current selection.
    #[must_use]
    pub fn route(&self) -> MessagesRoute {
        match *self.lock() {
            Some(peer_id) => MessagesRoute::Conversation(peer_id),
            None => MessagesRoute::Index,
        }
    }

    /// Viewport policy: on narrow viewports the panes are mutually exclusive
    /// full-screen views; on wide viewports the thread keeps the list visible
    /// side-by-side.
    #[must_use]
    pub fn visible_panes(&self, viewport: Viewport) -> PaneVisibility {
        match (self.pane(), viewport) {
            (Pane::List, _) => PaneVisibility {
                list: true,
                thread: false,
            },
            (Pane::Thread, Viewport::Narrow) => PaneVisibility {
                list: false,
                thread: true,
            },
            (Pane::Thread, Viewport::Wide) => PaneVisibility {
                list: true,
                thread: true,
            },
        }
    }
}

impl std::fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionController")
            .field("selected", &self.selected_peer())
            .finish_non_exhaustive()
    }
}
