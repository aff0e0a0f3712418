//! State controllers for the LoanDesk client.
//!
//! Each controller exclusively owns one state slice and is the only writer to
//! it. Methods take `&self`; interior state lives behind a mutex that is never
//! held across an await point, so overlapping in-flight operations are
//! expressible and resolved by per-fetch sequence tags.

pub mod conversations;
pub mod notifications;
pub mod selection;
pub mod thread;
pub mod unread;

use shared::models::UserSummary;
use uuid::Uuid;

pub use conversations::ConversationList;
pub use notifications::{ConfirmPrompt, NotificationCenter, NotificationError};
pub use selection::{
    MessagesRoute, Pane, PaneVisibility, RouteSink, SelectionController, Viewport,
};
pub use thread::{DayGroup, MessageThread, ThreadError, group_by_day};
pub use unread::{MessageUnread, NotificationUnread, UnreadPoller, UnreadSource, badge};

/// The authenticated actor, passed explicitly into each controller that needs
/// an identity. Authentication itself happens outside this crate.
#[derive(Debug, Clone)]
pub struct ActorContext {
    /// Snapshot of the signed-in user.
    pub user: UserSummary,
}

impl ActorContext {
    /// Wrap an authenticated user snapshot.
    #[must_use]
    pub fn new(user: UserSummary) -> Self {
        Self { user }
    }

    /// The actor's id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}
