pub mod conversation;
pub mod errors;
pub mod message;
pub mod notification;
pub mod timestamp;
pub mod user;

pub use conversation::Conversation;
pub use errors::ErrorResponse;
pub use message::{Message, SendMessageRequest, UnreadCountResponse};
pub use notification::{Notification, NotificationFilter, NotificationType};
pub use timestamp::Timestamp;
pub use user::{UserRole, UserSummary};
