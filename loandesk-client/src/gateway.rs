use async_trait::async_trait;
use shared::models::{Conversation, Message, Notification, SendMessageRequest, UserSummary};
use uuid::Uuid;

use crate::api::LoanDeskClient;
use crate::error::ApiError;

/// Read/write access to the messaging side of the backend.
///
/// The state controllers depend on this seam rather than on
/// [`LoanDeskClient`] directly; tests substitute in-memory fakes.
#[async_trait]
pub trait MessagesGateway: Send + Sync {
    /// All conversations for the current actor, in server order.
    async fn conversations(&self) -> Result<Vec<Conversation>, ApiError>;

    /// Full message history with one peer.
    async fn thread(&self, peer_id: Uuid) -> Result<Vec<Message>, ApiError>;

    /// Create a message; returns it with server-assigned id and timestamp.
    async fn send_message(&self, request: SendMessageRequest) -> Result<Message, ApiError>;

    /// Unread direct-message count.
    async fn unread_count(&self) -> Result<u64, ApiError>;

    /// Technicians available as send targets.
    async fn technicians(&self) -> Result<Vec<UserSummary>, ApiError>;
}

/// Read/write access to the notification side of the backend.
#[async_trait]
pub trait NotificationsGateway: Send + Sync {
    /// All notifications for the current actor, in server order.
    async fn notifications(&self) -> Result<Vec<Notification>, ApiError>;

    /// Unread notification count.
    async fn unread_count(&self) -> Result<u64, ApiError>;

    /// Mark one notification read. Idempotent.
    async fn mark_read(&self, id: Uuid) -> Result<(), ApiError>;

    /// Mark every notification read in one call.
    async fn mark_all_read(&self) -> Result<(), ApiError>;

    /// Delete one notification.
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

#[async_trait]
impl MessagesGateway for LoanDeskClient {
    async fn conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        LoanDeskClient::conversations(self).await
    }

    async fn thread(&self, peer_id: Uuid) -> Result<Vec<Message>, ApiError> {
        LoanDeskClient::thread(self, peer_id).await
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<Message, ApiError> {
        LoanDeskClient::send_message(self, &request).await
    }

    async fn unread_count(&self) -> Result<u64, ApiError> {
        self.unread_message_count().await
    }

    async fn technicians(&self) -> Result<Vec<UserSummary>, ApiError> {
        LoanDeskClient::technicians(self).await
    }
}

#[async_trait]
impl NotificationsGateway for LoanDeskClient {
    async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        LoanDeskClient::notifications(self).await
    }

    async fn unread_count(&self) -> Result<u64, ApiError> {
        self.unread_notification_count().await
    }

    async fn mark_read(&self, id: Uuid) -> Result<(), ApiError> {
        self.mark_notification_read(id).await
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.mark_all_notifications_read().await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete_notification(id).await
    }
}
