use std::time::Duration;

use reqwest::{Client, Response};
use shared::config::ClientConfig;
use shared::models::{
    Conversation, ErrorResponse, Message, Notification, SendMessageRequest, UnreadCountResponse,
    UserSummary,
};
use uuid::Uuid;

use crate::error::ApiError;

const USER_AGENT: &str = concat!("loandesk-client/", env!("CARGO_PKG_VERSION"));

/// Lightweight API client for the LoanDesk REST backend.
///
/// One async method per operation, JSON in and out. No retry or caching of its
/// own; failures propagate unchanged as [`ApiError`].
#[derive(Clone, Debug)]
pub struct LoanDeskClient {
    base_url: String,
    client: Client,
}

impl LoanDeskClient {
    /// Create a new API client with the provided base URL and a default
    /// `reqwest` client.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new API client over an externally configured `reqwest` client
    /// (cookies, auth headers, and TLS are the caller's business).
    #[must_use]
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Build a client from a resolved [`ClientConfig`].
    ///
    /// # Errors
    /// Returns [`ApiError::Transport`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(config.server_url.as_str(), client))
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// List all conversations for the current actor, in server order.
    pub async fn conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let response = self
            .client
            .get(self.api_url("messages/conversations"))
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// Fetch the full message history exchanged with one peer.
    pub async fn thread(&self, peer_id: Uuid) -> Result<Vec<Message>, ApiError> {
        let response = self
            .client
            .get(self.api_url(&format!("messages/conversation/{peer_id}")))
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// Send a direct message. Returns the created message with its
    /// server-assigned id and timestamp.
    pub async fn send_message(&self, request: &SendMessageRequest) -> Result<Message, ApiError> {
        let response = self
            .client
            .post(self.api_url("messages"))
            .json(request)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// Unread direct-message count for the current actor.
    pub async fn unread_message_count(&self) -> Result<u64, ApiError> {
        let response = self
            .client
            .get(self.api_url("messages/unread-count"))
            .send()
            .await?;
        let body: UnreadCountResponse = ensure_success(response).await?.json().await?;
        Ok(body.count)
    }

    /// List the technicians available as message targets.
    pub async fn technicians(&self) -> Result<Vec<UserSummary>, ApiError> {
        let response = self
            .client
            .get(self.api_url("messages/technicians"))
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// List all notifications for the current actor, in server order.
    pub async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let response = self.client.get(self.api_url("notifications")).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// Unread notification count for the current actor.
    pub async fn unread_notification_count(&self) -> Result<u64, ApiError> {
        let response = self
            .client
            .get(self.api_url("notifications/unread-count"))
            .send()
            .await?;
        let body: UnreadCountResponse = ensure_success(response).await?.json().await?;
        Ok(body.count)
    }

    /// Mark one notification as read. Idempotent on the server side.
    pub async fn mark_notification_read(&self, id: Uuid) -> Result<(), ApiError> {
        let response = self
            .client
            .patch(self.api_url(&format!("notifications/{id}/read")))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Mark every notification as read in one call.
    pub async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .patch(self.api_url("notifications/mark-all-read"))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Delete one notification.
    pub async fn delete_notification(&self, id: Uuid) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.api_url(&format!("notifications/{id}")))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Map a non-success response to [`ApiError::Status`], extracting the server's
/// [`ErrorResponse`] body when one is present.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(error) => error.to_string(),
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => body,
    };
    Err(ApiError::Status { status, message })
}
