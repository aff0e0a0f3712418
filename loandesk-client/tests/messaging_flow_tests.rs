//! End-to-end flow over the state controllers with a fake gateway: select a
//! conversation, load its thread, send a message.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use client::state::{
    ConversationList, MessageThread, MessagesRoute, RouteSink, SelectionController,
};
use client::{ActorContext, ApiError, MessagesGateway};
use shared::models::{
    Conversation, Message, SendMessageRequest, Timestamp, UserRole, UserSummary,
};
use uuid::Uuid;

fn user(id: Uuid, username: &str) -> UserSummary {
    UserSummary {
        id,
        username: username.to_string(),
        full_name: None,
        email: None,
        role: UserRole::Technician,
    }
}

struct FakeBackend {
    actor_id: Uuid,
    conversations: Vec<Conversation>,
    threads: Mutex<HashMap<Uuid, Vec<Message>>>,
}

#[async_trait]
impl MessagesGateway for FakeBackend {
    async fn conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        Ok(self.conversations.clone())
    }

    async fn thread(&self, peer_id: Uuid) -> Result<Vec<Message>, ApiError> {
        Ok(self
            .threads
            .lock()
            .unwrap()
            .get(&peer_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<Message, ApiError> {
        let message = Message {
            id: Uuid::new_v4(),
            sender_id: self.actor_id,
            receiver_id: request.receiver_id,
            content: request.content,
            created_at: Timestamp(Utc.with_ymd_and_hms(2025, 3, 8, 12, 5, 0).unwrap()),
        };
        self.threads
            .lock()
            .unwrap()
            .entry(request.receiver_id)
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn unread_count(&self) -> Result<u64, ApiError> {
        Ok(self
            .conversations
            .iter()
            .map(|c| u64::from(c.unread_count))
            .sum())
    }

    async fn technicians(&self) -> Result<Vec<UserSummary>, ApiError> {
        Ok(self.conversations.iter().map(|c| c.peer.clone()).collect())
    }
}

#[derive(Default)]
struct RecordingSink {
    routes: Mutex<Vec<MessagesRoute>>,
}

impl RouteSink for RecordingSink {
    fn navigate(&self, route: MessagesRoute) {
        self.routes.lock().unwrap().push(route);
    }
}

#[tokio::test]
async fn select_load_send_walkthrough() {
    let me = Uuid::new_v4();
    let peer_a = user(Uuid::new_v4(), "tech-a");
    let peer_b = user(Uuid::new_v4(), "tech-b");

    let existing = Message {
        id: Uuid::new_v4(),
        sender_id: peer_a.id,
        receiver_id: me,
        content: "Your loan request was received".to_string(),
        created_at: Timestamp(Utc.with_ymd_and_hms(2025, 3, 8, 12, 0, 0).unwrap()),
    };
    let backend = Arc::new(FakeBackend {
        actor_id: me,
        conversations: vec![
            Conversation {
                peer: peer_a.clone(),
                last_message: Some(existing.clone()),
                unread_count: 2,
            },
            Conversation {
                peer: peer_b,
                last_message: None,
                unread_count: 0,
            },
        ],
        threads: Mutex::new(HashMap::from([(peer_a.id, vec![existing.clone()])])),
    });

    let actor = ActorContext::new(user(me, "me"));
    let thread = Arc::new(MessageThread::new(backend.clone(), actor));

    // Selection changes flow to the thread controller through a channel, the
    // way a UI shell would wire the callback to `load_for`.
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let sink = Arc::new(RecordingSink::default());
    let selection = SelectionController::new(
        MessagesRoute::Index,
        sink.clone(),
        Box::new(move |peer| {
            let _ = tx.send(peer);
        }),
    );

    assert_eq!(selection.route(), MessagesRoute::Index);

    let list = ConversationList::new(
        backend.clone(),
        Box::new(move |peer| selection.select(peer)),
    );
    list.load().await;
    let conversations = list.conversations();
    assert_eq!(conversations.len(), 2);
    assert_eq!(conversations[0].unread_count, 2);

    // Select A; the callback chain delivers the peer to load_for.
    list.select(peer_a.id);
    let selected = rx.recv().await.unwrap();
    assert_eq!(selected, Some(peer_a.id));
    thread.load_for(selected).await;

    let before = thread.messages();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0], existing);

    // Send "hi": the server-assigned message lands at the tail, sender is us.
    let sent = thread.send("hi").await.unwrap();
    assert_eq!(sent.sender_id, me);

    let after = thread.messages();
    assert_eq!(after.len(), 2);
    assert_eq!(after[0], existing);
    assert_eq!(after[1].content, "hi");
    assert!(thread.is_own(&after[1]));

    // The route mirrors the selection.
    assert_eq!(
        *sink.routes.lock().unwrap(),
        vec![MessagesRoute::Conversation(peer_a.id)]
    );
}
