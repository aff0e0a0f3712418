//! Integration tests for the REST facade against an in-process HTTP server.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use client::{ApiError, LoanDeskClient};
use serde_json::{Value, json};
use shared::models::SendMessageRequest;
use uuid::Uuid;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{addr}")
}

fn peer_json(id: Uuid) -> Value {
    json!({
        "id": id,
        "username": "tech1",
        "full_name": "Terry Technician",
        "email": "tech1@example.com",
        "role": "technician",
    })
}

fn message_json(id: Uuid, sender: Uuid, receiver: Uuid, content: &str) -> Value {
    json!({
        "id": id,
        "sender_id": sender,
        "receiver_id": receiver,
        "content": content,
        "created_at": "2025-03-08T14:30:00Z",
    })
}

#[tokio::test]
async fn conversations_round_trip() {
    let peer = Uuid::new_v4();
    let me = Uuid::new_v4();
    let body = json!([{
        "peer": peer_json(peer),
        "last_message": message_json(Uuid::new_v4(), peer, me, "hello"),
        "unread_count": 2,
    }]);
    let app = Router::new().route(
        "/messages/conversations",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    );
    let base = serve(app).await;

    let api = LoanDeskClient::new(&base);
    let conversations = api.conversations().await.unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].peer.id, peer);
    assert_eq!(conversations[0].unread_count, 2);
    assert_eq!(
        conversations[0].last_message.as_ref().unwrap().content,
        "hello"
    );
}

#[tokio::test]
async fn thread_fetch_uses_peer_path() {
    let peer = Uuid::new_v4();
    let me = Uuid::new_v4();
    let app = Router::new().route(
        "/messages/conversation/{peer_id}",
        get(move |Path(peer_id): Path<Uuid>| async move {
            Json(json!([message_json(Uuid::new_v4(), peer_id, me, "from path peer")]))
        }),
    );
    let base = serve(app).await;

    let api = LoanDeskClient::new(&base);
    let messages = api.thread(peer).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender_id, peer);
    assert_eq!(messages[0].content, "from path peer");
}

#[tokio::test]
async fn send_message_posts_body_and_returns_created() {
    let me = Uuid::new_v4();
    let app = Router::new().route(
        "/messages",
        post(move |Json(request): Json<SendMessageRequest>| async move {
            Json(message_json(
                Uuid::new_v4(),
                me,
                request.receiver_id,
                &request.content,
            ))
        }),
    );
    let base = serve(app).await;

    let api = LoanDeskClient::new(&base);
    let receiver = Uuid::new_v4();
    let created = api
        .send_message(&SendMessageRequest {
            receiver_id: receiver,
            content: "hi".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.receiver_id, receiver);
    assert_eq!(created.content, "hi");
}

#[tokio::test]
async fn unread_counts_unwrap_the_body() {
    let app = Router::new()
        .route(
            "/messages/unread-count",
            get(|| async { Json(json!({"count": 4})) }),
        )
        .route(
            "/notifications/unread-count",
            get(|| async { Json(json!({"count": 0})) }),
        );
    let base = serve(app).await;

    let api = LoanDeskClient::new(&base);
    assert_eq!(api.unread_message_count().await.unwrap(), 4);
    assert_eq!(api.unread_notification_count().await.unwrap(), 0);
}

#[tokio::test]
async fn notification_mutations_accept_ack_responses() {
    let app = Router::new()
        .route(
            "/notifications/{id}/read",
            patch(|Path(_id): Path<Uuid>| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/notifications/mark-all-read",
            patch(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/notifications/{id}",
            delete(|Path(_id): Path<Uuid>| async { StatusCode::NO_CONTENT }),
        );
    let base = serve(app).await;

    let api = LoanDeskClient::new(&base);
    let id = Uuid::new_v4();
    api.mark_notification_read(id).await.unwrap();
    api.mark_all_notifications_read().await.unwrap();
    api.delete_notification(id).await.unwrap();
}

#[tokio::test]
async fn error_body_is_surfaced_in_status_error() {
    let app = Router::new().route(
        "/notifications",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"message": "no such actor", "details": "token expired"})),
            )
                .into_response()
        }),
    );
    let base = serve(app).await;

    let api = LoanDeskClient::new(&base);
    let err = api.notifications().await.unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(message.contains("no such actor"));
            assert!(message.contains("token expired"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_raw_text() {
    let app = Router::new().route(
        "/messages/conversations",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream exploded").into_response() }),
    );
    let base = serve(app).await;

    let api = LoanDeskClient::new(&base);
    let err = api.conversations().await.unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_refused_maps_to_transport() {
    // Nothing listens on this port; bind-then-drop guarantees it was free.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = LoanDeskClient::new(&format!("http://{addr}"));
    let err = api.conversations().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
