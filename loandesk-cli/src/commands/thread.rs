use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Args;
use client::state::{MessageThread, ThreadError};
use client::{ActorContext, MessagesGateway};
use shared::models::{UserRole, UserSummary};
use uuid::Uuid;

use super::net::{self, ServerArgs};

#[derive(Args, Debug)]
#[command(about = "Show the message thread with one peer, grouped by day")]
pub struct ThreadArgs {
    /// Peer identifier to show the thread for
    #[arg(long)]
    pub peer: Uuid,

    /// UUID of the signed-in user (used to mark your own messages)
    #[arg(long)]
    pub actor: Option<Uuid>,

    #[command(flatten)]
    pub net: ServerArgs,
}

#[derive(Args, Debug)]
#[command(about = "Send a direct message to a peer")]
pub struct SendArgs {
    /// Peer identifier to send the message to
    #[arg(long)]
    pub peer: Uuid,

    /// Message text
    #[arg()]
    pub text: String,

    /// UUID of the signed-in user (used to mark your own messages)
    #[arg(long)]
    pub actor: Option<Uuid>,

    #[command(flatten)]
    pub net: ServerArgs,
}

fn actor_context(actor: Option<Uuid>) -> ActorContext {
    // Authentication lives outside this client; the hosting app (or flag)
    // supplies the identity. Without one, nothing is marked as own.
    ActorContext::new(UserSummary {
        id: actor.unwrap_or_else(Uuid::nil),
        username: "me".to_string(),
        full_name: None,
        email: None,
        role: UserRole::Borrower,
    })
}

pub async fn handle_thread(args: ThreadArgs) -> Result<()> {
    let config = net::resolve_config(&args.net)?;
    net::init_tracing(&config.log_level);
    let gateway: Arc<dyn MessagesGateway> = Arc::new(net::build_client(&config)?);

    let thread = MessageThread::new(gateway, actor_context(args.actor));
    thread.load_for(Some(args.peer)).await;
    if let Some(error) = thread.error() {
        bail!("failed to load thread: {error}");
    }

    render_thread(&thread);
    Ok(())
}

pub async fn handle_send(args: SendArgs) -> Result<()> {
    let config = net::resolve_config(&args.net)?;
    net::init_tracing(&config.log_level);
    let gateway: Arc<dyn MessagesGateway> = Arc::new(net::build_client(&config)?);

    let thread = MessageThread::new(gateway, actor_context(args.actor));
    thread.load_for(Some(args.peer)).await;
    if let Some(error) = thread.error() {
        bail!("failed to load thread: {error}");
    }

    match thread.send(&args.text).await {
        Ok(message) => {
            println!("Message sent: id={} at={}", message.id, message.created_at);
            Ok(())
        }
        Err(ThreadError::EmptyDraft) => bail!("message text must not be empty"),
        Err(err) => bail!("failed to send message: {err}"),
    }
}

fn render_thread(thread: &MessageThread) {
    let groups = thread.grouped_by_day();
    if groups.is_empty() {
        println!("No messages yet.");
        return;
    }

    for group in groups {
        println!("── {} ──", group.day);
        for message in &group.messages {
            let marker = if thread.is_own(message) { ">" } else { "<" };
            println!(
                "{marker} [{}] {}",
                message.created_at.0.format("%H:%M:%S"),
                message.content
            );
        }
        println!();
    }
}
