use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use client::MessagesGateway;
use client::state::ConversationList;
use shared::models::{Conversation, UserSummary};

use super::net::{self, ServerArgs};

#[derive(Args, Debug)]
#[command(about = "List conversations for the current actor")]
pub struct ConversationsArgs {
    #[command(flatten)]
    pub net: ServerArgs,
}

#[derive(Args, Debug)]
#[command(about = "List technicians available as message targets")]
pub struct TechniciansArgs {
    #[command(flatten)]
    pub net: ServerArgs,
}

pub async fn handle_conversations(args: ConversationsArgs) -> Result<()> {
    let config = net::resolve_config(&args.net)?;
    net::init_tracing(&config.log_level);
    let gateway: Arc<dyn MessagesGateway> = Arc::new(net::build_client(&config)?);

    let list = ConversationList::new(gateway, Box::new(|_| {}));
    list.load().await;
    if let Some(error) = list.error() {
        bail!("failed to load conversations: {error}");
    }

    render_conversations(&list.conversations());
    Ok(())
}

pub async fn handle_technicians(args: TechniciansArgs) -> Result<()> {
    let config = net::resolve_config(&args.net)?;
    net::init_tracing(&config.log_level);
    let api = net::build_client(&config)?;

    let technicians = api
        .technicians()
        .await
        .context("failed to fetch technicians")?;
    render_technicians(&technicians);
    Ok(())
}

fn render_conversations(conversations: &[Conversation]) {
    if conversations.is_empty() {
        println!("No conversations yet.");
        return;
    }

    for conversation in conversations {
        let unread = if conversation.unread_count > 0 {
            format!(" unread={}", conversation.unread_count)
        } else {
            String::new()
        };
        println!(
            "- peer={} ({}){}",
            conversation.peer.display_name(),
            conversation.peer.id,
            unread
        );
        if let Some(last) = &conversation.last_message {
            println!("  last [{}]: {}", last.created_at, last.content);
        }
        println!();
    }
}

fn render_technicians(technicians: &[UserSummary]) {
    if technicians.is_empty() {
        println!("No technicians available.");
        return;
    }

    for technician in technicians {
        println!("- {} ({})", technician.display_name(), technician.id);
    }
}
