use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use client::NotificationsGateway;
use client::state::{ConfirmPrompt, NotificationCenter};
use shared::models::{Notification, NotificationFilter};
use uuid::Uuid;

use super::net::{self, ServerArgs};

#[derive(Subcommand, Debug)]
pub enum NotificationsCommand {
    /// List notifications, optionally filtered
    List(ListArgs),

    /// Mark one notification read
    MarkRead(MarkReadArgs),

    /// Mark every notification read
    MarkAllRead(MarkAllReadArgs),

    /// Delete one notification (asks for confirmation)
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter to apply: all, unread, or read
    #[arg(long, default_value = "all")]
    pub filter: NotificationFilter,

    #[command(flatten)]
    pub net: ServerArgs,
}

#[derive(Args, Debug)]
pub struct MarkReadArgs {
    /// Notification identifier
    #[arg(long)]
    pub id: Uuid,

    #[command(flatten)]
    pub net: ServerArgs,
}

#[derive(Args, Debug)]
pub struct MarkAllReadArgs {
    #[command(flatten)]
    pub net: ServerArgs,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Notification identifier
    #[arg(long)]
    pub id: Uuid,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    #[command(flatten)]
    pub net: ServerArgs,
}

/// Confirmation prompt backed by stdin.
struct StdinConfirm;

impl ConfirmPrompt for StdinConfirm {
    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N] ");
        io::stdout().flush().ok();
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return false;
        }
        matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Confirmation prompt that always agrees (`--yes`).
struct AssumeYes;

impl ConfirmPrompt for AssumeYes {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

pub async fn handle(command: NotificationsCommand) -> Result<()> {
    match command {
        NotificationsCommand::List(args) => handle_list(args).await,
        NotificationsCommand::MarkRead(args) => handle_mark_read(args).await,
        NotificationsCommand::MarkAllRead(args) => handle_mark_all_read(args).await,
        NotificationsCommand::Delete(args) => handle_delete(args).await,
    }
}

async fn load_center(net_args: &ServerArgs) -> Result<NotificationCenter> {
    let config = net::resolve_config(net_args)?;
    net::init_tracing(&config.log_level);
    let gateway: Arc<dyn NotificationsGateway> = Arc::new(net::build_client(&config)?);

    let center = NotificationCenter::new(gateway);
    center.load().await;
    if let Some(error) = center.error() {
        bail!("failed to load notifications: {error}");
    }
    Ok(center)
}

async fn handle_list(args: ListArgs) -> Result<()> {
    let center = load_center(&args.net).await?;
    render_notifications(&center.filter(args.filter));
    println!(
        "({} unread, {} read)",
        center.unread_count(),
        center.read_count()
    );
    Ok(())
}

async fn handle_mark_read(args: MarkReadArgs) -> Result<()> {
    let center = load_center(&args.net).await?;
    if let Err(err) = center.mark_read(args.id).await {
        bail!("failed to mark notification read: {err}");
    }
    println!("Marked read. {} unread remaining.", center.unread_count());
    Ok(())
}

async fn handle_mark_all_read(args: MarkAllReadArgs) -> Result<()> {
    let center = load_center(&args.net).await?;
    if let Err(err) = center.mark_all_read().await {
        bail!("failed to mark all notifications read: {err}");
    }
    println!("All notifications marked read.");
    Ok(())
}

async fn handle_delete(args: DeleteArgs) -> Result<()> {
    let center = load_center(&args.net).await?;
    let prompt: &dyn ConfirmPrompt = if args.yes { &AssumeYes } else { &StdinConfirm };

    match center.delete(args.id, prompt).await {
        Ok(true) => {
            println!("Notification deleted.");
            Ok(())
        }
        Ok(false) => {
            println!("Aborted.");
            Ok(())
        }
        Err(err) => bail!("failed to delete notification: {err}"),
    }
}

fn render_notifications(notifications: &[Notification]) {
    if notifications.is_empty() {
        println!("No notifications.");
        return;
    }

    for notification in notifications {
        let status = if notification.is_read { " " } else { "*" };
        println!(
            "{status} [{}] {}: {} (id={})",
            notification.kind, notification.title, notification.message, notification.id
        );
    }
}
