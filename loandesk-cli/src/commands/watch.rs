use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use client::state::{MessageUnread, NotificationUnread, UnreadPoller, UnreadSource, badge};

use super::net::{self, ServerArgs};

#[derive(Args, Debug)]
#[command(about = "Watch an unread counter in the foreground")]
pub struct WatchArgs {
    /// Watch the notification counter instead of the message counter
    #[arg(long)]
    pub notifications: bool,

    #[command(flatten)]
    pub net: ServerArgs,
}

pub async fn handle_watch(args: WatchArgs) -> Result<()> {
    let config = net::resolve_config(&args.net)?;
    net::init_tracing(&config.log_level);
    let api = Arc::new(net::build_client(&config)?);

    let source: Arc<dyn UnreadSource> = if args.notifications {
        Arc::new(NotificationUnread(api))
    } else {
        Arc::new(MessageUnread(api))
    };

    let poller = UnreadPoller::new(source, Duration::from_secs(config.poll_interval_secs));
    let mut rx = poller.subscribe();
    poller.start();

    println!(
        "Watching {} unread count every {}s... (press Ctrl+C to stop)",
        if args.notifications {
            "notification"
        } else {
            "message"
        },
        config.poll_interval_secs
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                match badge(*rx.borrow_and_update()) {
                    Some(count) => println!("{count} unread"),
                    None => println!("no unread"),
                }
            }
        }
    }

    poller.stop();
    Ok(())
}
