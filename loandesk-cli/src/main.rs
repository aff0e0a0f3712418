//! Main entry point for the LoanDesk command-line client.

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::error::Error;

mod commands;

/// LoanDesk CLI
#[derive(Parser)]
#[command(name = "loandesk")]
#[command(about = "Command-line client for the LoanDesk helpdesk platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the LoanDesk CLI
#[derive(Subcommand)]
enum Commands {
    /// List conversations for the current actor
    Conversations(commands::conversations::ConversationsArgs),

    /// Show the message thread with one peer, grouped by day
    Thread(commands::thread::ThreadArgs),

    /// Send a direct message to a peer
    Send(commands::thread::SendArgs),

    /// List technicians available as message targets
    Technicians(commands::conversations::TechniciansArgs),

    /// Inspect and mutate notifications
    Notifications {
        #[command(subcommand)]
        command: commands::notifications::NotificationsCommand,
    },

    /// Watch an unread counter in the foreground
    Watch(commands::watch::WatchArgs),

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(
            long,
            short,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Conversations(args) => {
            commands::conversations::handle_conversations(args).await?;
        }
        Commands::Thread(args) => {
            commands::thread::handle_thread(args).await?;
        }
        Commands::Send(args) => {
            commands::thread::handle_send(args).await?;
        }
        Commands::Technicians(args) => {
            commands::conversations::handle_technicians(args).await?;
        }
        Commands::Notifications { command } => {
            commands::notifications::handle(command).await?;
        }
        Commands::Watch(args) => {
            commands::watch::handle_watch(args).await?;
        }
        Commands::Completion { shell } => {
            let shell = shell
                .parse::<clap_complete::Shell>()
                .expect("Invalid shell type provided");
            commands::completion::generate_completion(shell);
        }
    }

    Ok(())
}
