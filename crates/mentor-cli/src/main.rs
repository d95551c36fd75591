use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mentor_core::notification::{AccessScope, TargetLevel};

mod app;
mod commands;

use app::App;

#[derive(Parser)]
#[command(name = "mentor")]
#[command(about = "FCDS Mentor - terminal client for the FCDS academic chat assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive chat (the default)
    Chat,
    /// Log in and persist the session token
    Login {
        username: String,
        /// Password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create a student account and log in
    Signup {
        username: String,
        /// Academic level, 0-4
        #[arg(long)]
        level: u8,
        /// Password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Log out and clear the local session
    Logout,
    /// Show the current account
    Whoami,
    /// List notifications
    Notifications {
        /// Include notifications already marked as seen
        #[arg(long)]
        all: bool,
    },
    /// Mark notifications as seen by id
    Seen {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Upload a document to the mentor's knowledge base (admin)
    Upload {
        file: PathBuf,
        /// Who may be served answers from this document:
        /// public, all_students, level_1..level_4, or admin_only
        #[arg(long, default_value = "all_students")]
        access: AccessScope,
        /// Send a notification about the new document
        #[arg(long)]
        notify: Option<String>,
        /// Notification audience: "all" or a level 0-4
        #[arg(long)]
        notify_level: Option<TargetLevel>,
    },
    /// Send a notification to students (admin)
    Broadcast {
        message: String,
        /// Audience: "all" or a level 0-4
        #[arg(long, default_value = "all")]
        level: TargetLevel,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = App::init().await?;

    match cli.command {
        None | Some(Commands::Chat) => commands::chat::run(&app).await?,
        Some(Commands::Login { username, password }) => {
            commands::auth::login(&app, username, password).await?
        }
        Some(Commands::Signup {
            username,
            level,
            password,
        }) => commands::auth::signup(&app, username, level, password).await?,
        Some(Commands::Logout) => commands::auth::logout(&app).await?,
        Some(Commands::Whoami) => commands::auth::whoami(&app).await?,
        Some(Commands::Notifications { all }) => commands::notifications::list(&app, all).await?,
        Some(Commands::Seen { ids }) => commands::notifications::mark_seen(&app, ids).await?,
        Some(Commands::Upload {
            file,
            access,
            notify,
            notify_level,
        }) => commands::admin::upload(&app, file, access, notify, notify_level).await?,
        Some(Commands::Broadcast { message, level }) => {
            commands::admin::broadcast(&app, message, level).await?
        }
    }

    Ok(())
}
