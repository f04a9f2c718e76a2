//! # Main Entry Point
//!
//! Initializes the application:
//! - Domain: Configuration and Types
//! - Infrastructure: Matrix, Hacker News, Stock quotes
//! - Application: Pipeline, Cache refresher, Router
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, SyncRoomMessageEvent},
    },
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::cache::StoryCache;
use crate::application::pipeline::PipelineConfig;
use crate::application::refresher::CacheRefresher;
use crate::application::router::CommandRouter;
use crate::domain::config::AppConfig;
use crate::domain::traits::{QuoteProvider, StoryFetcher};
use crate::infrastructure::hackernews::HackerNewsClient;
use crate::infrastructure::matrix::MatrixService;
use crate::infrastructure::stock::StockClient;

#[derive(Parser, Debug)]
#[command(name = "newsbot", version, about = "Matrix bot serving Hacker News and stock quotes")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "data/config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&args.config)?;

    // 2. Logging Setup
    // Ensure data directory exists
    if !std::path::Path::new("data").exists() {
        fs::create_dir("data").context("Failed to create data directory")?;
    }

    // Clear previous session log
    let log_path = std::path::Path::new("data/session.log");
    if log_path.exists() {
        let _ = fs::remove_file(log_path);
    }

    let file_appender = tracing_appender::rolling::never("data", "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn",
        )
    });

    // Layer for file (Always active)
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Starting newsbot...");
    tracing::info!(
        "{}",
        crate::strings::messages::config_loaded(&config.services.matrix.username)
    );

    // 3. Initialize Infrastructure
    let fetcher: Arc<dyn StoryFetcher> = Arc::new(
        HackerNewsClient::new(&config.news.api_base, config.news.request_timeout())
            .context("Failed to build Hacker News client")?,
    );
    let quotes: Arc<dyn QuoteProvider> = Arc::new(
        StockClient::new(&config.stock.endpoint, config.news.request_timeout())
            .context("Failed to build stock client")?,
    );

    // 4. Story Cache + Background Refresher
    let (cache, writer) = StoryCache::create();
    let refresher = CacheRefresher::new(
        fetcher.clone(),
        writer,
        PipelineConfig::from(&config.news),
        config.news.refresh_interval(),
    );
    tokio::spawn(refresher.run());

    let router = Arc::new(CommandRouter::new(config.clone(), fetcher, quotes, cache));

    // 5. Matrix Setup
    let client = Client::builder()
        .homeserver_url(&config.services.matrix.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(
            &config.services.matrix.username,
            &config.services.matrix.password,
        )
        .send()
        .await?;

    tracing::info!("Logged in as {}", config.services.matrix.username);

    if let Some(name) = &config.services.matrix.display_name {
        if let Err(e) = client.account().set_display_name(Some(name.as_str())).await {
            tracing::warn!("Failed to set display name: {}", e);
        }
    }

    // 6. Event Handlers
    let start_time = std::time::SystemTime::now();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = router.clone();

        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore events older than start_time
            let ts = ev.origin_server_ts();
            let event_time =
                std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            if let MessageType::Text(text_content) = &original_msg.content.msgtype {
                let body = &text_content.body;
                if original_msg.sender == room.own_user_id() {
                    return;
                }
                tracing::debug!("Received message from {}: {}", original_msg.sender, body);

                let chat = MatrixService::new(room);
                if let Err(e) = router
                    .route(&chat, body, original_msg.sender.as_str())
                    .await
                {
                    tracing::error!("Failed to route message: {}", e);
                }
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            if let Err(e) = room.join().await {
                tracing::warn!(
                    "{}",
                    crate::strings::messages::join_invite_fail(&e.to_string())
                );
            }
        }
    });

    // 7. Sync until the connection is lost
    client
        .sync(SyncSettings::default())
        .await
        .context("Matrix sync loop failed")?;

    Ok(())
}
