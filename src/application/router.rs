//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in `interface/commands`).
//! It parses the command string (e.g., `.news 3`) and dispatches it with the necessary context.
//! Commands are only served in the rooms configured under `bridges`.

use anyhow::Result;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::application::cache::StoryCache;
use crate::domain::config::AppConfig;
use crate::domain::traits::{ChatProvider, QuoteProvider, StoryFetcher};
use crate::interface::commands;

pub struct CommandRouter {
    config: AppConfig,
    fetcher: Arc<dyn StoryFetcher>,
    quotes: Arc<dyn QuoteProvider>,
    cache: StoryCache,
    allowed_channels: BTreeSet<String>,
}

impl CommandRouter {
    pub fn new(
        config: AppConfig,
        fetcher: Arc<dyn StoryFetcher>,
        quotes: Arc<dyn QuoteProvider>,
        cache: StoryCache,
    ) -> Self {
        let allowed_channels = config.allowed_channels();
        Self {
            config,
            fetcher,
            quotes,
            cache,
            allowed_channels,
        }
    }

    /// An empty allow-list serves every room.
    fn is_allowed(&self, room_id: &str) -> bool {
        self.allowed_channels.is_empty() || self.allowed_channels.contains(room_id)
    }

    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider + Clone + Send + Sync + 'static,
    {
        let msg = message.trim();
        if !msg.starts_with('.') {
            return Ok(());
        }

        let (cmd, args) = if let Some(idx) = msg.find(char::is_whitespace) {
            (&msg[..idx], msg[idx..].trim())
        } else {
            (msg, "")
        };
        tracing::info!(
            "Router dispatching cmd='{}' args='{}' sender='{}'",
            cmd,
            args,
            sender
        );

        if !self.is_allowed(&chat.room_id()) {
            tracing::info!("Ignoring '{}' in unlisted room {}", cmd, chat.room_id());
            let channels: Vec<String> = self.allowed_channels.iter().cloned().collect();
            chat.send_message(&crate::strings::messages::move_to_channels(&channels))
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            return Ok(());
        }

        match cmd {
            ".news" => {
                commands::news::handle_news(&self.config.news, &self.cache, chat, args).await?;
            }
            ".top" => {
                commands::top::handle_top(&self.config.news, self.fetcher.clone(), chat, args)
                    .await?;
            }
            ".stock" => {
                commands::stock::handle_stock(self.quotes.as_ref(), chat, args).await?;
            }
            ".status" => {
                commands::misc::handle_status(&self.config.news, &self.cache, chat).await?;
            }
            // Unknown commands get the help text too
            _ => {
                commands::help::handle_help(chat).await?;
            }
        }

        Ok(())
    }
}
