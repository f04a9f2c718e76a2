//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for the Matrix protocol using the `matrix_sdk`.
//! This module acts as the bridge between the generic `ChatProvider` interface used by the bot's core logic
//! and the specific implementation details of the Matrix SDK.
//!
//! Every outbound message is stamped with a process-wide sequence number before it is sent.

use crate::domain::traits::ChatProvider;
use async_trait::async_trait;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::events::room::message::RoomMessageEventContent;
use std::sync::atomic::{AtomicU64, Ordering};

static OUTBOUND_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Next outbound sequence number, starting at 1.
pub fn next_sequence() -> u64 {
    OUTBOUND_SEQUENCE.fetch_add(1, Ordering::Relaxed) + 1
}

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<String, String> {
        let seq = next_sequence();
        tracing::info!("Bot sending message #{} to {}: {}", seq, self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|resp| resp.event_id.to_string())
            .map_err(|e| format!("message #{seq}: {e}"))
    }

    async fn typing(&self, active: bool) -> Result<(), String> {
        self.room
            .typing_notice(active)
            .await
            .map_err(|e| e.to_string())
    }
}
