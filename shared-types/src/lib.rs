//! Shared types between the chat widget and its backend
//!
//! These types are used by both:
//! - the Dioxus widget (WASM)
//! - native unit tests and any Rust backend speaking the same wire format
//!
//! Serializable with serde for JSON over HTTP

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod color;
pub mod config;
pub mod reply;
pub mod session;
pub mod transcript;

pub use color::{adjust_color, hex_to_rgba, ColorError, Rgb};
pub use config::{
    ConfigError, ConfigUpdate, OwnerConfig, Position, WidgetConfig, WidgetSettings,
};
pub use reply::{normalize_reply, parse_reply_body, BotReply, EMPTY_RESPONSE_NOTICE, REPLY_FIELDS};
pub use session::{generate_session_key, resolve_session, MemorySessionStore, SessionStore};
pub use transcript::{ChatState, Outgoing, TranscriptEntry, TypingIndicator, TypingPhase};

// ============================================================================
// Chat Types
// ============================================================================

/// Who produced a transcript message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../../chat-widget/bindings/widget.ts")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// CSS modifier used by the message row (`user-message` / `bot-message`)
    pub fn css_class(self) -> &'static str {
        match self {
            Sender::User => "user-message",
            Sender::Bot => "bot-message",
        }
    }
}

/// A message rendered in the transcript. Never mutated once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../../chat-widget/bindings/widget.ts")]
pub struct ChatMessage {
    /// Position-independent key, unique within one transcript
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Wire Protocol
// ============================================================================

/// Outbound chat request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../../chat-widget/bindings/widget.ts")]
pub struct ChatRequest {
    pub message: String,
    pub chatbot_id: String,
    pub session_key: String,
}

impl ChatRequest {
    pub fn new(config: &WidgetConfig, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            chatbot_id: config.chatbot_id.clone(),
            session_key: config.session_key.clone(),
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Failure of a single request/response exchange with the chat backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("API request failed with status {0}")]
    Status(u16),

    #[error("{0}")]
    Network(String),

    #[error("request timed out after {0} ms")]
    Timeout(u32),

    #[error("failed to encode request: {0}")]
    Encode(String),
}

/// Text shown in the transcript when an exchange fails
pub fn apology_for(error: &TransportError) -> String {
    format!("Sorry, I encountered an error: {error}. Please try again later.")
}
