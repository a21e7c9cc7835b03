//! Panel state: open/closed, transcript entries and typing indicators.
//!
//! The rendered widget drives this from UI events; everything here is
//! synchronous so the send pipeline's bookkeeping can be tested natively.

use chrono::Utc;

use crate::reply::BotReply;
use crate::{apology_for, ChatMessage, Sender, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    /// Inserted but still transparent
    Entering,
    Visible,
    /// Fading out, removed once the fade finishes
    Leaving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingIndicator {
    pub id: u64,
    pub phase: TypingPhase,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEntry {
    Message(ChatMessage),
    Typing(TypingIndicator),
}

/// A validated submission ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub text: String,
    /// Indicator shown for this exchange
    pub indicator: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    open: bool,
    entries: Vec<TranscriptEntry>,
    next_message_id: u64,
    next_indicator_id: u64,
}

impl ChatState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(|entry| match entry {
            TranscriptEntry::Message(message) => Some(message),
            TranscriptEntry::Typing(_) => None,
        })
    }

    pub fn typing_indicators(&self) -> impl Iterator<Item = &TypingIndicator> {
        self.entries.iter().filter_map(|entry| match entry {
            TranscriptEntry::Typing(indicator) => Some(indicator),
            TranscriptEntry::Message(_) => None,
        })
    }

    /// Flip the panel. Opening an empty transcript shows the greeting.
    /// Returns the new open state.
    pub fn toggle(&mut self, greeting: &str) -> bool {
        self.open = !self.open;
        if self.open && self.messages().next().is_none() && !greeting.is_empty() {
            self.push_message(greeting, Sender::Bot);
        }
        self.open
    }

    pub fn push_message(&mut self, text: &str, sender: Sender) {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.entries.push(TranscriptEntry::Message(ChatMessage {
            id,
            text: text.to_string(),
            sender,
            timestamp: Utc::now(),
        }));
    }

    /// Record a user submission. Blank input is ignored.
    pub fn submit(&mut self, raw: &str) -> Option<Outgoing> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        self.push_message(text, Sender::User);
        let indicator = self.show_typing();
        Some(Outgoing {
            text: text.to_string(),
            indicator,
        })
    }

    /// Insert a fresh indicator, dropping any that is already showing.
    pub fn show_typing(&mut self) -> u64 {
        self.entries
            .retain(|entry| !matches!(entry, TranscriptEntry::Typing(_)));

        let id = self.next_indicator_id;
        self.next_indicator_id += 1;
        self.entries.push(TranscriptEntry::Typing(TypingIndicator {
            id,
            phase: TypingPhase::Entering,
        }));
        id
    }

    pub fn reveal_typing(&mut self, id: u64) {
        if let Some(indicator) = self.indicator_mut(id) {
            if indicator.phase == TypingPhase::Entering {
                indicator.phase = TypingPhase::Visible;
            }
        }
    }

    /// Start fading out the current indicator. Returns its id so the caller
    /// can remove it once the fade is over.
    pub fn hide_typing(&mut self) -> Option<u64> {
        let indicator = self.entries.iter_mut().rev().find_map(|entry| match entry {
            TranscriptEntry::Typing(indicator) => Some(indicator),
            TranscriptEntry::Message(_) => None,
        })?;
        indicator.phase = TypingPhase::Leaving;
        Some(indicator.id)
    }

    /// Remove a faded indicator. Unknown or already-removed ids are ignored.
    pub fn remove_typing(&mut self, id: u64) {
        self.entries.retain(
            |entry| !matches!(entry, TranscriptEntry::Typing(indicator) if indicator.id == id),
        );
    }

    /// Settle an exchange: hide the indicator, then append the reply or an
    /// apology. Returns the indicator to remove after its fade.
    pub fn finish_exchange(&mut self, outcome: Result<BotReply, TransportError>) -> Option<u64> {
        let fading = self.hide_typing();
        match outcome {
            Ok(BotReply::Text(text)) => {
                self.push_message(&text, Sender::Bot);
            }
            Ok(BotReply::Suppressed) => {}
            Err(error) => {
                self.push_message(&apology_for(&error), Sender::Bot);
            }
        }
        fading
    }

    fn indicator_mut(&mut self, id: u64) -> Option<&mut TypingIndicator> {
        self.entries.iter_mut().find_map(|entry| match entry {
            TranscriptEntry::Typing(indicator) if indicator.id == id => Some(indicator),
            _ => None,
        })
    }
}
