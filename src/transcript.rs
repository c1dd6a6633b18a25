//! Transcript storage for the live support widget
//!
//! The transcript lives only as long as the widget is mounted. Messages are
//! appended in order and never edited; the only other mutation is a
//! wholesale reset back to a single welcome message.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Who produced a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    System,
    User,
}

impl Sender {
    /// Label shown above the message bubble
    pub fn label(self) -> &'static str {
        match self {
            Sender::System => "SYSTEM",
            Sender::User => "YOU",
        }
    }
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    /// Position in creation order, never reused within a mount
    pub sequence: u64,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl Message {
    /// 24-hour `HH:MM` display stamp
    pub fn display_time(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Process-local transcript guarded by a mutex
#[derive(Debug, Default)]
pub struct InMemoryTranscript {
    inner: Mutex<TranscriptInner>,
}

#[derive(Debug, Default)]
struct TranscriptInner {
    messages: Vec<Message>,
    next_sequence: u64,
}

impl TranscriptInner {
    fn push(&mut self, sender: Sender, text: &str, at: DateTime<Local>) -> Message {
        let msg = Message {
            message_id: uuid::Uuid::new_v4().to_string(),
            sequence: self.next_sequence,
            sender,
            text: text.to_string(),
            timestamp: at,
        };
        self.next_sequence += 1;
        self.messages.push(msg.clone());
        msg
    }
}

impl InMemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the end of the transcript
    pub fn append(
        &self,
        sender: Sender,
        text: &str,
        at: DateTime<Local>,
    ) -> Result<Message, String> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| "transcript lock poisoned".to_string())?;
        Ok(inner.push(sender, text, at))
    }

    /// Drop every message and seed a single system welcome line
    pub fn reset(&self, welcome: &str, at: DateTime<Local>) -> Result<Message, String> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| "transcript lock poisoned".to_string())?;
        inner.messages.clear();
        Ok(inner.push(Sender::System, welcome, at))
    }

    /// Ordered copy of the transcript
    pub fn messages(&self) -> Result<Vec<Message>, String> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| "transcript lock poisoned".to_string())?;
        Ok(inner.messages.clone())
    }
}
