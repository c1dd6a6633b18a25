//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::mail::{self, MailDraft, MailError};
use crate::transcript::{InMemoryTranscript, Message, Sender};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::Arc;

/// Storage for the widget transcript
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Add a message at the end of the transcript
    async fn append(
        &self,
        sender: Sender,
        text: &str,
        at: DateTime<Local>,
    ) -> Result<Message, String>;

    /// Drop everything and start over with a single welcome message
    async fn reset(&self, welcome: &str, at: DateTime<Local>) -> Result<Message, String>;

    /// All messages in creation order
    async fn messages(&self) -> Result<Vec<Message>, String>;
}

/// Handoff to the user's mail client
#[async_trait]
pub trait MailComposer: Send + Sync {
    async fn compose(&self, draft: &MailDraft) -> Result<(), MailError>;
}

/// Wall clock used to stamp transcript messages
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: TranscriptStore + ?Sized> TranscriptStore for Arc<T> {
    async fn append(
        &self,
        sender: Sender,
        text: &str,
        at: DateTime<Local>,
    ) -> Result<Message, String> {
        (**self).append(sender, text, at).await
    }

    async fn reset(&self, welcome: &str, at: DateTime<Local>) -> Result<Message, String> {
        (**self).reset(welcome, at).await
    }

    async fn messages(&self) -> Result<Vec<Message>, String> {
        (**self).messages().await
    }
}

#[async_trait]
impl<T: MailComposer + ?Sized> MailComposer for Arc<T> {
    async fn compose(&self, draft: &MailDraft) -> Result<(), MailError> {
        (**self).compose(draft).await
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

// ============================================================================
// Production implementations
// ============================================================================

#[async_trait]
impl TranscriptStore for InMemoryTranscript {
    async fn append(
        &self,
        sender: Sender,
        text: &str,
        at: DateTime<Local>,
    ) -> Result<Message, String> {
        InMemoryTranscript::append(self, sender, text, at)
    }

    async fn reset(&self, welcome: &str, at: DateTime<Local>) -> Result<Message, String> {
        InMemoryTranscript::reset(self, welcome, at)
    }

    async fn messages(&self) -> Result<Vec<Message>, String> {
        InMemoryTranscript::messages(self)
    }
}

/// Opens `mailto:` links with the platform's URL opener
#[derive(Debug, Clone)]
pub struct SystemMailComposer {
    opener: Vec<String>,
}

impl SystemMailComposer {
    pub fn new(opener: Vec<String>) -> Self {
        Self { opener }
    }
}

impl Default for SystemMailComposer {
    fn default() -> Self {
        Self::new(mail::default_opener())
    }
}

#[async_trait]
impl MailComposer for SystemMailComposer {
    async fn compose(&self, draft: &MailDraft) -> Result<(), MailError> {
        mail::open_url(&self.opener, &draft.mailto_url()).await
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
