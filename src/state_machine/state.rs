//! Widget state types

use crate::mail::MailDraft;
use crate::script::{
    default_entries, transmission_text, ScriptedEntry, DEFAULT_MAIL_SUBJECT, DEFAULT_MAIL_TO,
    WELCOME_TEXT,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Window Chrome
// ============================================================================

/// Chrome state of the support window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    #[default]
    InlineExpanded,
    /// Title bar only ("window shade")
    InlineCollapsed,
    Fullscreen,
}

impl WindowMode {
    /// Minimize button: restore from fullscreen, otherwise toggle the shade
    pub fn minimized(self) -> Self {
        match self {
            WindowMode::Fullscreen | WindowMode::InlineCollapsed => WindowMode::InlineExpanded,
            WindowMode::InlineExpanded => WindowMode::InlineCollapsed,
        }
    }

    /// Maximize button: a collapsed window is expanded on the way up
    pub fn maximized(self) -> Self {
        match self {
            WindowMode::Fullscreen => WindowMode::InlineExpanded,
            WindowMode::InlineExpanded | WindowMode::InlineCollapsed => WindowMode::Fullscreen,
        }
    }

    pub fn is_fullscreen(self) -> bool {
        matches!(self, WindowMode::Fullscreen)
    }

    /// Whether the transcript area is shown at all
    pub fn transcript_visible(self) -> bool {
        !matches!(self, WindowMode::InlineCollapsed)
    }
}

// ============================================================================
// Reply Tracking
// ============================================================================

/// What simulated reply, if any, is currently in flight
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyState {
    #[default]
    Idle,
    /// A quick query was asked; its canned answer is on the way
    AwaitingScriptedReply { index: usize },
    /// Free text was submitted; the transmission notice is on the way
    AwaitingTransmission,
}

impl ReplyState {
    pub fn is_pending(&self) -> bool {
        !matches!(self, ReplyState::Idle)
    }
}

/// Session token; bumped on every reset so stale timers can be recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Identifies one raised toast so only its own timer can hide it
pub type ToastId = u64;

// ============================================================================
// Widget State
// ============================================================================

/// Everything the state machine owns, apart from the transcript itself
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WidgetState {
    pub reply: ReplyState,
    pub window: WindowMode,
    pub draft: String,
    /// Currently visible toast
    pub toast: Option<ToastId>,
    pub generation: Generation,
    /// Id handed to the next toast
    pub next_toast: ToastId,
}

impl WidgetState {
    pub fn pending_reply(&self) -> bool {
        self.reply.is_pending()
    }

    pub fn toast_visible(&self) -> bool {
        self.toast.is_some()
    }

    /// Read-only projection for the presentation layer
    pub fn view(&self) -> WidgetView {
        WidgetView {
            pending_reply: self.pending_reply(),
            draft: self.draft.clone(),
            window_mode: self.window,
            toast_visible: self.toast_visible(),
        }
    }
}

/// The rendering-relevant part of [`WidgetState`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WidgetView {
    pub pending_reply: bool,
    pub draft: String,
    pub window_mode: WindowMode,
    pub toast_visible: bool,
}

// ============================================================================
// Widget Context
// ============================================================================

/// Simulated latencies of the scripted conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTimings {
    /// Quick query asked -> canned answer shown
    pub scripted_reply: Duration,
    /// Free text sent -> transmission notice shown
    pub transmission: Duration,
    /// Transmission notice -> mail client opened
    pub mail_handoff: Duration,
    /// How long the "message sent" toast stays up
    pub toast: Duration,
}

impl Default for ReplyTimings {
    fn default() -> Self {
        Self {
            scripted_reply: Duration::from_millis(1200),
            transmission: Duration::from_millis(1000),
            mail_handoff: Duration::from_millis(1500),
            toast: Duration::from_millis(3000),
        }
    }
}

/// Fixed mail handoff parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailTemplate {
    pub to: String,
    pub subject: String,
}

impl MailTemplate {
    pub fn draft(&self, body: &str) -> MailDraft {
        MailDraft::new(&self.to, &self.subject, body)
    }
}

impl Default for MailTemplate {
    fn default() -> Self {
        Self {
            to: DEFAULT_MAIL_TO.to_string(),
            subject: DEFAULT_MAIL_SUBJECT.to_string(),
        }
    }
}

/// Immutable configuration of one widget instance
#[derive(Debug, Clone)]
pub struct WidgetContext {
    pub widget_id: String,
    pub welcome: String,
    pub entries: Vec<ScriptedEntry>,
    pub timings: ReplyTimings,
    pub mail: MailTemplate,
}

impl WidgetContext {
    pub fn new(widget_id: impl Into<String>, entries: Vec<ScriptedEntry>) -> Self {
        Self {
            widget_id: widget_id.into(),
            welcome: WELCOME_TEXT.to_string(),
            entries,
            timings: ReplyTimings::default(),
            mail: MailTemplate::default(),
        }
    }

    #[cfg(test)]
    pub fn with_timings(mut self, timings: ReplyTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_mail(mut self, mail: MailTemplate) -> Self {
        self.mail = mail;
        self
    }

    pub fn transmission_text(&self) -> String {
        transmission_text(&self.mail.to)
    }
}

impl Default for WidgetContext {
    fn default() -> Self {
        Self::new("faq", default_entries())
    }
}
