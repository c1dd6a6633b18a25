//! Effects produced by state transitions

use super::event::Event;
use super::state::WidgetView;
use crate::mail::MailDraft;
use crate::transcript::Sender;
use std::time::Duration;

/// Lifetime of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerScope {
    /// Cancelled by a reset as well as by unmount
    Session,
    /// Cancelled only by unmount
    Widget,
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the transcript
    AppendMessage { sender: Sender, text: String },

    /// Replace the transcript with a single welcome message
    ResetTranscript { welcome: String },

    /// Feed `event` back into the state machine after `delay`
    ScheduleEvent {
        delay: Duration,
        scope: TimerScope,
        event: Event,
    },

    /// Abort every session-scoped timer still pending
    CancelSessionTimers,

    /// Hand a draft to the mail client (fire and forget)
    ComposeMail { draft: MailDraft },

    /// Publish the new view to the presentation layer
    NotifyStateChange { view: WidgetView },
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn append_system(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::System,
            text: text.into(),
        }
    }

    pub fn schedule_session(delay: Duration, event: Event) -> Self {
        Effect::ScheduleEvent {
            delay,
            scope: TimerScope::Session,
            event,
        }
    }

    pub fn schedule_widget(delay: Duration, event: Event) -> Self {
        Effect::ScheduleEvent {
            delay,
            scope: TimerScope::Widget,
            event,
        }
    }
}
