//! Pure state transition function
//!
//! Given the same state, context and event this always yields the same new
//! state and effects. Timers, the transcript and the mail client are only
//! reached through the returned effects.

use super::state::{ReplyState, WidgetContext, WidgetState, WindowMode};
use super::{Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: WidgetState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: WidgetState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Finish with a view of the new state for the presentation layer
    pub fn with_notify(mut self) -> Self {
        let view = self.new_state.view();
        self.effects.push(Effect::NotifyStateChange { view });
        self
    }
}

/// Reasons an event is ignored
///
/// None of these are failures the user sees: the runtime drops the event and
/// the widget stays exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A reply is still pending, input ignored")]
    ReplyPending,
    #[error("Empty input ignored")]
    EmptyInput,
    #[error("No scripted question at index {0}")]
    UnknownQuestion(usize),
    #[error("Deferred event belongs to a discarded session")]
    StaleCallback,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(
    state: &WidgetState,
    context: &WidgetContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (&state.reply, event) {
        // ============================================================
        // Quick queries
        // ============================================================

        // One simulated reply at a time; extra clicks are dropped, not queued
        (reply, Event::SelectQuestion { .. }) if reply.is_pending() => {
            Err(TransitionError::ReplyPending)
        }

        (_, Event::SelectQuestion { index }) => {
            let entry = context
                .entries
                .get(index)
                .ok_or(TransitionError::UnknownQuestion(index))?;

            let next = WidgetState {
                reply: ReplyState::AwaitingScriptedReply { index },
                ..state.clone()
            };
            Ok(TransitionResult::new(next)
                .with_effect(Effect::append_user(&entry.question))
                .with_effect(Effect::schedule_session(
                    context.timings.scripted_reply,
                    Event::ScriptedReplyDue {
                        generation: state.generation,
                        index,
                    },
                ))
                .with_notify())
        }

        // ============================================================
        // Free text
        // ============================================================

        // Same guard as quick queries, so two submissions never interleave
        (reply, Event::SubmitFreeText { .. }) if reply.is_pending() => {
            Err(TransitionError::ReplyPending)
        }

        (_, Event::SubmitFreeText { text }) if text.trim().is_empty() => {
            Err(TransitionError::EmptyInput)
        }

        (_, Event::SubmitFreeText { text }) => {
            let next = WidgetState {
                reply: ReplyState::AwaitingTransmission,
                draft: String::new(),
                ..state.clone()
            };
            Ok(TransitionResult::new(next)
                .with_effect(Effect::append_user(text.clone()))
                .with_effect(Effect::schedule_session(
                    context.timings.transmission,
                    Event::TransmissionDue {
                        generation: state.generation,
                        text,
                    },
                ))
                .with_notify())
        }

        (_, Event::SubmitDraft) => transition(
            state,
            context,
            Event::SubmitFreeText {
                text: state.draft.clone(),
            },
        ),

        (_, Event::SubmitOrAsk { index }) if state.draft.is_empty() => {
            transition(state, context, Event::SelectQuestion { index })
        }

        (_, Event::SubmitOrAsk { .. }) => transition(state, context, Event::SubmitDraft),

        (_, Event::EditDraft { edit }) => {
            let mut draft = state.draft.clone();
            edit.apply(&mut draft);
            let next = WidgetState {
                draft,
                ..state.clone()
            };
            Ok(TransitionResult::new(next).with_notify())
        }

        (_, Event::DraftChanged { text }) => {
            let next = WidgetState {
                draft: text,
                ..state.clone()
            };
            Ok(TransitionResult::new(next).with_notify())
        }

        // ============================================================
        // Reset and window chrome
        // ============================================================
        (_, Event::Reset) => Ok(reset(state, context)),

        (_, Event::Minimize) => Ok(set_window(state, state.window.minimized())),

        (_, Event::MaximizeToggle) => Ok(set_window(state, state.window.maximized())),

        // Closing a fullscreen window only restores it
        (_, Event::Close) if state.window.is_fullscreen() => {
            Ok(set_window(state, WindowMode::InlineExpanded))
        }

        // Closing an inline window throws the conversation away
        (_, Event::Close) => Ok(reset(state, context)),

        // ============================================================
        // Deferred events
        // ============================================================
        (
            _,
            Event::ScriptedReplyDue { generation, .. }
            | Event::TransmissionDue { generation, .. }
            | Event::MailHandoffDue { generation, .. },
        ) if generation != state.generation => Err(TransitionError::StaleCallback),

        (
            ReplyState::AwaitingScriptedReply { index: pending },
            Event::ScriptedReplyDue { index, .. },
        ) if *pending == index => {
            let answer = context
                .entries
                .get(index)
                .ok_or(TransitionError::UnknownQuestion(index))?;

            let next = WidgetState {
                reply: ReplyState::Idle,
                ..state.clone()
            };
            Ok(TransitionResult::new(next)
                .with_effect(Effect::append_system(&answer.answer))
                .with_notify())
        }

        (ReplyState::AwaitingTransmission, Event::TransmissionDue { generation, text }) => {
            let next = WidgetState {
                reply: ReplyState::Idle,
                ..state.clone()
            };
            Ok(TransitionResult::new(next)
                .with_effect(Effect::append_system(context.transmission_text()))
                .with_effect(Effect::schedule_session(
                    context.timings.mail_handoff,
                    Event::MailHandoffDue { generation, text },
                ))
                .with_notify())
        }

        // The pending flag is already clear here; a quick query may be in
        // flight meanwhile and is left alone
        (_, Event::MailHandoffDue { text, .. }) => {
            let toast = state.next_toast;
            let next = WidgetState {
                toast: Some(toast),
                next_toast: toast + 1,
                ..state.clone()
            };
            Ok(TransitionResult::new(next)
                .with_effect(Effect::ComposeMail {
                    draft: context.mail.draft(&text),
                })
                .with_effect(Effect::schedule_widget(
                    context.timings.toast,
                    Event::ToastExpired { toast },
                ))
                .with_notify())
        }

        (_, Event::ToastExpired { toast }) if state.toast == Some(toast) => {
            let next = WidgetState {
                toast: None,
                ..state.clone()
            };
            Ok(TransitionResult::new(next).with_notify())
        }

        // A later toast replaced this one
        (_, Event::ToastExpired { .. }) => Err(TransitionError::StaleCallback),

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (reply, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {reply:?} with event {event:?}"
        ))),
    }
}

fn reset(state: &WidgetState, context: &WidgetContext) -> TransitionResult {
    let next = WidgetState {
        reply: ReplyState::Idle,
        draft: String::new(),
        generation: state.generation.next(),
        ..state.clone()
    };
    TransitionResult::new(next)
        .with_effect(Effect::CancelSessionTimers)
        .with_effect(Effect::ResetTranscript {
            welcome: context.welcome.clone(),
        })
        .with_notify()
}

fn set_window(state: &WidgetState, window: WindowMode) -> TransitionResult {
    let next = WidgetState {
        window,
        ..state.clone()
    };
    TransitionResult::new(next).with_notify()
}
