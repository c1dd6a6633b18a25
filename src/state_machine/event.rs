//! Events that can occur in the support widget

use super::state::{Generation, ToastId};

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    /// A quick query button was pressed
    SelectQuestion { index: usize },
    /// The input line was replaced wholesale
    DraftChanged { text: String },
    /// A single keystroke in the input line
    EditDraft { edit: DraftEdit },
    /// Free text submitted from outside the input line
    SubmitFreeText { text: String },
    /// The input form was submitted with whatever the draft holds
    SubmitDraft,
    /// Enter in the support window: the draft if there is one, otherwise
    /// the highlighted quick query
    SubmitOrAsk { index: usize },
    /// The "Cancel" button
    Reset,

    // Window chrome
    Minimize,
    MaximizeToggle,
    Close,

    // Deferred events, sent back by timers
    ScriptedReplyDue {
        generation: Generation,
        index: usize,
    },
    TransmissionDue {
        generation: Generation,
        text: String,
    },
    MailHandoffDue {
        generation: Generation,
        text: String,
    },
    ToastExpired { toast: ToastId },
}

impl Event {
    /// Whether this event was produced by a timer rather than the user
    pub fn is_deferred(&self) -> bool {
        matches!(
            self,
            Event::ScriptedReplyDue { .. }
                | Event::TransmissionDue { .. }
                | Event::MailHandoffDue { .. }
                | Event::ToastExpired { .. }
        )
    }
}

/// Keystroke-level change to the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftEdit {
    Insert(char),
    Backspace,
}

impl DraftEdit {
    pub fn apply(self, draft: &mut String) {
        match self {
            DraftEdit::Insert(c) => draft.push(c),
            DraftEdit::Backspace => {
                draft.pop();
            }
        }
    }
}
