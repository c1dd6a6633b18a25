//! Runtime hosting one mounted support widget
//!
//! The runtime task owns the [`WidgetState`] and applies every event through
//! the pure transition function. Presentation code talks to it only through
//! a [`WidgetHandle`].

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::WidgetRuntime;
pub use traits::*;

use crate::script::ScriptedEntry;
use crate::state_machine::{DraftEdit, Event, WidgetContext, WidgetState, WidgetView, WindowMode};
use crate::transcript::Message;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Widget is not mounted")]
    NotMounted,
    #[error("Transcript store error: {0}")]
    Store(String),
}

/// Events pushed to the presentation layer
#[derive(Debug, Clone)]
pub enum WidgetEvent {
    Message { message: Message },
    /// The transcript was replaced wholesale
    TranscriptReset { messages: Vec<Message> },
    StateChange { view: WidgetView },
    Error { message: String },
}

/// Everything needed to draw the widget from scratch
#[derive(Debug, Clone, Serialize)]
pub struct WidgetSnapshot {
    pub transcript: Vec<Message>,
    pub pending_reply: bool,
    pub draft: String,
    pub window_mode: WindowMode,
    pub toast_visible: bool,
}

/// Handle to interact with a mounted widget
#[derive(Clone)]
pub struct WidgetHandle {
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<WidgetEvent>,
    view_rx: watch::Receiver<WidgetView>,
    store: Arc<dyn TranscriptStore>,
    questions: Arc<[String]>,
    unmount: CancellationToken,
}

/// Seed the transcript with the welcome message and start the runtime task
pub async fn mount<S, M, C>(
    context: WidgetContext,
    store: S,
    mail: M,
    clock: C,
) -> Result<WidgetHandle, RuntimeError>
where
    S: TranscriptStore + 'static,
    M: MailComposer + 'static,
    C: Clock + 'static,
{
    let store = Arc::new(store);
    store
        .reset(&context.welcome, clock.now())
        .await
        .map_err(RuntimeError::Store)?;

    let state = WidgetState::default();
    let (event_tx, event_rx) = mpsc::channel(32);
    let (broadcast_tx, _) = broadcast::channel(128);
    let (view_tx, view_rx) = watch::channel(state.view());
    let unmount = CancellationToken::new();

    let dyn_store: Arc<dyn TranscriptStore> = store.clone();
    let handle = WidgetHandle {
        event_tx: event_tx.clone(),
        broadcast_tx: broadcast_tx.clone(),
        view_rx,
        store: dyn_store,
        questions: context
            .entries
            .iter()
            .map(|ScriptedEntry { question, .. }| question.clone())
            .collect(),
        unmount: unmount.clone(),
    };

    tracing::info!(
        widget_id = %context.widget_id,
        questions = context.entries.len(),
        "Mounting widget"
    );

    let runtime = WidgetRuntime::new(
        context,
        state,
        store,
        Arc::new(mail),
        clock,
        event_rx,
        event_tx.downgrade(),
        broadcast_tx,
        view_tx,
        unmount,
    );
    tokio::spawn(runtime.run());

    Ok(handle)
}

impl WidgetHandle {
    async fn send(&self, event: Event) -> Result<(), RuntimeError> {
        if self.unmount.is_cancelled() {
            return Err(RuntimeError::NotMounted);
        }
        self.event_tx
            .send(event)
            .await
            .map_err(|_| RuntimeError::NotMounted)
    }

    /// Ask the quick query at `index`
    #[cfg(test)]
    pub async fn select_question(&self, index: usize) -> Result<(), RuntimeError> {
        self.send(Event::SelectQuestion { index }).await
    }

    /// Replace the draft wholesale
    pub async fn set_draft(&self, text: impl Into<String>) -> Result<(), RuntimeError> {
        self.send(Event::DraftChanged { text: text.into() }).await
    }

    pub async fn edit_draft(&self, edit: DraftEdit) -> Result<(), RuntimeError> {
        self.send(Event::EditDraft { edit }).await
    }

    #[cfg(test)]
    pub async fn submit_free_text(&self, text: impl Into<String>) -> Result<(), RuntimeError> {
        self.send(Event::SubmitFreeText { text: text.into() }).await
    }

    /// Submit whatever the draft currently holds
    #[cfg(test)]
    pub async fn submit_draft(&self) -> Result<(), RuntimeError> {
        self.send(Event::SubmitDraft).await
    }

    /// Submit the draft, or ask the quick query at `index` if the draft is empty
    ///
    /// The runtime decides from its own draft, so keystrokes still in flight
    /// are taken into account.
    pub async fn submit_or_ask(&self, index: usize) -> Result<(), RuntimeError> {
        self.send(Event::SubmitOrAsk { index }).await
    }

    pub async fn reset(&self) -> Result<(), RuntimeError> {
        self.send(Event::Reset).await
    }

    pub async fn minimize(&self) -> Result<(), RuntimeError> {
        self.send(Event::Minimize).await
    }

    pub async fn toggle_maximize(&self) -> Result<(), RuntimeError> {
        self.send(Event::MaximizeToggle).await
    }

    pub async fn close(&self) -> Result<(), RuntimeError> {
        self.send(Event::Close).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Latest published view
    pub fn view(&self) -> WidgetView {
        self.view_rx.borrow().clone()
    }

    /// Labels of the quick query buttons, in index order
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub async fn snapshot(&self) -> Result<WidgetSnapshot, RuntimeError> {
        let transcript = self.store.messages().await.map_err(RuntimeError::Store)?;
        let view = self.view();
        Ok(WidgetSnapshot {
            transcript,
            pending_reply: view.pending_reply,
            draft: view.draft,
            window_mode: view.window_mode,
            toast_visible: view.toast_visible,
        })
    }

    /// Stop the runtime; pending timers never fire afterwards
    pub fn unmount(&self) {
        self.unmount.cancel();
    }

    #[cfg(test)]
    pub fn is_mounted(&self) -> bool {
        !self.unmount.is_cancelled()
    }
}
