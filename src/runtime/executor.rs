//! Widget runtime executor

use super::traits::{Clock, MailComposer, TranscriptStore};
use super::{RuntimeError, WidgetEvent};

use crate::state_machine::{
    transition, Effect, Event, TimerScope, WidgetContext, WidgetState, WidgetView,
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Owns the widget state and executes the effects of each transition
///
/// Every state change happens on the single task running [`run`], so
/// deferred events and user input are serialised through one channel.
///
/// [`run`]: WidgetRuntime::run
pub struct WidgetRuntime<S, M, C>
where
    S: TranscriptStore + 'static,
    M: MailComposer + 'static,
    C: Clock + 'static,
{
    context: WidgetContext,
    state: WidgetState,
    store: Arc<S>,
    mail: Arc<M>,
    clock: C,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so the queue closes once every handle is gone
    event_tx: mpsc::WeakSender<Event>,
    broadcast_tx: broadcast::Sender<WidgetEvent>,
    view_tx: watch::Sender<WidgetView>,
    /// Parent of every timer; only unmount cancels it
    widget_timers: CancellationToken,
    /// Timers of the current session; replaced on every reset
    session_timers: CancellationToken,
    unmount: CancellationToken,
}

impl<S, M, C> WidgetRuntime<S, M, C>
where
    S: TranscriptStore + 'static,
    M: MailComposer + 'static,
    C: Clock + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        context: WidgetContext,
        state: WidgetState,
        store: Arc<S>,
        mail: Arc<M>,
        clock: C,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::WeakSender<Event>,
        broadcast_tx: broadcast::Sender<WidgetEvent>,
        view_tx: watch::Sender<WidgetView>,
        unmount: CancellationToken,
    ) -> Self {
        let widget_timers = CancellationToken::new();
        let session_timers = widget_timers.child_token();
        Self {
            context,
            state,
            store,
            mail,
            clock,
            event_rx,
            event_tx,
            broadcast_tx,
            view_tx,
            widget_timers,
            session_timers,
            unmount,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(widget_id = %self.context.widget_id, "Starting widget runtime");

        let unmount = self.unmount.clone();
        loop {
            tokio::select! {
                biased;
                () = unmount.cancelled() => break,
                received = self.event_rx.recv() => {
                    // Every handle was dropped without unmounting
                    let Some(event) = received else { break };
                    if let Err(e) = self.process_event(event).await {
                        tracing::error!(error = %e, "Error handling event");
                        let _ = self.broadcast_tx.send(WidgetEvent::Error {
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        // Nothing scheduled may outlive the widget
        self.widget_timers.cancel();
        tracing::info!(widget_id = %self.context.widget_id, "Widget runtime stopped");
    }

    async fn process_event(&mut self, event: Event) -> Result<(), RuntimeError> {
        let deferred = event.is_deferred();
        let result = match transition(&self.state, &self.context, event) {
            Ok(result) => result,
            Err(reason) => {
                tracing::debug!(
                    widget_id = %self.context.widget_id,
                    deferred,
                    %reason,
                    "Event ignored"
                );
                return Ok(());
            }
        };

        self.state = result.new_state;
        for effect in result.effects {
            self.execute_effect(effect).await?;
        }
        Ok(())
    }

    async fn execute_effect(&mut self, effect: Effect) -> Result<(), RuntimeError> {
        match effect {
            Effect::AppendMessage { sender, text } => {
                let message = self
                    .store
                    .append(sender, &text, self.clock.now())
                    .await
                    .map_err(RuntimeError::Store)?;
                tracing::debug!(
                    sequence = message.sequence,
                    sender = sender.label(),
                    "Message appended"
                );
                let _ = self.broadcast_tx.send(WidgetEvent::Message { message });
            }

            Effect::ResetTranscript { welcome } => {
                self.store
                    .reset(&welcome, self.clock.now())
                    .await
                    .map_err(RuntimeError::Store)?;
                let messages = self.store.messages().await.map_err(RuntimeError::Store)?;
                tracing::info!(
                    widget_id = %self.context.widget_id,
                    generation = self.state.generation.0,
                    "Conversation reset"
                );
                let _ = self
                    .broadcast_tx
                    .send(WidgetEvent::TranscriptReset { messages });
            }

            Effect::ScheduleEvent {
                delay,
                scope,
                event,
            } => {
                let token = match scope {
                    TimerScope::Session => self.session_timers.clone(),
                    TimerScope::Widget => self.widget_timers.clone(),
                };
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        () = tokio::time::sleep(delay) => {
                            if let Some(event_tx) = event_tx.upgrade() {
                                let _ = event_tx.send(event).await;
                            }
                        }
                        () = token.cancelled() => {
                            tracing::trace!(?event, "Timer cancelled");
                        }
                    }
                });
            }

            Effect::CancelSessionTimers => {
                self.session_timers.cancel();
                self.session_timers = self.widget_timers.child_token();
            }

            Effect::ComposeMail { draft } => {
                tracing::info!(to = %draft.to, "Handing inquiry to mail client");
                let mail = Arc::clone(&self.mail);
                tokio::spawn(async move {
                    if let Err(e) = mail.compose(&draft).await {
                        tracing::warn!(error = %e, "Mail handoff failed");
                    }
                });
            }

            Effect::NotifyStateChange { view } => {
                self.view_tx.send_replace(view.clone());
                let _ = self.broadcast_tx.send(WidgetEvent::StateChange { view });
            }
        }
        Ok(())
    }
}
