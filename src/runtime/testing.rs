//! Mock implementations for testing
//!
//! These mocks drive a real runtime task on tokio's paused clock, so the
//! simulated reply delays elapse instantly and deterministically.

use super::traits::*;
use crate::mail::{MailDraft, MailError};
use crate::transcript::InMemoryTranscript;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Mail Composer
// ============================================================================

/// Records every draft instead of launching a mail client
#[derive(Default)]
pub struct MockMailComposer {
    drafts: Mutex<Vec<MailDraft>>,
    fail: bool,
}

impl MockMailComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A composer whose opener is missing; drafts are still recorded
    pub fn failing() -> Self {
        Self {
            drafts: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn recorded_drafts(&self) -> Vec<MailDraft> {
        self.drafts.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailComposer for MockMailComposer {
    async fn compose(&self, draft: &MailDraft) -> Result<(), MailError> {
        self.drafts.lock().unwrap().push(draft.clone());
        if self.fail {
            Err(MailError::NoOpener)
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Fixed Clock
// ============================================================================

pub struct FixedClock(pub DateTime<Local>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Local.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

// ============================================================================
// Test Widget Builder
// ============================================================================

use crate::runtime::{mount, WidgetEvent, WidgetHandle};
use crate::script::default_entries;
use crate::state_machine::WidgetContext;
use crate::transcript::{Message, Sender};
use std::time::Duration;
use tokio::sync::broadcast;

/// A mounted widget plus the mocks behind it
pub struct TestWidget {
    pub handle: WidgetHandle,
    pub transcript: Arc<InMemoryTranscript>,
    pub mail: Arc<MockMailComposer>,
    pub events: broadcast::Receiver<WidgetEvent>,
}

pub struct TestWidgetBuilder {
    context: WidgetContext,
    mail: MockMailComposer,
}

impl TestWidget {
    pub fn builder() -> TestWidgetBuilder {
        TestWidgetBuilder {
            context: WidgetContext::new("test-widget", default_entries()),
            mail: MockMailComposer::new(),
        }
    }

    pub async fn mount() -> Self {
        Self::builder().build().await
    }

    /// Let the runtime drain its queue without advancing past any timer
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    pub fn messages(&self) -> Vec<Message> {
        InMemoryTranscript::messages(&self.transcript).unwrap()
    }

    pub fn lines(&self) -> Vec<(Sender, String)> {
        self.messages()
            .into_iter()
            .map(|m| (m.sender, m.text))
            .collect()
    }
}

impl TestWidgetBuilder {
    pub fn context(mut self, context: WidgetContext) -> Self {
        self.context = context;
        self
    }

    pub fn mail(mut self, mail: MockMailComposer) -> Self {
        self.mail = mail;
        self
    }

    pub async fn build(self) -> TestWidget {
        let transcript = Arc::new(InMemoryTranscript::new());
        let mail = Arc::new(self.mail);
        let handle = mount(
            self.context,
            transcript.clone(),
            mail.clone(),
            FixedClock::default(),
        )
        .await
        .expect("mount failed");
        let events = handle.subscribe();
        TestWidget {
            handle,
            transcript,
            mail,
            events,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RuntimeError;
    use crate::script::WELCOME_TEXT;
    use crate::state_machine::{DraftEdit, WindowMode};

    const MAIL_TO: &str = "ishmam@hoverstate.design";

    fn transmission() -> String {
        format!("Initiating secure transmission to {MAIL_TO}...")
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_seeds_welcome() {
        let w = TestWidget::mount().await;
        assert_eq!(w.lines(), vec![(Sender::System, WELCOME_TEXT.to_string())]);
        assert_eq!(w.handle.questions().len(), 5);
        assert!(!w.handle.view().pending_reply);

        let msgs = w.messages();
        assert_eq!(msgs[0].display_time(), "09:30");
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_question_answered_after_delay() {
        let w = TestWidget::mount().await;
        w.handle.select_question(0).await.unwrap();
        w.settle().await;

        assert_eq!(
            w.lines()[1],
            (Sender::User, "What is the typical turnaround?".to_string())
        );
        assert!(w.handle.view().pending_reply);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(w.messages().len(), 2, "answer must not arrive early");

        tokio::time::sleep(Duration::from_millis(200)).await;
        let lines = w.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].0, Sender::System);
        assert!(lines[2].1.starts_with("For the Landing Page+ package"));
        assert!(!w.handle.view().pending_reply);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_question_while_pending_is_dropped() {
        let w = TestWidget::mount().await;
        w.handle.select_question(0).await.unwrap();
        w.handle.select_question(1).await.unwrap();
        w.settle().await;
        assert_eq!(w.messages().len(), 2);

        tokio::time::sleep(Duration::from_secs(5)).await;
        let lines = w.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].1.starts_with("For the Landing Page+ package"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_free_text_hands_off_to_mail() {
        let w = TestWidget::mount().await;
        for c in "Need a site".chars() {
            w.handle.edit_draft(DraftEdit::Insert(c)).await.unwrap();
        }
        w.handle.submit_draft().await.unwrap();
        w.settle().await;

        assert_eq!(w.lines()[1], (Sender::User, "Need a site".to_string()));
        let view = w.handle.view();
        assert!(view.pending_reply);
        assert_eq!(view.draft, "");

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(w.lines()[2], (Sender::System, transmission()));
        assert!(!w.handle.view().pending_reply);
        assert!(w.mail.recorded_drafts().is_empty());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let drafts = w.mail.recorded_drafts();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].to, MAIL_TO);
        assert_eq!(drafts[0].subject, "Project Inquiry via HoverState");
        assert_eq!(drafts[0].body, "Need a site");
        assert!(w.handle.view().toast_visible);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert!(!w.handle.view().toast_visible);
        assert_eq!(w.messages().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_submission_ignored() {
        let w = TestWidget::mount().await;
        w.handle.set_draft("   ").await.unwrap();
        w.handle.submit_draft().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(w.messages().len(), 1);
        assert_eq!(w.handle.view().draft, "   ");
        assert!(w.mail.recorded_drafts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_free_text_while_pending_keeps_draft() {
        let w = TestWidget::mount().await;
        w.handle.select_question(2).await.unwrap();
        w.handle.set_draft("hello").await.unwrap();
        w.handle.submit_draft().await.unwrap();
        w.settle().await;

        assert_eq!(w.messages().len(), 2);
        assert_eq!(w.handle.view().draft, "hello");

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(w.mail.recorded_drafts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_discards_pending_reply() {
        let w = TestWidget::mount().await;
        w.handle.select_question(0).await.unwrap();
        w.settle().await;
        w.handle.reset().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(w.lines(), vec![(Sender::System, WELCOME_TEXT.to_string())]);
        assert!(!w.handle.view().pending_reply);

        // A fresh question after the reset is answered normally
        w.handle.select_question(4).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(w.messages().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_during_handoff_cancels_mail() {
        let w = TestWidget::mount().await;
        w.handle.submit_free_text("Quote please").await.unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(w.messages().len(), 3);

        w.handle.reset().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(w.mail.recorded_drafts().is_empty());
        assert_eq!(w.messages().len(), 1);
        assert!(!w.handle.view().toast_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_survives_reset_then_clears() {
        let w = TestWidget::mount().await;
        w.handle.submit_free_text("Quote please").await.unwrap();
        tokio::time::sleep(Duration::from_millis(2600)).await;
        assert!(w.handle.view().toast_visible);

        w.handle.reset().await.unwrap();
        w.settle().await;
        assert!(w.handle.view().toast_visible);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert!(!w.handle.view().toast_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mail_failure_is_not_fatal() {
        let w = TestWidget::builder()
            .mail(MockMailComposer::failing())
            .build()
            .await;
        w.handle.submit_free_text("Quote please").await.unwrap();
        tokio::time::sleep(Duration::from_millis(2600)).await;

        assert_eq!(w.mail.recorded_drafts().len(), 1);
        assert!(w.handle.view().toast_visible);
        assert!(w.handle.is_mounted());

        w.handle.select_question(1).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(w.messages().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_inline_resets_and_close_fullscreen_restores() {
        let w = TestWidget::mount().await;
        w.handle.select_question(0).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(w.messages().len(), 3);

        w.handle.toggle_maximize().await.unwrap();
        w.settle().await;
        assert_eq!(w.handle.view().window_mode, WindowMode::Fullscreen);

        w.handle.close().await.unwrap();
        w.settle().await;
        assert_eq!(w.handle.view().window_mode, WindowMode::InlineExpanded);
        assert_eq!(w.messages().len(), 3);

        w.handle.close().await.unwrap();
        w.settle().await;
        assert_eq!(w.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_minimize_keeps_conversation_running() {
        let w = TestWidget::mount().await;
        w.handle.select_question(3).await.unwrap();
        w.handle.minimize().await.unwrap();
        w.settle().await;
        assert_eq!(w.handle.view().window_mode, WindowMode::InlineCollapsed);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(w.messages().len(), 3);

        w.handle.minimize().await.unwrap();
        w.settle().await;
        assert_eq!(w.handle.view().window_mode, WindowMode::InlineExpanded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_cancels_timers() {
        let w = TestWidget::mount().await;
        w.handle.submit_free_text("Quote please").await.unwrap();
        w.settle().await;
        w.handle.unmount();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(w.messages().len(), 2);
        assert!(w.mail.recorded_drafts().is_empty());
        assert!(!w.handle.is_mounted());
        assert!(matches!(
            w.handle.select_question(0).await,
            Err(RuntimeError::NotMounted)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_every_handle_stops_runtime() {
        let w = TestWidget::mount().await;
        w.handle.submit_free_text("Quote please").await.unwrap();
        w.settle().await;

        let TestWidget {
            handle,
            transcript,
            mail,
            ..
        } = w;
        drop(handle);
        tokio::time::sleep(Duration::from_secs(60)).await;

        // The runtime task let go of the store and its timers never fired
        assert_eq!(Arc::strong_count(&transcript), 1);
        assert_eq!(InMemoryTranscript::messages(&transcript).unwrap().len(), 2);
        assert!(mail.recorded_drafts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_broadcasts_messages_and_state() {
        let mut w = TestWidget::mount().await;
        w.handle.select_question(0).await.unwrap();

        match w.events.recv().await.unwrap() {
            WidgetEvent::Message { message } => {
                assert_eq!(message.sender, Sender::User);
                assert_eq!(message.sequence, 1);
            }
            other => panic!("expected message, got {other:?}"),
        }
        match w.events.recv().await.unwrap() {
            WidgetEvent::StateChange { view } => assert!(view.pending_reply),
            other => panic!("expected state change, got {other:?}"),
        }

        w.handle.reset().await.unwrap();
        match w.events.recv().await.unwrap() {
            WidgetEvent::TranscriptReset { messages } => {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].text, WELCOME_TEXT);
            }
            other => panic!("expected reset, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_context() {
        use crate::script::ScriptedEntry;
        use crate::state_machine::state::ReplyTimings;
        use crate::state_machine::MailTemplate;

        let timings = ReplyTimings {
            scripted_reply: Duration::from_millis(10),
            ..ReplyTimings::default()
        };
        let context = WidgetContext::new("custom", vec![ScriptedEntry::new("Ping?", "Pong.")])
            .with_timings(timings)
            .with_mail(MailTemplate {
                to: "hello@example.com".to_string(),
                subject: "Hi".to_string(),
            });
        let w = TestWidget::builder().context(context).build().await;
        assert_eq!(w.handle.questions(), ["Ping?".to_string()]);

        w.handle.select_question(0).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(w.lines()[2], (Sender::System, "Pong.".to_string()));

        // Out of range is ignored
        w.handle.select_question(3).await.unwrap();
        w.settle().await;
        assert_eq!(w.messages().len(), 3);

        w.handle.submit_free_text("hey").await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(
            w.lines()[4],
            (
                Sender::System,
                "Initiating secure transmission to hello@example.com...".to_string()
            )
        );
        assert_eq!(w.mail.recorded_drafts()[0].subject, "Hi");
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_reflects_runtime() {
        let w = TestWidget::mount().await;
        w.handle.set_draft("typing").await.unwrap();
        w.handle.toggle_maximize().await.unwrap();
        w.settle().await;

        let snapshot = w.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.transcript.len(), 1);
        assert_eq!(snapshot.draft, "typing");
        assert_eq!(snapshot.window_mode, WindowMode::Fullscreen);
        assert!(!snapshot.pending_reply);
        assert!(!snapshot.toast_visible);
    }

    #[tokio::test]
    async fn test_in_memory_transcript_through_trait() {
        let store: Arc<dyn TranscriptStore> = Arc::new(InMemoryTranscript::new());
        let at = FixedClock::default().now();
        store.reset("welcome", at).await.unwrap();
        store.append(Sender::User, "hi", at).await.unwrap();

        let msgs = store.messages().await.unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].text, "hi");
    }
}
