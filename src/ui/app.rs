//! Presentation state and key bindings

use crate::runtime::{WidgetEvent, WidgetSnapshot};
use crate::state_machine::{DraftEdit, WidgetView};
use crate::terminal::{PendingReply, ReplyAction, Terminal};
use crate::transcript::Message;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use std::time::Duration;

/// Which pane receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Terminal,
    Support,
}

/// What the event loop must do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    Edit(DraftEdit),
    ClearDraft,
    /// Enter in the support window, with the highlighted query
    SubmitOrAsk(usize),
    Reset,
    Minimize,
    ToggleMaximize,
    Close,
    /// Start the timer for a hero terminal reply
    ScheduleReply(PendingReply),
}

pub struct App {
    pub(super) terminal: Terminal,
    pub(super) terminal_input: String,
    pub(super) transcript: Vec<Message>,
    pub(super) view: WidgetView,
    pub(super) questions: Vec<String>,
    pub(super) selected: usize,
    pub(super) focus: Focus,
    /// Last runtime error, shown in the status line
    pub(super) error: Option<String>,
    rng: StdRng,
}

impl App {
    pub fn new(
        terminal: Terminal,
        questions: Vec<String>,
        snapshot: WidgetSnapshot,
        rng: StdRng,
    ) -> Self {
        let mut app = Self {
            terminal,
            terminal_input: String::new(),
            transcript: Vec::new(),
            view: WidgetView::default(),
            questions,
            selected: 0,
            focus: Focus::Support,
            error: None,
            rng,
        };
        app.load_snapshot(snapshot);
        app
    }

    /// Replace everything mirrored from the runtime
    pub fn load_snapshot(&mut self, snapshot: WidgetSnapshot) {
        self.transcript = snapshot.transcript;
        self.view = WidgetView {
            pending_reply: snapshot.pending_reply,
            draft: snapshot.draft,
            window_mode: snapshot.window_mode,
            toast_visible: snapshot.toast_visible,
        };
    }

    pub fn apply_widget_event(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::Message { message } => {
                // Already part of the snapshot this view started from
                if self
                    .transcript
                    .last()
                    .is_some_and(|last| last.sequence >= message.sequence)
                {
                    return;
                }
                self.transcript.push(message);
            }
            WidgetEvent::TranscriptReset { messages } => self.transcript = messages,
            WidgetEvent::StateChange { view } => self.view = view,
            WidgetEvent::Error { message } => self.error = Some(message),
        }
    }

    pub fn apply_terminal_reply(&mut self, action: ReplyAction) {
        self.terminal.apply(action);
    }

    /// Advance the boot banner to `elapsed` since start
    pub fn tick(&mut self, elapsed: Duration) {
        self.terminal.advance_boot(elapsed);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Bindings that work whatever has focus
        match key.code {
            KeyCode::Esc => return Some(UiCommand::Quit),
            KeyCode::Char('c') if ctrl => return Some(UiCommand::Quit),
            KeyCode::Char('r') if ctrl => return Some(UiCommand::Reset),
            KeyCode::F(2) => return Some(UiCommand::Minimize),
            KeyCode::F(3) => return Some(UiCommand::ToggleMaximize),
            KeyCode::F(4) => return Some(UiCommand::Close),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Terminal => Focus::Support,
                    Focus::Support => Focus::Terminal,
                };
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Terminal => self.terminal_key(key),
            Focus::Support => self.support_key(key),
        }
    }

    fn terminal_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        match key.code {
            KeyCode::Char(c) => {
                self.terminal_input.push(c);
                None
            }
            KeyCode::Backspace => {
                self.terminal_input.pop();
                None
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.terminal_input);
                self.terminal
                    .submit(&input, &mut self.rng)
                    .map(UiCommand::ScheduleReply)
            }
            _ => None,
        }
    }

    fn support_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        // The collapsed window only shows its title bar
        if !self.view.window_mode.transcript_visible() {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                if self.selected + 1 < self.questions.len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char('u') if ctrl => Some(UiCommand::ClearDraft),
            KeyCode::Char(c) => Some(UiCommand::Edit(DraftEdit::Insert(c))),
            KeyCode::Backspace => Some(UiCommand::Edit(DraftEdit::Backspace)),
            // The mirrored draft may lag behind keystrokes still in flight,
            // so the runtime picks between the two
            KeyCode::Enter => Some(UiCommand::SubmitOrAsk(self.selected)),
            _ => None,
        }
    }
}
