//! Hero terminal
//!
//! A toy shell on the landing page: a boot banner typed out line by line,
//! then canned replies to whatever the visitor enters. Replies are decided
//! at submit time and applied once their random delay has passed; the
//! caller owns the timers.

mod rules;

pub use rules::{ReplyAction, ReplyRules};

use rand::Rng;
use std::time::Duration;

pub const BOOT_LINES: [&str; 5] = [
    "HOVERSTATE OS v2.4.0",
    "INITIALIZING...",
    "CONNECTING TO HOST...",
    "CONNECTION ESTABLISHED.",
    "TYPE A COMMAND OR SAY HELLO.",
];

/// Gap between boot lines
pub const BOOT_INTERVAL: Duration = Duration::from_millis(600);

const REPLY_DELAY_MIN_MS: u64 = 300;
const REPLY_DELAY_MAX_MS: u64 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalLine {
    pub kind: LineKind,
    pub content: String,
}

impl TerminalLine {
    fn system(content: impl Into<String>) -> Self {
        Self {
            kind: LineKind::System,
            content: content.into(),
        }
    }
}

/// A reply waiting for its delay to elapse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub delay: Duration,
    pub action: ReplyAction,
}

#[derive(Debug, Default)]
pub struct Terminal {
    lines: Vec<TerminalLine>,
    rules: ReplyRules,
    /// How many boot lines have been printed
    booted: usize,
}

impl Terminal {
    pub fn new(rules: ReplyRules) -> Self {
        Self {
            lines: Vec::new(),
            rules,
            booted: 0,
        }
    }

    pub fn lines(&self) -> &[TerminalLine] {
        &self.lines
    }

    #[cfg(test)]
    pub fn boot_finished(&self) -> bool {
        self.booted == BOOT_LINES.len()
    }

    /// Print every boot line due `elapsed` after mount
    ///
    /// Line `i` is due at `(i + 1) * BOOT_INTERVAL`. Boot lines keep coming
    /// even if the screen was cleared in the meantime.
    pub fn advance_boot(&mut self, elapsed: Duration) {
        while let Some(line) = BOOT_LINES.get(self.booted) {
            let due = BOOT_INTERVAL * u32::try_from(self.booted + 1).unwrap_or(u32::MAX);
            if due > elapsed {
                break;
            }
            self.lines.push(TerminalLine::system(*line));
            self.booted += 1;
        }
    }

    /// Echo `input` and decide the reply
    ///
    /// Blank input is ignored. Several replies may be in flight at once.
    pub fn submit<R: Rng + ?Sized>(&mut self, input: &str, rng: &mut R) -> Option<PendingReply> {
        let command = input.trim();
        if command.is_empty() {
            return None;
        }
        self.lines.push(TerminalLine {
            kind: LineKind::User,
            content: command.to_string(),
        });

        let delay = Duration::from_millis(rng.gen_range(REPLY_DELAY_MIN_MS..REPLY_DELAY_MAX_MS));
        let action = self.rules.respond(command, rng)?;
        tracing::debug!(command, ?action, ?delay, "Terminal reply scheduled");
        Some(PendingReply { delay, action })
    }

    pub fn apply(&mut self, action: ReplyAction) {
        match action {
            ReplyAction::Say(text) => self.lines.push(TerminalLine::system(text)),
            ReplyAction::Clear => self.lines.clear(),
        }
    }
}
