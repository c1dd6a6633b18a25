//! Reply rules for the hero terminal
//!
//! Rules are checked top to bottom against the lowercased command; the
//! first match wins. Commands that match nothing get a random line from
//! the fallback pool.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// What the terminal does once the reply delay has elapsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyAction {
    /// Print a system line
    Say(String),
    /// Wipe the screen without replying
    Clear,
}

impl ReplyAction {
    pub fn say(text: impl Into<String>) -> Self {
        ReplyAction::Say(text.into())
    }
}

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

pub struct ReplyRule {
    predicate: Predicate,
    action: ReplyAction,
}

impl ReplyRule {
    pub fn new(
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
        action: ReplyAction,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            action,
        }
    }

    /// Matches when the command contains any of `needles`
    ///
    /// Plain substring match, so `hi` also fires on `this`.
    pub fn contains_any(needles: &[&str], action: ReplyAction) -> Self {
        let needles: Vec<String> = needles.iter().map(|n| n.to_lowercase()).collect();
        Self::new(move |cmd| needles.iter().any(|n| cmd.contains(n.as_str())), action)
    }

    fn matches(&self, lowered: &str) -> bool {
        (self.predicate)(lowered)
    }
}

impl fmt::Debug for ReplyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyRule")
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

const FALLBACK_LINES: [&str; 16] = [
    "I'M SORRY DAVE, I CAN'T DO THAT.",
    "HAVE YOU TRIED TURNING IT OFF AND ON AGAIN?",
    "ERROR 418: I AM A TEAPOT.",
    "NICE TRY, BUT NO.",
    "COMPUTING... COMPUTING... 42.",
    "PLEASE DON'T FEED THE BUGS.",
    "SYSTEM OVERLOAD. NEED COFFEE.",
    "I SAW YOU CLICK THAT.",
    "DELETING SYSTEM32... JUST KIDDING.",
    "PASSWORD INCORRECT. TRY 'ADMIN'.",
    "WOULD YOU LIKE TO PLAY A GAME?",
    "LOADING WITTY REMARK... FAILED.",
    "PC LOAD LETTER?",
    "INSERT COIN TO CONTINUE.",
    "KEYBOARD NOT DETECTED. PRESS F1 TO RESUME.",
    "BUFFER OVERFLOW IN SECTOR 7G.",
];

/// Ordered rules plus the fallback pool
#[derive(Debug)]
pub struct ReplyRules {
    rules: Vec<ReplyRule>,
    fallback: Vec<String>,
}

impl ReplyRules {
    pub fn new(rules: Vec<ReplyRule>, fallback: Vec<String>) -> Self {
        Self { rules, fallback }
    }

    /// The easter eggs of the landing page terminal
    pub fn hero_defaults() -> Self {
        Self::new(
            vec![
                ReplyRule::contains_any(&["hello", "hi"], ReplyAction::say("GREETINGS, HUMAN.")),
                ReplyRule::contains_any(
                    &["help"],
                    ReplyAction::say("THERE IS NO HELP. ONLY CODE."),
                ),
                ReplyRule::contains_any(&["clear"], ReplyAction::Clear),
                ReplyRule::contains_any(
                    &["sudo"],
                    ReplyAction::say("NICE TRY. YOU HAVE NO POWER HERE."),
                ),
                ReplyRule::contains_any(&["whoami"], ReplyAction::say("A VISITOR IN MY WORLD.")),
                ReplyRule::contains_any(&["ls"], ReplyAction::say("FILE_NOT_FOUND")),
            ],
            FALLBACK_LINES.iter().map(ToString::to_string).collect(),
        )
    }

    #[cfg(test)]
    pub fn fallback(&self) -> &[String] {
        &self.fallback
    }

    /// Pick the reply to `command`
    ///
    /// `None` only when nothing matches and the fallback pool is empty.
    pub fn respond<R: Rng + ?Sized>(&self, command: &str, rng: &mut R) -> Option<ReplyAction> {
        let lowered = command.to_lowercase();
        if let Some(rule) = self.rules.iter().find(|r| r.matches(&lowered)) {
            return Some(rule.action.clone());
        }
        self.fallback.choose(rng).cloned().map(ReplyAction::Say)
    }
}

impl Default for ReplyRules {
    fn default() -> Self {
        Self::hero_defaults()
    }
}
