//! Scripted content for the live support widget
//!
//! Everything here is fixed at configuration time and read-only afterwards.

use serde::{Deserialize, Serialize};

/// First message of every fresh transcript
pub const WELCOME_TEXT: &str =
    "Connection established. Select a query from the database or type a custom inquiry below.";

/// Where free-text inquiries are addressed
pub const DEFAULT_MAIL_TO: &str = "ishmam@hoverstate.design";

/// Subject line of the composed inquiry mail
pub const DEFAULT_MAIL_SUBJECT: &str = "Project Inquiry via HoverState";

/// A canned question and its answer, shown in the quick queries list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedEntry {
    pub question: String,
    pub answer: String,
}

impl ScriptedEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// The quick queries in display order
pub fn default_entries() -> Vec<ScriptedEntry> {
    vec![
        ScriptedEntry::new(
            "What is the typical turnaround?",
            "For the Landing Page+ package, we typically ship in 10-14 days. The MVP Kit takes \
             about 3-4 weeks depending on scope complexity.",
        ),
        ScriptedEntry::new(
            "Do you provide the copy?",
            "Yes. We hate Lorem Ipsum. We include professional, conversion-focused copywriting \
             in all our packages to ensure your narrative sells.",
        ),
        ScriptedEntry::new(
            "What tech stack do you use?",
            "We build on modern, scalable foundations: React, Next.js, TailwindCSS, and WebGL \
             for high-performance interactions.",
        ),
        ScriptedEntry::new(
            "Do you offer post-launch support?",
            "Absolutely. Every project includes 30 days of free support. We also offer ongoing \
             partnership retainers for continuous iteration.",
        ),
        ScriptedEntry::new(
            "How do payments work?",
            "We work on a milestone basis: 50% to kickstart the project, 25% upon design \
             approval, and the final 25% before handoff/deployment.",
        ),
    ]
}

/// System line announcing the mail handoff
pub fn transmission_text(mail_to: &str) -> String {
    format!("Initiating secure transmission to {mail_to}...")
}
