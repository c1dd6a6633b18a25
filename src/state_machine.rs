//! Support widget state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::{Effect, TimerScope};
pub use event::{DraftEdit, Event};
pub use state::{MailTemplate, WidgetContext, WidgetState, WidgetView, WindowMode};
pub use transition::transition;
