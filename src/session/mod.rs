//! The quiz session engine: timed prompts, scoring and reporting.

mod cancel;
mod controller;
mod prompt;
mod state;
#[cfg(test)]
pub(crate) mod testing;

pub use cancel::Cancellation;
pub use controller::{
    clamp_time_limit, ConfigureError, Session, DEFAULT_TIME_LIMIT_SECS, MAX_TIME_LIMIT_SECS,
    MIN_TIME_LIMIT_SECS,
};
pub use prompt::{PromptOutcome, PromptState, TimedPrompt};
pub use state::{percentage, FinalReport, Outcome, OutcomeKind, SessionState};
