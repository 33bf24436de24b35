//! A single timed question prompt.
//!
//! The prompt waits on three things at once: the operator's input, the
//! question deadline and the session cancellation signal. One `select!` is
//! the only place an outcome is decided, so a prompt resolves exactly once.
//! The deadline is polled ahead of input, which means input that becomes
//! ready in the same instant the deadline passes is ignored.

use std::io;
use std::time::Duration;

use serde::Serialize;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use super::cancel::Cancellation;
use crate::input::{AnswerSource, InputEvent};
use crate::models::{normalize, OptionLetter, QuestionRecord};
use crate::ui::Presenter;

const TICK: Duration = Duration::from_secs(1);

/// Terminal state of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptState {
    /// A valid option letter arrived before the deadline.
    Answered,
    /// The deadline passed with no accepted input.
    TimedOut,
    /// Input arrived in time but named no option of this question.
    InvalidInput,
    /// The session was cancelled or input ended while waiting.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptOutcome {
    pub state: PromptState,
    pub chosen: Option<OptionLetter>,
    /// Trimmed text the operator submitted, if any.
    pub raw_answer: Option<String>,
    pub elapsed: Duration,
}

pub struct TimedPrompt<'q> {
    question: &'q QuestionRecord,
    limit: Duration,
}

impl<'q> TimedPrompt<'q> {
    pub fn new(question: &'q QuestionRecord, limit: Duration) -> Self {
        Self { question, limit }
    }

    /// Collect one answer within the time limit.
    ///
    /// Input typed before the prompt opened is discarded first. Blank lines
    /// keep the prompt waiting. Errors come only from the input source or
    /// the presenter; timeouts and bad answers are ordinary outcomes.
    pub async fn ask<S, P>(
        &self,
        source: &mut S,
        presenter: &mut P,
        cancel: &Cancellation,
    ) -> io::Result<PromptOutcome>
    where
        S: AnswerSource,
        P: Presenter,
    {
        source.discard_pending();

        let label = answer_label(self.question);
        let started = Instant::now();
        let deadline = started + self.limit;
        let countdown = time::sleep_until(deadline);
        tokio::pin!(countdown);

        let mut ticker = time::interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut typed = String::new();

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    return Ok(self.resolve(PromptState::Interrupted, None, None, started));
                }
                _ = &mut countdown => {
                    debug!(limit = ?self.limit, "Question timed out");
                    return Ok(self.resolve(PromptState::TimedOut, None, None, started));
                }
                event = source.next_event() => match event? {
                    Some(InputEvent::Submit(line)) => {
                        if line.trim().is_empty() {
                            typed.clear();
                            presenter.show_input_line(&label, &typed, Some(remaining(deadline)))?;
                            continue;
                        }
                        return Ok(self.judge(&line, started));
                    }
                    Some(InputEvent::Edit(buffer)) => {
                        typed = buffer;
                        presenter.show_input_line(&label, &typed, Some(remaining(deadline)))?;
                    }
                    Some(InputEvent::Interrupt) => {
                        cancel.cancel();
                        return Ok(self.resolve(PromptState::Interrupted, None, None, started));
                    }
                    None => {
                        debug!("Input closed while waiting for an answer");
                        return Ok(self.resolve(PromptState::Interrupted, None, None, started));
                    }
                },
                _ = ticker.tick() => {
                    presenter.show_input_line(&label, &typed, Some(remaining(deadline)))?;
                }
            }
        }
    }

    fn judge(&self, line: &str, started: Instant) -> PromptOutcome {
        let raw = Some(line.trim().to_string());
        let letter = normalize(line)
            .letter()
            .filter(|letter| self.question.option_text_for(*letter).is_some());

        match letter {
            Some(letter) => self.resolve(PromptState::Answered, Some(letter), raw, started),
            None => self.resolve(PromptState::InvalidInput, None, raw, started),
        }
    }

    fn resolve(
        &self,
        state: PromptState,
        chosen: Option<OptionLetter>,
        raw_answer: Option<String>,
        started: Instant,
    ) -> PromptOutcome {
        PromptOutcome {
            state,
            chosen,
            raw_answer,
            elapsed: started.elapsed(),
        }
    }
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

fn answer_label(question: &QuestionRecord) -> String {
    let letters: Vec<String> = question
        .valid_option_letters()
        .iter()
        .map(|l| l.to_string())
        .collect();
    format!("Your answer ({})", letters.join(", "))
}
