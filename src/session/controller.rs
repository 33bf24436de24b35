//! Session configuration and the question loop.

use std::io;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::thread_rng;
use thiserror::Error;
use tokio::time;
use tracing::{debug, error, info, info_span, Instrument};

use super::cancel::Cancellation;
use super::prompt::TimedPrompt;
use super::state::{FinalReport, Outcome, SessionState};
use crate::input::{AnswerSource, InputEvent};
use crate::models::QuestionRecord;
use crate::ui::Presenter;

pub const MIN_TIME_LIMIT_SECS: u32 = 10;
pub const MAX_TIME_LIMIT_SECS: u32 = 60;
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 30;

/// Why a session could not be set up.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigureError {
    #[error("no questions found for {category} > {subcategory}")]
    EmptyPool {
        category: String,
        subcategory: String,
    },

    #[error("question count must be between 1 and {available}, got {requested}")]
    Range { requested: usize, available: usize },
}

pub fn clamp_time_limit(seconds: u32) -> u32 {
    seconds.clamp(MIN_TIME_LIMIT_SECS, MAX_TIME_LIMIT_SECS)
}

/// One quiz run: a fixed list of questions asked in order.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    pause: Duration,
}

impl Session {
    /// Pick `count` random questions from `pool` filed under
    /// `category` / `subcategory`.
    ///
    /// The order is shuffled with an unseeded RNG, so it differs between
    /// runs. `time_limit_seconds` is clamped to the supported range; records
    /// that carry their own timer keep it.
    pub fn configure(
        pool: &[QuestionRecord],
        category: &str,
        subcategory: &str,
        count: usize,
        time_limit_seconds: u32,
    ) -> Result<Self, ConfigureError> {
        let mut filtered: Vec<QuestionRecord> = pool
            .iter()
            .filter(|q| q.category() == category && q.subcategory() == subcategory)
            .cloned()
            .collect();

        if filtered.is_empty() {
            return Err(ConfigureError::EmptyPool {
                category: category.to_string(),
                subcategory: subcategory.to_string(),
            });
        }
        if count == 0 || count > filtered.len() {
            return Err(ConfigureError::Range {
                requested: count,
                available: filtered.len(),
            });
        }

        filtered.shuffle(&mut thread_rng());
        filtered.truncate(count);

        let time_limit = Duration::from_secs(u64::from(clamp_time_limit(time_limit_seconds)));
        Ok(Self {
            state: SessionState::new(category, subcategory, time_limit, filtered),
            pause: Duration::ZERO,
        })
    }

    /// Wait this long after each question's feedback before the next one.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Ask every question and return the report.
    ///
    /// Cancellation, closed input and I/O failures all end the loop early
    /// with a partial report covering the questions answered so far.
    pub async fn run<S, P>(
        mut self,
        source: &mut S,
        presenter: &mut P,
        cancel: &Cancellation,
    ) -> FinalReport
    where
        S: AnswerSource,
        P: Presenter,
    {
        let span = info_span!("session", id = %self.state.id());
        async move {
            info!(
                category = self.state.category(),
                subcategory = self.state.subcategory(),
                questions = self.state.planned_total(),
                time_limit = ?self.state.time_limit(),
                "Session started"
            );

            let interrupted = self.drive(source, presenter, cancel).await;
            let report = self.state.report(interrupted);

            info!(
                score = report.score,
                answered = report.answered_count,
                total = report.total_questions,
                interrupted,
                "Session finished"
            );
            report
        }
        .instrument(span)
        .await
    }

    /// Returns whether the loop stopped before the last question.
    async fn drive<S, P>(&mut self, source: &mut S, presenter: &mut P, cancel: &Cancellation) -> bool
    where
        S: AnswerSource,
        P: Presenter,
    {
        let total = self.state.planned_total();

        while let Some(question) = self.state.next_question() {
            if cancel.is_cancelled() {
                return true;
            }

            let index = self.state.answered_count();
            match self.ask(index, total, &question, source, presenter, cancel).await {
                Ok(true) => {}
                Ok(false) => return true,
                Err(e) => {
                    error!(error = %e, question = index + 1, "Question loop failed, reporting partial results");
                    return true;
                }
            }

            if !self.pause.is_zero()
                && self.state.remaining_questions().next().is_some()
                && self.wait_between(source, cancel).await
            {
                return true;
            }
        }

        false
    }

    /// Sit out the pause after a question's feedback, still listening for
    /// an interrupt. Anything else typed meanwhile is dropped. Returns
    /// whether the session should stop.
    async fn wait_between<S>(&self, source: &mut S, cancel: &Cancellation) -> bool
    where
        S: AnswerSource,
    {
        let pause = time::sleep(self.pause);
        tokio::pin!(pause);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => return true,
                _ = &mut pause => return false,
                event = source.next_event() => match event {
                    Ok(Some(InputEvent::Interrupt)) => {
                        debug!("Interrupted between questions");
                        cancel.cancel();
                        return true;
                    }
                    Ok(Some(_)) => {}
                    Ok(None) => {
                        debug!("Input closed between questions");
                        return true;
                    }
                    Err(e) => {
                        error!(error = %e, "Input failed between questions, reporting partial results");
                        return true;
                    }
                },
            }
        }
    }

    /// Ask one question. `Ok(false)` means the prompt was interrupted.
    async fn ask<S, P>(
        &mut self,
        index: usize,
        total: usize,
        question: &QuestionRecord,
        source: &mut S,
        presenter: &mut P,
        cancel: &Cancellation,
    ) -> io::Result<bool>
    where
        S: AnswerSource,
        P: Presenter,
    {
        let limit = question.effective_time_limit(self.state.time_limit());
        presenter.show_question(index + 1, total, question, limit)?;

        let prompt = TimedPrompt::new(question, limit)
            .ask(source, presenter, cancel)
            .await?;

        let Some(outcome) = Outcome::from_prompt(index, question, &prompt) else {
            return Ok(false);
        };
        debug!(
            question = index + 1,
            kind = ?outcome.kind,
            chosen = ?outcome.chosen,
            elapsed = outcome.elapsed_seconds,
            "Question resolved"
        );
        self.state.record(outcome);

        presenter.show_outcome(question, &prompt)?;
        Ok(true)
    }
}
