//! Test doubles for driving prompts and sessions under paused time.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use tokio::time::{self, Instant};

use super::prompt::{PromptOutcome, PromptState};
use super::state::FinalReport;
use crate::input::{AnswerSource, InputEvent};
use crate::models::QuestionRecord;
use crate::ui::Presenter;

pub(crate) fn question(
    category: &str,
    subcategory: &str,
    text: &str,
    option_count: usize,
    answer: &str,
) -> QuestionRecord {
    let options = (1..=option_count).map(|i| format!("Option {i}")).collect();
    QuestionRecord::new(category, subcategory, text, options, answer).unwrap()
}

/// Replays input events, each due a fixed delay after it is first awaited.
///
/// `None` events close the input. Once the script runs out the source
/// waits forever, like a terminal nobody is typing at.
#[derive(Default)]
pub(crate) struct ScriptedSource {
    steps: VecDeque<(Duration, Option<InputEvent>)>,
    pending: Option<(Instant, Option<InputEvent>)>,
    stale: Vec<InputEvent>,
    held_interrupt: bool,
    pub(crate) discarded: usize,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn submit_after(self, secs: u64, line: &str) -> Self {
        self.event_after(secs, InputEvent::Submit(line.to_string()))
    }

    pub(crate) fn event_after(mut self, secs: u64, event: InputEvent) -> Self {
        self.steps.push_back((Duration::from_secs(secs), Some(event)));
        self
    }

    pub(crate) fn close_after(mut self, secs: u64) -> Self {
        self.steps.push_back((Duration::from_secs(secs), None));
        self
    }

    /// A line typed before anyone asked for it.
    pub(crate) fn stale(self, line: &str) -> Self {
        self.stale_event(InputEvent::Submit(line.to_string()))
    }

    pub(crate) fn stale_event(mut self, event: InputEvent) -> Self {
        self.stale.push(event);
        self
    }
}

impl AnswerSource for ScriptedSource {
    async fn next_event(&mut self) -> io::Result<Option<InputEvent>> {
        if std::mem::take(&mut self.held_interrupt) {
            return Ok(Some(InputEvent::Interrupt));
        }
        if !self.stale.is_empty() {
            return Ok(Some(self.stale.remove(0)));
        }
        if self.pending.is_none() {
            let Some((delay, event)) = self.steps.pop_front() else {
                return std::future::pending().await;
            };
            self.pending = Some((Instant::now() + delay, event));
        }
        if let Some((due, _)) = &self.pending {
            time::sleep_until(*due).await;
        }
        Ok(self.pending.take().and_then(|(_, event)| event))
    }

    fn discard_pending(&mut self) {
        self.discarded += self.stale.len() + usize::from(self.pending.is_some());
        self.held_interrupt |= self.stale.contains(&InputEvent::Interrupt);
        self.stale.clear();
        self.pending = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Recorded {
    Banner,
    Menu { title: String, choices: Vec<String> },
    Notice(String),
    Question {
        position: usize,
        total: usize,
        limit: Duration,
    },
    InputLine {
        typed: String,
        remaining: Option<Duration>,
    },
    Outcome(PromptState),
    Report,
}

/// Presenter that remembers what it was asked to show.
#[derive(Debug, Default)]
pub(crate) struct RecordingPresenter {
    pub(crate) events: Vec<Recorded>,
    /// Fail the n-th (1-based) `show_outcome` call.
    pub(crate) fail_outcome_at: Option<usize>,
    pub(crate) outcomes_shown: usize,
}

impl Presenter for RecordingPresenter {
    fn show_banner(&mut self, _available: usize, _time_limit: Duration) -> io::Result<()> {
        self.events.push(Recorded::Banner);
        Ok(())
    }

    fn show_menu(&mut self, title: &str, choices: &[String]) -> io::Result<()> {
        self.events.push(Recorded::Menu {
            title: title.to_string(),
            choices: choices.to_vec(),
        });
        Ok(())
    }

    fn show_notice(&mut self, message: &str) -> io::Result<()> {
        self.events.push(Recorded::Notice(message.to_string()));
        Ok(())
    }

    fn show_question(
        &mut self,
        position: usize,
        total: usize,
        _question: &QuestionRecord,
        limit: Duration,
    ) -> io::Result<()> {
        self.events.push(Recorded::Question {
            position,
            total,
            limit,
        });
        Ok(())
    }

    fn show_input_line(
        &mut self,
        _label: &str,
        typed: &str,
        remaining: Option<Duration>,
    ) -> io::Result<()> {
        self.events.push(Recorded::InputLine {
            typed: typed.to_string(),
            remaining,
        });
        Ok(())
    }

    fn show_outcome(&mut self, _question: &QuestionRecord, outcome: &PromptOutcome) -> io::Result<()> {
        self.outcomes_shown += 1;
        if self.fail_outcome_at == Some(self.outcomes_shown) {
            return Err(io::Error::other("terminal went away"));
        }
        self.events.push(Recorded::Outcome(outcome.state));
        Ok(())
    }

    fn show_report(&mut self, _report: &FinalReport) -> io::Result<()> {
        self.events.push(Recorded::Report);
        Ok(())
    }
}
