//! Session state and scoring.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use super::prompt::{PromptOutcome, PromptState};
use crate::models::{OptionLetter, QuestionRecord};

/// How one question ended, for scoring and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Correct,
    Incorrect,
    TimedOut,
    /// An answer arrived in time but named no option of the question.
    Invalid,
}

/// Audit entry for one asked question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub question_index: usize,
    pub question_text: String,
    pub chosen: Option<OptionLetter>,
    pub correct_answer: OptionLetter,
    pub correct: bool,
    pub kind: OutcomeKind,
    pub elapsed_seconds: f64,
}

impl Outcome {
    /// Score a prompt result. Interrupted prompts produce no outcome.
    pub fn from_prompt(
        question_index: usize,
        question: &QuestionRecord,
        prompt: &PromptOutcome,
    ) -> Option<Self> {
        let kind = match (prompt.state, prompt.chosen) {
            (PromptState::Answered, Some(letter)) if question.is_correct(letter) => {
                OutcomeKind::Correct
            }
            (PromptState::Answered, _) => OutcomeKind::Incorrect,
            (PromptState::TimedOut, _) => OutcomeKind::TimedOut,
            (PromptState::InvalidInput, _) => OutcomeKind::Invalid,
            (PromptState::Interrupted, _) => return None,
        };

        Some(Self {
            question_index,
            question_text: question.text().to_string(),
            chosen: prompt.chosen,
            correct_answer: question.correct_answer(),
            correct: kind == OutcomeKind::Correct,
            kind,
            elapsed_seconds: prompt.elapsed.as_secs_f64(),
        })
    }
}

/// Summary produced at the end of a session, complete or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalReport {
    pub score: usize,
    pub answered_count: usize,
    pub total_questions: usize,
    pub percentage: f64,
    /// The session stopped before every planned question was asked.
    pub interrupted: bool,
    pub timed_out: usize,
    pub invalid: usize,
    pub outcomes: Vec<Outcome>,
}

pub fn percentage(score: usize, total: usize) -> f64 {
    if total > 0 {
        (score as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Mutable state of one quiz run.
#[derive(Debug)]
pub struct SessionState {
    id: Uuid,
    category: String,
    subcategory: String,
    time_limit: Duration,
    remaining_questions: VecDeque<QuestionRecord>,
    planned_total: usize,
    score: usize,
    answered_count: usize,
    outcomes: Vec<Outcome>,
}

impl SessionState {
    pub fn new(
        category: &str,
        subcategory: &str,
        time_limit: Duration,
        questions: Vec<QuestionRecord>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            time_limit,
            planned_total: questions.len(),
            remaining_questions: questions.into(),
            score: 0,
            answered_count: 0,
            outcomes: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    pub fn remaining_questions(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.remaining_questions.iter()
    }

    pub fn planned_total(&self) -> usize {
        self.planned_total
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn answered_count(&self) -> usize {
        self.answered_count
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub(crate) fn next_question(&mut self) -> Option<QuestionRecord> {
        self.remaining_questions.pop_front()
    }

    /// Append an outcome and update the score.
    ///
    /// A second outcome for an already recorded question is ignored and
    /// `false` is returned.
    pub fn record(&mut self, outcome: Outcome) -> bool {
        if self
            .outcomes
            .iter()
            .any(|o| o.question_index == outcome.question_index)
        {
            warn!(
                question_index = outcome.question_index,
                "Ignoring repeated outcome for question"
            );
            return false;
        }

        if outcome.correct {
            self.score += 1;
        }
        self.answered_count += 1;
        self.outcomes.push(outcome);
        true
    }

    /// Build the final report. An interrupted session reports only the
    /// questions that were actually answered.
    pub fn report(&self, interrupted: bool) -> FinalReport {
        let total_questions = if interrupted {
            self.answered_count
        } else {
            self.planned_total
        };
        let count = |kind: OutcomeKind| self.outcomes.iter().filter(|o| o.kind == kind).count();

        FinalReport {
            score: self.score,
            answered_count: self.answered_count,
            total_questions,
            percentage: percentage(self.score, total_questions),
            interrupted,
            timed_out: count(OutcomeKind::TimedOut),
            invalid: count(OutcomeKind::Invalid),
            outcomes: self.outcomes.clone(),
        }
    }
}
