use std::time::Duration;

use thiserror::Error;

use super::answer::{normalize, NormalizedAnswer, OptionLetter};

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

/// Reasons a question record is rejected at construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("category cannot be empty")]
    EmptyCategory,

    #[error("subcategory cannot be empty")]
    EmptySubcategory,

    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("at least {MIN_OPTIONS} options are required, found {found}")]
    TooFewOptions { found: usize },

    #[error("at most {MAX_OPTIONS} options are allowed, found {found}")]
    TooManyOptions { found: usize },

    #[error("option {index} is blank")]
    BlankOption { index: usize },

    #[error("answer '{answer}' is not valid, valid options: {valid}")]
    AnswerOutOfRange { answer: String, valid: String },

    #[error("per-question timer must be at least one second")]
    ZeroTimer,
}

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    category: String,
    subcategory: String,
    text: String,
    options: Vec<String>,
    correct_answer: OptionLetter,
    timer_seconds: Option<u32>,
    explanation: Option<String>,
}

impl QuestionRecord {
    /// Build a record, trimming every text field.
    ///
    /// The correct answer accepts any form [`normalize`] understands, so
    /// `"2"`, `"b"` and `"second"` all name option B.
    pub fn new(
        category: &str,
        subcategory: &str,
        text: &str,
        options: Vec<String>,
        correct_answer: &str,
    ) -> Result<Self, ValidationError> {
        let category = category.trim();
        let subcategory = subcategory.trim();
        let text = text.trim();

        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        if subcategory.is_empty() {
            return Err(ValidationError::EmptySubcategory);
        }
        if text.is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }

        let options: Vec<String> = options.iter().map(|o| o.trim().to_string()).collect();
        if options.len() < MIN_OPTIONS {
            return Err(ValidationError::TooFewOptions {
                found: options.len(),
            });
        }
        if options.len() > MAX_OPTIONS {
            return Err(ValidationError::TooManyOptions {
                found: options.len(),
            });
        }
        if let Some(index) = options.iter().position(|o| o.is_empty()) {
            return Err(ValidationError::BlankOption { index });
        }

        let correct_answer = match normalize(correct_answer) {
            NormalizedAnswer::Letter(letter) if letter.index() < options.len() => letter,
            other => {
                return Err(ValidationError::AnswerOutOfRange {
                    answer: other.as_str().to_string(),
                    valid: letters_for(options.len())
                        .map(|l| l.to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
        };

        Ok(Self {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            text: text.to_string(),
            options,
            correct_answer,
            timer_seconds: None,
            explanation: None,
        })
    }

    /// Attach a per-question timer supplied by the data source.
    pub fn with_timer(mut self, seconds: u32) -> Result<Self, ValidationError> {
        if seconds == 0 {
            return Err(ValidationError::ZeroTimer);
        }
        self.timer_seconds = Some(seconds);
        Ok(self)
    }

    pub fn with_explanation(mut self, explanation: &str) -> Self {
        let explanation = explanation.trim();
        self.explanation = (!explanation.is_empty()).then(|| explanation.to_string());
        self
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer(&self) -> OptionLetter {
        self.correct_answer
    }

    pub fn timer_seconds(&self) -> Option<u32> {
        self.timer_seconds
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Letters that name an existing option, in order.
    pub fn valid_option_letters(&self) -> Vec<OptionLetter> {
        letters_for(self.options.len()).collect()
    }

    pub fn correct_option_text(&self) -> &str {
        &self.options[self.correct_answer.index()]
    }

    pub fn option_text_for(&self, letter: OptionLetter) -> Option<&str> {
        self.options.get(letter.index()).map(String::as_str)
    }

    pub fn is_correct(&self, letter: OptionLetter) -> bool {
        letter == self.correct_answer
    }

    /// The record's own timer when present, otherwise the session limit.
    pub fn effective_time_limit(&self, session_limit: Duration) -> Duration {
        self.timer_seconds
            .map(|s| Duration::from_secs(u64::from(s)))
            .unwrap_or(session_limit)
    }
}

fn letters_for(option_count: usize) -> impl Iterator<Item = OptionLetter> {
    OptionLetter::ALL.into_iter().take(option_count)
}
