//! # timed-quiz
//!
//! A terminal quiz engine: multiple-choice questions asked one at a time,
//! each against its own countdown.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timed_quiz::{App, QuizConfig, QuizError, Selection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = QuizConfig::load(None)?;
//!     let mut app = App::new(config, Selection::default());
//!
//!     for report in app.run().await? {
//!         println!("{}/{}", report.score, report.total_questions);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The pieces are usable on their own as well: [`data::load_questions`]
//! parses a question file and [`Session`] runs a configured quiz against
//! any [`input::AnswerSource`] and [`ui::Presenter`].

mod app;
pub mod config;
pub mod data;
pub mod input;
pub mod models;
pub mod session;
pub mod telemetry;
pub mod terminal;
pub mod ui;

use std::io;

use thiserror::Error;

pub use app::{check_questions, App, Selection};
pub use config::{ConfigError, QuizConfig};
pub use data::LoadError;
pub use models::{OptionLetter, QuestionRecord, ValidationError};
pub use session::{Cancellation, ConfigureError, FinalReport, Session};

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Error loading questions from file.
    #[error("failed to load questions")]
    Load(#[from] LoadError),

    /// The requested quiz cannot be built from the loaded questions.
    #[error("cannot start quiz")]
    Configure(#[from] ConfigureError),

    #[error("bad configuration")]
    Config(#[from] ConfigError),

    /// IO error during quiz execution.
    #[error("terminal I/O failed")]
    Io(#[from] io::Error),
}
