//! Console presentation.
//!
//! Everything the quiz shows goes through [`Presenter`], so the session
//! engine never writes to the terminal itself.

pub mod menu;
mod quiz;
mod result;
mod welcome;

use std::io::{self, Write};
use std::time::Duration;

use crate::models::QuestionRecord;
use crate::session::{FinalReport, PromptOutcome};

pub use result::{grade_color, remark};

pub trait Presenter {
    fn show_banner(&mut self, available: usize, time_limit: Duration) -> io::Result<()>;

    fn show_menu(&mut self, title: &str, choices: &[String]) -> io::Result<()>;

    fn show_notice(&mut self, message: &str) -> io::Result<()>;

    fn show_question(
        &mut self,
        position: usize,
        total: usize,
        question: &QuestionRecord,
        limit: Duration,
    ) -> io::Result<()>;

    /// Redraw the line being typed. `remaining` is set while a question
    /// clock is running.
    fn show_input_line(
        &mut self,
        label: &str,
        typed: &str,
        remaining: Option<Duration>,
    ) -> io::Result<()>;

    fn show_outcome(&mut self, question: &QuestionRecord, outcome: &PromptOutcome)
    -> io::Result<()>;

    fn show_report(&mut self, report: &FinalReport) -> io::Result<()>;
}

/// Writes styled text to a terminal or any other writer.
///
/// Lines end in `\r\n` so output stays aligned while the terminal is in raw
/// mode. With `live_countdown` the input line is redrawn in place on every
/// tick; otherwise the prompt is printed once and the terminal echoes input.
pub struct ConsolePresenter<W: Write> {
    out: W,
    live_countdown: bool,
    line_open: bool,
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W, live_countdown: bool) -> Self {
        Self {
            out,
            live_countdown,
            line_open: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn close_line(&mut self) -> io::Result<()> {
        if self.line_open {
            self.out.write_all(b"\r\n")?;
            self.line_open = false;
        }
        Ok(())
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn show_banner(&mut self, available: usize, time_limit: Duration) -> io::Result<()> {
        self.close_line()?;
        welcome::render_banner(&mut self.out, available, time_limit)
    }

    fn show_menu(&mut self, title: &str, choices: &[String]) -> io::Result<()> {
        self.close_line()?;
        quiz::render_menu(&mut self.out, title, choices)
    }

    fn show_notice(&mut self, message: &str) -> io::Result<()> {
        self.close_line()?;
        quiz::render_notice(&mut self.out, message)
    }

    fn show_question(
        &mut self,
        position: usize,
        total: usize,
        question: &QuestionRecord,
        limit: Duration,
    ) -> io::Result<()> {
        self.close_line()?;
        quiz::render_question(&mut self.out, position, total, question, limit)
    }

    fn show_input_line(
        &mut self,
        label: &str,
        typed: &str,
        remaining: Option<Duration>,
    ) -> io::Result<()> {
        if self.live_countdown {
            quiz::render_live_input(&mut self.out, label, typed, remaining)?;
        } else if !self.line_open {
            quiz::render_plain_prompt(&mut self.out, label)?;
        }
        self.line_open = true;
        Ok(())
    }

    fn show_outcome(
        &mut self,
        question: &QuestionRecord,
        outcome: &PromptOutcome,
    ) -> io::Result<()> {
        self.close_line()?;
        quiz::render_outcome(&mut self.out, question, outcome)
    }

    fn show_report(&mut self, report: &FinalReport) -> io::Result<()> {
        self.close_line()?;
        result::render_report(&mut self.out, report)
    }
}

fn line<W: Write, D: std::fmt::Display>(out: &mut W, content: D) -> io::Result<()> {
    write!(out, "{}\r\n", content)
}
