use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};

use super::line;
use crate::models::{OptionLetter, QuestionRecord};
use crate::session::{PromptOutcome, PromptState};

const RULE_WIDTH: usize = 50;
const URGENT_SECS: u64 = 5;

pub fn render_question<W: Write>(
    out: &mut W,
    position: usize,
    total: usize,
    question: &QuestionRecord,
    limit: Duration,
) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);

    line(out, "")?;
    line(out, rule.as_str().dark_grey())?;
    line(out, format!("Question {}/{}", position, total).cyan().bold())?;
    line(
        out,
        format!(
            "{} > {} · {} seconds",
            question.category(),
            question.subcategory(),
            limit.as_secs()
        )
        .dark_grey(),
    )?;
    line(out, rule.as_str().dark_grey())?;
    line(out, "")?;
    line(out, question.text().bold())?;
    line(out, "")?;

    for (letter, option) in question.valid_option_letters().iter().zip(question.options()) {
        line(out, format!("  {}. {}", letter, option))?;
    }
    line(out, "")?;
    out.flush()
}

/// Redraw the input line in place: `[12s] Your answer (A, B, C): b`.
pub fn render_live_input<W: Write>(
    out: &mut W,
    label: &str,
    typed: &str,
    remaining: Option<Duration>,
) -> io::Result<()> {
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;

    if let Some(remaining) = remaining {
        // Round up so the clock shows 1s until the deadline actually passes.
        let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
        let badge = format!("[{:>2}s] ", secs);
        let badge = if secs <= URGENT_SECS {
            badge.red().bold()
        } else {
            badge.yellow()
        };
        queue!(out, PrintStyledContent(badge))?;
    }

    queue!(out, Print(format!("{}: {}", label, typed)))?;
    out.flush()
}

pub fn render_plain_prompt<W: Write>(out: &mut W, label: &str) -> io::Result<()> {
    write!(out, "{}: ", label)?;
    out.flush()
}

pub fn render_menu<W: Write>(out: &mut W, title: &str, choices: &[String]) -> io::Result<()> {
    line(out, "")?;
    line(out, title.cyan().bold())?;
    line(out, "-".repeat(title.chars().count()).dark_grey())?;
    for (index, choice) in choices.iter().enumerate() {
        line(out, format!("{:>3}. {}", index + 1, choice))?;
    }
    line(out, "")?;
    out.flush()
}

pub fn render_notice<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    line(out, message.yellow())?;
    out.flush()
}

pub fn render_outcome<W: Write>(
    out: &mut W,
    question: &QuestionRecord,
    outcome: &PromptOutcome,
) -> io::Result<()> {
    match outcome.state {
        PromptState::Answered => {
            let chosen = outcome.chosen.map(|letter| option_label(question, letter));
            let chosen = chosen.unwrap_or_default();
            if outcome.chosen.is_some_and(|letter| question.is_correct(letter)) {
                line(out, format!("Correct! You chose {}", chosen).green().bold())?;
            } else {
                line(out, format!("Incorrect. You chose {}", chosen).red().bold())?;
                render_correct_answer(out, question)?;
            }
            line(
                out,
                format!("Answered in {:.1} seconds", outcome.elapsed.as_secs_f64()).dark_grey(),
            )?;
        }
        PromptState::TimedOut => {
            line(out, "Time's up! No answer was given.".yellow().bold())?;
            render_correct_answer(out, question)?;
        }
        PromptState::InvalidInput => {
            let letters: Vec<String> = question
                .valid_option_letters()
                .iter()
                .map(|l| l.to_string())
                .collect();
            line(
                out,
                format!(
                    "'{}' is not an option. Valid answers are {}.",
                    outcome.raw_answer.as_deref().unwrap_or_default(),
                    letters.join(", ")
                )
                .yellow()
                .bold(),
            )?;
            render_correct_answer(out, question)?;
        }
        PromptState::Interrupted => return out.flush(),
    }

    if let Some(explanation) = question.explanation() {
        line(out, format!("Explanation: {}", explanation).dark_grey())?;
    }
    out.flush()
}

fn render_correct_answer<W: Write>(out: &mut W, question: &QuestionRecord) -> io::Result<()> {
    line(
        out,
        format!("Correct answer: {}", option_label(question, question.correct_answer())).green(),
    )
}

fn option_label(question: &QuestionRecord, letter: OptionLetter) -> String {
    match question.option_text_for(letter) {
        Some(text) => format!("{}. {}", letter, text),
        None => letter.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::question;

    fn outcome(state: PromptState, chosen: Option<OptionLetter>, raw: Option<&str>) -> PromptOutcome {
        PromptOutcome {
            state,
            chosen,
            raw_answer: raw.map(str::to_string),
            elapsed: Duration::from_millis(2300),
        }
    }

    fn rendered(q: &QuestionRecord, o: &PromptOutcome) -> String {
        let mut out = Vec::new();
        render_outcome(&mut out, q, o).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_question_lists_only_its_options() {
        let q = question("Science", "Physics", "Fastest thing?", 3, "C");
        let mut out = Vec::new();
        render_question(&mut out, 2, 5, &q, Duration::from_secs(20)).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Question 2/5"));
        assert!(text.contains("Science > Physics"));
        assert!(text.contains("20 seconds"));
        assert!(text.contains("A. Option 1"));
        assert!(text.contains("C. Option 3"));
        assert!(!text.contains("D."));
    }

    #[test]
    fn test_outcome_messages() {
        let q = question("Science", "Physics", "q", 4, "B")
            .with_explanation("Light wins.");

        let correct = rendered(&q, &outcome(PromptState::Answered, Some(OptionLetter::B), Some("b")));
        assert!(correct.contains("Correct! You chose B. Option 2"));
        assert!(correct.contains("2.3 seconds"));
        assert!(correct.contains("Explanation: Light wins."));

        let wrong = rendered(&q, &outcome(PromptState::Answered, Some(OptionLetter::D), Some("4")));
        assert!(wrong.contains("Incorrect. You chose D. Option 4"));
        assert!(wrong.contains("Correct answer: B. Option 2"));

        let late = rendered(&q, &outcome(PromptState::TimedOut, None, None));
        assert!(late.contains("Time's up!"));
        assert!(late.contains("Correct answer: B. Option 2"));

        let invalid = rendered(&q, &outcome(PromptState::InvalidInput, None, Some("maybe")));
        assert!(invalid.contains("'maybe' is not an option. Valid answers are A, B, C, D."));
    }

    #[test]
    fn test_countdown_rounds_up() {
        let mut out = Vec::new();
        render_live_input(&mut out, "Your answer (A, B)", "a", Some(Duration::from_millis(400)))
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[ 1s]"));
        assert!(text.contains("Your answer (A, B): a"));
    }
}
