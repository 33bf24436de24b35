use std::io::{self, Write};

use crossterm::style::{Color, Stylize};

use super::line;
use crate::session::{FinalReport, OutcomeKind};

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render_report<W: Write>(out: &mut W, report: &FinalReport) -> io::Result<()> {
    let rule = "=".repeat(50);
    let title = if report.interrupted {
        "QUIZ STOPPED EARLY"
    } else {
        "RESULTS"
    };

    line(out, "")?;
    line(out, rule.as_str().dark_grey())?;
    line(out, title.cyan().bold())?;
    line(out, rule.as_str().dark_grey())?;
    line(out, "")?;

    if report.answered_count == 0 {
        line(out, "No questions were answered.".dark_grey())?;
        line(out, "")?;
        return out.flush();
    }

    let color = grade_color(report.percentage);
    line(
        out,
        format!(
            "{} / {}  ({:.0}%)",
            report.score, report.total_questions, report.percentage
        )
        .with(color)
        .bold(),
    )?;
    line(out, remark(report.percentage).with(color))?;
    if report.timed_out > 0 || report.invalid > 0 {
        line(
            out,
            format!("Timed out: {} · Invalid: {}", report.timed_out, report.invalid).dark_grey(),
        )?;
    }
    line(out, "")?;

    for outcome in &report.outcomes {
        let (symbol, color) = match outcome.kind {
            OutcomeKind::Correct => ("+", Color::Green),
            OutcomeKind::Incorrect => ("-", Color::Red),
            OutcomeKind::TimedOut => ("~", Color::Yellow),
            OutcomeKind::Invalid => ("?", Color::Yellow),
        };
        write!(
            out,
            " {} {} {}\r\n",
            symbol.with(color),
            format!("{:2}.", outcome.question_index + 1).dark_grey(),
            truncate_question(&outcome.question_text).grey()
        )?;
    }
    line(out, "")?;
    out.flush()
}

pub fn grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

pub fn remark(percentage: f64) -> &'static str {
    match percentage as u32 {
        90..=100 => "Outstanding! You really know your stuff.",
        80..=89 => "Great job!",
        70..=79 => "Good work.",
        50..=69 => "Fair. There is room to improve.",
        _ => "Keep studying and try again.",
    }
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
