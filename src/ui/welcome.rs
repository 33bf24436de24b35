use std::io::{self, Write};
use std::time::Duration;

use crossterm::style::Stylize;

use super::line;

pub fn render_banner<W: Write>(out: &mut W, available: usize, time_limit: Duration) -> io::Result<()> {
    let rule = "=".repeat(50);

    line(out, "")?;
    line(out, rule.as_str().dark_grey())?;
    line(out, "TIMED QUIZ".cyan().bold())?;
    line(out, rule.as_str().dark_grey())?;
    line(
        out,
        format!(
            "{} questions loaded · {} seconds per question",
            available,
            time_limit.as_secs()
        )
        .dark_grey(),
    )?;
    line(out, "Answer with a letter, a number or a word like \"second\".".dark_grey())?;
    line(out, "Ctrl-C ends the quiz early.".dark_grey())?;
    line(out, "")?;
    out.flush()
}
