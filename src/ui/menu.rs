//! Numbered console menus for picking a category, subcategory and count.

use std::io;

use super::Presenter;
use crate::input::{AnswerSource, InputEvent};
use crate::session::Cancellation;

/// Show `choices` and return the index of the one picked.
///
/// Bad input is reported and asked for again. `None` means the operator
/// interrupted or input ended.
pub async fn select_option<S, P>(
    source: &mut S,
    presenter: &mut P,
    cancel: &Cancellation,
    title: &str,
    choices: &[String],
) -> io::Result<Option<usize>>
where
    S: AnswerSource,
    P: Presenter,
{
    presenter.show_menu(title, choices)?;
    let label = format!("Select an option (1-{})", choices.len());
    ask_number(source, presenter, cancel, &label, choices.len())
        .await
        .map(|picked| picked.map(|n| n - 1))
}

/// Ask how many questions to run, between 1 and `max`.
pub async fn select_count<S, P>(
    source: &mut S,
    presenter: &mut P,
    cancel: &Cancellation,
    max: usize,
) -> io::Result<Option<usize>>
where
    S: AnswerSource,
    P: Presenter,
{
    let label = format!("How many questions would you like? (1-{})", max);
    ask_number(source, presenter, cancel, &label, max).await
}

async fn ask_number<S, P>(
    source: &mut S,
    presenter: &mut P,
    cancel: &Cancellation,
    label: &str,
    max: usize,
) -> io::Result<Option<usize>>
where
    S: AnswerSource,
    P: Presenter,
{
    source.discard_pending();
    loop {
        let Some(line) = read_line(source, presenter, cancel, label).await? else {
            return Ok(None);
        };
        match parse_choice(&line, max) {
            Ok(n) => return Ok(Some(n)),
            Err(message) => presenter.show_notice(&message)?,
        }
    }
}

/// Read one submitted line with no time limit.
///
/// Input already waiting is read, not discarded, so callers that want a
/// clean slate call [`AnswerSource::discard_pending`] first.
pub async fn read_line<S, P>(
    source: &mut S,
    presenter: &mut P,
    cancel: &Cancellation,
    label: &str,
) -> io::Result<Option<String>>
where
    S: AnswerSource,
    P: Presenter,
{
    presenter.show_input_line(label, "", None)?;

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => return Ok(None),
            event = source.next_event() => match event? {
                Some(InputEvent::Submit(line)) => return Ok(Some(line)),
                Some(InputEvent::Edit(typed)) => presenter.show_input_line(label, &typed, None)?,
                Some(InputEvent::Interrupt) => {
                    cancel.cancel();
                    return Ok(None);
                }
                None => return Ok(None),
            },
        }
    }
}

/// Parse a 1-based menu choice.
fn parse_choice(input: &str, max: usize) -> Result<usize, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Please enter a choice.".to_string());
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        Ok(_) => Err(format!("Please enter a number between 1 and {}.", max)),
        Err(_) => Err("Please enter a valid number.".to_string()),
    }
}
