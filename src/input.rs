//! Answer input sources.
//!
//! A source produces [`InputEvent`]s. The interactive source reads raw key
//! presses and does its own line editing; the line source reads whole lines
//! from stdin for pipes and terminals where raw mode is unwanted.

use std::io::{self, BufRead};
use std::thread;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::terminal::RawModeGuard;

/// One step of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The line being typed changed; carries the whole current buffer.
    Edit(String),
    /// A completed line.
    Submit(String),
    /// The operator asked to abandon the session.
    Interrupt,
}

/// Something answers can be read from.
#[allow(async_fn_in_trait)]
pub trait AnswerSource {
    /// Wait for the next event. `Ok(None)` means input is exhausted.
    ///
    /// Must be cancel-safe: dropping the future before it resolves loses no
    /// input that a later call would have returned.
    async fn next_event(&mut self) -> io::Result<Option<InputEvent>>;

    /// Throw away anything typed before now.
    ///
    /// An interrupt or end of input found among the discarded events is
    /// kept and returned by the next [`next_event`](Self::next_event).
    fn discard_pending(&mut self);
}

/// Key-press input with in-process line editing. Holds the terminal in raw mode.
///
/// Terminal events are pumped by a background task into a channel, so the
/// event stream is never dropped halfway through a poll.
pub struct KeyboardSource {
    events: mpsc::UnboundedReceiver<io::Result<Event>>,
    pump: Option<JoinHandle<()>>,
    buffer: String,
    /// Ctrl-C or Ctrl-D seen while discarding; delivered before anything else.
    held: Option<Control>,
    _raw: Option<RawModeGuard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Interrupt,
    Closed,
}

enum Keystroke {
    Ignored,
    Event(InputEvent),
    Control(Control),
}

impl KeyboardSource {
    /// Enter raw mode and start reading key presses. Needs a tokio runtime.
    pub fn new() -> io::Result<Self> {
        let raw = RawModeGuard::enable()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let pump = tokio::spawn(async move {
            let mut stream = EventStream::new();
            while let Some(event) = stream.next().await {
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
        let mut source = Self::from_events(rx);
        source.pump = Some(pump);
        source._raw = Some(raw);
        Ok(source)
    }

    /// Read terminal events from a channel instead of the real terminal.
    pub fn from_events(events: mpsc::UnboundedReceiver<io::Result<Event>>) -> Self {
        Self {
            events,
            pump: None,
            buffer: String::new(),
            held: None,
            _raw: None,
        }
    }

    fn apply(&mut self, event: Event) -> Keystroke {
        let Event::Key(key) = event else {
            return Keystroke::Ignored;
        };
        if key.kind != KeyEventKind::Press {
            return Keystroke::Ignored;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return Keystroke::Control(Control::Interrupt),
            KeyCode::Char('d') if ctrl && self.buffer.is_empty() => {
                return Keystroke::Control(Control::Closed);
            }
            KeyCode::Char(_) if ctrl => return Keystroke::Ignored,
            KeyCode::Char(c) => self.buffer.push(c),
            KeyCode::Backspace => {
                self.buffer.pop();
            }
            KeyCode::Esc => self.buffer.clear(),
            KeyCode::Enter => {
                return Keystroke::Event(InputEvent::Submit(std::mem::take(&mut self.buffer)));
            }
            _ => return Keystroke::Ignored,
        }
        Keystroke::Event(InputEvent::Edit(self.buffer.clone()))
    }
}

impl Drop for KeyboardSource {
    fn drop(&mut self) {
        if let Some(pump) = &self.pump {
            pump.abort();
        }
    }
}

impl AnswerSource for KeyboardSource {
    async fn next_event(&mut self) -> io::Result<Option<InputEvent>> {
        match self.held.take() {
            Some(Control::Interrupt) => return Ok(Some(InputEvent::Interrupt)),
            Some(Control::Closed) => return Ok(None),
            None => {}
        }

        while let Some(event) = self.events.recv().await {
            match self.apply(event?) {
                Keystroke::Ignored => continue,
                Keystroke::Event(event) => return Ok(Some(event)),
                Keystroke::Control(Control::Interrupt) => return Ok(Some(InputEvent::Interrupt)),
                Keystroke::Control(Control::Closed) => return Ok(None),
            }
        }
        Ok(None)
    }

    fn discard_pending(&mut self) {
        let mut dropped = self.buffer.len();
        self.buffer.clear();
        while let Ok(event) = self.events.try_recv() {
            dropped += 1;
            let Ok(event) = event else {
                continue;
            };
            if let Keystroke::Control(control) = self.apply(event) {
                // An interrupt outranks end of input.
                if self.held != Some(Control::Interrupt) {
                    self.held = Some(control);
                }
            }
        }
        if dropped > 0 {
            debug!(dropped, held = ?self.held, "Discarded stale key presses");
        }
        self.buffer.clear();
    }
}

/// Whole-line input delivered over a channel.
pub struct LineSource {
    lines: mpsc::UnboundedReceiver<io::Result<String>>,
}

impl LineSource {
    /// Read stdin on a dedicated thread. The thread ends with stdin.
    pub fn stdin() -> io::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self::from_receiver(rx))
    }

    pub fn from_receiver(lines: mpsc::UnboundedReceiver<io::Result<String>>) -> Self {
        Self { lines }
    }
}

impl AnswerSource for LineSource {
    async fn next_event(&mut self) -> io::Result<Option<InputEvent>> {
        match self.lines.recv().await {
            Some(Ok(line)) => Ok(Some(InputEvent::Submit(line))),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    fn discard_pending(&mut self) {
        let mut dropped = 0usize;
        while self.lines.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "Discarded stale input lines");
        }
    }
}
