use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur setting up a key source.
#[derive(Debug, Error)]
pub enum KeysError {
    /// Terminal setup error.
    #[error("Failed to initialize terminal input: {0}")]
    Terminal(#[from] std::io::Error),
}

/// A command for the poll loop, decoded from a key press.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoopCommand {
    /// Flip the paused flag.
    TogglePause,

    /// Exit the loop cleanly.
    Terminate,
}

/// A non-blocking source of loop commands.
pub trait KeySource: Send + 'static {
    /// Returns the next pending command, if any, without blocking.
    fn poll(&mut self) -> Option<LoopCommand>;
}

/// Loop commands decoded from terminal key presses.
///
/// `p` toggles pause; `q`, `Esc` or ctrl-c terminate. A reader thread owns
/// the terminal, so polling from the loop never blocks. Raw mode is enabled
/// for the lifetime of the source and restored on drop.
#[derive(Debug)]
pub struct TerminalKeys {
    receiver: mpsc::Receiver<LoopCommand>,
}

impl TerminalKeys {
    /// Starts the terminal reader thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be switched to raw mode.
    pub fn new() -> Result<Self, KeysError> {
        terminal::enable_raw_mode()?;

        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            loop {
                // Poll with a timeout so the thread notices a dropped receiver.
                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(_) => break,
                }

                let Ok(Event::Key(key)) = event::read() else {
                    continue;
                };
                let Some(command) = decode(key) else {
                    continue;
                };

                if sender.send(command).is_err() {
                    break;
                }
            }

            debug!("terminal key reader stopped");
        });

        Ok(Self { receiver })
    }
}

/// Maps a key event to a loop command.
///
/// Only plain presses (shift allowed) drive the loop, with ctrl-c as the
/// one modified chord; any other modifier combination is ignored.
fn decode(key: KeyEvent) -> Option<LoopCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let plain = (key.modifiers - KeyModifiers::SHIFT).is_empty();

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(LoopCommand::Terminate)
        }
        KeyCode::Char('p' | 'P') if plain => Some(LoopCommand::TogglePause),
        KeyCode::Char('q') | KeyCode::Esc if plain => Some(LoopCommand::Terminate),
        _ => None,
    }
}

impl KeySource for TerminalKeys {
    fn poll(&mut self) -> Option<LoopCommand> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for TerminalKeys {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
