//! Masked password entry on the controlling terminal.

use std::io::{self, Write};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal,
};

const MAX_ATTEMPTS: u32 = 3;

/// Raw mode for the lifetime of one prompt.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads one line from the keyboard, echoing an asterisk per
/// character. Ctrl-C aborts.
fn read_secret(label: &str) -> io::Result<String> {
    let mut tty = io::stderr();
    write!(tty, "{label}")?;
    tty.flush()?;

    let _raw = RawMode::enable()?;
    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => break,
            KeyCode::Backspace => {
                if secret.pop().is_some() {
                    write!(tty, "\u{8} \u{8}")?;
                    tty.flush()?;
                }
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                write!(tty, "\r\n")?;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                secret.push(ch);
                write!(tty, "*")?;
                tty.flush()?;
            }
            _ => {}
        }
    }
    write!(tty, "\r\n")?;
    tty.flush()?;

    Ok(secret)
}

/// Asks for a password twice and insists on a non-empty match, giving
/// up after three failed rounds.
pub fn password_confirmed() -> io::Result<String> {
    for _ in 0..MAX_ATTEMPTS {
        let first = read_secret("Password: ")?;
        if first.is_empty() {
            eprintln!("Password must not be empty.");
        } else if first == read_secret("Confirm password: ")? {
            return Ok(first);
        } else {
            eprintln!("Passwords do not match. Try again.");
        }
    }

    Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        "too many attempts",
    ))
}
