//! Masked password entry on the controlling terminal.

use std::io::{Stderr, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};

use crate::CliResult;

const ATTEMPTS: usize = 3;

/// What a single key press does to the secret being typed.
#[derive(Debug, PartialEq, Eq)]
enum Keystroke {
    Push(char),
    Erase,
    Submit,
    Abort,
    Ignore,
}

fn classify(code: KeyCode, modifiers: KeyModifiers) -> Keystroke {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Enter => Keystroke::Submit,
        KeyCode::Backspace => Keystroke::Erase,
        KeyCode::Esc => Keystroke::Abort,
        KeyCode::Char('c' | 'd') if ctrl => Keystroke::Abort,
        KeyCode::Char(ch) if !ctrl => Keystroke::Push(ch),
        _ => Keystroke::Ignore,
    }
}

struct RawTerminal {
    out: Stderr,
}

impl RawTerminal {
    fn open() -> CliResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self {
            out: std::io::stderr(),
        })
    }

    fn line(&mut self, text: &str) -> CliResult<()> {
        execute!(
            self.out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print(text)
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn echo(&mut self, text: &str) -> CliResult<()> {
        execute!(self.out, Print(text))?;
        self.out.flush()?;
        Ok(())
    }

    fn unecho(&mut self) -> CliResult<()> {
        execute!(self.out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn read_secret(term: &mut RawTerminal, label: &str) -> CliResult<String> {
    term.line(label)?;
    let mut secret = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };
        match classify(code, modifiers) {
            Keystroke::Push(ch) => {
                secret.push(ch);
                term.echo("*")?;
            }
            Keystroke::Erase => {
                if secret.pop().is_some() {
                    term.unecho()?;
                }
            }
            Keystroke::Submit => {
                term.echo("\r\n")?;
                return Ok(secret);
            }
            Keystroke::Abort => {
                term.echo("\r\n")?;
                return Err("password entry aborted".into());
            }
            Keystroke::Ignore => {}
        }
    }
}

/// Asks for a new password and its confirmation, giving a few tries.
pub fn new_password(username: &str) -> CliResult<String> {
    let mut term = RawTerminal::open()?;
    for _ in 0..ATTEMPTS {
        let first = read_secret(&mut term, &format!("Password for {username}: "))?;
        if first.is_empty() {
            term.line("An empty password is not accepted.\r\n")?;
            continue;
        }
        let second = read_secret(&mut term, "Repeat password: ")?;
        if first == second {
            return Ok(first);
        }
        term.line("The two passwords differ.\r\n")?;
    }
    Err(format!("no matching password after {ATTEMPTS} attempts").into())
}
