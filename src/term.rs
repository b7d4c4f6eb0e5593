use crate::Coords;
use std::io::{Stdout, Write, stdout};

use anyhow::Context;
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{self, Event};
use crossterm::style::{Attribute, Color};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

/// How a run of cells is coloured.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Paint {
    Plain,
    Reversed,
    Background(Color),
}

pub struct TermManager {
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout() }
    }

    pub fn setup(&mut self) -> anyhow::Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("Error hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> anyhow::Result<()> {
        restore_terminal()
    }

    pub fn fill_rect(&mut self, top_left: Coords, width: u16, height: u16, paint: Paint) -> anyhow::Result<()> {
        let blank = " ".repeat(width as usize);

        for y_diff in 0..height {
            self.print_at((top_left.0, top_left.1 + y_diff), &blank, paint)?;
        }

        Ok(())
    }

    pub fn print_at(&mut self, pos: Coords, text: &str, paint: Paint) -> anyhow::Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1))?;
        self.set_paint(paint)?;
        queue!(self.stdout, style::Print(text), style::SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    pub fn clear(&mut self) -> anyhow::Result<()> {
        execute!(self.stdout, style::ResetColor, terminal::Clear(ClearType::All)).context("Error clearing")?;
        Ok(())
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    ///////////////////////////////////////////////////////////////////////////

    fn set_paint(&mut self, paint: Paint) -> anyhow::Result<()> {
        queue!(self.stdout, style::ResetColor)?;

        match paint {
            Paint::Plain => {},
            Paint::Reversed => queue!(self.stdout, style::SetAttribute(Attribute::Reverse))?,
            Paint::Background(color) => queue!(
                self.stdout,
                style::SetBackgroundColor(color),
                style::SetForegroundColor(Color::Black)
            )?,
        }

        Ok(())
    }
}

/// Blocks until the terminal reports the next event.
pub fn read_event() -> anyhow::Result<Event> {
    event::read().context("Error reading terminal event")
}

/// Leaves raw mode and the alternate screen. Safe to call from any thread.
pub fn restore_terminal() -> anyhow::Result<()> {
    let mut out = stdout();

    terminal::disable_raw_mode().context("Error unsetting raw mode")?;
    execute!(out, style::ResetColor, cursor::Show, cursor::EnableBlinking).context("Error showing cursor")?;
    execute!(out, LeaveAlternateScreen).context("Error leaving alt screen")?;
    Ok(())
}
