use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::InputDriver;
use crate::screen::ScreenCaps;

/// Reads events from the controlling terminal through crossterm.
///
/// Key events are normalized before they leave the driver: releases (and
/// repeats on Windows) are dropped and Shift+Tab is reported as `BackTab`
/// on every platform.
#[derive(Debug, Default)]
pub struct ConsoleInputDriver {
    pending: VecDeque<Event>,
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_internal(&mut self) -> io::Result<Event> {
        loop {
            let evt = crossterm::event::read()?;
            if let Some(normalized) = normalize(evt) {
                return Ok(normalized);
            }
        }
    }
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.pending.is_empty() {
            return Ok(true);
        }
        if !crossterm::event::poll(timeout)? {
            return Ok(false);
        }
        // Peek through filtered events so a lone key release does not
        // report readiness and then block in `read`.
        while crossterm::event::poll(Duration::ZERO)? {
            if let Some(evt) = normalize(crossterm::event::read()?) {
                self.pending.push_back(evt);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn read(&mut self) -> io::Result<Event> {
        if let Some(evt) = self.pending.pop_front() {
            return Ok(evt);
        }
        self.read_internal()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            execute!(io::stdout(), EnableMouseCapture)
        } else {
            execute!(io::stdout(), DisableMouseCapture)
        }
    }
}

fn normalize(evt: Event) -> Option<Event> {
    let Event::Key(mut key) = evt else {
        return Some(evt);
    };
    match key.kind {
        KeyEventKind::Release => return None,
        KeyEventKind::Repeat if cfg!(windows) => return None,
        _ => {}
    }
    if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
        key.code = KeyCode::BackTab;
        key.modifiers.remove(KeyModifiers::SHIFT);
    }
    Some(Event::Key(key))
}

/// Terminal capabilities as advertised by the environment.
pub fn screen_caps(mouse: bool) -> ScreenCaps {
    let colorterm = std::env::var("COLORTERM").ok();
    let term = std::env::var("TERM").ok();
    ScreenCaps {
        mouse,
        colors: color_count(colorterm.as_deref(), term.as_deref()),
    }
}

fn color_count(colorterm: Option<&str>, term: Option<&str>) -> u32 {
    if let Some(value) = colorterm {
        let value = value.to_ascii_lowercase();
        if value.contains("truecolor") || value.contains("24bit") {
            return 16_777_216;
        }
    }
    if term.is_some_and(|t| t.contains("256color")) {
        return 256;
    }
    16
}

/// Puts the terminal into raw mode on the alternate screen for as long as
/// it lives.
pub struct ConsoleTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleTerminal {
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }

    pub fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.entered = true;
        tracing::debug!("entered alternate screen");
        Ok(())
    }

    pub fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        self.entered = false;
        tracing::debug!("left alternate screen");
        Ok(())
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for ConsoleTerminal {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
