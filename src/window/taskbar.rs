//! A manager that keeps a task list along the bottom of the desktop.
//!
//! `TaskbarManager` is built by wrapping [`DefaultWindowManager`]: it keeps
//! the stock chrome and pointer policy and only adds bookkeeping in the
//! lifecycle hooks plus a wallpaper pass that draws the list.
use std::cell::RefCell;

use ratatui::style::Style;

use super::{DefaultWindowManager, FloatRect, WindowManager, WindowState};
use crate::desktop::{Desktop, WindowId};
use crate::screen::Screen;
use crate::theme::{self, WindowTheme};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TaskEntry {
    id: WindowId,
    title: String,
}

/// Slot occupied by one entry on the task row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    id: WindowId,
    x: i32,
    width: u16,
}

#[derive(Debug, Default)]
pub struct TaskbarManager {
    inner: DefaultWindowManager,
    entries: RefCell<Vec<TaskEntry>>,
}

impl TaskbarManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: WindowTheme) -> Self {
        Self {
            inner: DefaultWindowManager::with_theme(theme),
            entries: RefCell::default(),
        }
    }

    /// Titles in the order the windows were added.
    pub fn titles(&self) -> Vec<String> {
        self.entries.borrow().iter().map(|e| e.title.clone()).collect()
    }

    /// Row the task list occupies, if the desktop has any room for it.
    pub fn bar_rect(&self, desktop: &Desktop) -> Option<FloatRect> {
        let inner = desktop.inner_rect();
        if inner.height < 2 || inner.width == 0 {
            return None;
        }
        Some(FloatRect::new(inner.x, inner.bottom(), inner.width, 1))
    }

    /// Window whose task entry covers the given cell.
    pub fn window_at(&self, desktop: &Desktop, column: i32, row: i32) -> Option<WindowId> {
        let bar = self.bar_rect(desktop)?;
        if !bar.contains(column, row) {
            return None;
        }
        self.slots(bar)
            .into_iter()
            .find(|slot| column >= slot.x && column < slot.x + slot.width as i32)
            .map(|slot| slot.id)
    }

    fn slots(&self, bar: FloatRect) -> Vec<Slot> {
        let entries = self.entries.borrow();
        let mut slots = Vec::with_capacity(entries.len());
        let mut x = bar.x;
        let end = bar.x + bar.width as i32;
        for entry in entries.iter() {
            if x >= end {
                break;
            }
            let label = entry.title.chars().count().max(1) as i32 + 2;
            let width = label.min(end - x) as u16;
            slots.push(Slot {
                id: entry.id,
                x,
                width,
            });
            x += width as i32 + 1;
        }
        slots
    }
}

impl WindowManager for TaskbarManager {
    fn theme(&self) -> WindowTheme {
        self.inner.theme()
    }

    fn set_theme(&self, theme: WindowTheme) {
        self.inner.set_theme(theme);
    }

    fn added(&self, desktop: &mut Desktop, id: WindowId) {
        let title = desktop.window(id).map(|w| w.title().to_string()).unwrap_or_default();
        self.entries.borrow_mut().push(TaskEntry { id, title });
    }

    fn removed(&self, _desktop: &mut Desktop, id: WindowId) {
        self.entries.borrow_mut().retain(|e| e.id != id);
    }

    fn title_changed(&self, desktop: &mut Desktop, id: WindowId) {
        let Some(title) = desktop.window(id).map(|w| w.title().to_string()) else {
            return;
        };
        if let Some(entry) = self.entries.borrow_mut().iter_mut().find(|e| e.id == id) {
            entry.title = title;
        }
    }

    fn desktop_draw(&self, desktop: &mut Desktop, screen: &mut Screen<'_>) {
        let Some(bar) = self.bar_rect(desktop) else {
            return;
        };
        screen.fill(bar, Style::reset().fg(theme::taskbar_fg()).bg(theme::taskbar_bg()));
        let focused = desktop.focused_window();
        let entries = self.entries.borrow();
        for slot in self.slots(bar) {
            let Some(entry) = entries.iter().find(|e| e.id == slot.id) else {
                continue;
            };
            let minimized = desktop
                .window(slot.id)
                .is_some_and(|w| w.state() == WindowState::Minimized);
            let style = if focused == Some(slot.id) {
                Style::reset()
                    .fg(theme::taskbar_active_fg())
                    .bg(theme::taskbar_active_bg())
            } else {
                Style::reset().fg(theme::taskbar_fg()).bg(theme::taskbar_bg())
            };
            let label = if minimized {
                format!("[{}]", entry.title)
            } else {
                format!(" {} ", entry.title)
            };
            for (i, ch) in label.chars().take(slot.width as usize).enumerate() {
                let mut buf = [0u8; 4];
                screen.set_content(slot.x + i as i32, bar.y, ch.encode_utf8(&mut buf), style);
            }
        }
    }

    fn maximized_area(&self, desktop: &Desktop) -> FloatRect {
        let inner = desktop.inner_rect();
        match self.bar_rect(desktop) {
            Some(_) => FloatRect::new(inner.x, inner.y, inner.width, inner.height - 1),
            None => inner,
        }
    }
}
