//! Window-management policy.
//!
//! A [`WindowManager`] decides what windows look like and how they react to
//! the pointer. Every hook has a default body that forwards to one of the
//! free functions in this module, so a custom manager can override a single
//! hook and still reach the stock behavior from its own implementation.
use std::cell::Cell;

use super::{DragState, FloatRect, ResizeMask, Window, WindowState};
use crate::desktop::{Desktop, WindowId};
use crate::event::{KeyEvent, MouseAction, MouseButtons, MouseEvent, MouseOutcome};
use crate::screen::Screen;
use crate::theme::{self, WindowTheme};

/// Policy object shared by every window of one desktop.
///
/// Hooks receive the desktop and the id of the window concerned rather than
/// the window itself, so they are free to inspect or rearrange any part of
/// the desktop. Ids handed to a hook are always attached when it fires.
pub trait WindowManager {
    fn theme(&self) -> WindowTheme;

    fn set_theme(&self, theme: WindowTheme);

    /// Fired after a window has been pushed onto the stack.
    fn added(&self, _desktop: &mut Desktop, _id: WindowId) {}

    /// Fired while the window is still reachable, just before it leaves the
    /// desktop.
    fn removed(&self, _desktop: &mut Desktop, _id: WindowId) {}

    fn resized(&self, _desktop: &mut Desktop, _id: WindowId) {}

    fn title_changed(&self, _desktop: &mut Desktop, _id: WindowId) {}

    /// State transition for an attached window.
    fn set_state(&self, desktop: &mut Desktop, id: WindowId, state: WindowState) {
        let area = self.maximized_area(desktop);
        apply_state(desktop, id, state, area);
    }

    fn desktop_resized(&self, desktop: &mut Desktop) {
        let area = self.maximized_area(desktop);
        fit_maximized(desktop, area);
    }

    /// Wallpaper hook, drawn after the desktop background and before any
    /// window.
    fn desktop_draw(&self, _desktop: &mut Desktop, _screen: &mut Screen<'_>) {}

    fn default_draw(&self, desktop: &mut Desktop, id: WindowId, screen: &mut Screen<'_>) {
        draw_window(&self.theme(), desktop, id, screen);
    }

    /// Offered every key event for a focused window before its client.
    fn default_input_handler(
        &self,
        _desktop: &mut Desktop,
        _id: WindowId,
        _event: &KeyEvent,
    ) -> bool {
        false
    }

    fn default_mouse_handler(
        &self,
        desktop: &mut Desktop,
        id: WindowId,
        event: &MouseEvent,
    ) -> MouseOutcome {
        handle_mouse_default(desktop, id, event)
    }

    /// Rectangle a maximized window occupies.
    fn maximized_area(&self, desktop: &Desktop) -> FloatRect {
        desktop.inner_rect()
    }
}

/// The stock policy: caption chrome, caption drag, edge resize and
/// double-click maximize.
#[derive(Debug, Default)]
pub struct DefaultWindowManager {
    theme: Cell<WindowTheme>,
}

impl DefaultWindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: WindowTheme) -> Self {
        Self {
            theme: Cell::new(theme),
        }
    }
}

impl WindowManager for DefaultWindowManager {
    fn theme(&self) -> WindowTheme {
        self.theme.get()
    }

    fn set_theme(&self, theme: WindowTheme) {
        self.theme.set(theme);
    }
}

/// Move a window into `state`, maximizing into `area`.
///
/// Minimizing collapses the window to a single cell at the origin; the size
/// clamp of bordered windows expands that back to the minimum. The restored
/// rectangle survives every excursion.
pub fn apply_state(desktop: &mut Desktop, id: WindowId, state: WindowState, area: FloatRect) {
    let Some(from) = desktop.window(id).map(Window::state) else {
        return;
    };
    let Some(mut handle) = desktop.window_mut(id) else {
        return;
    };
    if from == state {
        return;
    }
    tracing::debug!(window_id = ?id, ?from, to = ?state, "window state change");
    handle.record_state(state);
    match state {
        WindowState::Restored => {
            if let Some(restored) = handle.window().map(Window::restored_rect) {
                handle.set_rect(restored);
            }
        }
        WindowState::Minimized => handle.set_rect(FloatRect::new(0, 0, 1, 1)),
        WindowState::Maximized => handle.set_rect(area),
    }
}

/// Re-fit every maximized window to `area`.
pub fn fit_maximized(desktop: &mut Desktop, area: FloatRect) {
    for id in desktop.stack().to_vec() {
        let stale = desktop
            .window(id)
            .is_some_and(|w| w.state() == WindowState::Maximized && w.rect() != area);
        if stale && let Some(mut handle) = desktop.window_mut(id) {
            handle.set_rect(area);
        }
    }
}

/// Default chrome: base box, caption row recolored by focus, resize grip,
/// then the client on top.
pub fn draw_window(theme: &WindowTheme, desktop: &mut Desktop, id: WindowId, screen: &mut Screen<'_>) {
    let focused = desktop.window_has_focus(id);
    let Some(window) = desktop.windows.get_mut(id) else {
        return;
    };
    window.draw(screen);
    let rect = window.rect();

    if window.has_caption() {
        let style = theme.caption_style(focused);
        for x in rect.x..rect.x + rect.width as i32 {
            let Some(symbol) = screen.content(x, rect.y).map(|c| c.symbol().to_string()) else {
                continue;
            };
            screen.set_content(x, rect.y, &symbol, style);
        }
    }

    if window.is_resizable() && focused && screen.has_mouse() {
        let (x, y) = (rect.right(), rect.bottom());
        if let Some(symbol) = screen.content(x, y).map(|c| c.symbol().to_string()) {
            let style = ratatui::style::Style::reset().fg(theme::resize_grip());
            screen.set_content(x, y, &symbol, style);
        }
    }

    if let Some(client) = window.client_mut() {
        client.draw(screen);
    }
}

/// Default pointer policy: caption drag, edge resize and double-click
/// maximize toggling.
pub fn handle_mouse_default(desktop: &mut Desktop, id: WindowId, event: &MouseEvent) -> MouseOutcome {
    let Some(window) = desktop.window(id) else {
        return MouseOutcome::IGNORED;
    };
    let rect = window.rect();
    let drag = window.drag();
    let resizable = window.is_resizable();
    let state = window.state();
    let (x, y) = event.position();
    let in_caption = window.has_border() && y == rect.y && rect.contains(x, y);

    if event.action.is_press() {
        if !rect.contains(x, y) {
            return MouseOutcome::IGNORED;
        }
        if in_caption && event.buttons == MouseButtons::PRIMARY {
            tracing::debug!(window_id = ?id, "move started");
            set_drag(
                desktop,
                id,
                DragState {
                    moving: true,
                    grab_x: x - rect.x,
                    grab_y: y - rect.y,
                    resize: ResizeMask::NONE,
                },
            );
            return MouseOutcome::CAPTURED;
        }
        if resizable {
            let mut mask = ResizeMask::NONE;
            if x == rect.right() {
                mask = mask.union(ResizeMask::HORIZONTAL);
            }
            if y == rect.bottom() {
                mask = mask.union(ResizeMask::VERTICAL);
            }
            if !mask.is_empty() {
                tracing::debug!(window_id = ?id, mask = mask.bits(), "resize started");
                set_drag(
                    desktop,
                    id,
                    DragState {
                        resize: mask,
                        ..DragState::default()
                    },
                );
                return MouseOutcome::CAPTURED;
            }
        }
        return MouseOutcome::IGNORED;
    }

    if event.action.is_release() {
        if !drag.is_active() {
            return MouseOutcome::IGNORED;
        }
        tracing::debug!(window_id = ?id, "drag ended");
        set_drag(desktop, id, DragState::default());
        return MouseOutcome::CONSUMED;
    }

    match event.action {
        MouseAction::Move if drag.moving => {
            let target = FloatRect::new(x - drag.grab_x, y - drag.grab_y, rect.width, rect.height);
            if let Some(mut handle) = desktop.window_mut(id) {
                handle.set_rect(target);
            }
            MouseOutcome::CAPTURED
        }
        MouseAction::Move if !drag.resize.is_empty() => {
            let mut target = rect;
            if drag.resize.contains(ResizeMask::HORIZONTAL) {
                target.width = (x - rect.x + 1).clamp(0, u16::MAX as i32) as u16;
            }
            if drag.resize.contains(ResizeMask::VERTICAL) {
                target.height = (y - rect.y + 1).clamp(0, u16::MAX as i32) as u16;
            }
            if let Some(mut handle) = desktop.window_mut(id) {
                handle.set_rect(target);
            }
            MouseOutcome::CAPTURED
        }
        action if action.is_double_click() && in_caption && resizable => {
            let next = if state == WindowState::Restored {
                WindowState::Maximized
            } else {
                WindowState::Restored
            };
            if let Some(mut handle) = desktop.window_mut(id) {
                handle.set_state(next);
            }
            MouseOutcome::CONSUMED
        }
        _ => MouseOutcome::IGNORED,
    }
}

fn set_drag(desktop: &mut Desktop, id: WindowId, drag: DragState) {
    if let Some(window) = desktop.windows.get_mut(id) {
        window.set_drag(drag);
    }
}
