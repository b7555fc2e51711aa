//! The desktop: owner of the window stack.
//!
//! Windows live in a slot map keyed by [`WindowId`]; `stack` holds the ids in
//! z-order, index 0 at the back. Drawing walks the stack front to back in
//! array order so the topmost window paints last, and mouse routing walks it
//! in reverse so the topmost window gets the first chance at an event.
//!
//! Policy (chrome, drag/resize, what maximizing means) lives in the
//! [`WindowManager`] injected at construction. The desktop calls into it at
//! the lifecycle points it defines and never decides those things itself.
use std::rc::Rc;

use ratatui::style::Color;
use slotmap::{SlotMap, new_key_type};

use crate::components::{Content, subtree_has_focus};
use crate::constants::{AUTO_POSITION_RESERVE, AUTO_POSITION_STEP};
use crate::event::{KeyEvent, MouseEvent, MouseOutcome};
use crate::screen::Screen;
use crate::theme::WindowTheme;
use crate::window::decorator::Decoration;
use crate::window::{
    DefaultWindowManager, DragState, FloatRect, Window, WindowHandle, WindowManager, WindowState,
};

new_key_type! {
    /// Identifies a window attached to a desktop.
    pub struct WindowId;
}

/// What currently receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Window(WindowId),
    /// The desktop-level client content.
    Client,
}

pub struct Desktop {
    decoration: Decoration,
    pub(crate) windows: SlotMap<WindowId, Window>,
    pub(crate) stack: Vec<WindowId>,
    manager: Rc<dyn WindowManager>,
    client: Option<Box<dyn Content>>,
    client_full_size: bool,
    focus: Option<FocusTarget>,
    capture: Option<WindowId>,
    auto_position_offset: i32,
    initialized: bool,
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new()
    }
}

impl Desktop {
    pub fn new() -> Self {
        Self::with_manager(Rc::new(DefaultWindowManager::new()))
    }

    pub fn with_manager(manager: Rc<dyn WindowManager>) -> Self {
        Self {
            decoration: Decoration::new(crate::theme::desktop_bg()),
            windows: SlotMap::with_key(),
            stack: Vec::new(),
            manager,
            client: None,
            client_full_size: false,
            focus: None,
            capture: None,
            auto_position_offset: 0,
            initialized: false,
        }
    }

    pub fn manager(&self) -> Rc<dyn WindowManager> {
        Rc::clone(&self.manager)
    }

    /// Swap the policy object. Every attached window is announced as removed
    /// to the old manager and as added to the new one.
    pub fn set_manager(&mut self, manager: Rc<dyn WindowManager>) {
        if Rc::ptr_eq(&self.manager, &manager) {
            return;
        }
        tracing::debug!(windows = self.stack.len(), "swapping window manager");
        let old = Rc::clone(&self.manager);
        for id in self.stack.clone() {
            old.removed(self, id);
        }
        self.manager = Rc::clone(&manager);
        for id in self.stack.clone() {
            manager.added(self, id);
        }
    }

    pub fn theme(&self) -> WindowTheme {
        self.manager.theme()
    }

    pub fn set_theme(&mut self, theme: WindowTheme) {
        self.manager.set_theme(theme);
    }

    pub fn rect(&self) -> FloatRect {
        self.decoration.rect()
    }

    pub fn inner_rect(&self) -> FloatRect {
        self.decoration.inner_rect()
    }

    pub fn decoration(&self) -> &Decoration {
        &self.decoration
    }

    pub fn set_rect(&mut self, rect: FloatRect) {
        tracing::debug!(?rect, "desktop resized");
        self.decoration.set_rect(rect);
        self.layout_client();
        self.manager().desktop_resized(self);
    }

    pub fn set_border(&mut self, border: bool) {
        self.decoration.set_border(border);
        self.layout_client();
        self.manager().desktop_resized(self);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.decoration.set_title(title);
    }

    pub fn set_background(&mut self, background: Color) {
        self.decoration.set_background(background);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn client(&self) -> Option<&dyn Content> {
        self.client.as_deref()
    }

    pub fn client_mut(&mut self) -> Option<&mut (dyn Content + 'static)> {
        self.client.as_deref_mut()
    }

    /// Desktop-level content drawn behind all windows (icons, widgets).
    pub fn set_client(&mut self, client: Option<Box<dyn Content>>, full_size: bool) {
        self.client = client;
        self.client_full_size = full_size;
        self.layout_client();
    }

    fn layout_client(&mut self) {
        if !self.client_full_size {
            return;
        }
        let inner = self.decoration.inner_rect();
        if let Some(client) = self.client.as_mut() {
            client.set_rect(inner);
        }
    }

    /// Attach a window. It lands on top of the stack but is not focused.
    pub fn add_window(&mut self, window: Window) -> WindowId {
        let id = self.windows.insert(window);
        self.stack.push(id);
        tracing::debug!(window_id = ?id, title = self.windows[id].title(), "window added");
        if self.initialized {
            self.init_window(id);
        }
        self.manager().added(self, id);
        id
    }

    /// Move a window attached to `from` onto this desktop.
    pub fn adopt_window(&mut self, from: &mut Desktop, id: WindowId) -> Option<WindowId> {
        let window = from.remove_window(id)?;
        Some(self.add_window(window))
    }

    /// Detach a window and hand it back. Unknown ids are ignored.
    pub fn remove_window(&mut self, id: WindowId) -> Option<Window> {
        let pos = self.stack.iter().position(|x| *x == id)?;
        self.stack.remove(pos);
        tracing::debug!(window_id = ?id, "window removed");
        if self.capture == Some(id) {
            self.capture = None;
        }
        self.manager().removed(self, id);
        if self.focus == Some(FocusTarget::Window(id)) {
            self.focus = None;
        }
        let mut window = self.windows.remove(id)?;
        if let Some(client) = window.client_mut() {
            client.set_focus(false);
        }
        window.set_drag(DragState::default());
        window.set_laid_out(false);
        Some(window)
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<WindowHandle<'_>> {
        if self.windows.contains_key(id) {
            Some(WindowHandle::new(self, id))
        } else {
            None
        }
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.stack.contains(&id)
    }

    /// Window ids back to front.
    pub fn stack(&self) -> &[WindowId] {
        &self.stack
    }

    /// Windows back to front.
    pub fn windows(&self) -> impl Iterator<Item = (WindowId, &Window)> + '_ {
        self.stack
            .iter()
            .filter_map(|id| self.windows.get(*id).map(|w| (*id, w)))
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn top_window(&self) -> Option<WindowId> {
        self.stack.last().copied()
    }

    pub fn bottom_window(&self) -> Option<WindowId> {
        self.stack.first().copied()
    }

    pub fn focus(&self) -> Option<FocusTarget> {
        self.focus
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.stack
            .iter()
            .copied()
            .find(|id| self.window_has_focus(*id))
    }

    /// Move keyboard focus. Focusing a window hands focus on to its client;
    /// the previous target is blurred and loses any drag in progress.
    pub fn set_focus(&mut self, target: Option<FocusTarget>) {
        if self.focus == target {
            return;
        }
        match self.focus.take() {
            Some(FocusTarget::Window(old)) => {
                if let Some(window) = self.windows.get_mut(old) {
                    window.set_drag(DragState::default());
                    if let Some(client) = window.client_mut() {
                        client.set_focus(false);
                    }
                }
                if self.capture == Some(old) {
                    self.capture = None;
                }
            }
            Some(FocusTarget::Client) => {
                if let Some(client) = self.client.as_mut() {
                    client.set_focus(false);
                }
            }
            None => {}
        }
        match target {
            Some(FocusTarget::Window(id)) => {
                let Some(window) = self.windows.get_mut(id) else {
                    return;
                };
                if let Some(client) = window.client_mut() {
                    client.set_focus(true);
                }
            }
            Some(FocusTarget::Client) => {
                let Some(client) = self.client.as_mut() else {
                    return;
                };
                client.set_focus(true);
            }
            None => {}
        }
        tracing::debug!(?target, "focus changed");
        self.focus = target;
    }

    /// Whether the window or anything inside its client holds focus.
    pub fn window_has_focus(&self, id: WindowId) -> bool {
        if self.focus == Some(FocusTarget::Window(id)) {
            return true;
        }
        self.windows
            .get(id)
            .and_then(|w| w.client())
            .is_some_and(subtree_has_focus)
    }

    /// Whether the window's client content holds focus. Focusing a window
    /// delegates to its client, so this is true whenever a window with a
    /// client is focused.
    pub(crate) fn window_client_has_focus(&self, id: WindowId) -> bool {
        let Some(client) = self.windows.get(id).and_then(|w| w.client()) else {
            return false;
        };
        self.focus == Some(FocusTarget::Window(id)) || subtree_has_focus(client)
    }

    fn client_has_focus(&self) -> bool {
        let Some(client) = self.client.as_deref() else {
            return false;
        };
        self.focus == Some(FocusTarget::Client) || subtree_has_focus(client)
    }

    /// Window currently receiving all mouse events, if a drag is underway.
    pub fn capture(&self) -> Option<WindowId> {
        self.capture
    }

    pub(crate) fn raise(&mut self, id: WindowId) {
        if self.stack.last() == Some(&id) {
            return;
        }
        if let Some(pos) = self.stack.iter().position(|x| *x == id) {
            self.stack.remove(pos);
            self.stack.push(id);
        }
    }

    /// Neighbor in z-order, cycling around the ends. `below` picks the next
    /// window towards the back.
    pub(crate) fn neighbor(&self, id: WindowId, below: bool) -> Option<WindowId> {
        let len = self.stack.len();
        if len <= 1 {
            return None;
        }
        let pos = self.stack.iter().position(|x| *x == id)?;
        let next = if below {
            (pos + len - 1) % len
        } else {
            (pos + 1) % len
        };
        Some(self.stack[next])
    }

    /// First-time layout: theme title alignment, cascading placement for
    /// auto-positioned windows and any state set before attachment.
    fn init_window(&mut self, id: WindowId) {
        let theme = self.manager.theme();
        let inner = self.inner_rect();
        let offset = self.auto_position_offset;
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        window.set_laid_out(true);
        window.set_title_alignment(theme.title_alignment);
        let pending = window.state();
        let auto_position = window.auto_positions();
        let size = window.restored_rect();

        if auto_position {
            let target = FloatRect::new(inner.x + offset, inner.y + offset, size.width, size.height);
            self.auto_position_offset += AUTO_POSITION_STEP;
            if self.auto_position_offset >= inner.width as i32 - AUTO_POSITION_RESERVE
                || self.auto_position_offset >= inner.height as i32 - AUTO_POSITION_RESERVE
            {
                self.auto_position_offset = 0;
            }
            tracing::debug!(window_id = ?id, ?target, "auto-positioned window");
            if let Some(mut handle) = self.window_mut(id) {
                handle.set_restored_rect(target);
            }
        }

        if pending != WindowState::Restored
            && let Some(mut handle) = self.window_mut(id)
        {
            // Replay the transition now that there is a desktop to size against.
            handle.record_state(WindowState::Restored);
            handle.set_state(pending);
        }

        if let Some(window) = self.windows.get_mut(id) {
            window.layout_client();
        }
    }

    pub fn draw(&mut self, screen: &mut Screen<'_>) {
        self.decoration.draw(screen);
        let manager = self.manager();
        manager.desktop_draw(self, screen);
        if let Some(client) = self.client.as_mut() {
            client.draw(screen);
        }
        let first = !self.initialized;
        self.initialized = true;
        if first {
            tracing::debug!(windows = self.stack.len(), "first desktop draw");
            manager.desktop_resized(self);
        }
        for id in self.stack.clone() {
            let pending = self.windows.get(id).is_some_and(|w| !w.is_laid_out());
            if pending {
                self.init_window(id);
            }
            if let Some(mut handle) = self.window_mut(id) {
                handle.draw(screen);
            }
        }
    }

    /// Deliver a key event to whichever single target holds focus.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if self.client_has_focus() {
            return self
                .client
                .as_mut()
                .is_some_and(|client| client.handle_key(event));
        }
        let Some(id) = self.focused_window() else {
            return false;
        };
        self.window_mut(id)
            .is_some_and(|mut handle| handle.handle_key(event))
    }

    /// Route a mouse event: capture target first, then windows topmost
    /// first, then the desktop client.
    pub fn handle_mouse(&mut self, event: &MouseEvent) -> MouseOutcome {
        if let Some(id) = self.capture {
            if let Some(mut handle) = self.window_mut(id) {
                let outcome = handle.handle_mouse(event);
                self.update_capture(id, outcome);
                return outcome;
            }
            self.capture = None;
        }
        if !self.decoration.contains(event.column, event.row) {
            return MouseOutcome::IGNORED;
        }
        for id in self.stack.clone().into_iter().rev() {
            let Some(mut handle) = self.window_mut(id) else {
                continue;
            };
            let outcome = handle.handle_mouse(event);
            if outcome.consumed {
                tracing::trace!(window_id = ?id, action = ?event.action, "mouse consumed");
                self.update_capture(id, outcome);
                return outcome;
            }
        }
        if let Some(client) = self.client.as_mut() {
            let outcome = client.handle_mouse(event);
            if outcome.consumed {
                return MouseOutcome::CONSUMED;
            }
        }
        MouseOutcome::IGNORED
    }

    fn update_capture(&mut self, id: WindowId, outcome: MouseOutcome) {
        if outcome.capture {
            if self.capture != Some(id) {
                tracing::debug!(window_id = ?id, "mouse captured");
            }
            self.capture = Some(id);
        } else if self.capture == Some(id) {
            tracing::debug!(window_id = ?id, "mouse capture released");
            self.capture = None;
        }
    }
}
