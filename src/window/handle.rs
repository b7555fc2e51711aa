use ratatui::layout::Alignment;

use super::{DragState, FloatRect, Window, WindowState};
use crate::components::Content;
use crate::desktop::{Desktop, FocusTarget, WindowId};
use crate::event::{KeyEvent, MouseAction, MouseEvent, MouseOutcome};
use crate::screen::Screen;

/// Mutable access to a window attached to a desktop.
///
/// Obtained from [`Desktop::window_mut`]. Unlike the setters on [`Window`],
/// these keep the desktop and its manager in the loop: geometry changes fire
/// `resized`, title changes fire `title_changed`, and state changes run the
/// manager's transition.
pub struct WindowHandle<'a> {
    desktop: &'a mut Desktop,
    id: WindowId,
}

impl<'a> WindowHandle<'a> {
    pub(crate) fn new(desktop: &'a mut Desktop, id: WindowId) -> Self {
        Self { desktop, id }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    /// The window, or `None` once a manager hook has removed it.
    pub fn window(&self) -> Option<&Window> {
        self.desktop.windows.get(self.id)
    }

    pub fn desktop(&mut self) -> &mut Desktop {
        &mut *self.desktop
    }

    fn window_mut(&mut self) -> Option<&mut Window> {
        self.desktop.windows.get_mut(self.id)
    }

    pub fn set_rect(&mut self, rect: FloatRect) {
        let Some(window) = self.window_mut() else {
            return;
        };
        window.apply_rect(rect);
        self.desktop.manager().resized(self.desktop, self.id);
    }

    pub fn set_restored_rect(&mut self, rect: FloatRect) {
        let Some(window) = self.window_mut() else {
            return;
        };
        if window.state() == WindowState::Restored {
            self.set_rect(rect);
        } else {
            window.set_restored_rect(rect);
        }
    }

    /// Run the manager's transition into `state`.
    pub fn set_state(&mut self, state: WindowState) {
        self.desktop.manager().set_state(self.desktop, self.id, state);
    }

    /// Store `state` without any layout effect. For managers implementing
    /// their own transitions.
    pub fn record_state(&mut self, state: WindowState) {
        if let Some(window) = self.window_mut() {
            window.set_state(state);
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let Some(window) = self.window_mut() else {
            return;
        };
        window.set_title(title);
        self.desktop.manager().title_changed(self.desktop, self.id);
    }

    pub fn set_title_alignment(&mut self, alignment: Alignment) {
        if let Some(window) = self.window_mut() {
            window.set_title_alignment(alignment);
        }
    }

    pub fn set_border(&mut self, border: bool) {
        let Some(window) = self.window_mut() else {
            return;
        };
        window.set_border(border);
        self.desktop.manager().resized(self.desktop, self.id);
    }

    pub fn set_caption(&mut self, caption: bool) {
        if let Some(window) = self.window_mut() {
            window.set_caption(caption);
        }
    }

    pub fn set_resizable(&mut self, resizable: bool) {
        if let Some(window) = self.window_mut() {
            window.set_resizable(resizable);
        }
    }

    pub fn set_auto_activate(&mut self, auto_activate: bool) {
        if let Some(window) = self.window_mut() {
            window.set_auto_activate(auto_activate);
        }
    }

    pub fn set_auto_position(&mut self, auto_position: bool) {
        if let Some(window) = self.window_mut() {
            window.set_auto_position(auto_position);
        }
    }

    pub fn set_client(&mut self, client: Option<Box<dyn Content>>, full_size: bool) {
        let focused = self.desktop.focus() == Some(FocusTarget::Window(self.id));
        let Some(window) = self.window_mut() else {
            return;
        };
        if let Some(old) = window.client_mut() {
            old.set_focus(false);
        }
        window.set_client(client, full_size);
        if focused && let Some(new) = window.client_mut() {
            new.set_focus(true);
        }
    }

    pub fn client_mut(&mut self) -> Option<&mut (dyn Content + 'static)> {
        self.window_mut()?.client_mut()
    }

    pub fn set_drag(&mut self, drag: DragState) {
        if let Some(window) = self.window_mut() {
            window.set_drag(drag);
        }
    }

    /// Raise to the top of the stack. Focus is left alone.
    pub fn bring_to_front(&mut self) {
        self.desktop.raise(self.id);
    }

    /// Raise and focus. Returns whether anything changed.
    pub fn activate(&mut self) -> bool {
        let was_top = self.desktop.top_window() == Some(self.id);
        let had_focus = self.has_focus();
        if was_top && had_focus {
            return false;
        }
        self.bring_to_front();
        if !had_focus {
            self.desktop.set_focus(Some(FocusTarget::Window(self.id)));
        }
        tracing::debug!(window_id = ?self.id, "window activated");
        true
    }

    pub fn has_focus(&self) -> bool {
        self.desktop.window_has_focus(self.id)
    }

    /// Window below this one, wrapping to the top of the stack.
    pub fn next_window(&self) -> Option<WindowId> {
        self.desktop.neighbor(self.id, true)
    }

    /// Window above this one, wrapping to the bottom of the stack.
    pub fn prev_window(&self) -> Option<WindowId> {
        self.desktop.neighbor(self.id, false)
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if self.has_focus() {
            let wm = self.desktop.manager();
            if wm.default_input_handler(self.desktop, self.id, event) {
                return true;
            }
        }
        if !self.desktop.window_client_has_focus(self.id) {
            return false;
        }
        self.client_mut()
            .is_some_and(|client| client.handle_key(event))
    }

    /// Route a mouse event through the manager, then the client.
    ///
    /// A left press inside an auto-activating window always counts as
    /// consumed, even when the window was already active, so the press never
    /// falls through to a window further down the stack.
    pub fn handle_mouse(&mut self, event: &MouseEvent) -> MouseOutcome {
        let Some(window) = self.window() else {
            return MouseOutcome::IGNORED;
        };
        let inside = window.contains(event.column, event.row);
        let activated =
            event.action == MouseAction::LeftDown && inside && window.auto_activates();
        if activated {
            self.activate();
        }

        let wm = self.desktop.manager();
        let outcome = wm.default_mouse_handler(self.desktop, self.id, event);
        if outcome.consumed {
            return outcome;
        }
        if !inside || !self.desktop.contains(self.id) {
            return MouseOutcome::IGNORED;
        }
        let client_outcome = self
            .client_mut()
            .map(|client| client.handle_mouse(event))
            .unwrap_or_default();
        if client_outcome.consumed {
            return client_outcome;
        }
        if activated {
            return MouseOutcome::CONSUMED;
        }
        MouseOutcome::IGNORED
    }

    pub fn draw(&mut self, screen: &mut Screen<'_>) {
        let wm = self.desktop.manager();
        wm.default_draw(self.desktop, self.id, screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::TextView;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn desktop_with(n: usize) -> (Desktop, Vec<WindowId>) {
        let mut desktop = Desktop::new();
        desktop.set_rect(FloatRect::new(0, 0, 80, 24));
        let ids = (0..n)
            .map(|i| {
                desktop.add_window(
                    Window::new()
                        .with_border(true)
                        .with_title(format!("W{i}"))
                        .with_rect(FloatRect::new(i as i32 * 3, 0, 30, 15)),
                )
            })
            .collect();
        (desktop, ids)
    }

    #[test]
    fn bring_to_front_is_idempotent() {
        let (mut desktop, ids) = desktop_with(3);
        desktop.window_mut(ids[0]).expect("attached").bring_to_front();
        assert_eq!(desktop.stack(), &[ids[1], ids[2], ids[0]]);
        desktop.window_mut(ids[0]).expect("attached").bring_to_front();
        assert_eq!(desktop.stack(), &[ids[1], ids[2], ids[0]]);
        assert_eq!(desktop.focus(), None);
    }

    #[test]
    fn activate_reports_change_once() {
        let (mut desktop, ids) = desktop_with(2);
        assert!(desktop.window_mut(ids[0]).expect("attached").activate());
        assert_eq!(desktop.top_window(), Some(ids[0]));
        assert_eq!(desktop.focused_window(), Some(ids[0]));
        assert!(!desktop.window_mut(ids[0]).expect("attached").activate());
    }

    #[test]
    fn activate_focuses_top_window_without_focus() {
        let (mut desktop, ids) = desktop_with(2);
        assert!(desktop.window_mut(ids[1]).expect("attached").activate());
        assert_eq!(desktop.stack(), &[ids[0], ids[1]]);
        assert_eq!(desktop.focused_window(), Some(ids[1]));
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let (mut desktop, ids) = desktop_with(3);
        let handle = desktop.window_mut(ids[0]).expect("attached");
        assert_eq!(handle.next_window(), Some(ids[2]));
        assert_eq!(handle.prev_window(), Some(ids[1]));
        let handle = desktop.window_mut(ids[2]).expect("attached");
        assert_eq!(handle.next_window(), Some(ids[1]));
        assert_eq!(handle.prev_window(), Some(ids[0]));
    }

    #[test]
    fn neighbors_need_two_windows() {
        let (mut desktop, ids) = desktop_with(1);
        let handle = desktop.window_mut(ids[0]).expect("attached");
        assert_eq!(handle.next_window(), None);
        assert_eq!(handle.prev_window(), None);
    }

    #[test]
    fn attached_state_change_runs_transition() {
        let (mut desktop, ids) = desktop_with(1);
        desktop
            .window_mut(ids[0])
            .expect("attached")
            .set_state(WindowState::Maximized);
        let win = desktop.window(ids[0]).expect("attached");
        assert_eq!(win.rect(), FloatRect::new(0, 0, 80, 24));
        assert_eq!(win.restored_rect(), FloatRect::new(0, 0, 30, 15));
    }

    #[test]
    fn restored_rect_while_maximized_is_cached() {
        let (mut desktop, ids) = desktop_with(1);
        let mut handle = desktop.window_mut(ids[0]).expect("attached");
        handle.set_state(WindowState::Maximized);
        handle.set_restored_rect(FloatRect::new(7, 7, 20, 6));
        assert_eq!(handle.window().map(|w| w.rect()), Some(FloatRect::new(0, 0, 80, 24)));
        handle.set_state(WindowState::Restored);
        assert_eq!(handle.window().map(|w| w.rect()), Some(FloatRect::new(7, 7, 20, 6)));
    }

    #[test]
    fn keys_reach_client_only_with_focus() {
        let mut desktop = Desktop::new();
        desktop.set_rect(FloatRect::new(0, 0, 80, 24));
        let id = desktop.add_window(
            Window::new()
                .with_border(true)
                .with_rect(FloatRect::new(0, 0, 30, 15))
                .with_client(Box::new(TextView::new("a\nb")), true),
        );
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert!(!desktop.window_mut(id).expect("attached").handle_key(&down));
        desktop.set_focus(Some(FocusTarget::Window(id)));
        assert!(desktop.window_mut(id).expect("attached").handle_key(&down));
    }

    #[test]
    fn click_in_body_activates_and_is_consumed() {
        let (mut desktop, ids) = desktop_with(2);
        let press = MouseEvent::new(MouseAction::LeftDown, 5, 5);
        let outcome = desktop.window_mut(ids[0]).expect("attached").handle_mouse(&press);
        assert_eq!(outcome, MouseOutcome::CONSUMED);
        assert_eq!(desktop.top_window(), Some(ids[0]));
    }

    #[test]
    fn press_on_already_active_window_is_still_consumed() {
        let (mut desktop, ids) = desktop_with(2);
        desktop.window_mut(ids[1]).expect("attached").activate();
        let press = MouseEvent::new(MouseAction::LeftDown, 5, 5);
        let outcome = desktop.window_mut(ids[1]).expect("attached").handle_mouse(&press);
        assert_eq!(outcome, MouseOutcome::CONSUMED);
    }

    #[test]
    fn setters_on_removed_window_do_nothing() {
        let (mut desktop, ids) = desktop_with(2);
        let mut handle = desktop.window_mut(ids[0]).expect("attached");
        handle.desktop().remove_window(ids[0]);
        handle.set_rect(FloatRect::new(1, 1, 20, 5));
        handle.set_title("gone");
        handle.set_border(false);
        handle.set_restored_rect(FloatRect::new(2, 2, 20, 5));
        assert!(handle.window().is_none());
        assert!(handle.client_mut().is_none());
        let press = MouseEvent::new(MouseAction::LeftDown, 5, 5);
        assert_eq!(handle.handle_mouse(&press), MouseOutcome::IGNORED);
        assert_eq!(desktop.len(), 1);
    }

    #[test]
    fn click_without_auto_activate_falls_through() {
        let mut desktop = Desktop::new();
        desktop.set_rect(FloatRect::new(0, 0, 80, 24));
        let id = desktop.add_window(
            Window::new()
                .with_border(true)
                .with_auto_activate(false)
                .with_rect(FloatRect::new(0, 0, 30, 15)),
        );
        let press = MouseEvent::new(MouseAction::LeftDown, 5, 5);
        let outcome = desktop.window_mut(id).expect("attached").handle_mouse(&press);
        assert_eq!(outcome, MouseOutcome::IGNORED);
        assert_eq!(desktop.focus(), None);
    }

    #[test]
    fn title_change_is_visible_through_window() {
        let (mut desktop, ids) = desktop_with(1);
        desktop.window_mut(ids[0]).expect("attached").set_title("renamed");
        assert_eq!(desktop.window(ids[0]).map(|w| w.title()), Some("renamed"));
    }

    #[test]
    fn swapping_client_moves_focus() {
        let (mut desktop, ids) = desktop_with(1);
        desktop.set_focus(Some(FocusTarget::Window(ids[0])));
        let mut handle = desktop.window_mut(ids[0]).expect("attached");
        handle.set_client(Some(Box::new(TextView::new("x"))), true);
        assert!(handle.client_mut().is_some_and(|c| c.has_focus()));
        assert_eq!(
            handle.window().and_then(|w| w.client()).map(|c| c.rect()),
            Some(FloatRect::new(1, 1, 28, 13))
        );
    }
}
