//! Turns crossterm's raw mouse reports into press/release/click events.
//!
//! crossterm reports only button transitions and motion. The window manager
//! additionally needs to know which buttons are held and whether a release
//! completed a click or a double click, so this keeps a little state between
//! events.
use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent as RawMouseEvent, MouseEventKind};

use crate::constants::DOUBLE_CLICK_INTERVAL;
use crate::event::{MouseAction, MouseButtons, MouseEvent};

#[derive(Debug, Clone, Copy)]
struct Press {
    button: MouseButton,
    column: u16,
    row: u16,
}

#[derive(Debug, Clone, Copy)]
struct LastClick {
    button: MouseButton,
    column: u16,
    row: u16,
    at: Instant,
}

#[derive(Debug, Default)]
pub struct ClickClassifier {
    held: MouseButtons,
    press: Option<Press>,
    last_click: Option<LastClick>,
}

impl ClickClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&mut self, event: RawMouseEvent) -> Vec<MouseEvent> {
        self.classify_at(event, Instant::now())
    }

    /// Classify one raw event observed at `now`. A release may produce two
    /// events: the release itself followed by a click or double click.
    pub fn classify_at(&mut self, event: RawMouseEvent, now: Instant) -> Vec<MouseEvent> {
        let column = event.column as i32;
        let row = event.row as i32;
        let emit = |action, buttons| MouseEvent {
            column,
            row,
            action,
            buttons,
        };
        match event.kind {
            MouseEventKind::Down(button) => {
                self.held = self.held.union(button_bit(button));
                self.press = Some(Press {
                    button,
                    column: event.column,
                    row: event.row,
                });
                vec![emit(down_action(button), self.held)]
            }
            MouseEventKind::Up(button) => {
                self.held = self.held.difference(button_bit(button));
                let mut out = vec![emit(up_action(button), self.held)];
                let same_cell = self.press.take().is_some_and(|p| {
                    p.button == button && p.column == event.column && p.row == event.row
                });
                if !same_cell {
                    return out;
                }
                let double = self.last_click.is_some_and(|c| {
                    c.button == button
                        && c.column == event.column
                        && c.row == event.row
                        && now.saturating_duration_since(c.at) <= DOUBLE_CLICK_INTERVAL
                });
                if double {
                    self.last_click = None;
                    out.push(emit(double_click_action(button), self.held));
                } else {
                    self.last_click = Some(LastClick {
                        button,
                        column: event.column,
                        row: event.row,
                        at: now,
                    });
                    out.push(emit(click_action(button), self.held));
                }
                out
            }
            MouseEventKind::Drag(button) => {
                // A drag implies the button is down even if the press was
                // reported before we started listening.
                self.held = self.held.union(button_bit(button));
                vec![emit(MouseAction::Move, self.held)]
            }
            MouseEventKind::Moved => vec![emit(MouseAction::Move, MouseButtons::NONE)],
            MouseEventKind::ScrollUp => vec![emit(MouseAction::ScrollUp, self.held)],
            MouseEventKind::ScrollDown => vec![emit(MouseAction::ScrollDown, self.held)],
            MouseEventKind::ScrollLeft => vec![emit(MouseAction::ScrollLeft, self.held)],
            MouseEventKind::ScrollRight => vec![emit(MouseAction::ScrollRight, self.held)],
        }
    }
}

fn button_bit(button: MouseButton) -> MouseButtons {
    match button {
        MouseButton::Left => MouseButtons::PRIMARY,
        MouseButton::Right => MouseButtons::SECONDARY,
        MouseButton::Middle => MouseButtons::MIDDLE,
    }
}

fn down_action(button: MouseButton) -> MouseAction {
    match button {
        MouseButton::Left => MouseAction::LeftDown,
        MouseButton::Right => MouseAction::RightDown,
        MouseButton::Middle => MouseAction::MiddleDown,
    }
}

fn up_action(button: MouseButton) -> MouseAction {
    match button {
        MouseButton::Left => MouseAction::LeftUp,
        MouseButton::Right => MouseAction::RightUp,
        MouseButton::Middle => MouseAction::MiddleUp,
    }
}

fn click_action(button: MouseButton) -> MouseAction {
    match button {
        MouseButton::Left => MouseAction::LeftClick,
        MouseButton::Right => MouseAction::RightClick,
        MouseButton::Middle => MouseAction::MiddleClick,
    }
}

fn double_click_action(button: MouseButton) -> MouseAction {
    match button {
        MouseButton::Left => MouseAction::LeftDoubleClick,
        MouseButton::Right => MouseAction::RightDoubleClick,
        MouseButton::Middle => MouseAction::MiddleDoubleClick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::time::Duration;

    fn raw(kind: MouseEventKind, column: u16, row: u16) -> RawMouseEvent {
        RawMouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn actions(events: &[MouseEvent]) -> Vec<MouseAction> {
        events.iter().map(|e| e.action).collect()
    }

    #[test]
    fn press_reports_held_button() {
        let mut c = ClickClassifier::new();
        let out = c.classify_at(raw(MouseEventKind::Down(MouseButton::Left), 3, 4), Instant::now());
        assert_eq!(actions(&out), vec![MouseAction::LeftDown]);
        assert_eq!(out[0].buttons, MouseButtons::PRIMARY);
        assert_eq!(out[0].position(), (3, 4));
    }

    #[test]
    fn release_on_same_cell_is_a_click() {
        let mut c = ClickClassifier::new();
        let t0 = Instant::now();
        c.classify_at(raw(MouseEventKind::Down(MouseButton::Left), 3, 4), t0);
        let out = c.classify_at(raw(MouseEventKind::Up(MouseButton::Left), 3, 4), t0);
        assert_eq!(actions(&out), vec![MouseAction::LeftUp, MouseAction::LeftClick]);
        assert!(out[0].buttons.is_empty());
    }

    #[test]
    fn release_elsewhere_is_not_a_click() {
        let mut c = ClickClassifier::new();
        let t0 = Instant::now();
        c.classify_at(raw(MouseEventKind::Down(MouseButton::Left), 3, 4), t0);
        let out = c.classify_at(raw(MouseEventKind::Up(MouseButton::Left), 9, 4), t0);
        assert_eq!(actions(&out), vec![MouseAction::LeftUp]);
    }

    #[test]
    fn quick_second_click_is_double_then_resets() {
        let mut c = ClickClassifier::new();
        let t0 = Instant::now();
        let mut click = |at: Instant| {
            c.classify_at(raw(MouseEventKind::Down(MouseButton::Left), 1, 1), at);
            c.classify_at(raw(MouseEventKind::Up(MouseButton::Left), 1, 1), at)
        };
        assert_eq!(actions(&click(t0))[1], MouseAction::LeftClick);
        let t1 = t0 + Duration::from_millis(200);
        assert_eq!(actions(&click(t1))[1], MouseAction::LeftDoubleClick);
        let t2 = t1 + Duration::from_millis(100);
        assert_eq!(actions(&click(t2))[1], MouseAction::LeftClick);
    }

    #[test]
    fn slow_second_click_stays_single() {
        let mut c = ClickClassifier::new();
        let t0 = Instant::now();
        c.classify_at(raw(MouseEventKind::Down(MouseButton::Right), 1, 1), t0);
        c.classify_at(raw(MouseEventKind::Up(MouseButton::Right), 1, 1), t0);
        let t1 = t0 + DOUBLE_CLICK_INTERVAL + Duration::from_millis(1);
        c.classify_at(raw(MouseEventKind::Down(MouseButton::Right), 1, 1), t1);
        let out = c.classify_at(raw(MouseEventKind::Up(MouseButton::Right), 1, 1), t1);
        assert_eq!(actions(&out), vec![MouseAction::RightUp, MouseAction::RightClick]);
    }

    #[test]
    fn drag_and_motion_map_to_move() {
        let mut c = ClickClassifier::new();
        let t0 = Instant::now();
        c.classify_at(raw(MouseEventKind::Down(MouseButton::Left), 0, 0), t0);
        let out = c.classify_at(raw(MouseEventKind::Drag(MouseButton::Left), 5, 3), t0);
        assert_eq!(actions(&out), vec![MouseAction::Move]);
        assert_eq!(out[0].buttons, MouseButtons::PRIMARY);
        let out = c.classify_at(raw(MouseEventKind::Moved, 6, 3), t0);
        assert_eq!(out[0].buttons, MouseButtons::NONE);
    }

    #[test]
    fn chorded_press_holds_both_buttons() {
        let mut c = ClickClassifier::new();
        let t0 = Instant::now();
        c.classify_at(raw(MouseEventKind::Down(MouseButton::Left), 0, 0), t0);
        let out = c.classify_at(raw(MouseEventKind::Down(MouseButton::Right), 0, 0), t0);
        assert_eq!(out[0].buttons, MouseButtons::PRIMARY.union(MouseButtons::SECONDARY));
    }

    #[test]
    fn wheel_maps_to_scroll() {
        let mut c = ClickClassifier::new();
        let out = c.classify(raw(MouseEventKind::ScrollDown, 2, 2));
        assert_eq!(actions(&out), vec![MouseAction::ScrollDown]);
    }
}
