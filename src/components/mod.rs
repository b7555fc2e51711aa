use crate::event::{KeyEvent, MouseEvent, MouseOutcome};
use crate::screen::Screen;
use crate::window::FloatRect;

pub mod text_view;

pub use text_view::TextView;

/// Client content hosted inside a window or behind all windows on the
/// desktop.
///
/// The window manager treats content as opaque: it positions it, asks it to
/// draw, and offers it the input the window chrome did not claim. Handlers
/// left at their defaults mean "this content has no handler".
pub trait Content {
    fn rect(&self) -> FloatRect;

    fn set_rect(&mut self, rect: FloatRect);

    fn draw(&mut self, screen: &mut Screen<'_>);

    fn has_focus(&self) -> bool {
        false
    }

    /// Called by the desktop when focus moves onto or away from this
    /// content.
    fn set_focus(&mut self, _focused: bool) {}

    fn handle_key(&mut self, _event: &KeyEvent) -> bool {
        false
    }

    fn handle_mouse(&mut self, _event: &MouseEvent) -> MouseOutcome {
        MouseOutcome::IGNORED
    }

    fn children(&self) -> Vec<&dyn Content> {
        Vec::new()
    }
}

/// Whether `content` or any of its descendants reports focus.
pub fn subtree_has_focus(content: &dyn Content) -> bool {
    content.has_focus() || content.children().into_iter().any(subtree_has_focus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[derive(Default)]
    struct Leaf {
        rect: FloatRect,
        focused: bool,
    }

    impl Content for Leaf {
        fn rect(&self) -> FloatRect {
            self.rect
        }
        fn set_rect(&mut self, rect: FloatRect) {
            self.rect = rect;
        }
        fn draw(&mut self, _screen: &mut Screen<'_>) {}
        fn has_focus(&self) -> bool {
            self.focused
        }
    }

    #[derive(Default)]
    struct Group {
        rect: FloatRect,
        items: Vec<Leaf>,
    }

    impl Content for Group {
        fn rect(&self) -> FloatRect {
            self.rect
        }
        fn set_rect(&mut self, rect: FloatRect) {
            self.rect = rect;
        }
        fn draw(&mut self, _screen: &mut Screen<'_>) {}
        fn children(&self) -> Vec<&dyn Content> {
            self.items.iter().map(|item| item as &dyn Content).collect()
        }
    }

    #[test]
    fn default_handlers_do_not_consume() {
        let mut leaf = Leaf::default();
        assert!(!leaf.handle_key(&KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)));
        let outcome = leaf.handle_mouse(&MouseEvent::new(crate::event::MouseAction::LeftDown, 0, 0));
        assert_eq!(outcome, MouseOutcome::IGNORED);
    }

    #[test]
    fn focus_is_found_in_descendants() {
        let mut group = Group {
            items: vec![Leaf::default(), Leaf::default()],
            ..Group::default()
        };
        assert!(!subtree_has_focus(&group));
        group.items[1].focused = true;
        assert!(subtree_has_focus(&group));
    }
}
