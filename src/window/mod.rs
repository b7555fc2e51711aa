pub mod decorator;
mod handle;
pub mod taskbar;
mod window_manager;

use std::fmt;

use ratatui::layout::Alignment;
use ratatui::prelude::Rect;

use crate::components::Content;
use crate::constants::{MIN_BORDERED_HEIGHT, MIN_BORDERED_WIDTH};
use crate::screen::Screen;
use decorator::Decoration;

pub use handle::WindowHandle;
pub use taskbar::TaskbarManager;
pub use window_manager::{
    DefaultWindowManager, WindowManager, apply_state, draw_window, fit_maximized,
    handle_mouse_default,
};

/// Signed rectangle origin with unsigned size.
///
/// Windows can be dragged partially past the top or left edge of the
/// desktop, so their origin is signed; sizes never are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && x < self.x + self.width as i32
            && y >= self.y
            && y < self.y + self.height as i32
    }

    /// Last column covered by the rectangle.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32 - 1
    }

    /// Last row covered by the rectangle.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32 - 1
    }

    /// The rectangle shrunk by one cell on every side when `border` is set.
    pub fn inner(&self, border: bool) -> FloatRect {
        if !border {
            return *self;
        }
        FloatRect {
            x: self.x + 1,
            y: self.y + 1,
            width: self.width.saturating_sub(2),
            height: self.height.saturating_sub(2),
        }
    }

    /// Part of the rectangle visible inside `bounds`, if any.
    pub fn visible_in(&self, bounds: Rect) -> Option<Rect> {
        let bx0 = bounds.x as i32;
        let by0 = bounds.y as i32;
        let bx1 = bx0 + bounds.width as i32;
        let by1 = by0 + bounds.height as i32;
        let x0 = self.x.max(bx0);
        let y0 = self.y.max(by0);
        let x1 = (self.x + self.width as i32).min(bx1);
        let y1 = (self.y + self.height as i32).min(by1);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        })
    }
}

impl From<Rect> for FloatRect {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x as i32,
            y: rect.y as i32,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Visual state of a window, driven by the desktop's manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WindowState {
    #[default]
    Restored,
    Minimized,
    Maximized,
}

/// Which edges a resize drag is moving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResizeMask(u8);

impl ResizeMask {
    pub const NONE: Self = Self(0);
    /// Right edge: the drag changes the width.
    pub const HORIZONTAL: Self = Self(1);
    /// Bottom edge: the drag changes the height.
    pub const VERTICAL: Self = Self(2);
    pub const CORNER: Self = Self(3);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Transient pointer interaction state of a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    pub moving: bool,
    /// Pointer offset from the window's top-left corner when the move began.
    pub grab_x: i32,
    pub grab_y: i32,
    pub resize: ResizeMask,
}

impl DragState {
    pub fn is_active(&self) -> bool {
        self.moving || !self.resize.is_empty()
    }
}

/// A top-level window.
///
/// A `Window` is built standalone and handed to a `Desktop`, which owns it
/// for as long as it is attached. The setters here are the detached
/// variants: they only touch local state. Once attached, the window is
/// reached through a [`WindowHandle`], whose setters additionally consult
/// the desktop's manager.
pub struct Window {
    decoration: Decoration,
    restored: FloatRect,
    state: WindowState,
    caption: bool,
    resizable: bool,
    auto_activate: bool,
    auto_position: bool,
    drag: DragState,
    client: Option<Box<dyn Content>>,
    client_full_size: bool,
    laid_out: bool,
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("title", &self.decoration.title())
            .field("rect", &self.decoration.rect())
            .field("restored", &self.restored)
            .field("state", &self.state)
            .field("border", &self.decoration.border())
            .field("resizable", &self.resizable)
            .field("drag", &self.drag)
            .field("client", &self.client.is_some())
            .finish()
    }
}

impl Window {
    pub fn new() -> Self {
        let decoration = Decoration::new(crate::theme::window_bg());
        let restored = decoration.rect();
        Self {
            decoration,
            restored,
            state: WindowState::Restored,
            caption: true,
            resizable: false,
            auto_activate: true,
            auto_position: false,
            drag: DragState::default(),
            client: None,
            client_full_size: false,
            laid_out: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.set_title(title);
        self
    }

    pub fn with_border(mut self, border: bool) -> Self {
        self.set_border(border);
        self
    }

    pub fn with_rect(mut self, rect: FloatRect) -> Self {
        self.set_rect(rect);
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_auto_position(mut self, auto_position: bool) -> Self {
        self.auto_position = auto_position;
        self
    }

    pub fn with_auto_activate(mut self, auto_activate: bool) -> Self {
        self.auto_activate = auto_activate;
        self
    }

    pub fn with_caption(mut self, caption: bool) -> Self {
        self.caption = caption;
        self
    }

    pub fn with_state(mut self, state: WindowState) -> Self {
        self.state = state;
        self
    }

    pub fn with_client(mut self, client: Box<dyn Content>, full_size: bool) -> Self {
        self.set_client(Some(client), full_size);
        self
    }

    pub fn decoration(&self) -> &Decoration {
        &self.decoration
    }

    pub fn rect(&self) -> FloatRect {
        self.decoration.rect()
    }

    pub fn inner_rect(&self) -> FloatRect {
        self.decoration.inner_rect()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.decoration.contains(x, y)
    }

    /// Geometry the window returns to when restored, whatever its current
    /// state.
    pub fn restored_rect(&self) -> FloatRect {
        self.restored
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn title(&self) -> &str {
        self.decoration.title()
    }

    pub fn title_alignment(&self) -> Alignment {
        self.decoration.title_alignment()
    }

    pub fn has_border(&self) -> bool {
        self.decoration.border()
    }

    pub fn has_caption(&self) -> bool {
        self.caption
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn auto_activates(&self) -> bool {
        self.auto_activate
    }

    pub fn auto_positions(&self) -> bool {
        self.auto_position
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn client(&self) -> Option<&dyn Content> {
        self.client.as_deref()
    }

    pub fn client_mut(&mut self) -> Option<&mut (dyn Content + 'static)> {
        self.client.as_deref_mut()
    }

    pub fn client_full_size(&self) -> bool {
        self.client_full_size
    }

    pub fn set_rect(&mut self, rect: FloatRect) {
        self.apply_rect(rect);
    }

    /// While restored this moves the window; otherwise it only changes where
    /// the window will land once restored.
    pub fn set_restored_rect(&mut self, rect: FloatRect) {
        if self.state == WindowState::Restored {
            self.apply_rect(rect);
        } else {
            self.restored = self.clamp(rect);
        }
    }

    /// Stores the state without any layout effect. The transition runs once
    /// the window is first laid out on a desktop.
    pub fn set_state(&mut self, state: WindowState) {
        self.state = state;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.decoration.set_title(title);
    }

    pub fn set_border(&mut self, border: bool) {
        self.decoration.set_border(border);
        self.apply_rect(self.decoration.rect());
    }

    pub fn set_caption(&mut self, caption: bool) {
        self.caption = caption;
    }

    pub fn set_resizable(&mut self, resizable: bool) {
        self.resizable = resizable;
    }

    pub fn set_auto_activate(&mut self, auto_activate: bool) {
        self.auto_activate = auto_activate;
    }

    pub fn set_auto_position(&mut self, auto_position: bool) {
        self.auto_position = auto_position;
    }

    pub fn set_client(&mut self, client: Option<Box<dyn Content>>, full_size: bool) {
        self.client = client;
        self.client_full_size = full_size;
        self.layout_client();
    }

    pub fn take_client(&mut self) -> Option<Box<dyn Content>> {
        self.client.take()
    }

    /// Bare box: background, border and title. No caption colors, no
    /// client content.
    pub fn draw(&self, screen: &mut Screen<'_>) {
        self.decoration.draw(screen);
    }

    fn clamp(&self, mut rect: FloatRect) -> FloatRect {
        if self.decoration.border() {
            rect.width = rect.width.max(MIN_BORDERED_WIDTH);
            rect.height = rect.height.max(MIN_BORDERED_HEIGHT);
        }
        rect
    }

    /// Single point through which displayed geometry changes.
    pub(crate) fn apply_rect(&mut self, rect: FloatRect) {
        let rect = self.clamp(rect);
        self.decoration.set_rect(rect);
        if self.state == WindowState::Restored {
            self.restored = rect;
        }
        self.layout_client();
    }

    pub(crate) fn layout_client(&mut self) {
        if !self.client_full_size {
            return;
        }
        let inner = self.decoration.inner_rect();
        if let Some(client) = self.client.as_mut() {
            client.set_rect(inner);
        }
    }

    pub(crate) fn set_title_alignment(&mut self, alignment: Alignment) {
        self.decoration.set_title_alignment(alignment);
    }

    pub(crate) fn set_drag(&mut self, drag: DragState) {
        self.drag = drag;
    }

    pub(crate) fn is_laid_out(&self) -> bool {
        self.laid_out
    }

    pub(crate) fn set_laid_out(&mut self, laid_out: bool) {
        self.laid_out = laid_out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::TextView;

    #[test]
    fn bordered_window_never_shrinks_below_minimum() {
        let mut win = Window::new().with_border(true);
        win.set_rect(FloatRect::new(3, 4, 1, 0));
        assert_eq!(win.rect(), FloatRect::new(3, 4, 12, 2));
        win.set_rect(FloatRect::new(0, 0, 40, 1));
        assert_eq!(win.rect().width, 40);
        assert_eq!(win.rect().height, 2);
    }

    #[test]
    fn unbordered_window_takes_any_size() {
        let mut win = Window::new();
        win.set_rect(FloatRect::new(0, 0, 1, 1));
        assert_eq!(win.rect(), FloatRect::new(0, 0, 1, 1));
    }

    #[test]
    fn enabling_border_reclamps_current_geometry() {
        let mut win = Window::new().with_rect(FloatRect::new(1, 1, 4, 1));
        win.set_border(true);
        assert_eq!(win.rect(), FloatRect::new(1, 1, 12, 2));
        assert_eq!(win.restored_rect(), win.rect());
    }

    #[test]
    fn restored_rect_tracks_only_restored_geometry() {
        let mut win = Window::new()
            .with_border(true)
            .with_rect(FloatRect::new(10, 10, 20, 10));
        win.set_state(WindowState::Maximized);
        win.set_rect(FloatRect::new(0, 0, 80, 24));
        assert_eq!(win.restored_rect(), FloatRect::new(10, 10, 20, 10));
    }

    #[test]
    fn restored_rect_set_while_not_restored_is_cached_and_clamped() {
        let mut win = Window::new()
            .with_border(true)
            .with_rect(FloatRect::new(0, 0, 30, 15))
            .with_state(WindowState::Minimized);
        win.set_restored_rect(FloatRect::new(5, 6, 3, 1));
        assert_eq!(win.rect(), FloatRect::new(0, 0, 30, 15));
        assert_eq!(win.restored_rect(), FloatRect::new(5, 6, 12, 2));
    }

    #[test]
    fn detached_state_is_stored_without_moving() {
        let mut win = Window::new().with_rect(FloatRect::new(2, 2, 20, 8));
        win.set_state(WindowState::Maximized);
        assert_eq!(win.state(), WindowState::Maximized);
        assert_eq!(win.rect(), FloatRect::new(2, 2, 20, 8));
    }

    #[test]
    fn full_size_client_follows_inner_rect() {
        let mut win = Window::new()
            .with_border(true)
            .with_rect(FloatRect::new(0, 0, 30, 15))
            .with_client(Box::new(TextView::new("hi")), true);
        assert_eq!(
            win.client().map(|c| c.rect()),
            Some(FloatRect::new(1, 1, 28, 13))
        );
        win.set_rect(FloatRect::new(5, 5, 20, 10));
        assert_eq!(
            win.client().map(|c| c.rect()),
            Some(FloatRect::new(6, 6, 18, 8))
        );
    }

    #[test]
    fn float_rect_edges_and_inner() {
        let r = FloatRect::new(-2, 3, 10, 4);
        assert_eq!(r.right(), 7);
        assert_eq!(r.bottom(), 6);
        assert!(r.contains(-2, 3));
        assert!(!r.contains(8, 3));
        assert_eq!(r.inner(true), FloatRect::new(-1, 4, 8, 2));
        assert_eq!(r.inner(false), r);
    }

    #[test]
    fn float_rect_visible_clips_negative_offsets() {
        let bounds = Rect::new(0, 0, 80, 24);
        let rect = FloatRect::new(-5, 3, 20, 6);
        let visible = rect.visible_in(bounds).expect("overlaps");
        assert_eq!(visible, Rect::new(0, 3, 15, 6));
        assert!(FloatRect::new(-30, 0, 10, 5).visible_in(bounds).is_none());
    }

    #[test]
    fn resize_mask_combines_edges() {
        let mask = ResizeMask::HORIZONTAL.union(ResizeMask::VERTICAL);
        assert_eq!(mask, ResizeMask::CORNER);
        assert!(mask.contains(ResizeMask::VERTICAL));
        assert!(!ResizeMask::HORIZONTAL.contains(ResizeMask::VERTICAL));
        assert!(DragState {
            resize: mask,
            ..DragState::default()
        }
        .is_active());
    }
}
