//! Screen: the render surface windows and client content draw onto.
//!
//! It wraps a ratatui `Buffer` and speaks in signed coordinates, because a
//! window dragged past the left or top edge of the terminal still has a
//! well-defined rectangle. Everything written through a `Screen` is clipped
//! to its visible area, so callers never need their own bounds checks.
//!
//! Besides cell access the screen reports two capabilities of the host
//! terminal: whether pointer input is available and how many colors it can
//! show. The default chrome uses the former to decide whether a resize grip
//! is worth drawing.
use crate::window::FloatRect;
use ratatui::Frame;
use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

/// Capabilities of the terminal behind a `Screen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCaps {
    pub mouse: bool,
    pub colors: u32,
}

impl Default for ScreenCaps {
    fn default() -> Self {
        Self {
            mouse: true,
            colors: 256,
        }
    }
}

pub struct Screen<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
    caps: ScreenCaps,
}

impl<'a> Screen<'a> {
    pub fn new(frame: &'a mut Frame<'_>, caps: ScreenCaps) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer, caps }
    }

    /// Construct a `Screen` directly from an area and buffer. Used for
    /// offscreen rendering and in tests.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer, caps: ScreenCaps) -> Self {
        Self { area, buffer, caps }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    pub fn has_mouse(&self) -> bool {
        self.caps.mouse
    }

    pub fn colors(&self) -> u32 {
        self.caps.colors
    }

    pub fn caps(&self) -> ScreenCaps {
        self.caps
    }

    fn position(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        let x0 = self.area.x as i32;
        let y0 = self.area.y as i32;
        let x1 = x0 + self.area.width as i32;
        let y1 = y0 + self.area.height as i32;
        if x < x0 || x >= x1 || y < y0 || y >= y1 {
            return None;
        }
        Some((x as u16, y as u16))
    }

    /// The cell at `(x, y)`, or `None` when it lies outside the screen.
    pub fn content(&self, x: i32, y: i32) -> Option<&Cell> {
        let pos = self.position(x, y)?;
        self.buffer.cell(pos)
    }

    /// Write a glyph and style into one cell. The style is patched onto the
    /// cell, so pass a style built from `Style::reset()` to replace it fully.
    pub fn set_content(&mut self, x: i32, y: i32, symbol: &str, style: Style) {
        let Some(pos) = self.position(x, y) else {
            return;
        };
        if let Some(cell) = self.buffer.cell_mut(pos) {
            cell.set_symbol(symbol);
            cell.set_style(style);
        }
    }

    /// Blank every visible cell of `rect` and paint it with `style`.
    pub fn fill(&mut self, rect: FloatRect, style: Style) {
        let Some(visible) = rect.visible_in(self.area) else {
            return;
        };
        for y in visible.y..visible.y.saturating_add(visible.height) {
            for x in visible.x..visible.x.saturating_add(visible.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_symbol(" ");
                    cell.set_style(style);
                }
            }
        }
    }

    /// Render a ratatui widget into a signed rectangle.
    ///
    /// The widget sees a buffer of exactly `rect`'s size, pre-filled with
    /// whatever the screen already shows there, so partially offscreen
    /// windows keep their layout instead of being squeezed into the visible
    /// part.
    pub fn render_widget<W>(&mut self, widget: W, rect: FloatRect)
    where
        W: Widget,
    {
        if rect.width == 0 || rect.height == 0 || rect.visible_in(self.area).is_none() {
            return;
        }
        let local = Rect::new(0, 0, rect.width, rect.height);
        let mut offscreen = Buffer::empty(local);
        for sy in 0..rect.height {
            for sx in 0..rect.width {
                if let Some(src) = self.content(rect.x + sx as i32, rect.y + sy as i32)
                    && let Some(dst) = offscreen.cell_mut((sx, sy))
                {
                    *dst = src.clone();
                }
            }
        }
        widget.render(local, &mut offscreen);
        self.blit_from_signed(&offscreen, rect);
    }

    pub fn blit_from_signed(&mut self, src: &Buffer, dest: FloatRect) {
        let frame_x0 = self.area.x as i32;
        let frame_y0 = self.area.y as i32;
        let frame_x1 = frame_x0 + self.area.width as i32;
        let frame_y1 = frame_y0 + self.area.height as i32;
        for sy in 0..dest.height as i32 {
            let dy = dest.y + sy;
            if dy < frame_y0 || dy >= frame_y1 {
                continue;
            }
            for sx in 0..dest.width as i32 {
                let dx = dest.x + sx;
                if dx < frame_x0 || dx >= frame_x1 {
                    continue;
                }
                if let (Some(src_cell), Some(dst_cell)) = (
                    src.cell((sx as u16, sy as u16)),
                    self.buffer.cell_mut((dx as u16, dy as u16)),
                ) {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use ratatui::style::{Color, Style};
    use ratatui::widgets::Widget;

    fn filled(area: Rect, symbol: &str) -> Buffer {
        let mut buf = Buffer::empty(area);
        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol(symbol);
                }
            }
        }
        buf
    }

    #[test]
    fn blit_from_signed_clips_negative_offsets() {
        let frame_area = Rect::new(0, 0, 4, 2);
        let mut dest = Buffer::empty(frame_area);
        let mut screen = Screen::from_parts(frame_area, &mut dest, ScreenCaps::default());
        let src = filled(Rect::new(0, 0, 3, 2), "#");
        screen.blit_from_signed(
            &src,
            FloatRect {
                x: -1,
                y: 0,
                width: 3,
                height: 2,
            },
        );
        assert_eq!(dest.cell((0, 0)).unwrap().symbol(), "#");
        assert_eq!(dest.cell((1, 0)).unwrap().symbol(), "#");
        assert_eq!(dest.cell((2, 0)).unwrap().symbol(), " ");
    }

    #[test]
    fn content_outside_area_is_none_and_writes_are_dropped() {
        let area = Rect::new(0, 0, 3, 3);
        let mut buf = Buffer::empty(area);
        let mut screen = Screen::from_parts(area, &mut buf, ScreenCaps::default());
        assert!(screen.content(-1, 0).is_none());
        assert!(screen.content(3, 1).is_none());
        screen.set_content(-1, 0, "x", Style::default());
        screen.set_content(1, 1, "y", Style::default().fg(Color::Red));
        let cell = screen.content(1, 1).expect("cell present");
        assert_eq!(cell.symbol(), "y");
        assert_eq!(cell.fg, Color::Red);
    }

    #[test]
    fn fill_clips_to_screen() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = filled(area, ".");
        let mut screen = Screen::from_parts(area, &mut buf, ScreenCaps::default());
        screen.fill(FloatRect::new(-2, 1, 4, 5), Style::default().bg(Color::Blue));
        assert_eq!(buf.cell((0, 1)).unwrap().symbol(), " ");
        assert_eq!(buf.cell((0, 1)).unwrap().bg, Color::Blue);
        assert_eq!(buf.cell((2, 1)).unwrap().symbol(), ".");
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), ".");
    }

    #[test]
    fn render_widget_keeps_layout_when_partially_offscreen() {
        struct Ruler;
        impl Widget for Ruler {
            fn render(self, area: Rect, buf: &mut Buffer) {
                for x in area.x..area.x.saturating_add(area.width) {
                    if let Some(cell) = buf.cell_mut((x, area.y)) {
                        cell.set_symbol(&(x % 10).to_string());
                    }
                }
            }
        }

        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);
        let mut screen = Screen::from_parts(area, &mut buf, ScreenCaps::default());
        screen.render_widget(Ruler, FloatRect::new(-2, 0, 4, 1));
        // Columns 0 and 1 of the widget fall offscreen.
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), "2");
        assert_eq!(buf.cell((1, 0)).unwrap().symbol(), "3");
        assert_eq!(buf.cell((2, 0)).unwrap().symbol(), " ");
    }

    #[test]
    fn render_widget_sees_existing_content() {
        struct Noop;
        impl Widget for Noop {
            fn render(self, _area: Rect, _buf: &mut Buffer) {}
        }

        let area = Rect::new(0, 0, 3, 2);
        let mut buf = filled(area, "Z");
        let mut screen = Screen::from_parts(area, &mut buf, ScreenCaps::default());
        screen.render_widget(Noop, FloatRect::new(1, 0, 2, 2));
        assert_eq!(buf.cell((1, 0)).unwrap().symbol(), "Z");
        assert_eq!(buf.cell((2, 1)).unwrap().symbol(), "Z");
    }

    #[test]
    fn caps_are_reported() {
        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        let screen = Screen::from_parts(
            area,
            &mut buf,
            ScreenCaps {
                mouse: false,
                colors: 16,
            },
        );
        assert!(!screen.has_mouse());
        assert_eq!(screen.colors(), 16);
    }
}
