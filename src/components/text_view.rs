use crossterm::event::{KeyCode, KeyEventKind};
use ratatui::style::Style;
use ratatui::text::Text;
use ratatui::widgets::{Block, Padding, Paragraph, Wrap};

use crate::components::Content;
use crate::event::{KeyEvent, MouseAction, MouseEvent, MouseOutcome};
use crate::screen::Screen;
use crate::window::FloatRect;

/// Scrollable, word-wrapped block of text. Used as window client content by
/// the demo binary.
#[derive(Debug)]
pub struct TextView {
    rect: FloatRect,
    text: Text<'static>,
    style: Style,
    padding: Padding,
    scroll: u16,
    focused: bool,
}

impl TextView {
    pub fn new(text: impl Into<Text<'static>>) -> Self {
        Self {
            rect: FloatRect::default(),
            text: text.into(),
            style: Style::default(),
            padding: Padding::ZERO,
            scroll: 0,
            focused: false,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = self.text.lines.len().saturating_sub(1) as i32;
        self.scroll = (self.scroll as i32 + delta).clamp(0, max.max(0)) as u16;
    }
}

impl Content for TextView {
    fn rect(&self) -> FloatRect {
        self.rect
    }

    fn set_rect(&mut self, rect: FloatRect) {
        self.rect = rect;
    }

    fn draw(&mut self, screen: &mut Screen<'_>) {
        if self.rect.width == 0 || self.rect.height == 0 {
            return;
        }
        let paragraph = Paragraph::new(self.text.clone())
            .style(self.style)
            .block(Block::new().padding(self.padding))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        screen.render_widget(paragraph, self.rect);
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if event.kind == KeyEventKind::Release {
            return false;
        }
        match event.code {
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-(self.rect.height as i32)),
            KeyCode::PageDown => self.scroll_by(self.rect.height as i32),
            KeyCode::Home => self.scroll = 0,
            _ => return false,
        }
        true
    }

    fn handle_mouse(&mut self, event: &MouseEvent) -> MouseOutcome {
        if !event.is_within(self.rect) {
            return MouseOutcome::IGNORED;
        }
        match event.action {
            MouseAction::ScrollUp => self.scroll_by(-1),
            MouseAction::ScrollDown => self.scroll_by(1),
            _ => return MouseOutcome::IGNORED,
        }
        MouseOutcome::CONSUMED
    }
}
