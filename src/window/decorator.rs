use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Clear, Widget};

use super::FloatRect;
use crate::screen::Screen;

/// Geometry and plain decoration shared by windows and the desktop:
/// rectangle, optional border, title and background color.
///
/// This carries no behavior beyond drawing itself; the owners decide what a
/// geometry change means for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    rect: FloatRect,
    border: bool,
    title: String,
    title_alignment: Alignment,
    background: Color,
}

impl Decoration {
    pub fn new(background: Color) -> Self {
        Self {
            rect: FloatRect::new(0, 0, 15, 10),
            border: false,
            title: String::new(),
            title_alignment: Alignment::Left,
            background,
        }
    }

    pub fn rect(&self) -> FloatRect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: FloatRect) {
        self.rect = rect;
    }

    pub fn inner_rect(&self) -> FloatRect {
        self.rect.inner(self.border)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rect.contains(x, y)
    }

    pub fn border(&self) -> bool {
        self.border
    }

    pub fn set_border(&mut self, border: bool) {
        self.border = border;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn title_alignment(&self) -> Alignment {
        self.title_alignment
    }

    pub fn set_title_alignment(&mut self, alignment: Alignment) {
        self.title_alignment = alignment;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    pub fn draw(&self, screen: &mut Screen<'_>) {
        screen.render_widget(BoxWidget { decoration: self }, self.rect);
    }
}

struct BoxWidget<'a> {
    decoration: &'a Decoration,
}

impl Widget for BoxWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let deco = self.decoration;
        Clear.render(area, buf);
        let mut block = Block::new().style(Style::default().bg(deco.background));
        if deco.border {
            // The title sits in the top border, so a borderless box has none.
            block = Block::bordered()
                .style(Style::default().bg(deco.background))
                .title(deco.title.as_str())
                .title_alignment(deco.title_alignment);
        }
        block.render(area, buf);
    }
}
