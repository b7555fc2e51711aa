use ratatui::layout::Alignment;
use ratatui::style::{Color, Style};

// Centralized theme colors. The indexed values were picked to stay readable
// on 16, 256 and truecolor terminals alike.

/// Caption colors and title alignment shared by every window on a desktop.
///
/// This is a plain value: managers hand out copies and compare by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowTheme {
    pub title_alignment: Alignment,
    pub active_caption_text: Color,
    pub active_caption: Color,
    pub inactive_caption_text: Color,
    pub inactive_caption: Color,
}

impl Default for WindowTheme {
    fn default() -> Self {
        Self {
            title_alignment: Alignment::Left,
            active_caption_text: Color::Indexed(230),
            active_caption: Color::Indexed(26),
            inactive_caption_text: Color::Indexed(15),
            inactive_caption: Color::Indexed(239),
        }
    }
}

impl WindowTheme {
    pub fn with_title_alignment(mut self, alignment: Alignment) -> Self {
        self.title_alignment = alignment;
        self
    }

    /// Style painted over the caption row for a window with the given focus.
    pub fn caption_style(&self, focused: bool) -> Style {
        if focused {
            Style::reset()
                .fg(self.active_caption_text)
                .bg(self.active_caption)
        } else {
            Style::reset()
                .fg(self.inactive_caption_text)
                .bg(self.inactive_caption)
        }
    }
}

// Desktop
pub fn desktop_bg() -> Color {
    Color::Indexed(234)
}

// Window body
pub fn window_bg() -> Color {
    Color::Reset
}

// Bottom-right cell of a focused, resizable window.
pub fn resize_grip() -> Color {
    Color::Indexed(226)
}

// Taskbar
pub fn taskbar_bg() -> Color {
    Color::DarkGray
}
pub fn taskbar_fg() -> Color {
    Color::White
}
pub fn taskbar_active_bg() -> Color {
    Color::Gray
}
pub fn taskbar_active_fg() -> Color {
    Color::Black
}
