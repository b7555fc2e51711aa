use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use crossterm::event::{KeyCode, KeyModifiers};
use indoc::formatdoc;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Padding;

use term_desk::components::TextView;
use term_desk::drivers::console::{self, ConsoleInputDriver, ConsoleTerminal};
use term_desk::event::{KeyEvent, MouseAction, MouseEvent};
use term_desk::runner::{DesktopApp, Flow, RunOptions, run_desktop};
use term_desk::{
    Desktop, FloatRect, ScreenCaps, TaskbarManager, Window, WindowState, WindowTheme,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TitleAlign {
    Left,
    Center,
    Right,
}

impl From<TitleAlign> for Alignment {
    fn from(value: TitleAlign) -> Self {
        match value {
            TitleAlign::Left => Alignment::Left,
            TitleAlign::Center => Alignment::Center,
            TitleAlign::Right => Alignment::Right,
        }
    }
}

/// Two movable windows on a terminal desktop.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Run without mouse reporting.
    #[arg(long)]
    no_mouse: bool,

    #[arg(long, value_enum, default_value_t = TitleAlign::Left)]
    title_align: TitleAlign,

    /// Append debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Input poll interval in milliseconds.
    #[arg(long, default_value_t = 16)]
    poll_ms: u64,

    /// Keep a task list on the bottom row.
    #[arg(long)]
    taskbar: bool,
}

fn main() -> term_desk::Result<()> {
    let cli = Cli::parse();
    term_desk::tracing_sub::init(cli.log_file.as_deref())?;

    let caps = console::screen_caps(!cli.no_mouse);
    let theme = WindowTheme::default().with_title_alignment(cli.title_align.into());
    let mut app = DemoApp::new(caps, theme, cli.taskbar);

    let mut term = ConsoleTerminal::new()?;
    term.enter()?;
    let options = RunOptions {
        poll_interval: Duration::from_millis(cli.poll_ms),
        caps,
    };
    let result = run_desktop::<_, _, _, term_desk::Error>(
        term.terminal_mut(),
        ConsoleInputDriver::new(),
        &mut app,
        options,
    );
    term.exit()?;
    result
}

struct DemoApp {
    desktop: Desktop,
    taskbar: Option<Rc<TaskbarManager>>,
}

impl DemoApp {
    fn new(caps: ScreenCaps, theme: WindowTheme, taskbar: bool) -> Self {
        let taskbar = taskbar.then(|| Rc::new(TaskbarManager::with_theme(theme)));
        let mut desktop = match &taskbar {
            Some(manager) => Desktop::with_manager(manager.clone()),
            None => Desktop::new(),
        };
        desktop.set_theme(theme);
        desktop.set_background(Color::Indexed(234));

        let hint = formatdoc! {"
            F9 minimizes the focused window, F10 toggles maximize.

            Tab and Shift+Tab cycle between windows. Ctrl+Q quits.
        "};
        let first = Window::new()
            .with_title("Window 1")
            .with_border(true)
            .with_rect(FloatRect::new(0, 0, 30, 15))
            .with_auto_position(true)
            .with_client(
                Box::new(
                    TextView::new(hint)
                        .with_style(Style::default().fg(Color::Gray))
                        .with_padding(Padding::uniform(1)),
                ),
                true,
            );
        let second = Window::new()
            .with_title("Window 2")
            .with_border(true)
            .with_rect(FloatRect::new(0, 0, 30, 15))
            .with_auto_position(true)
            .with_resizable(true)
            .with_client(
                Box::new(TextView::new(greeting(caps)).with_padding(Padding::uniform(1))),
                true,
            );
        desktop.add_window(first);
        desktop.add_window(second);
        Self { desktop, taskbar }
    }

    fn cycle(&mut self, forward: bool) {
        let current = self.desktop.focused_window().or(self.desktop.top_window());
        let Some(current) = current else {
            return;
        };
        let target = self.desktop.window_mut(current).and_then(|handle| {
            if forward {
                handle.next_window()
            } else {
                handle.prev_window()
            }
        });
        let target = target.unwrap_or(current);
        if let Some(mut handle) = self.desktop.window_mut(target) {
            handle.activate();
        }
    }

    fn set_focused_state(&mut self, toggle_to: WindowState) {
        let Some(id) = self.desktop.focused_window() else {
            return;
        };
        let Some(current) = self.desktop.window(id).map(|w| w.state()) else {
            return;
        };
        let state = if current == toggle_to {
            WindowState::Restored
        } else {
            toggle_to
        };
        if let Some(mut handle) = self.desktop.window_mut(id) {
            handle.set_state(state);
        }
    }
}

impl DesktopApp for DemoApp {
    fn desktop(&mut self) -> &mut Desktop {
        &mut self.desktop
    }

    fn on_key(&mut self, key: &KeyEvent) -> Flow {
        match key.code {
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => Flow::Quit,
            KeyCode::Tab => {
                self.cycle(true);
                Flow::Handled
            }
            KeyCode::BackTab => {
                self.cycle(false);
                Flow::Handled
            }
            KeyCode::F(9) => {
                self.set_focused_state(WindowState::Minimized);
                Flow::Handled
            }
            KeyCode::F(10) => {
                self.set_focused_state(WindowState::Maximized);
                Flow::Handled
            }
            _ => Flow::Pass,
        }
    }

    fn on_unhandled_mouse(&mut self, event: &MouseEvent) {
        if event.action != MouseAction::LeftDown {
            return;
        }
        let Some(manager) = self.taskbar.as_ref() else {
            return;
        };
        let Some(id) = manager.window_at(&self.desktop, event.column, event.row) else {
            return;
        };
        let Some(mut handle) = self.desktop.window_mut(id) else {
            return;
        };
        if handle.window().is_some_and(|w| w.state() == WindowState::Minimized) {
            handle.set_state(WindowState::Restored);
        }
        handle.activate();
    }
}

fn greeting(caps: ScreenCaps) -> Text<'static> {
    let mut hello = vec![Span::styled(
        "Hello!",
        Style::default().fg(Color::Indexed(208)),
    )];
    if !caps.mouse {
        hello.push(Span::styled("   <<No mouse!>>", Style::default().fg(Color::Red)));
    }
    let (verdict, color) = if caps.colors < 256 {
        (" Not good!", Color::Red)
    } else {
        (" Good!", Color::Green)
    };
    Text::from(vec![
        Line::from(hello),
        Line::default(),
        Line::from(vec![
            Span::raw("Your terminal supports "),
            Span::styled(
                caps.colors.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" colors."),
            Span::styled(verdict, Style::default().fg(color)),
        ]),
        Line::default(),
        Line::raw("Click and drag the window captions to move around."),
        Line::default(),
        Line::raw("You can resize this window and double click the caption."),
    ])
}
