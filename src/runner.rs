//! Drives a [`Desktop`] from a terminal: draws on every tick, classifies
//! mouse input and routes events through the application first.
use std::io;
use std::time::Duration;

use crossterm::event::{Event, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::desktop::Desktop;
use crate::drivers::InputDriver;
use crate::drivers::mouse::ClickClassifier;
use crate::event::{KeyEvent, MouseEvent};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::screen::{Screen, ScreenCaps};
use crate::window::FloatRect;

/// What the application did with a key before the desktop saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Hand the key on to the desktop.
    Pass,
    Handled,
    Quit,
}

pub trait DesktopApp {
    fn desktop(&mut self) -> &mut Desktop;

    /// Application shortcuts, offered every key press first.
    fn on_key(&mut self, _key: &KeyEvent) -> Flow {
        Flow::Pass
    }

    /// Mouse events no window or desktop client claimed.
    fn on_unhandled_mouse(&mut self, _event: &MouseEvent) {}

    /// Checked once per tick, before drawing.
    fn should_quit(&mut self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub poll_interval: Duration,
    pub caps: ScreenCaps,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(16),
            caps: ScreenCaps::default(),
        }
    }
}

pub fn run_desktop<B, D, A, E>(
    terminal: &mut Terminal<B>,
    driver: D,
    app: &mut A,
    options: RunOptions,
) -> Result<(), E>
where
    B: Backend,
    D: InputDriver,
    A: DesktopApp,
    E: From<io::Error> + From<B::Error>,
{
    let mut event_loop = EventLoop::new(driver, options.poll_interval);
    event_loop.driver().set_mouse_capture(options.caps.mouse)?;
    let mut classifier = ClickClassifier::new();
    tracing::debug!(caps = ?options.caps, "desktop runner started");

    event_loop.run(|_driver, event| -> Result<ControlFlow, E> {
        let Some(event) = event else {
            if app.should_quit() {
                return Ok(ControlFlow::Quit);
            }
            terminal.draw(|frame| {
                let area = FloatRect::from(frame.area());
                let desktop = app.desktop();
                if desktop.rect() != area {
                    desktop.set_rect(area);
                }
                let mut screen = Screen::new(frame, options.caps);
                desktop.draw(&mut screen);
            })?;
            return Ok(ControlFlow::Continue);
        };
        Ok(dispatch(app, &mut classifier, event, options.caps))
    })
}

fn dispatch<A: DesktopApp>(
    app: &mut A,
    classifier: &mut ClickClassifier,
    event: Event,
    caps: ScreenCaps,
) -> ControlFlow {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => match app.on_key(&key) {
            Flow::Quit => return ControlFlow::Quit,
            Flow::Handled => {}
            Flow::Pass => {
                app.desktop().handle_key(&key);
            }
        },
        Event::Mouse(raw) if caps.mouse => {
            for event in classifier.classify(raw) {
                let outcome = app.desktop().handle_mouse(&event);
                if !outcome.consumed {
                    app.on_unhandled_mouse(&event);
                }
            }
        }
        Event::Resize(width, height) => {
            tracing::debug!(width, height, "terminal resized");
            app.desktop().set_rect(FloatRect::new(0, 0, width, height));
        }
        _ => {}
    }
    ControlFlow::Continue
}
