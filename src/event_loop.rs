use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Single-threaded event pump.
///
/// The loop is the only place that reads from the input driver. Each turn
/// calls the handler once with `None` (time to draw) and then once per
/// pending event, draining bursts such as drags before drawing again.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F, E>(&mut self, mut handler: F) -> Result<(), E>
    where
        F: FnMut(&mut D, Option<Event>) -> Result<ControlFlow, E>,
        E: From<io::Error>,
    {
        loop {
            if handler(&mut self.driver, None)? == ControlFlow::Quit {
                return Ok(());
            }
            if !self.driver.poll(self.poll_interval)? {
                continue;
            }
            loop {
                let event = self.driver.read()?;
                if handler(&mut self.driver, Some(event))? == ControlFlow::Quit {
                    return Ok(());
                }
                if !self.driver.poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::ScriptedInputDriver;

    #[test]
    fn drains_events_between_ticks() {
        let driver = ScriptedInputDriver::new([Event::Resize(1, 1), Event::Resize(2, 2)]);
        let mut event_loop = EventLoop::new(driver, Duration::ZERO);
        let mut seen = Vec::new();
        let result: io::Result<()> = event_loop.run(|_, event| {
            seen.push(event.clone());
            if event.is_none() && seen.len() > 1 {
                return Ok(ControlFlow::Quit);
            }
            Ok(ControlFlow::Continue)
        });
        assert!(result.is_ok());
        assert_eq!(
            seen,
            vec![
                None,
                Some(Event::Resize(1, 1)),
                Some(Event::Resize(2, 2)),
                None
            ]
        );
    }

    #[test]
    fn quit_from_event_stops_immediately() {
        let driver = ScriptedInputDriver::new([Event::FocusLost, Event::FocusGained]);
        let mut event_loop = EventLoop::new(driver, Duration::ZERO);
        let result: io::Result<()> = event_loop.run(|_, event| {
            Ok(if event.is_some() {
                ControlFlow::Quit
            } else {
                ControlFlow::Continue
            })
        });
        assert!(result.is_ok());
        assert_eq!(event_loop.driver().remaining(), 1);
    }
}
