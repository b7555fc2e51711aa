//! Stacking window manager for terminal user interfaces.
//!
//! A [`Desktop`] owns a z-ordered stack of [`Window`]s and routes drawing,
//! keyboard and mouse input to them. Look and interaction policy come from
//! a pluggable [`WindowManager`]; [`DefaultWindowManager`] provides caption
//! chrome, caption dragging, edge resizing and double-click maximize.
pub mod components;
pub mod constants;
pub mod desktop;
pub mod drivers;
pub mod error;
pub mod event;
pub mod event_loop;
pub mod runner;
pub mod screen;
pub mod theme;
pub mod tracing_sub;
pub mod window;

pub use desktop::{Desktop, FocusTarget, WindowId};
pub use error::{Error, Result};
pub use screen::{Screen, ScreenCaps};
pub use theme::WindowTheme;
pub use window::{
    DefaultWindowManager, FloatRect, TaskbarManager, Window, WindowHandle, WindowManager,
    WindowState,
};
