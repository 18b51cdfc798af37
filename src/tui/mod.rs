//! Full-screen terminal interface
//!
//! - `model` - reducer state of the resource browser, testable on its own
//! - `browser` - the iocraft component and the driver task running effects
//! - `components` - shared building blocks

pub mod browser;
pub mod components;
pub mod model;
pub mod theme;

pub use browser::{ResourceBrowser, ResourceBrowserProps, run_browser};
pub use model::{BrowserAction, BrowserModel, BrowserView, Effect, InputMode, key_to_action};
pub use theme::Theme;
