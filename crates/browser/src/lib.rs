//! Chromium-backed browser session for the cookie compliance checks.

pub mod chromium;
pub mod shared;

pub use chromium::{ChromiumSession, LaunchOptions, WaitStrategy};
pub use shared::to_session_error;
