mod session;
mod wait;

pub use session::{ChromiumSession, LaunchOptions};
pub use wait::WaitStrategy;
