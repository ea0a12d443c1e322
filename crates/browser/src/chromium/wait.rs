use chromiumoxide::page::Page;
use consent_core::{Result, TimeoutConfig};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::shared::{is_context_lost, js, to_session_error};

const QUIET_POLLS_REQUIRED: u32 = 5;

/// Polls the page until JavaScript conditions hold.
pub struct WaitStrategy {
    config: TimeoutConfig,
}

impl WaitStrategy {
    pub fn new(config: TimeoutConfig) -> Self {
        Self { config }
    }

    /// Poll a boolean JavaScript expression until it is true or `timeout` elapses.
    pub async fn wait_for_condition(&self, page: &Page, condition: &str, timeout: Duration) -> Result<bool> {
        let start = Instant::now();

        loop {
            match page.evaluate(condition.to_string()).await {
                Ok(result) => {
                    if result.value().and_then(|v| v.as_bool()) == Some(true) {
                        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "wait condition met");
                        return Ok(true);
                    }
                }
                Err(e) if is_context_lost(&e) => {
                    debug!("page context replaced while waiting");
                }
                Err(e) => return Err(to_session_error(e, "Wait")),
            }

            if start.elapsed() >= timeout {
                debug!(timeout_ms = timeout.as_millis() as u64, "wait condition not met");
                return Ok(false);
            }

            sleep(self.config.check_interval).await;
        }
    }

    /// Wait until the document is complete and no resources are pending for
    /// several consecutive polls. Returns normally on timeout.
    pub async fn wait_for_stable(&self, page: &Page, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        let mut quiet_polls = 0;

        // Let the navigation get going first
        sleep(Duration::from_millis(500)).await;

        loop {
            let js = js::build_js_call(js::wait::PAGE_ACTIVITY, &[]);
            match page.evaluate(js).await {
                Ok(result) => {
                    let activity = result.value();
                    let complete = activity
                        .and_then(|v| v.get("readyState"))
                        .and_then(|v| v.as_str())
                        == Some("complete");
                    let pending = activity
                        .and_then(|v| v.get("pendingResources"))
                        .and_then(|v| v.as_u64())
                        .unwrap_or(0);

                    if complete && pending == 0 {
                        quiet_polls += 1;
                        if quiet_polls >= QUIET_POLLS_REQUIRED {
                            debug!(elapsed_ms = start.elapsed().as_millis() as u64, "page settled");
                            sleep(self.config.settle_delay).await;
                            return Ok(());
                        }
                    } else {
                        quiet_polls = 0;
                    }
                }
                Err(e) if is_context_lost(&e) => {
                    debug!("page context replaced by navigation");
                    quiet_polls = 0;
                }
                Err(e) => return Err(to_session_error(e, "WaitForStable")),
            }

            if start.elapsed() > timeout {
                warn!(timeout_ms = timeout.as_millis() as u64, "page did not settle, continuing");
                return Ok(());
            }

            sleep(self.config.check_interval).await;
        }
    }
}
