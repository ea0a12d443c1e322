use consent_core::{BrowserSession, ComplianceError, Result, WaitCondition};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// A vendor's global consent object inside the page.
#[derive(Debug)]
pub(crate) struct VendorApi {
    pub vendor: &'static str,
    /// Expression that holds once the vendor script has loaded
    pub ready: &'static str,
}

impl VendorApi {
    pub async fn wait_until_loaded(&self, session: &dyn BrowserSession, timeout: Duration) -> Result<()> {
        debug!(vendor = self.vendor, timeout_ms = timeout.as_millis() as u64, "waiting for consent API");
        if session.wait(timeout, &WaitCondition::script(self.ready)).await? {
            Ok(())
        } else {
            Err(ComplianceError::VendorApiUnavailable {
                vendor: self.vendor,
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }

    pub async fn run(&self, session: &dyn BrowserSession, timeout: Duration, script: &str) -> Result<()> {
        self.wait_until_loaded(session, timeout).await?;
        session.execute_script(script).await?;
        debug!(vendor = self.vendor, "consent decision submitted");
        Ok(())
    }

    pub async fn status(
        &self,
        session: &dyn BrowserSession,
        timeout: Duration,
        script: &str,
    ) -> Result<BTreeMap<String, bool>> {
        self.wait_until_loaded(session, timeout).await?;
        let value = session.evaluate_script(script).await?;
        self.parse_status(value)
    }

    fn parse_status(&self, value: Value) -> Result<BTreeMap<String, bool>> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(ComplianceError::Script(format!(
                    "{} consent status is not an object: {}",
                    self.vendor, other
                )));
            }
        };

        map.into_iter()
            .map(|(category, accepted)| match accepted.as_bool() {
                Some(accepted) => Ok((category, accepted)),
                None => Err(ComplianceError::Script(format!(
                    "{} consent status for '{}' is not a boolean: {}",
                    self.vendor, category, accepted
                ))),
            })
            .collect()
    }
}
