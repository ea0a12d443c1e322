use async_trait::async_trait;
use consent_core::{BrowserSession, Result};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::vendor::VendorApi;
use crate::{CookieManager, DEFAULT_API_TIMEOUT, Selectors};

const API: VendorApi = VendorApi {
    vendor: "OneTrust",
    ready: "typeof window.OneTrust !== 'undefined' && typeof window.OneTrust.AllowAll === 'function'",
};

const ACCEPT_ALL: &str = "window.OneTrust.AllowAll();";

const REJECT_ALL: &str = "window.OneTrust.RejectAll();";

// Group ids (C0001, C0002, ...) mapped to whether they are in the active list.
const GROUP_STATUS: &str = r#"
(() => {
    const active = (window.OnetrustActiveGroups || '').split(',').filter(Boolean);
    const data = window.OneTrust.GetDomainData() || {};
    const status = {};
    (data.Groups || []).forEach(group => {
        status[group.OptanonGroupId] = active.includes(group.OptanonGroupId);
    });
    return status;
})()
"#;

#[derive(Debug, Clone)]
pub struct OneTrustCookieManager {
    selectors: Selectors,
    api_timeout: Duration,
}

impl OneTrustCookieManager {
    pub fn new(selectors: Selectors) -> Self {
        Self {
            selectors,
            api_timeout: DEFAULT_API_TIMEOUT,
        }
    }

    pub fn with_api_timeout(mut self, timeout: Duration) -> Self {
        self.api_timeout = timeout;
        self
    }
}

#[async_trait]
impl CookieManager for OneTrustCookieManager {
    fn name(&self) -> &'static str {
        "onetrust"
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    async fn accept_cookies(&self, session: &dyn BrowserSession) -> Result<()> {
        API.run(session, self.api_timeout, ACCEPT_ALL).await
    }

    async fn reject_cookies(&self, session: &dyn BrowserSession) -> Result<()> {
        API.run(session, self.api_timeout, REJECT_ALL).await
    }

    async fn categories_accepted_status(&self, session: &dyn BrowserSession) -> Result<BTreeMap<String, bool>> {
        API.status(session, self.api_timeout, GROUP_STATUS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_core::mock::MockSession;
    use consent_core::{ComplianceError, WaitCondition};
    use serde_json::json;

    fn manager() -> OneTrustCookieManager {
        OneTrustCookieManager::new(Selectors::new(
            "#onetrust-accept-btn-handler",
            "#onetrust-reject-all-handler",
            "#onetrust-banner-sdk",
        ))
    }

    #[tokio::test]
    async fn accept_waits_for_api_then_allows_all() {
        let session = MockSession::new().with_truthy("window.OneTrust");
        manager().accept_cookies(&session).await.unwrap();

        assert_eq!(session.waits(), vec![WaitCondition::script(API.ready)]);
        assert_eq!(session.scripts(), vec![ACCEPT_ALL.to_string()]);
    }

    #[tokio::test]
    async fn reject_rejects_all() {
        let session = MockSession::new().with_truthy("window.OneTrust");
        manager().reject_cookies(&session).await.unwrap();
        assert_eq!(session.scripts(), vec![REJECT_ALL.to_string()]);
    }

    #[tokio::test]
    async fn unavailable_api_reports_configured_timeout() {
        let session = MockSession::new();
        let err = manager()
            .with_api_timeout(Duration::from_millis(1500))
            .accept_cookies(&session)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "The OneTrust consent API was not loaded after 1500ms");
    }

    #[tokio::test]
    async fn status_maps_active_groups() {
        let session = MockSession::new()
            .with_truthy("window.OneTrust")
            .with_evaluation("OnetrustActiveGroups", json!({ "C0001": true, "C0004": false }));

        let status = manager().categories_accepted_status(&session).await.unwrap();
        assert_eq!(status.get("C0001"), Some(&true));
        assert_eq!(status.get("C0004"), Some(&false));
    }

    #[tokio::test]
    async fn status_fails_when_api_missing() {
        let session = MockSession::new();
        let err = manager().categories_accepted_status(&session).await.unwrap_err();
        assert!(matches!(err, ComplianceError::VendorApiUnavailable { vendor: "OneTrust", .. }));
    }
}
