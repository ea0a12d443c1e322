use async_trait::async_trait;
use consent_core::{BrowserSession, Result};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::vendor::VendorApi;
use crate::{CookieManager, DEFAULT_API_TIMEOUT, Selectors};

const API: VendorApi = VendorApi {
    vendor: "Cookiebot",
    ready: "typeof window.Cookiebot !== 'undefined' && typeof window.Cookiebot.submitCustomConsent === 'function'",
};

// Arguments are preferences, statistics, marketing. Necessary is always on.
const ACCEPT_ALL: &str = "window.Cookiebot.submitCustomConsent(true, true, true);";

const REJECT_ALL: &str = "window.Cookiebot.submitCustomConsent(false, false, false);";

const CONSENT_STATUS: &str = r#"
(() => {
    const consent = window.Cookiebot.consent || {};
    return {
        necessary: !!consent.necessary,
        preferences: !!consent.preferences,
        statistics: !!consent.statistics,
        marketing: !!consent.marketing
    };
})()
"#;

#[derive(Debug, Clone)]
pub struct CookiebotCookieManager {
    selectors: Selectors,
    api_timeout: Duration,
}

impl CookiebotCookieManager {
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
impl CookieManager for CookiebotCookieManager {
    fn name(&self) -> &'static str {
        "cookiebot"
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
        API.status(session, self.api_timeout, CONSENT_STATUS).await
    }
}
