use async_trait::async_trait;
use consent_core::{BrowserSession, ComplianceError, Result};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::vendor::VendorApi;
use crate::{CookieManager, DEFAULT_API_TIMEOUT, Selectors};

const API: VendorApi = VendorApi {
    vendor: "EU Cookie Compliance",
    ready: "typeof window.Drupal !== 'undefined' && typeof window.Drupal.eu_cookie_compliance !== 'undefined' \
            && typeof window.Drupal.eu_cookie_compliance.setStatus === 'function'",
};

// Status 2 means agreed and banner closed.
const ACCEPT_ALL: &str = r#"
(() => {
    const ecc = window.Drupal.eu_cookie_compliance;
    const settings = (window.drupalSettings || {}).eu_cookie_compliance || {};
    const categories = settings.cookie_categories || [];
    if (categories.length && typeof ecc.setAcceptedCategories === 'function') {
        ecc.setAcceptedCategories(categories);
        if (typeof ecc.loadCategoryScripts === 'function') {
            ecc.loadCategoryScripts(categories);
        }
    }
    ecc.setStatus(2);
})()
"#;

const CATEGORY_STATUS: &str = r#"
(() => {
    const ecc = window.Drupal.eu_cookie_compliance;
    const settings = (window.drupalSettings || {}).eu_cookie_compliance || {};
    const status = {};
    (settings.cookie_categories || []).forEach(category => {
        status[category] = !!ecc.hasAgreed(category);
    });
    return status;
})()
"#;

/// EU-style banner: consent can be given, never declined.
#[derive(Debug, Clone)]
pub struct EuCookieComplianceManager {
    selectors: Selectors,
    api_timeout: Duration,
}

impl EuCookieComplianceManager {
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
impl CookieManager for EuCookieComplianceManager {
    fn name(&self) -> &'static str {
        "eu_cookie_compliance"
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn reject_button_selector(&self) -> Result<&str> {
        Err(ComplianceError::CapabilityUnsupported {
            manager: self.name(),
            capability: "a reject button",
        })
    }

    async fn accept_cookies(&self, session: &dyn BrowserSession) -> Result<()> {
        API.run(session, self.api_timeout, ACCEPT_ALL).await
    }

    async fn reject_cookies(&self, _session: &dyn BrowserSession) -> Result<()> {
        Err(ComplianceError::CapabilityUnsupported {
            manager: self.name(),
            capability: "rejecting cookies",
        })
    }

    async fn categories_accepted_status(&self, session: &dyn BrowserSession) -> Result<BTreeMap<String, bool>> {
        API.status(session, self.api_timeout, CATEGORY_STATUS).await
    }
}
