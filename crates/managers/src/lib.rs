//! Cookie consent managers.
//!
//! Every consent vendor exposes the same three banner selectors, but only
//! some of them ship an in-page API that can grant or withdraw consent
//! without clicking. [`CookieManager`] covers both: selector lookups work for
//! every variant, programmatic actions only where the vendor supports them.

mod cookiebot;
mod eu_cookie_compliance;
mod generic;
mod onetrust;
mod selectors;
mod vendor;

use async_trait::async_trait;
use consent_core::{BrowserSession, CookieManagerConfig, ManagerKind, Result};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::time::Duration;

pub use cookiebot::CookiebotCookieManager;
pub use eu_cookie_compliance::EuCookieComplianceManager;
pub use generic::GenericCookieManager;
pub use onetrust::OneTrustCookieManager;
pub use selectors::Selectors;

/// How long to wait for a vendor API unless configured otherwise.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_millis(10000);

#[async_trait]
pub trait CookieManager: Send + Sync + Debug {
    /// Vendor key, as used in configuration.
    fn name(&self) -> &'static str;

    fn selectors(&self) -> &Selectors;

    fn accept_button_selector(&self) -> Result<&str> {
        self.selectors().accept(self.name())
    }

    fn reject_button_selector(&self) -> Result<&str> {
        self.selectors().reject(self.name())
    }

    fn cookie_banner_selector(&self) -> Result<&str> {
        self.selectors().banner(self.name())
    }

    /// Grant every consent category through the vendor API.
    async fn accept_cookies(&self, session: &dyn BrowserSession) -> Result<()>;

    /// Withdraw every optional consent category through the vendor API.
    async fn reject_cookies(&self, session: &dyn BrowserSession) -> Result<()>;

    /// Live consent state per category, read from the vendor API.
    async fn categories_accepted_status(&self, session: &dyn BrowserSession) -> Result<BTreeMap<String, bool>>;
}

/// Build the manager selected by the `type` option.
pub fn build_manager(config: &CookieManagerConfig) -> Box<dyn CookieManager> {
    let selectors = Selectors::from_config(config);
    let api_timeout = config
        .api_timeout_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_API_TIMEOUT);

    match config.kind {
        ManagerKind::Generic => Box::new(GenericCookieManager::new(selectors)),
        ManagerKind::OneTrust => Box::new(OneTrustCookieManager::new(selectors).with_api_timeout(api_timeout)),
        ManagerKind::Cookiebot => Box::new(CookiebotCookieManager::new(selectors).with_api_timeout(api_timeout)),
        ManagerKind::EuCookieCompliance => {
            Box::new(EuCookieComplianceManager::new(selectors).with_api_timeout(api_timeout))
        }
    }
}
