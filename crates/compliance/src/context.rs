use consent_core::{
    BrowserSession, ComplianceError, CookieComplianceConfig, CookieRecord, Result, TimeoutConfig, Violation,
    ViolationKind, WaitCondition,
};
use consent_managers::{CookieManager, build_manager};
use consent_parser::{MonitoredDomains, scan_iframes};
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::audit::CookieAudit;
use crate::diagnostics::{cookie_table, iframe_table};
use crate::reporter::FailureReporter;

/// Step definitions verifying that a site honours cookie consent.
///
/// Every collaborator is handed in at construction: the live browser session,
/// the consent manager of the site under test and the options.
pub struct CookieComplianceContext {
    session: Arc<dyn BrowserSession>,
    manager: Box<dyn CookieManager>,
    config: CookieComplianceConfig,
    timeouts: TimeoutConfig,
    domains: MonitoredDomains,
    reporter: Option<FailureReporter>,
}

impl CookieComplianceContext {
    pub fn new(
        session: Arc<dyn BrowserSession>,
        manager: Box<dyn CookieManager>,
        config: CookieComplianceConfig,
        timeouts: TimeoutConfig,
    ) -> Self {
        let domains = MonitoredDomains::new(&config.third_party_domains_included, &config.third_party_domains_ignored);
        let reporter = FailureReporter::from_config(&config.report);
        Self {
            session,
            manager,
            config,
            timeouts,
            domains,
            reporter,
        }
    }

    /// Build the manager named by `cookie_manager.type`. Its API timeout falls
    /// back to `timeouts.vendor_api`.
    pub fn from_config(
        session: Arc<dyn BrowserSession>,
        config: CookieComplianceConfig,
        timeouts: TimeoutConfig,
    ) -> Self {
        let mut manager_config = config.cookie_manager.clone();
        manager_config
            .api_timeout_ms
            .get_or_insert(timeouts.vendor_api.as_millis() as u64);
        let manager = build_manager(&manager_config);
        Self::new(session, manager, config, timeouts)
    }

    /// `I accept cookies`
    pub async fn accept_cookies(&self) -> Result<()> {
        let selector = self.manager.accept_button_selector()?;
        self.click_banner_control("accept", selector).await
    }

    /// `I reject cookies`
    pub async fn reject_cookies(&self) -> Result<()> {
        let selector = self.manager.reject_button_selector()?;
        self.click_banner_control("reject", selector).await
    }

    async fn click_banner_control(&self, control: &str, selector: &str) -> Result<()> {
        let banner = self.manager.cookie_banner_selector()?;

        let state = self.session.element_state(selector).await?;
        if !state.exists {
            return Err(ComplianceError::ElementNotFound(format!(
                "cookie {} button '{}'",
                control, selector
            )));
        }
        if !state.visible {
            // Still animating in
            debug!(selector, "button not visible yet, pausing before click");
            sleep(self.timeouts.settle_delay).await;
        }

        self.session.click(selector).await?;
        info!(control, selector, "clicked cookie banner button");

        let timeout = self.timeouts.banner_dismiss;
        if !self.session.wait(timeout, &WaitCondition::ElementGone(banner.to_string())).await? {
            return Err(ComplianceError::BannerNotDismissed {
                selector: banner.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        Ok(())
    }

    /// `I wait cookie banner appears`
    pub async fn wait_cookie_banner_appears(&self) -> Result<()> {
        let banner = self.manager.cookie_banner_selector()?;
        let timeout = self.timeouts.cookie_banner;
        if !self.session.wait(timeout, &WaitCondition::ElementVisible(banner.to_string())).await? {
            return Err(ComplianceError::BannerNotFound {
                selector: banner.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        Ok(())
    }

    pub async fn is_banner_visible(&self) -> Result<bool> {
        let banner = self.manager.cookie_banner_selector()?;
        Ok(self.session.element_state(banner).await?.visible)
    }

    /// A cookie counts as loaded when it is set with a non-empty value.
    pub async fn has_cookie(&self, name: &str) -> Result<bool> {
        Ok(self.session.cookie(name).await?.is_some_and(|value| !value.is_empty()))
    }

    /// `the cookies of :type type have not been loaded`
    pub async fn cookies_should_be_empty(&self, category: &str) -> Result<()> {
        for name in self.config.cookies_for(category)? {
            if self.has_cookie(name).await? {
                return Err(ComplianceError::assertion(format!(
                    "The cookie '{}' of type '{}' has been loaded",
                    name, category
                )));
            }
        }
        Ok(())
    }

    /// `the cookies of :type type have been loaded`
    pub async fn cookies_have_been_saved(&self, category: &str) -> Result<()> {
        for name in self.config.cookies_for(category)? {
            if !self.has_cookie(name).await? {
                return Err(ComplianceError::assertion(format!(
                    "The cookie '{}' of type '{}' has not been loaded",
                    name, category
                )));
            }
        }
        Ok(())
    }

    /// `the cookie with name :name exists`
    pub async fn cookie_exists(&self, name: &str) -> Result<()> {
        if self.session.cookie(name).await?.is_none() {
            return Err(ComplianceError::assertion(format!("The cookie '{}' does not exist", name)));
        }
        Ok(())
    }

    /// `the cookie with name :name exists with value :value`
    pub async fn cookie_exists_with_value(&self, name: &str, expected: &str) -> Result<()> {
        match self.session.cookie(name).await? {
            None => Err(ComplianceError::assertion(format!("The cookie '{}' does not exist", name))),
            Some(actual) if actual != expected => Err(ComplianceError::assertion(format!(
                "The cookie '{}' has value '{}' but '{}' was expected",
                name, actual, expected
            ))),
            Some(_) => Ok(()),
        }
    }

    /// `there should not be any cookies loaded`
    ///
    /// Prints the ignored-cookie notice and every finding table, then fails
    /// with all findings at once.
    pub async fn there_should_not_be_any_cookie(&self) -> Result<()> {
        let audit = self.audit_cookies().await;

        if let Some(notice) = audit.notice() {
            println!("{}", notice);
            info!(count = audit.ignored.len(), "ignored cookies are loaded");
        }
        for violation in audit.violations.iter().filter(|v| !v.table.is_empty()) {
            println!("{}", violation.table);
        }

        audit.into_result()
    }

    /// Run the host-cookie and third-party iframe analyses. Both always run;
    /// one failing is recorded next to the findings of the other.
    pub async fn audit_cookies(&self) -> CookieAudit {
        let mut audit = CookieAudit::default();

        match self.session.cookies().await {
            Ok(cookies) => self.analyse_host_cookies(cookies, &mut audit),
            Err(e) => {
                warn!(error = %e, "cookie analysis failed");
                audit.record_failure("cookie", &e);
            }
        }

        match self.third_party_violation().await {
            Ok(Some(violation)) => audit.violations.push(violation),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "iframe analysis failed");
                audit.record_failure("third-party iframe", &e);
            }
        }

        audit
    }

    fn analyse_host_cookies(&self, cookies: Vec<CookieRecord>, audit: &mut CookieAudit) {
        let (ignored, loaded): (Vec<CookieRecord>, Vec<CookieRecord>) = cookies
            .into_iter()
            .partition(|cookie| self.config.is_ignored_cookie(&cookie.name));

        if !ignored.is_empty() && self.config.fail_on_ignored_cookies {
            audit.violations.push(Violation::new(
                ViolationKind::IgnoredCookies,
                format!("There are {} ignored cookies loaded", ignored.len()),
                cookie_table(&ignored),
            ));
        }
        audit.ignored = ignored;

        if !loaded.is_empty() {
            audit.violations.push(Violation::new(
                ViolationKind::HostCookies,
                format!("There are {} cookies loaded that should not be", loaded.len()),
                cookie_table(&loaded),
            ));
        }
    }

    async fn third_party_violation(&self) -> Result<Option<Violation>> {
        let html = self.session.html().await?;
        let references = scan_iframes(&html, &self.domains)?;
        if references.is_empty() {
            return Ok(None);
        }

        Ok(Some(Violation::new(
            ViolationKind::ThirdPartyIframes,
            format!(
                "There are {} iframes loading content from third-party domains",
                references.len()
            ),
            iframe_table(&references),
        )))
    }

    /// `I accept all cookies through the consent manager`
    pub async fn accept_cookies_through_manager(&self) -> Result<()> {
        self.manager.accept_cookies(self.session.as_ref()).await
    }

    /// `I reject all cookies through the consent manager`
    pub async fn reject_cookies_through_manager(&self) -> Result<()> {
        self.manager.reject_cookies(self.session.as_ref()).await
    }

    /// `the cookie category :category is accepted` / `is not accepted`
    pub async fn cookie_category_should_be_accepted(&self, category: &str, expected: bool) -> Result<()> {
        let status = self.manager.categories_accepted_status(self.session.as_ref()).await?;
        match status.get(category) {
            None => Err(ComplianceError::assertion(format!(
                "The {} consent manager does not know the cookie category '{}' (known: {})",
                self.manager.name(),
                category,
                status.keys().cloned().collect::<Vec<_>>().join(", ")
            ))),
            Some(&actual) if actual != expected => Err(ComplianceError::assertion(format!(
                "The cookie category '{}' is {} but should be {}",
                category,
                accepted_label(actual),
                accepted_label(expected)
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Write a failure report when reporting is configured.
    pub async fn report_failure(&self, step: &str, error: &ComplianceError) -> Option<Vec<String>> {
        let reporter = self.reporter.as_ref()?;
        match reporter.report(self.session.as_ref(), step, error).await {
            Ok(written) => Some(written),
            Err(e) => {
                warn!(error = %e, "failed to save failure report");
                None
            }
        }
    }
}

fn accepted_label(accepted: bool) -> &'static str {
    if accepted { "accepted" } else { "not accepted" }
}
