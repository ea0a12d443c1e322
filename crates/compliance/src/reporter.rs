use consent_core::{BrowserSession, ComplianceError, FailureReport, ReportConfig};
use consent_storage::{FileReportStorage, ReportStorage};
use tracing::warn;

/// Captures the page state when a step fails.
pub struct FailureReporter {
    storage: Box<dyn ReportStorage>,
    capture_html: bool,
    capture_screenshot: bool,
}

impl FailureReporter {
    pub fn new(storage: Box<dyn ReportStorage>) -> Self {
        Self {
            storage,
            capture_html: false,
            capture_screenshot: false,
        }
    }

    /// Reporter writing under `report.path`, or `None` when no path is configured.
    pub fn from_config(config: &ReportConfig) -> Option<Self> {
        let path = config.path.as_ref()?;
        let mut storage = FileReportStorage::new(path);
        if let Some(url) = &config.url {
            storage = storage.with_public_url(url.clone());
        }
        Some(Self::new(Box::new(storage)).capture(config.html, config.screenshot))
    }

    pub fn capture(mut self, html: bool, screenshot: bool) -> Self {
        self.capture_html = html;
        self.capture_screenshot = screenshot;
        self
    }

    /// Save a report for `step`. Capture problems are logged and skipped so
    /// the original failure still surfaces.
    pub async fn report(
        &self,
        session: &dyn BrowserSession,
        step: &str,
        error: &ComplianceError,
    ) -> anyhow::Result<Vec<String>> {
        let mut report = FailureReport::new(report_name(step), format!("Step: {}\n\n{}", step, error));

        match session.current_url().await {
            Ok(url) => report.url = Some(url),
            Err(e) => warn!(error = %e, "could not read the page URL for the report"),
        }
        if self.capture_html {
            match session.html().await {
                Ok(html) => report.html = Some(html),
                Err(e) => warn!(error = %e, "could not capture page HTML"),
            }
        }
        if self.capture_screenshot {
            match session.screenshot().await {
                Ok(png) => report.screenshot = Some(png),
                Err(e) => warn!(error = %e, "could not capture screenshot"),
            }
        }

        self.storage.save_report(&report).await
    }
}

/// File stem: the step text as a slug plus a short unique suffix.
fn report_name(step: &str) -> String {
    let slug = step
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", slug, &id[..8])
}
