use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig, HeadlessMode};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::page::Page;
use consent_core::{
    BrowserSession, ComplianceError, CookieRecord, ElementState, Result, TimeoutConfig, WaitCondition,
};
use futures::StreamExt;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::wait::WaitStrategy;
use crate::shared::{js, to_session_error};

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub viewport_width: Option<u32>,
    pub viewport_height: Option<u32>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: Some(1920),
            viewport_height: Some(1080),
        }
    }
}

/// [`BrowserSession`] backed by a Chromium page.
pub struct ChromiumSession {
    browser: Mutex<Browser>,
    page: Page,
    wait_strategy: WaitStrategy,
    timeouts: TimeoutConfig,
}

impl ChromiumSession {
    pub async fn launch(options: LaunchOptions, timeouts: TimeoutConfig) -> Result<Self> {
        // A unique profile per instance avoids SingletonLock conflicts
        let temp_dir = std::env::temp_dir().join(format!("chromium-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&temp_dir)
            .map_err(|e| ComplianceError::driver("Create profile dir", e))?;

        let mut builder = BrowserConfig::builder()
            .headless_mode(if options.headless { HeadlessMode::True } else { HeadlessMode::False })
            .user_data_dir(temp_dir);

        if let (Some(w), Some(h)) = (options.viewport_width, options.viewport_height) {
            builder = builder.window_size(w, h);
        }

        let config = builder.build().map_err(|e| ComplianceError::driver("Browser config", e))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| to_session_error(e, "Launch"))?;

        tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| to_session_error(e, "New page"))?;

        info!(headless = options.headless, "chromium session started");
        Ok(Self {
            browser: Mutex::new(browser),
            page,
            wait_strategy: WaitStrategy::new(timeouts.clone()),
            timeouts,
        })
    }

    pub async fn close(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.map_err(|e| to_session_error(e, "Close"))?;
        Ok(())
    }

    async fn evaluate(&self, script: String, action: &str) -> Result<Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| to_session_error(e, action))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn visit(&self, url: &str) -> Result<()> {
        info!(url, "navigating");
        let timeout = self.timeouts.navigation;
        tokio::time::timeout(timeout, self.page.goto(url))
            .await
            .map_err(|_| {
                ComplianceError::Timeout(format!("Navigate to {} timed out after {}ms", url, timeout.as_millis()))
            })?
            .map_err(|e| to_session_error(e, "Navigate"))?;
        self.wait_strategy.wait_for_stable(&self.page, self.timeouts.page_stable).await
    }

    async fn execute_script(&self, script: &str) -> Result<()> {
        self.evaluate(script.to_string(), "ExecuteScript").await?;
        Ok(())
    }

    async fn evaluate_script(&self, script: &str) -> Result<Value> {
        self.evaluate(script.to_string(), "EvaluateScript").await
    }

    async fn wait(&self, timeout: Duration, condition: &WaitCondition) -> Result<bool> {
        self.wait_strategy
            .wait_for_condition(&self.page, &condition.to_js(), timeout)
            .await
    }

    async fn cookie(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .cookies()
            .await?
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.value))
    }

    async fn cookies(&self) -> Result<Vec<CookieRecord>> {
        let cookies = self
            .page
            .get_cookies()
            .await
            .map_err(|e| to_session_error(e, "GetCookies"))?;
        Ok(cookies
            .into_iter()
            .map(|c| CookieRecord::new(c.name, c.domain, c.value))
            .collect())
    }

    async fn element_state(&self, selector: &str) -> Result<ElementState> {
        let js = js::build_js_call(js::element::CHECK_ELEMENT_STATE, &[json!(selector)]);
        let value = self.evaluate(js, "ElementState").await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let scroll = js::build_js_call(js::element::SCROLL_INTO_VIEW, &[json!(selector), json!("center")]);
        self.evaluate(scroll, "Scroll").await?;

        let click = js::build_js_call(js::element::SAFE_CLICK, &[json!(selector)]);
        let result = self.evaluate(click, "Click").await?;
        if result.get("success").and_then(|v| v.as_bool()) != Some(true) {
            return Err(ComplianceError::ElementNotFound(selector.to_string()));
        }
        debug!(selector, "clicked");
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        self.page.content().await.map_err(|e| to_session_error(e, "Content"))
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        self.page
            .screenshot(params)
            .await
            .map_err(|e| to_session_error(e, "Screenshot"))
    }

    async fn current_url(&self) -> Result<String> {
        let url = self.page.url().await.map_err(|e| to_session_error(e, "Url"))?;
        Ok(url.unwrap_or_default())
    }
}
