//! In-memory [`BrowserSession`] for tests.
//!
//! Waits resolve immediately against the current state, so a test describes
//! the page as it will look once the condition would have settled.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::error::{ComplianceError, Result};
use crate::session::{BrowserSession, CookieRecord, ElementState, WaitCondition};

/// PNG signature, enough for code that only stores screenshots.
pub const FAKE_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// State change triggered by a click or a script.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SetElement(String, ElementState),
    SetCookie(CookieRecord),
    RemoveCookie(String),
    /// Scripts containing the pattern now evaluate to the value
    SetEvaluation(String, Value),
}

#[derive(Debug, Default)]
struct MockState {
    url: String,
    html: String,
    cookies: Vec<CookieRecord>,
    cannot_list_cookies: bool,
    cannot_read_html: bool,
    elements: HashMap<String, ElementState>,
    truthy: Vec<String>,
    evaluations: Vec<(String, Value)>,
    script_effects: Vec<(String, Vec<Effect>)>,
    click_effects: HashMap<String, Vec<Effect>>,
    scripts: Vec<String>,
    clicks: Vec<String>,
    waits: Vec<WaitCondition>,
}

impl MockState {
    fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::SetElement(selector, state) => {
                    self.elements.insert(selector.clone(), *state);
                }
                Effect::SetCookie(cookie) => {
                    self.cookies.retain(|c| c.name != cookie.name);
                    self.cookies.push(cookie.clone());
                }
                Effect::RemoveCookie(name) => self.cookies.retain(|c| &c.name != name),
                Effect::SetEvaluation(pattern, value) => {
                    self.evaluations.retain(|(p, _)| p != pattern);
                    self.evaluations.push((pattern.clone(), value.clone()));
                }
            }
        }
    }

    fn run_script(&mut self, script: &str) {
        self.scripts.push(script.to_string());
        let triggered: Vec<Effect> = self
            .script_effects
            .iter()
            .filter(|(pattern, _)| script.contains(pattern.as_str()))
            .flat_map(|(_, effects)| effects.iter().cloned())
            .collect();
        self.apply(&triggered);
    }

    fn element(&self, selector: &str) -> ElementState {
        self.elements.get(selector).copied().unwrap_or(ElementState::MISSING)
    }
}

#[derive(Debug, Default)]
pub struct MockSession {
    state: Mutex<MockState>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_url(self, url: &str) -> Self {
        self.lock().url = url.to_string();
        self
    }

    pub fn with_html(self, html: &str) -> Self {
        self.set_html(html);
        self
    }

    pub fn with_cookie(self, name: &str, domain: &str, value: &str) -> Self {
        self.set_cookie(CookieRecord::new(name, domain, value));
        self
    }

    pub fn with_element(self, selector: &str, state: ElementState) -> Self {
        self.set_element(selector, state);
        self
    }

    /// Script conditions containing `pattern` hold.
    pub fn with_truthy(self, pattern: &str) -> Self {
        self.lock().truthy.push(pattern.to_string());
        self
    }

    /// Scripts containing `pattern` evaluate to `value`.
    pub fn with_evaluation(self, pattern: &str, value: Value) -> Self {
        self.lock().evaluations.push((pattern.to_string(), value));
        self
    }

    /// Running a script containing `pattern` applies `effects`.
    pub fn on_script(self, pattern: &str, effects: Vec<Effect>) -> Self {
        self.lock().script_effects.push((pattern.to_string(), effects));
        self
    }

    pub fn on_click(self, selector: &str, effects: Vec<Effect>) -> Self {
        self.lock().click_effects.insert(selector.to_string(), effects);
        self
    }

    /// Behave like a driver that can only read cookies by name.
    pub fn without_cookie_listing(self) -> Self {
        self.lock().cannot_list_cookies = true;
        self
    }

    /// Fail every attempt to read the page markup.
    pub fn without_page_source(self) -> Self {
        self.lock().cannot_read_html = true;
        self
    }

    pub fn set_html(&self, html: &str) {
        self.lock().html = html.to_string();
    }

    pub fn set_cookie(&self, cookie: CookieRecord) {
        self.lock().apply(&[Effect::SetCookie(cookie)]);
    }

    pub fn set_element(&self, selector: &str, state: ElementState) {
        self.lock().elements.insert(selector.to_string(), state);
    }

    pub fn scripts(&self) -> Vec<String> {
        self.lock().scripts.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.lock().clicks.clone()
    }

    pub fn waits(&self) -> Vec<WaitCondition> {
        self.lock().waits.clone()
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn visit(&self, url: &str) -> Result<()> {
        self.lock().url = url.to_string();
        Ok(())
    }

    async fn execute_script(&self, script: &str) -> Result<()> {
        self.lock().run_script(script);
        Ok(())
    }

    async fn evaluate_script(&self, script: &str) -> Result<Value> {
        let mut state = self.lock();
        state.run_script(script);
        Ok(state
            .evaluations
            .iter()
            .find(|(pattern, _)| script.contains(pattern.as_str()))
            .map(|(_, value)| value.clone())
            .unwrap_or(Value::Null))
    }

    async fn wait(&self, _timeout: Duration, condition: &WaitCondition) -> Result<bool> {
        let mut state = self.lock();
        state.waits.push(condition.clone());
        Ok(match condition {
            WaitCondition::Script(script) => state.truthy.iter().any(|p| script.contains(p.as_str())),
            WaitCondition::ElementVisible(selector) => state.element(selector).visible,
            WaitCondition::ElementGone(selector) => !state.element(selector).visible,
        })
    }

    async fn cookie(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .lock()
            .cookies
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.clone()))
    }

    async fn cookies(&self) -> Result<Vec<CookieRecord>> {
        let state = self.lock();
        if state.cannot_list_cookies {
            return Err(ComplianceError::driver(
                "Cookie listing",
                "this driver can only read cookies by name",
            ));
        }
        Ok(state.cookies.clone())
    }

    async fn element_state(&self, selector: &str) -> Result<ElementState> {
        Ok(self.lock().element(selector))
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let mut state = self.lock();
        if !state.element(selector).exists {
            return Err(ComplianceError::ElementNotFound(selector.to_string()));
        }
        state.clicks.push(selector.to_string());
        let effects = state.click_effects.get(selector).cloned().unwrap_or_default();
        state.apply(&effects);
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        let state = self.lock();
        if state.cannot_read_html {
            return Err(ComplianceError::driver("Content", "page target closed"));
        }
        Ok(state.html.clone())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Ok(FAKE_PNG.to_vec())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.lock().url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn click_applies_effects() {
        let session = MockSession::new()
            .with_element("#accept", ElementState::VISIBLE)
            .with_element("#banner", ElementState::VISIBLE)
            .on_click(
                "#accept",
                vec![
                    Effect::SetElement("#banner".into(), ElementState::HIDDEN),
                    Effect::SetCookie(CookieRecord::new("_ga", ".example.com", "GA1.1")),
                ],
            );

        session.click("#accept").await.unwrap();

        assert_eq!(session.element_state("#banner").await.unwrap(), ElementState::HIDDEN);
        assert_eq!(session.cookie("_ga").await.unwrap().as_deref(), Some("GA1.1"));
        assert_eq!(session.clicks(), vec!["#accept".to_string()]);
    }

    #[tokio::test]
    async fn scripts_can_change_later_evaluations() {
        let session = MockSession::new()
            .with_evaluation("consent.status", serde_json::json!({ "marketing": false }))
            .on_script(
                "consent.grant",
                vec![Effect::SetEvaluation(
                    "consent.status".into(),
                    serde_json::json!({ "marketing": true }),
                )],
            );

        session.execute_script("consent.grant()").await.unwrap();

        let status = session.evaluate_script("consent.status()").await.unwrap();
        assert_eq!(status, serde_json::json!({ "marketing": true }));
    }

    #[tokio::test]
    async fn clicking_a_missing_element_fails() {
        let session = MockSession::new();
        let err = session.click("#nope").await.unwrap_err();
        assert!(matches!(err, ComplianceError::ElementNotFound(_)));
    }
}
