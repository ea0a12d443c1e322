use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::Result;

/// A cookie read from the live browser session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CookieRecord {
    pub name: String,
    pub domain: String,
    pub value: String,
}

impl CookieRecord {
    pub fn new(name: impl Into<String>, domain: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ElementState {
    pub exists: bool,
    #[serde(default)]
    pub visible: bool,
}

impl ElementState {
    pub const MISSING: Self = Self { exists: false, visible: false };
    pub const HIDDEN: Self = Self { exists: true, visible: false };
    pub const VISIBLE: Self = Self { exists: true, visible: true };
}

/// Something a bounded wait polls for inside the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitCondition {
    /// A JavaScript expression that must become truthy
    Script(String),
    /// The selector matches an element that is rendered and not hidden
    ElementVisible(String),
    /// The selector matches nothing, or only a hidden element
    ElementGone(String),
}

const ELEMENT_VISIBLE: &str = r#"((selector) => {
    const el = document.querySelector(selector);
    if (!el) return false;
    const rect = el.getBoundingClientRect();
    const style = window.getComputedStyle(el);
    return rect.width > 0 && rect.height > 0 &&
        style.visibility !== 'hidden' && style.display !== 'none';
})"#;

impl WaitCondition {
    pub fn script(expression: impl Into<String>) -> Self {
        Self::Script(expression.into())
    }

    /// Render as a JavaScript expression evaluating to a boolean.
    pub fn to_js(&self) -> String {
        match self {
            Self::Script(expression) => format!("!!({})", expression),
            Self::ElementVisible(selector) => {
                format!("{}({})", ELEMENT_VISIBLE, Value::from(selector.as_str()))
            }
            Self::ElementGone(selector) => {
                format!("!{}({})", ELEMENT_VISIBLE, Value::from(selector.as_str()))
            }
        }
    }
}

/// The live browser the compliance checks drive.
///
/// Implementations wrap a real driver (see the `browser` crate) or an
/// in-memory double for tests. Calls happen one at a time from a single
/// step executor.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn visit(&self, url: &str) -> Result<()>;

    /// Run a script for its side effects.
    async fn execute_script(&self, script: &str) -> Result<()>;

    /// Run a script and return its JSON result (`null` when it has none).
    async fn evaluate_script(&self, script: &str) -> Result<Value>;

    /// Poll `condition` until it holds or `timeout` elapses. Returns whether it held.
    async fn wait(&self, timeout: Duration, condition: &WaitCondition) -> Result<bool>;

    async fn cookie(&self, name: &str) -> Result<Option<String>>;

    /// Every cookie in the jar. Drivers that cannot enumerate cookies
    /// return `UnsupportedOperation`.
    async fn cookies(&self) -> Result<Vec<CookieRecord>>;

    async fn element_state(&self, selector: &str) -> Result<ElementState>;

    async fn click(&self, selector: &str) -> Result<()>;

    /// Rendered markup of the current page.
    async fn html(&self) -> Result<String>;

    /// PNG bytes of the current viewport.
    async fn screenshot(&self) -> Result<Vec<u8>>;

    async fn current_url(&self) -> Result<String>;
}
