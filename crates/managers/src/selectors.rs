use consent_core::{ComplianceError, CookieManagerConfig, Result};

/// CSS selectors locating the consent banner and its controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selectors {
    accept: String,
    reject: String,
    banner: String,
}

impl Selectors {
    pub fn new(accept: impl Into<String>, reject: impl Into<String>, banner: impl Into<String>) -> Self {
        Self {
            accept: accept.into(),
            reject: reject.into(),
            banner: banner.into(),
        }
    }

    pub fn from_config(config: &CookieManagerConfig) -> Self {
        Self::new(
            config.accept_button_selector.trim(),
            config.reject_button_selector.trim(),
            config.cookie_banner_selector.trim(),
        )
    }

    pub fn accept(&self, manager: &str) -> Result<&str> {
        require(&self.accept, "accept_button_selector", manager)
    }

    pub fn reject(&self, manager: &str) -> Result<&str> {
        require(&self.reject, "reject_button_selector", manager)
    }

    pub fn banner(&self, manager: &str) -> Result<&str> {
        require(&self.banner, "cookie_banner_selector", manager)
    }
}

fn require<'a>(value: &'a str, option: &str, manager: &str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(ComplianceError::configuration(format!(
            "The '{}' option of the '{}' cookie manager is not set",
            option, manager
        )));
    }
    Ok(value)
}
