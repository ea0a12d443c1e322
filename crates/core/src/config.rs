use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{ComplianceError, Result};

/// Which consent vendor drives the banner on the site under test.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ManagerKind {
    /// Selectors only, no in-page API
    #[default]
    #[serde(rename = "generic", alias = "manual")]
    Generic,
    #[serde(rename = "onetrust")]
    OneTrust,
    #[serde(rename = "cookiebot")]
    Cookiebot,
    #[serde(rename = "eu_cookie_compliance")]
    EuCookieCompliance,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct CookieManagerConfig {
    #[serde(rename = "type")]
    pub kind: ManagerKind,
    pub accept_button_selector: String,
    pub reject_button_selector: String,
    pub cookie_banner_selector: String,
    /// Overrides the default vendor API readiness timeout
    pub api_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Folder report files are written to; reporting is off without it
    pub path: Option<PathBuf>,
    /// Public URL the folder is served from, echoed for CI logs
    pub url: Option<String>,
    pub screenshot: bool,
    pub html: bool,
}

/// Options accepted by the cookie compliance context.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct CookieComplianceConfig {
    pub cookie_manager: CookieManagerConfig,
    /// Category name to the cookie names it sets
    pub cookies: BTreeMap<String, Vec<String>>,
    pub cookies_ignored: Vec<String>,
    pub third_party_domains_ignored: Vec<String>,
    pub third_party_domains_included: Vec<String>,
    /// Treat loaded cookies from the ignore list as violations
    pub fail_on_ignored_cookies: bool,
    pub report: ReportConfig,
}

impl CookieComplianceConfig {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| ComplianceError::configuration(format!("Invalid cookie compliance options: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ComplianceError::configuration(format!("Invalid cookie compliance options: {}", e)))
    }

    /// Cookie names registered for a category.
    pub fn cookies_for(&self, category: &str) -> Result<&[String]> {
        match self.cookies.get(category) {
            Some(names) if !names.is_empty() => Ok(names),
            _ => Err(ComplianceError::configuration(format!(
                "No cookies are registered for the '{}' category",
                category
            ))),
        }
    }

    pub fn is_ignored_cookie(&self, name: &str) -> bool {
        self.cookies_ignored.iter().any(|ignored| ignored == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_flat_option_map() {
        let config = CookieComplianceConfig::from_value(json!({
            "cookie_manager": {
                "type": "onetrust",
                "accept_button_selector": "#onetrust-accept-btn-handler",
                "reject_button_selector": "#onetrust-reject-all-handler",
                "cookie_banner_selector": "#onetrust-banner-sdk"
            },
            "cookies": {
                "analytics": ["_ga", "_gid"],
                "marketing": ["_fbp"]
            },
            "cookies_ignored": ["SSESS"],
            "third_party_domains_included": ["example-ads.com"]
        }))
        .unwrap();

        assert_eq!(config.cookie_manager.kind, ManagerKind::OneTrust);
        assert_eq!(config.cookies_for("analytics").unwrap(), ["_ga", "_gid"]);
        assert!(config.is_ignored_cookie("SSESS"));
        assert!(!config.fail_on_ignored_cookies);
        assert!(config.report.path.is_none());
    }

    #[test]
    fn manual_is_an_alias_for_generic() {
        let config = CookieComplianceConfig::from_json(r#"{"cookie_manager": {"type": "manual"}}"#).unwrap();
        assert_eq!(config.cookie_manager.kind, ManagerKind::Generic);
    }

    #[test]
    fn unknown_options_are_rejected() {
        let err = CookieComplianceConfig::from_value(json!({ "cookies_ignore": ["typo"] })).unwrap_err();
        assert!(matches!(err, ComplianceError::Configuration(_)));
    }

    #[test]
    fn unknown_category_is_a_configuration_error() {
        let config = CookieComplianceConfig::default();
        let err = config.cookies_for("analytics").unwrap_err();
        assert!(err.to_string().contains("'analytics'"));
    }
}
