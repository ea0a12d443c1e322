use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ComplianceError>;

/// What a compliance check found, one entry per finding category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Human-readable summary
    pub message: String,
    /// Rendered diagnostics table (domain, name, value / domain, url)
    pub table: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ViolationKind {
    /// First-party cookies present that are not ignored
    HostCookies,
    /// Cookies on the ignore list that are loaded, when escalation is enabled
    IgnoredCookies,
    /// Iframes pointing at monitored third-party domains
    ThirdPartyIframes,
    /// One of the analyses could not run; the message carries the cause
    AnalysisFailed,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            table: table.into(),
        }
    }
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| {
            if v.table.is_empty() {
                v.message.clone()
            } else {
                format!("{}\n{}", v.message, v.table)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("The '{manager}' cookie manager does not offer {capability}")]
    CapabilityUnsupported {
        manager: &'static str,
        capability: &'static str,
    },

    #[error("The '{manager}' cookie manager cannot {operation}")]
    UnsupportedOperation {
        manager: &'static str,
        operation: &'static str,
    },

    #[error("The {vendor} consent API was not loaded after {timeout_ms}ms")]
    VendorApiUnavailable { vendor: &'static str, timeout_ms: u64 },

    #[error("Cookie banner '{selector}' did not appear after {timeout_ms}ms")]
    BannerNotFound { selector: String, timeout_ms: u64 },

    #[error("Cookie banner '{selector}' is still visible after {timeout_ms}ms")]
    BannerNotDismissed { selector: String, timeout_ms: u64 },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("{0}")]
    Assertion(String),

    #[error("{}", render_violations(.0))]
    Violations(Vec<Violation>),

    #[error("{0}")]
    Timeout(String),

    #[error("{action} failed: {message}")]
    Driver { action: String, message: String },

    #[error("Script error: {0}")]
    Script(String),

    #[error("Parsing error: {0}")]
    Parsing(String),
}

impl ComplianceError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion(message.into())
    }

    pub fn driver(action: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Driver {
            action: action.into(),
            message: message.to_string(),
        }
    }

    /// Findings carried by an aggregate compliance failure.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Violations(v) => v,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for ComplianceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parsing(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violations_render_every_finding() {
        let err = ComplianceError::Violations(vec![
            Violation::new(ViolationKind::HostCookies, "2 cookies loaded", "| a | b |"),
            Violation::new(ViolationKind::ThirdPartyIframes, "1 third-party iframe", "| c |"),
        ]);
        let text = err.to_string();
        assert!(text.contains("2 cookies loaded"));
        assert!(text.contains("| a | b |"));
        assert!(text.contains("1 third-party iframe"));
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn capability_message_names_manager() {
        let err = ComplianceError::CapabilityUnsupported {
            manager: "eu_cookie_compliance",
            capability: "a reject button",
        };
        assert_eq!(
            err.to_string(),
            "The 'eu_cookie_compliance' cookie manager does not offer a reject button"
        );
    }
}
