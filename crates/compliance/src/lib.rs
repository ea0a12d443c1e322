//! Verifies that a website honours cookie consent.
//!
//! [`CookieComplianceContext`] drives a live [`BrowserSession`] through the
//! consent banner and checks which cookies and third-party iframes the page
//! loads before and after the visitor decides.

mod audit;
mod context;
pub mod diagnostics;
mod reporter;

pub use consent_core::{
    BrowserSession, ComplianceError, CookieComplianceConfig, CookieManagerConfig, ManagerKind, ReportConfig, Result,
    TimeoutConfig, Violation, ViolationKind,
};
pub use consent_managers::{CookieManager, build_manager};
pub use consent_parser::MonitoredDomains;
pub use audit::CookieAudit;
pub use context::CookieComplianceContext;
pub use reporter::FailureReporter;
