//! Types shared by the cookie compliance crates: errors, options, timeouts
//! and the browser session the checks drive.

pub mod config;
pub mod error;
pub mod report;
pub mod session;
pub mod timeouts;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use config::{CookieComplianceConfig, CookieManagerConfig, ManagerKind, ReportConfig};
pub use error::{ComplianceError, Result, Violation, ViolationKind};
pub use report::FailureReport;
pub use session::{BrowserSession, CookieRecord, ElementState, WaitCondition};
pub use timeouts::TimeoutConfig;
