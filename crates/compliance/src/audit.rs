use consent_core::{ComplianceError, CookieRecord, Result, Violation, ViolationKind};

use crate::diagnostics::cookie_table;

/// Outcome of checking a page for cookies and embeds loaded without consent.
///
/// An analysis that could not run is recorded as an
/// [`ViolationKind::AnalysisFailed`] entry next to the findings of the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieAudit {
    /// Loaded cookies that are on the ignore list
    pub ignored: Vec<CookieRecord>,
    pub violations: Vec<Violation>,
}

impl CookieAudit {
    /// Informational notice listing ignored cookies that are loaded.
    pub fn notice(&self) -> Option<String> {
        if self.ignored.is_empty() {
            return None;
        }
        Some(format!(
            "The following cookies are in the ignore list but loaded:\n{}",
            cookie_table(&self.ignored)
        ))
    }

    pub fn record_failure(&mut self, analysis: &str, error: &ComplianceError) {
        self.violations.push(Violation::new(
            ViolationKind::AnalysisFailed,
            format!("The {} analysis could not run: {}", analysis, error),
            "",
        ));
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(ComplianceError::Violations(self.violations))
        }
    }
}
