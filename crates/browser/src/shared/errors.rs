use consent_core::ComplianceError;

pub fn to_session_error(e: impl std::fmt::Display, action: &str) -> ComplianceError {
    let s = e.to_string();
    if s.contains("timeout") || s.contains("Timeout") {
        ComplianceError::Timeout(format!("{} timed out: {}", action, s))
    } else if s.contains("not found") {
        ComplianceError::ElementNotFound(format!("{}: {}", action, s))
    } else if s.contains("SyntaxError") || s.contains("ReferenceError") || s.contains("TypeError") {
        ComplianceError::Script(format!("{}: {}", action, s))
    } else {
        ComplianceError::driver(action, s)
    }
}

/// Errors Chromium raises while a navigation swaps the execution context.
pub fn is_context_lost(e: &impl std::fmt::Display) -> bool {
    let s = e.to_string();
    s.contains("Cannot find context") || s.contains("Execution context was destroyed")
}
