//! Generic error handling utilities
//!
//! Errors that reach the process boundary are logged once, with a short
//! user-facing line and the full detail kept at debug level.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)` telling the user what to fix (a rejected token, an unknown
/// namespace, a malformed config file). System errors such as network
/// failures return `None` and are reported with generic context instead.
pub trait ContextualError: std::error::Error {
    /// Returns true if the user can fix this error by changing their input
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<String>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// # Examples
/// ```rust,no_run
/// # use glstats::core::error_handling::log_error_with_context;
/// # use glstats::scanner::api::ScannerError;
/// let err = ScannerError::Cancelled;
/// log_error_with_context(&err, "Repository scan");
/// // Logs: "FATAL: Repository scan"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => {
            log::error!("FATAL: {}: {}", operation_context, user_msg);
        }
        _ => {
            log::error!("FATAL: {}: {}", operation_context, error);
        }
    }
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
