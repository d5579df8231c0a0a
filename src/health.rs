//! Startup verification check
//!
//! Placeholder for an end-to-end check against the payment providers. It
//! currently records that it ran and reports success.

/// Message logged on every verification run
pub const VERIFICATION_MESSAGE: &str = "verification passed";

/// Run the verification check
///
/// Always returns `true` and emits one `INFO` record.
pub fn verify() -> bool {
    tracing::info!(check = "payments", "{}", VERIFICATION_MESSAGE);
    true
}
