//! Unrecoverable faults.
//!
//! These mark a broken storage contract or a failed bootstrap step. They are
//! logged and then abort the current task; they never travel through
//! `ContactError`.

use std::fmt::Display;

/// The storage layer reported success but broke its contract.
#[track_caller]
pub fn invariant_violated(what: &str) -> ! {
    let location = std::panic::Location::caller();
    tracing::error!(%location, "internal invariant violated: {what}");
    panic!("internal invariant violated: {what}");
}

/// A storage operation with no recoverable-error contract failed.
#[track_caller]
pub fn fatal(context: &str, err: impl Display) -> ! {
    let location = std::panic::Location::caller();
    tracing::error!(%location, error = %err, "fatal: {context}");
    panic!("{context}: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "internal invariant violated: zero id")]
    fn invariant_violation_panics() {
        invariant_violated("zero id");
    }

    #[test]
    #[should_panic(expected = "listing contacts: connection reset")]
    fn fatal_panics_with_context() {
        fatal("listing contacts", "connection reset");
    }
}
