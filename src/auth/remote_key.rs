//! Authorization gate for dual-mode maintenance scripts.
//!
//! A maintenance script may be invoked from a trusted local shell, or over
//! HTTP by supplying the shared secret stored in the
//! `security.remote_cli_key` setting. Local invocation is always trusted;
//! remote invocation requires a non-empty stored key and an exact match.

use crate::auth::csrf::constant_time_eq;

/// How a maintenance script was invoked.
#[derive(Debug, Clone, Copy)]
pub enum InvocationContext<'a> {
    /// Run from a local shell. Inherently trusted.
    LocalCli,
    /// Run over HTTP with an optional `remoteCLIKey` query parameter.
    Remote { key: Option<&'a str> },
}

/// Message printed when a remote invocation is rejected.
pub const DENIED_MESSAGE: &str = "This script cannot be run from a browser, only via CLI.";

/// Decide whether an invocation is authorized against the stored key.
///
/// An empty stored key disables remote invocation entirely, so a request
/// carrying an empty key never matches.
pub fn authorize(ctx: &InvocationContext, stored_key: &str) -> bool {
    match ctx {
        InvocationContext::LocalCli => true,
        InvocationContext::Remote { key } => {
            if stored_key.is_empty() {
                return false;
            }
            match key {
                Some(provided) => constant_time_eq(stored_key, provided),
                None => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_cli_is_always_authorized() {
        assert!(authorize(&InvocationContext::LocalCli, ""));
        assert!(authorize(&InvocationContext::LocalCli, "secret"));
    }

    #[test]
    fn remote_rejected_when_stored_key_empty() {
        let ctx = InvocationContext::Remote { key: Some("") };
        assert!(!authorize(&ctx, ""));
        let ctx = InvocationContext::Remote { key: Some("anything") };
        assert!(!authorize(&ctx, ""));
    }

    #[test]
    fn remote_rejected_on_mismatch_or_missing_key() {
        assert!(!authorize(&InvocationContext::Remote { key: Some("wrong") }, "secret"));
        assert!(!authorize(&InvocationContext::Remote { key: None }, "secret"));
    }

    #[test]
    fn remote_accepted_on_exact_match() {
        assert!(authorize(&InvocationContext::Remote { key: Some("secret") }, "secret"));
    }
}
