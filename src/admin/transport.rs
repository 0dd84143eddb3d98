//! HTTP transport options for the admin endpoint.

use crate::error::AuthError;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the admin client talks to the vault.
///
/// Certificate validation is on by default. Self-hosted vaults often run with
/// a self-signed certificate; turning validation off requires an explicit
/// call to [`TransportOptions::accept_invalid_certs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    accept_invalid_certs: bool,
    timeout: Duration,
    verify_after_apply: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            accept_invalid_certs: false,
            timeout: DEFAULT_TIMEOUT,
            verify_after_apply: true,
        }
    }
}

impl TransportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip TLS certificate validation. Only for vaults with self-signed
    /// certificates on trusted networks.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Upper bound for each request, connect included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the SSO settings back after applying them and compare.
    pub fn verify_after_apply(mut self, verify: bool) -> Self {
        self.verify_after_apply = verify;
        self
    }

    pub fn accepts_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    pub fn request_timeout(&self) -> Duration {
        self.timeout
    }

    pub fn verifies_after_apply(&self) -> bool {
        self.verify_after_apply
    }

    /// Build a cookie-keeping HTTP client honoring these options.
    pub(crate) fn build_client(&self) -> Result<reqwest::Client, AuthError> {
        reqwest::Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| AuthError::Client {
                reason: e.to_string(),
            })
    }
}
