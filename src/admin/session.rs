//! Authenticated admin session.

use super::client::AdminEndpoints;
use super::payload::{OrganizationSpec, SsoSettings};
use crate::error::ConfigError;
use crate::model::IdentityProviderConfig;
use log::{debug, info, warn};
use tokio::sync::Mutex;

/// Authenticated context obtained from [`AdminClient::login`].
///
/// Holds the cookies set by the login. Calls through one session are
/// serialized: at most one authenticated request is in flight at a time.
///
/// [`AdminClient::login`]: super::AdminClient::login
#[derive(Debug)]
pub struct AdminSession {
    http: reqwest::Client,
    endpoints: AdminEndpoints,
    verify_after_apply: bool,
    organization: Option<OrganizationSpec>,
    in_flight: Mutex<()>,
}

impl AdminSession {
    pub(crate) fn new(
        http: reqwest::Client,
        endpoints: AdminEndpoints,
        verify_after_apply: bool,
        organization: Option<OrganizationSpec>,
    ) -> Self {
        Self {
            http,
            endpoints,
            verify_after_apply,
            organization,
            in_flight: Mutex::new(()),
        }
    }

    /// Register `idp` as the vault's SAML SSO source.
    ///
    /// Returns `Ok(true)` once the endpoint acknowledged the settings and,
    /// when verification is on, the read-back matches what was sent.
    pub async fn apply_saml_config(
        &self,
        idp: &IdentityProviderConfig,
    ) -> Result<bool, ConfigError> {
        let _guard = self.in_flight.lock().await;
        let settings = SsoSettings::enable(idp, self.organization.clone());

        info!(
            "Applying SAML settings for tenant {} (SSO URL {})",
            idp.tenant_id(),
            idp.sso_url()
        );
        let response = self
            .http
            .post(self.endpoints.sso_config.clone())
            .json(&settings)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Could not read rejection body: {}", e);
                    String::new()
                }
            };
            let reason = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_string()
            } else {
                body
            };
            warn!("SAML settings rejected ({}): {}", status.as_u16(), reason);
            return Err(ConfigError::Rejected {
                status_code: status.as_u16(),
                reason,
            });
        }

        if self.verify_after_apply {
            self.verify(&settings).await?;
        }

        info!("SAML settings acknowledged by {}", self.endpoints.sso_config);
        Ok(true)
    }

    /// Read the stored settings back and compare them with `expected`.
    async fn verify(&self, expected: &SsoSettings) -> Result<(), ConfigError> {
        let response = self
            .http
            .get(self.endpoints.sso_config.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::VerificationFailed {
                reason: format!("read-back returned status {}", status.as_u16()),
            });
        }

        let stored: SsoSettings =
            response
                .json()
                .await
                .map_err(|e| ConfigError::VerificationFailed {
                    reason: format!("unreadable read-back: {}", e),
                })?;

        let mismatches = stored.mismatches(expected);
        if !mismatches.is_empty() {
            return Err(ConfigError::VerificationFailed {
                reason: format!("stored values differ for {}", mismatches.join(", ")),
            });
        }
        debug!("SAML settings verified by read-back");
        Ok(())
    }

    /// End the session on the server side.
    pub async fn logout(self) -> Result<(), ConfigError> {
        let _guard = self.in_flight.lock().await;
        let response = self
            .http
            .get(self.endpoints.logout.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::Rejected {
                status_code: status.as_u16(),
                reason: "logout failed".to_string(),
            });
        }
        info!("Logged out of admin panel");
        Ok(())
    }
}
