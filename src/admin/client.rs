//! Admin endpoint client and login.

use super::payload::OrganizationSpec;
use super::session::AdminSession;
use super::token::AdminToken;
use super::transport::TransportOptions;
use crate::error::{AuthError, ValidationError};
use log::{info, warn};
use url::Url;

pub(crate) const LOGIN_PATH: &str = "admin";
pub(crate) const SSO_CONFIG_PATH: &str = "admin/config/sso";
pub(crate) const LOGOUT_PATH: &str = "admin/logout";

/// Resolved admin URLs for one vault.
#[derive(Debug, Clone)]
pub(crate) struct AdminEndpoints {
    pub login: Url,
    pub sso_config: Url,
    pub logout: Url,
}

impl AdminEndpoints {
    fn resolve(base_url: &Url) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidUrl {
            field: "vaultBaseUrl".to_string(),
            value: base_url.to_string(),
        };
        if base_url.cannot_be_a_base() || !base_url.has_host() {
            return Err(invalid());
        }

        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let join = |path: &str| base.join(path).map_err(|_| invalid());

        Ok(Self {
            login: join(LOGIN_PATH)?,
            sso_config: join(SSO_CONFIG_PATH)?,
            logout: join(LOGOUT_PATH)?,
        })
    }
}

/// Entry point to the vault's admin surface.
///
/// The client itself is unauthenticated; [`AdminClient::login`] is the only
/// way to obtain an [`AdminSession`], and only a session can apply settings.
///
/// # Example Usage
///
/// ```rust,no_run
/// use vault_sso_config::admin::{AdminClient, AdminToken, TransportOptions};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AdminClient::new(
///     Url::parse("https://vault.internal")?,
///     TransportOptions::default().accept_invalid_certs(true),
/// )?;
/// let session = client.login(&AdminToken::new("admin-token")?).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: Url,
    endpoints: AdminEndpoints,
    options: TransportOptions,
    organization: Option<OrganizationSpec>,
}

impl AdminClient {
    pub fn new(base_url: Url, options: TransportOptions) -> Result<Self, ValidationError> {
        let endpoints = AdminEndpoints::resolve(&base_url)?;
        if options.accepts_invalid_certs() {
            warn!(
                "TLS certificate validation is disabled for {}",
                base_url.as_str()
            );
        }
        Ok(Self {
            base_url,
            endpoints,
            options,
            organization: None,
        })
    }

    /// Organization sent along with the SAML settings.
    pub fn with_organization(mut self, organization: OrganizationSpec) -> Self {
        self.organization = Some(organization);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    /// Submit the admin token and open a session.
    ///
    /// Each call uses a fresh cookie store, so a session carries only the
    /// auth state established by its own token. Any non-2xx status (after
    /// redirects) is returned as [`AuthError::Rejected`]. One attempt only.
    pub async fn login(&self, token: &AdminToken) -> Result<AdminSession, AuthError> {
        let http = self.options.build_client()?;

        let response = http
            .post(self.endpoints.login.clone())
            .form(&[("token", token.expose())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "Admin login to {} failed with status {}",
                self.endpoints.login,
                status.as_u16()
            );
            return Err(AuthError::Rejected {
                status_code: status.as_u16(),
            });
        }

        info!("Logged into admin panel at {}", self.base_url);
        Ok(AdminSession::new(
            http,
            self.endpoints.clone(),
            self.options.verifies_after_apply(),
            self.organization.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_resolve_under_base_path() {
        let endpoints =
            AdminEndpoints::resolve(&Url::parse("https://example.com/vault").unwrap()).unwrap();
        assert_eq!(endpoints.login.as_str(), "https://example.com/vault/admin");
        assert_eq!(
            endpoints.sso_config.as_str(),
            "https://example.com/vault/admin/config/sso"
        );
        assert_eq!(
            endpoints.logout.as_str(),
            "https://example.com/vault/admin/logout"
        );
    }

    #[test]
    fn test_non_base_url_rejected() {
        let result = AdminClient::new(
            Url::parse("mailto:admin@example.com").unwrap(),
            TransportOptions::default(),
        );
        assert!(matches!(result, Err(ValidationError::InvalidUrl { .. })));
    }
}
