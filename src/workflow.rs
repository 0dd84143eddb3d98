//! End-to-end enterprise setup.
//!
//! [`EnterpriseSetup`] runs the stages in a fixed order and stops at the
//! first failure:
//!
//! 1. assemble the SCIM, monitoring and deployment sections
//! 2. log into the admin endpoint
//! 3. apply the SAML settings
//! 4. merge everything into one document
//! 5. persist the document
//!
//! Invalid inputs are rejected when the setup is constructed, so nothing is
//! sent over the network for a configuration that could never be written.
//! Each failed stage logs exactly one error line.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use vault_sso_config::settings::IntegrationSettings;
//! use vault_sso_config::workflow::EnterpriseSetup;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = IntegrationSettings::from_file("enterprise.toml")?;
//! let report = EnterpriseSetup::from_settings(&settings)?.run().await?;
//! println!("SCIM endpoint: {}", report.summary.scim_endpoint);
//! # Ok(())
//! # }
//! ```

use crate::admin::{AdminClient, AdminSession, AdminToken};
use crate::assembler::ConfigAssembler;
use crate::error::{ConfigError, IntegrationResult, PersistenceError, SettingsError};
use crate::model::{ConfigurationSummary, EnterpriseConfigDocument, IdentityProviderConfig, merge};
use crate::settings::{ENV_ADMIN_TOKEN, IntegrationSettings};
use crate::storage::DocumentStore;
use log::{error, info, warn};
use std::path::Path;

/// Outcome of a completed setup.
#[derive(Debug, Clone)]
pub struct SetupReport {
    pub document: EnterpriseConfigDocument,
    pub summary: ConfigurationSummary,
    pub saml_applied: bool,
}

/// Drives assembly, admin login, SAML application and persistence.
#[derive(Debug)]
pub struct EnterpriseSetup {
    assembler: ConfigAssembler,
    identity_provider: IdentityProviderConfig,
    client: AdminClient,
    admin_token: Option<AdminToken>,
    store: DocumentStore,
    session: Option<AdminSession>,
    skip_saml: bool,
}

impl EnterpriseSetup {
    pub fn new(
        assembler: ConfigAssembler,
        identity_provider: IdentityProviderConfig,
        client: AdminClient,
        store: DocumentStore,
    ) -> Self {
        Self {
            assembler,
            identity_provider,
            client,
            admin_token: None,
            store,
            session: None,
            skip_saml: false,
        }
    }

    /// Validate `settings` and build every component.
    pub fn from_settings(settings: &IntegrationSettings) -> IntegrationResult<Self> {
        let assembler = ConfigAssembler::new(settings.assembler.clone())
            .inspect_err(|e| error!("Assembly failed: {}", e))?;
        let identity_provider = settings
            .identity_provider()
            .inspect_err(|e| error!("Identity provider is invalid: {}", e))?;

        let mut client =
            AdminClient::new(settings.vault_base_url.clone(), settings.transport.clone())?;
        if let Some(organization) = &settings.organization {
            client = client.with_organization(organization.clone());
        }

        let mut setup = Self::new(
            assembler,
            identity_provider,
            client,
            DocumentStore::new(&settings.output_path),
        );
        setup.admin_token = settings.admin_token.clone();
        Ok(setup)
    }

    pub fn with_admin_token(mut self, token: AdminToken) -> Self {
        self.admin_token = Some(token);
        self
    }

    /// Assemble and persist only; no admin calls are made.
    pub fn skip_saml(mut self, skip: bool) -> Self {
        self.skip_saml = skip;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn output_path(&self) -> &Path {
        self.store.path()
    }

    /// Build the merged document from the assembled sections.
    pub fn assemble(&self) -> EnterpriseConfigDocument {
        let scim = self.assembler.build_scim_config();
        let monitoring = self.assembler.build_monitoring_policy();
        let deployment = self.assembler.build_deployment_metadata();
        merge(&scim, &monitoring, &deployment, &self.identity_provider)
    }

    /// Open an admin session with the configured token.
    pub async fn login(&mut self) -> IntegrationResult<()> {
        let token = self.admin_token.as_ref().ok_or_else(|| SettingsError::Missing {
            key: "vault.admin_token".to_string(),
            env_var: ENV_ADMIN_TOKEN.to_string(),
        })?;
        let session = self
            .client
            .login(token)
            .await
            .inspect_err(|e| error!("Login failed: {}", e))?;
        self.session = Some(session);
        Ok(())
    }

    /// Apply the SAML settings through the current session.
    ///
    /// Without a session this fails with [`ConfigError::NotAuthenticated`]
    /// and no request is sent.
    pub async fn apply_saml_config(&self) -> Result<bool, ConfigError> {
        let session = self.session.as_ref().ok_or(ConfigError::NotAuthenticated)?;
        session
            .apply_saml_config(&self.identity_provider)
            .await
            .inspect_err(|e| error!("SAML configuration failed: {}", e))
    }

    /// End the session, if any. Logout failures are logged, not returned.
    pub async fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.logout().await {
                warn!("Admin logout failed: {}", e);
            }
        }
    }

    /// Run every stage except persistence.
    ///
    /// Callers that want to keep the document when the write fails can call
    /// this followed by [`EnterpriseSetup::persist`].
    pub async fn configure(&mut self) -> IntegrationResult<SetupReport> {
        let document = self.assemble();

        let saml_applied = if self.skip_saml {
            info!("Skipping SAML configuration");
            false
        } else {
            self.login().await?;
            let applied = self.apply_saml_config().await;
            self.logout().await;
            applied?
        };

        let summary = document.summary();
        Ok(SetupReport {
            document,
            summary,
            saml_applied,
        })
    }

    /// Write `document` to the configured output path.
    pub fn persist(&self, document: &EnterpriseConfigDocument) -> Result<(), PersistenceError> {
        self.store
            .write(document)
            .inspect_err(|e| error!("Persisting configuration failed: {}", e))
    }

    /// Run all stages in order.
    pub async fn run(mut self) -> IntegrationResult<SetupReport> {
        let report = self.configure().await?;
        self.persist(&report.document)?;
        info!(
            "Enterprise setup complete (SAML applied: {})",
            report.saml_applied
        );
        Ok(report)
    }
}
