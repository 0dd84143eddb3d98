//! SAML SSO and SCIM provisioning setup for a self-hosted password vault.
//!
//! Assembles the SCIM, monitoring and deployment configuration for an
//! enterprise identity provider, registers the provider's SAML settings
//! through the vault's admin endpoint, and persists the merged result as one
//! JSON document.
//!
//! # Core Components
//!
//! - [`ConfigAssembler`] - Pure construction of the configuration sections
//! - [`AdminClient`] / [`AdminSession`] - Admin login and SAML application
//! - [`DocumentStore`] - Atomic persistence of the merged document
//! - [`EnterpriseSetup`] - Runs every stage in order
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use vault_sso_config::{EnterpriseSetup, IntegrationSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = IntegrationSettings::from_file("enterprise.toml")?;
//! let report = EnterpriseSetup::from_settings(&settings)?.run().await?;
//! assert_eq!(report.summary.provisioning_features.len(), 6);
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod assembler;
pub mod error;
pub mod model;
pub mod settings;
pub mod storage;
pub mod workflow;

// Re-export commonly used types for convenience
pub use admin::{AdminClient, AdminSession, AdminToken, TransportOptions};
pub use assembler::{AssemblerOptions, ConfigAssembler, MonitoringToggles};
pub use error::{
    AuthError, ConfigError, IntegrationError, IntegrationResult, PersistenceError, SettingsError,
    ValidationError, ValidationResult,
};
pub use model::{
    AttributeMapping, DeploymentMetadata, EnterpriseConfigDocument, GroupMapping,
    IdentityProviderConfig, MonitoringPolicy, ScimAttributePath, ScimConfig, merge,
};
pub use settings::IntegrationSettings;
pub use storage::DocumentStore;
pub use workflow::{EnterpriseSetup, SetupReport};
