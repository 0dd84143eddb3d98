//! The merged enterprise configuration document.

use super::deployment::DeploymentMetadata;
use super::identity_provider::IdentityProviderConfig;
use super::monitoring::{MonitoringPolicy, MonitoringSubsystem};
use super::scim::ScimConfig;
use serde::{Deserialize, Serialize};

/// Complete snapshot persisted to disk.
///
/// Every section is required, so a value of this type is always complete.
/// Build one with [`merge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseConfigDocument {
    pub scim: ScimConfig,
    pub monitoring: MonitoringPolicy,
    pub deployment: DeploymentMetadata,
    pub identity_provider: IdentityProviderConfig,
}

/// Combine the assembled sections into one document.
///
/// Inputs are only borrowed; the document owns copies of them.
pub fn merge(
    scim: &ScimConfig,
    monitoring: &MonitoringPolicy,
    deployment: &DeploymentMetadata,
    identity_provider: &IdentityProviderConfig,
) -> EnterpriseConfigDocument {
    EnterpriseConfigDocument {
        scim: scim.clone(),
        monitoring: monitoring.clone(),
        deployment: deployment.clone(),
        identity_provider: identity_provider.clone(),
    }
}

/// Reporting view over a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationSummary {
    pub scim_endpoint: String,
    pub provisioning_features: Vec<&'static str>,
    pub enabled_monitoring: Vec<MonitoringSubsystem>,
    pub tenant_id: String,
    pub sso_url: String,
}

impl EnterpriseConfigDocument {
    pub fn summary(&self) -> ConfigurationSummary {
        ConfigurationSummary {
            scim_endpoint: self.scim.endpoint.to_string(),
            provisioning_features: self.scim.feature_labels(),
            enabled_monitoring: self.monitoring.enabled_features(),
            tenant_id: self.identity_provider.tenant_id().to_string(),
            sso_url: self.identity_provider.sso_url().to_string(),
        }
    }
}
