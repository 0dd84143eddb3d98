//! SCIM provisioning configuration.

use super::mapping::{AttributeMapping, GroupMapping};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use url::Url;

/// SCIM authentication methods the provisioning connector can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScimAuthMethod {
    #[serde(rename = "Bearer Token")]
    BearerToken,
    #[serde(rename = "OAuth 2.0")]
    OAuth2,
}

/// Provisioning operations enabled on the SCIM connector.
///
/// Ordered by lifecycle so sets iterate users first, then groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProvisioningFeature {
    #[serde(rename = "Create Users")]
    CreateUsers,
    #[serde(rename = "Update Users")]
    UpdateUsers,
    #[serde(rename = "Deactivate Users")]
    DeactivateUsers,
    #[serde(rename = "Create Groups")]
    CreateGroups,
    #[serde(rename = "Update Groups")]
    UpdateGroups,
    #[serde(rename = "Remove Users from Groups")]
    RemoveUsersFromGroups,
}

impl ProvisioningFeature {
    pub const ALL: [ProvisioningFeature; 6] = [
        Self::CreateUsers,
        Self::UpdateUsers,
        Self::DeactivateUsers,
        Self::CreateGroups,
        Self::UpdateGroups,
        Self::RemoveUsersFromGroups,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::CreateUsers => "Create Users",
            Self::UpdateUsers => "Update Users",
            Self::DeactivateUsers => "Deactivate Users",
            Self::CreateGroups => "Create Groups",
            Self::UpdateGroups => "Update Groups",
            Self::RemoveUsersFromGroups => "Remove Users from Groups",
        }
    }
}

impl fmt::Display for ProvisioningFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the identity provider needs to provision into the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimConfig {
    pub endpoint: Url,
    pub auth_method: ScimAuthMethod,
    pub features: BTreeSet<ProvisioningFeature>,
    pub attribute_mappings: AttributeMapping,
    pub group_mappings: GroupMapping,
}

impl ScimConfig {
    pub fn supports(&self, feature: ProvisioningFeature) -> bool {
        self.features.contains(&feature)
    }

    /// Feature labels in lifecycle order.
    pub fn feature_labels(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.label()).collect()
    }
}
