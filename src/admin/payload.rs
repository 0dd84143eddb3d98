//! Request and response bodies exchanged with the admin SSO settings endpoint.

use crate::model::IdentityProviderConfig;
use serde::{Deserialize, Serialize};

/// Organization that owns the SSO configuration on the vault side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSpec {
    pub name: String,
    pub billing_email: String,
    /// Vault plan identifier; SSO needs a business tier plan.
    pub plan_type: String,
}

/// SAML fields the vault stores for an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamlSettings {
    pub idp_tenant_id: String,
    pub idp_application_id: String,
    pub idp_sso_url: String,
    pub idp_issuer: String,
    pub sp_entity_id: String,
    pub sp_acs_url: String,
}

impl From<&IdentityProviderConfig> for SamlSettings {
    fn from(idp: &IdentityProviderConfig) -> Self {
        Self {
            idp_tenant_id: idp.tenant_id().to_string(),
            idp_application_id: idp.application_id().to_string(),
            idp_sso_url: idp.sso_url().to_string(),
            idp_issuer: idp.issuer().to_string(),
            sp_entity_id: idp.entity_id().to_string(),
            sp_acs_url: idp.assertion_consumer_service_url().to_string(),
        }
    }
}

/// Body of `POST /admin/config/sso`, also returned by `GET /admin/config/sso`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsoSettings {
    pub sso_enabled: bool,
    pub saml: SamlSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationSpec>,
}

impl SsoSettings {
    pub fn enable(idp: &IdentityProviderConfig, organization: Option<OrganizationSpec>) -> Self {
        Self {
            sso_enabled: true,
            saml: SamlSettings::from(idp),
            organization,
        }
    }

    /// Names of the fields that differ from `expected`.
    pub fn mismatches(&self, expected: &SsoSettings) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.sso_enabled != expected.sso_enabled {
            fields.push("ssoEnabled");
        }
        let (ours, theirs) = (&self.saml, &expected.saml);
        let pairs = [
            ("idpTenantId", &ours.idp_tenant_id, &theirs.idp_tenant_id),
            (
                "idpApplicationId",
                &ours.idp_application_id,
                &theirs.idp_application_id,
            ),
            ("idpSsoUrl", &ours.idp_sso_url, &theirs.idp_sso_url),
            ("idpIssuer", &ours.idp_issuer, &theirs.idp_issuer),
            ("spEntityId", &ours.sp_entity_id, &theirs.sp_entity_id),
            ("spAcsUrl", &ours.sp_acs_url, &theirs.sp_acs_url),
        ];
        for (name, a, b) in pairs {
            if a != b {
                fields.push(name);
            }
        }
        fields
    }
}
