//! Identity provider record used for SAML registration.

use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use url::Url;

/// Immutable description of the external identity provider.
///
/// Built once from operator-supplied values through
/// [`IdentityProviderConfigBuilder`]; every field is validated at
/// construction, and deserialization runs the same checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawIdentityProviderConfig")]
pub struct IdentityProviderConfig {
    tenant_id: String,
    application_id: String,
    sso_url: Url,
    issuer: String,
    entity_id: String,
    assertion_consumer_service_url: Url,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_principal_id: Option<String>,
}

impl IdentityProviderConfig {
    pub fn builder() -> IdentityProviderConfigBuilder {
        IdentityProviderConfigBuilder::default()
    }

    /// Standard Azure AD SAML endpoints for a tenant, with the service
    /// provider side hosted under `vault_base_url`.
    pub fn azure_ad(
        tenant_id: &str,
        application_id: &str,
        vault_base_url: &Url,
    ) -> ValidationResult<Self> {
        let base = vault_base_url.as_str().trim_end_matches('/');
        Self::builder()
            .tenant_id(tenant_id)
            .application_id(application_id)
            .sso_url(format!(
                "https://login.microsoftonline.com/{}/saml2",
                tenant_id
            ))
            .issuer(format!("https://sts.windows.net/{}/", tenant_id))
            .entity_id(format!("{}/sso/saml2", base))
            .assertion_consumer_service_url(format!("{}/sso/saml2/Acs", base))
            .build()
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn sso_url(&self) -> &Url {
        &self.sso_url
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn assertion_consumer_service_url(&self) -> &Url {
        &self.assertion_consumer_service_url
    }

    pub fn service_principal_id(&self) -> Option<&str> {
        self.service_principal_id.as_deref()
    }

    /// Copy with a service principal id attached.
    pub fn with_service_principal_id(
        &self,
        service_principal_id: impl Into<String>,
    ) -> ValidationResult<Self> {
        let service_principal_id = non_empty("servicePrincipalId", service_principal_id.into())?;
        Ok(Self {
            service_principal_id: Some(service_principal_id),
            ..self.clone()
        })
    }
}

/// Builder for [`IdentityProviderConfig`].
#[derive(Debug, Default, Clone)]
pub struct IdentityProviderConfigBuilder {
    tenant_id: Option<String>,
    application_id: Option<String>,
    sso_url: Option<String>,
    issuer: Option<String>,
    entity_id: Option<String>,
    assertion_consumer_service_url: Option<String>,
    service_principal_id: Option<String>,
}

impl IdentityProviderConfigBuilder {
    pub fn tenant_id(mut self, value: impl Into<String>) -> Self {
        self.tenant_id = Some(value.into());
        self
    }

    pub fn application_id(mut self, value: impl Into<String>) -> Self {
        self.application_id = Some(value.into());
        self
    }

    pub fn sso_url(mut self, value: impl Into<String>) -> Self {
        self.sso_url = Some(value.into());
        self
    }

    pub fn issuer(mut self, value: impl Into<String>) -> Self {
        self.issuer = Some(value.into());
        self
    }

    pub fn entity_id(mut self, value: impl Into<String>) -> Self {
        self.entity_id = Some(value.into());
        self
    }

    pub fn assertion_consumer_service_url(mut self, value: impl Into<String>) -> Self {
        self.assertion_consumer_service_url = Some(value.into());
        self
    }

    pub fn service_principal_id(mut self, value: impl Into<String>) -> Self {
        self.service_principal_id = Some(value.into());
        self
    }

    pub fn build(self) -> ValidationResult<IdentityProviderConfig> {
        RawIdentityProviderConfig {
            tenant_id: self.tenant_id.unwrap_or_default(),
            application_id: self.application_id.unwrap_or_default(),
            sso_url: self.sso_url.unwrap_or_default(),
            issuer: self.issuer.unwrap_or_default(),
            entity_id: self.entity_id.unwrap_or_default(),
            assertion_consumer_service_url: self.assertion_consumer_service_url.unwrap_or_default(),
            service_principal_id: self.service_principal_id,
        }
        .try_into()
    }
}

/// Unvalidated wire shape.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIdentityProviderConfig {
    tenant_id: String,
    application_id: String,
    sso_url: String,
    issuer: String,
    entity_id: String,
    assertion_consumer_service_url: String,
    #[serde(default)]
    service_principal_id: Option<String>,
}

impl TryFrom<RawIdentityProviderConfig> for IdentityProviderConfig {
    type Error = ValidationError;

    fn try_from(raw: RawIdentityProviderConfig) -> ValidationResult<Self> {
        Ok(Self {
            tenant_id: non_empty("tenantId", raw.tenant_id)?,
            application_id: non_empty("applicationId", raw.application_id)?,
            sso_url: absolute_url("ssoUrl", raw.sso_url)?,
            issuer: non_empty("issuer", raw.issuer)?,
            entity_id: non_empty("entityId", raw.entity_id)?,
            assertion_consumer_service_url: absolute_url(
                "assertionConsumerServiceUrl",
                raw.assertion_consumer_service_url,
            )?,
            service_principal_id: raw
                .service_principal_id
                .map(|id| non_empty("servicePrincipalId", id))
                .transpose()?,
        })
    }
}

fn non_empty(field: &str, value: String) -> ValidationResult<String> {
    if value.trim().is_empty() {
        Err(ValidationError::empty(field))
    } else {
        Ok(value)
    }
}

fn absolute_url(field: &str, value: String) -> ValidationResult<Url> {
    let value = non_empty(field, value)?;
    match Url::parse(&value) {
        Ok(url) if !url.cannot_be_a_base() && url.has_host() => Ok(url),
        _ => Err(ValidationError::InvalidUrl {
            field: field.to_string(),
            value,
        }),
    }
}
