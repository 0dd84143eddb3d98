//! Operator settings: TOML file plus environment overrides.
//!
//! Secrets, identifiers and paths are never compiled in. They come from a
//! settings file, and the environment variables below take precedence over
//! the file:
//!
//! | Variable                 | Setting                          |
//! |--------------------------|----------------------------------|
//! | `VAULT_BASE_URL`         | `vault.base_url`                 |
//! | `VAULT_ADMIN_TOKEN`      | `vault.admin_token`              |
//! | `IDP_TENANT_ID`          | `identity_provider.tenant_id`    |
//! | `IDP_APPLICATION_ID`     | `identity_provider.application_id` |
//! | `ENTERPRISE_CONFIG_PATH` | `output.path`                    |
//!
//! ```toml
//! [vault]
//! base_url = "https://vault.internal"
//! accept_invalid_certs = false
//! timeout_secs = 30
//!
//! [identity_provider]
//! tenant_id = "11111111-2222-3333-4444-555555555555"
//! application_id = "66666666-7777-8888-9999-000000000000"
//!
//! [monitoring]
//! alerting = false
//! retention_days = 30
//!
//! [[scim.extra_attribute_mappings]]
//! source = "department"
//! target = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:department"
//!
//! [output]
//! path = "enterprise-config.json"
//! ```

use crate::admin::{AdminToken, OrganizationSpec, TransportOptions};
use crate::assembler::{AssemblerOptions, MonitoringToggles};
use crate::error::{SettingsError, ValidationError, ValidationResult};
use crate::model::IdentityProviderConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const ENV_BASE_URL: &str = "VAULT_BASE_URL";
pub const ENV_ADMIN_TOKEN: &str = "VAULT_ADMIN_TOKEN";
pub const ENV_TENANT_ID: &str = "IDP_TENANT_ID";
pub const ENV_APPLICATION_ID: &str = "IDP_APPLICATION_ID";
pub const ENV_OUTPUT_PATH: &str = "ENTERPRISE_CONFIG_PATH";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    #[serde(default)]
    vault: RawVault,
    #[serde(default)]
    identity_provider: RawIdentityProvider,
    organization: Option<RawOrganization>,
    #[serde(default)]
    monitoring: RawMonitoring,
    #[serde(default)]
    scim: RawScim,
    #[serde(default)]
    output: RawOutput,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVault {
    base_url: Option<String>,
    admin_token: Option<String>,
    #[serde(default)]
    accept_invalid_certs: bool,
    timeout_secs: Option<u64>,
    verify_after_apply: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIdentityProvider {
    tenant_id: Option<String>,
    application_id: Option<String>,
    service_principal_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOrganization {
    name: String,
    billing_email: String,
    #[serde(default = "default_plan_type")]
    plan_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMonitoring {
    #[serde(default = "default_true")]
    application_telemetry: bool,
    #[serde(default = "default_true")]
    alerting: bool,
    #[serde(default = "default_true")]
    log_analytics: bool,
    #[serde(default = "default_workspace")]
    workspace: String,
    #[serde(default = "default_retention_days")]
    retention_days: u32,
}

impl Default for RawMonitoring {
    fn default() -> Self {
        Self {
            application_telemetry: true,
            alerting: true,
            log_analytics: true,
            workspace: default_workspace(),
            retention_days: default_retention_days(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScim {
    #[serde(default)]
    extra_attribute_mappings: Vec<RawMapping>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMapping {
    source: String,
    target: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_plan_type() -> String {
    "2".to_string()
}

fn default_workspace() -> String {
    "vault-logs".to_string()
}

fn default_retention_days() -> u32 {
    90
}

/// Fully resolved operator settings.
#[derive(Debug, Clone)]
pub struct IntegrationSettings {
    pub vault_base_url: Url,
    /// Only needed when SAML settings are applied.
    pub admin_token: Option<AdminToken>,
    pub transport: TransportOptions,
    pub tenant_id: String,
    pub application_id: String,
    pub service_principal_id: Option<String>,
    pub organization: Option<OrganizationSpec>,
    pub assembler: AssemblerOptions,
    pub output_path: PathBuf,
}

impl IntegrationSettings {
    /// Load from a TOML file, letting the process environment override it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, |key| std::env::var(key).ok())
    }

    /// Parse `contents`, consulting `env` for overrides.
    pub fn from_toml_str<F>(contents: &str, env: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw: RawSettings = toml::from_str(contents)?;
        Self::resolve(raw, env)
    }

    /// Build settings from the environment alone.
    pub fn from_env<F>(env: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::resolve(RawSettings::default(), env)
    }

    fn resolve<F>(raw: RawSettings, env: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |file_value: Option<String>, var: &str| {
            env(var)
                .filter(|v| !v.trim().is_empty())
                .or(file_value)
        };
        let required = |value: Option<String>, key: &str, var: &str| {
            value.ok_or_else(|| SettingsError::Missing {
                key: key.to_string(),
                env_var: var.to_string(),
            })
        };

        let base_url = required(
            pick(raw.vault.base_url, ENV_BASE_URL),
            "vault.base_url",
            ENV_BASE_URL,
        )?;
        let vault_base_url = Url::parse(&base_url).map_err(|_| ValidationError::InvalidUrl {
            field: "vault.base_url".to_string(),
            value: base_url.clone(),
        })?;

        let admin_token = pick(raw.vault.admin_token, ENV_ADMIN_TOKEN)
            .map(AdminToken::new)
            .transpose()?;

        let tenant_id = required(
            pick(raw.identity_provider.tenant_id, ENV_TENANT_ID),
            "identity_provider.tenant_id",
            ENV_TENANT_ID,
        )?;
        let application_id = required(
            pick(raw.identity_provider.application_id, ENV_APPLICATION_ID),
            "identity_provider.application_id",
            ENV_APPLICATION_ID,
        )?;

        let output_path = pick(
            raw.output.path.map(|p| p.to_string_lossy().into_owned()),
            ENV_OUTPUT_PATH,
        )
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("enterprise-config.json"));

        let mut transport = TransportOptions::new()
            .accept_invalid_certs(raw.vault.accept_invalid_certs)
            .verify_after_apply(raw.vault.verify_after_apply.unwrap_or(true));
        if let Some(secs) = raw.vault.timeout_secs {
            if secs == 0 {
                return Err(ValidationError::InvalidTimeout { secs }.into());
            }
            transport = transport.timeout(Duration::from_secs(secs));
        }

        let mut assembler = AssemblerOptions::new(vault_base_url.clone())
            .with_monitoring(MonitoringToggles {
                application_telemetry: raw.monitoring.application_telemetry,
                alerting: raw.monitoring.alerting,
                log_analytics: raw.monitoring.log_analytics,
            })
            .with_log_retention(raw.monitoring.workspace, raw.monitoring.retention_days);
        for mapping in raw.scim.extra_attribute_mappings {
            assembler = assembler.with_extra_attribute_mapping(mapping.source, mapping.target);
        }

        Ok(Self {
            vault_base_url,
            admin_token,
            transport,
            tenant_id,
            application_id,
            service_principal_id: raw.identity_provider.service_principal_id,
            organization: raw.organization.map(|org| OrganizationSpec {
                name: org.name,
                billing_email: org.billing_email,
                plan_type: org.plan_type,
            }),
            assembler,
            output_path,
        })
    }

    /// Identity provider record derived from these settings.
    pub fn identity_provider(&self) -> ValidationResult<IdentityProviderConfig> {
        let idp = IdentityProviderConfig::azure_ad(
            &self.tenant_id,
            &self.application_id,
            &self.vault_base_url,
        )?;
        match &self.service_principal_id {
            Some(id) => idp.with_service_principal_id(id.as_str()),
            None => Ok(idp),
        }
    }
}
