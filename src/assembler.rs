//! Assembly of the SCIM, monitoring and deployment sections.
//!
//! [`ConfigAssembler`] is pure: no I/O, no clock, no randomness. All inputs
//! are validated when the assembler is constructed, so the `build_*` methods
//! cannot fail and always return equal values for equal inputs.
//!
//! # Example Usage
//!
//! ```rust
//! use vault_sso_config::assembler::{AssemblerOptions, ConfigAssembler};
//! use url::Url;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = AssemblerOptions::new(Url::parse("https://vault.example.com")?)
//!     .with_extra_attribute_mapping("department", "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:department");
//! let assembler = ConfigAssembler::new(options)?;
//!
//! let scim = assembler.build_scim_config();
//! assert_eq!(scim.endpoint.as_str(), "https://vault.example.com/scim/v2");
//! assert_eq!(assembler.build_scim_config(), scim);
//! # Ok(())
//! # }
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::model::{
    Alerting, ApplicationTelemetry, AttributeMapping, DeploymentMetadata,
    EnterpriseFeatureSummary, GroupMapping, LogAnalytics, MonitoringPolicy, ProvisioningFeature,
    RetentionDays, ScimAuthMethod, ScimConfig,
};
use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

/// Path of the vault's SCIM service relative to its base URL.
pub const SCIM_ENDPOINT_PATH: &str = "scim/v2";

/// Identity-provider field → SCIM path pairs every deployment maps.
pub const STANDARD_ATTRIBUTE_MAPPINGS: &[(&str, &str)] = &[
    ("user_principal_name", "userName"),
    ("display_name", "displayName"),
    ("given_name", "name.givenName"),
    ("surname", "name.familyName"),
    ("mail", r#"emails[type eq "work"].value"#),
    ("object_id", "externalId"),
];

pub const STANDARD_GROUP_MAPPINGS: &[(&str, &str)] =
    &[("display_name", "displayName"), ("members", "members")];

const TELEMETRY_METRICS: &[&str] = &[
    "user_login_success_rate",
    "saml_assertion_validation_time",
    "provisioning_sync_errors",
    "password_vault_access_patterns",
];

const ALERT_RULES: &[&str] = &[
    "Failed login attempts > 5 in 10 minutes",
    "Privileged account access outside business hours",
    "Mass password export attempts",
    "Suspicious IP address patterns",
];

const LOG_SOURCES: &[&str] = &[
    "Identity Provider Sign-ins",
    "Identity Provider Audit Logs",
    "Vault Application Logs",
    "Container Runtime Logs",
];

/// Which monitoring subsystems are switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringToggles {
    pub application_telemetry: bool,
    pub alerting: bool,
    pub log_analytics: bool,
}

impl Default for MonitoringToggles {
    fn default() -> Self {
        Self {
            application_telemetry: true,
            alerting: true,
            log_analytics: true,
        }
    }
}

/// Operator inputs for assembly.
#[derive(Debug, Clone)]
pub struct AssemblerOptions {
    pub vault_base_url: Url,
    pub extra_attribute_mappings: Vec<(String, String)>,
    pub monitoring: MonitoringToggles,
    pub log_workspace: String,
    pub log_retention_days: u32,
}

impl AssemblerOptions {
    pub fn new(vault_base_url: Url) -> Self {
        Self {
            vault_base_url,
            extra_attribute_mappings: Vec::new(),
            monitoring: MonitoringToggles::default(),
            log_workspace: "vault-logs".to_string(),
            log_retention_days: 90,
        }
    }

    pub fn with_extra_attribute_mapping(
        mut self,
        source_field: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.extra_attribute_mappings
            .push((source_field.into(), target.into()));
        self
    }

    pub fn with_monitoring(mut self, toggles: MonitoringToggles) -> Self {
        self.monitoring = toggles;
        self
    }

    pub fn with_log_retention(mut self, workspace: impl Into<String>, days: u32) -> Self {
        self.log_workspace = workspace.into();
        self.log_retention_days = days;
        self
    }
}

/// Builds the configuration sections from validated inputs.
#[derive(Debug, Clone)]
pub struct ConfigAssembler {
    scim_endpoint: Url,
    attribute_mappings: AttributeMapping,
    group_mappings: GroupMapping,
    monitoring: MonitoringToggles,
    log_workspace: String,
    log_retention: RetentionDays,
}

impl ConfigAssembler {
    /// Validate every input up front.
    ///
    /// Fails with a [`ValidationError`] if an extra mapping is malformed or
    /// duplicates a standard one, if the workspace name is empty, or if the
    /// retention period is zero.
    pub fn new(options: AssemblerOptions) -> ValidationResult<Self> {
        let scim_endpoint = scim_endpoint_for(&options.vault_base_url)?;

        let mut attribute_mappings = AttributeMapping::new();
        for (source, target) in STANDARD_ATTRIBUTE_MAPPINGS {
            attribute_mappings.insert(*source, *target)?;
        }
        for (source, target) in &options.extra_attribute_mappings {
            attribute_mappings.insert(source.as_str(), target.as_str())?;
        }

        let mut group_mappings = GroupMapping::new();
        for (source, target) in STANDARD_GROUP_MAPPINGS {
            group_mappings.insert(*source, *target)?;
        }

        if options.log_workspace.trim().is_empty() {
            return Err(ValidationError::empty("logAnalytics.workspace"));
        }
        let log_retention = RetentionDays::new(options.log_retention_days)?;

        debug!(
            "Assembler ready: {} attribute mappings, {} group mappings",
            attribute_mappings.len(),
            group_mappings.len()
        );

        Ok(Self {
            scim_endpoint,
            attribute_mappings,
            group_mappings,
            monitoring: options.monitoring,
            log_workspace: options.log_workspace,
            log_retention,
        })
    }

    pub fn build_scim_config(&self) -> ScimConfig {
        ScimConfig {
            endpoint: self.scim_endpoint.clone(),
            auth_method: ScimAuthMethod::BearerToken,
            features: ProvisioningFeature::ALL.into_iter().collect(),
            attribute_mappings: self.attribute_mappings.clone(),
            group_mappings: self.group_mappings.clone(),
        }
    }

    pub fn build_monitoring_policy(&self) -> MonitoringPolicy {
        MonitoringPolicy {
            application_telemetry: ApplicationTelemetry {
                enabled: self.monitoring.application_telemetry,
                metrics: to_set(TELEMETRY_METRICS),
            },
            alerting: Alerting {
                enabled: self.monitoring.alerting,
                alert_rules: ALERT_RULES.iter().map(|r| r.to_string()).collect(),
            },
            log_analytics: LogAnalytics {
                enabled: self.monitoring.log_analytics,
                workspace: self.log_workspace.clone(),
                retention_days: self.log_retention,
                log_sources: to_set(LOG_SOURCES),
            },
        }
    }

    pub fn build_deployment_metadata(&self) -> DeploymentMetadata {
        DeploymentMetadata {
            prerequisites: to_vec(&[
                "Cloud subscription with identity administrator rights",
                "Domain name for the TLS certificate",
                "SMTP server for email notifications",
                "Vault business or enterprise license",
            ]),
            deployment_steps: to_vec(&[
                "Deploy a virtual machine with a container runtime",
                "Configure DNS and TLS certificates",
                "Install the vault server",
                "Configure SAML integration with the identity provider",
                "Enable SCIM user provisioning",
                "Set up monitoring and alerting",
                "Configure backup and disaster recovery",
            ]),
            post_deployment: to_vec(&[
                "User acceptance testing with a pilot group",
                "Security review and penetration testing",
                "Performance optimization and scaling",
                "Training materials for end users",
                "Runbook for the operations team",
            ]),
            enterprise_features: EnterpriseFeatureSummary {
                single_sign_on: "SAML 2.0 with the external identity provider".to_string(),
                user_provisioning: "SCIM 2.0 automated sync".to_string(),
                mobile_device_management: "Device management integration".to_string(),
                compliance_reporting: "Audit trail for compliance reviews".to_string(),
                backup_strategy: "Automated daily backups".to_string(),
                disaster_recovery: "Multi-region deployment".to_string(),
            },
        }
    }
}

fn scim_endpoint_for(base: &Url) -> ValidationResult<Url> {
    let invalid = || ValidationError::InvalidUrl {
        field: "vaultBaseUrl".to_string(),
        value: base.to_string(),
    };
    if base.cannot_be_a_base() || !base.has_host() {
        return Err(invalid());
    }

    // Ensure the base ends with '/' so join appends instead of replacing.
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(SCIM_ENDPOINT_PATH).map_err(|_| invalid())
}

fn to_set(items: &[&str]) -> std::collections::BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn to_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
