//! Typed configuration records.
//!
//! Every record validates its invariants at construction time (and again on
//! deserialization), so an invalid mapping or identity provider cannot be
//! assembled into a document.

mod attribute_path;
mod deployment;
mod document;
mod identity_provider;
mod mapping;
mod monitoring;
mod scim;

pub use attribute_path::ScimAttributePath;
pub use deployment::{DeploymentMetadata, EnterpriseFeatureSummary};
pub use document::{ConfigurationSummary, EnterpriseConfigDocument, merge};
pub use identity_provider::{IdentityProviderConfig, IdentityProviderConfigBuilder};
pub use mapping::{AttributeMapping, GROUP_LEVEL_ATTRIBUTES, GroupMapping, MappingEntry};
pub use monitoring::{
    Alerting, ApplicationTelemetry, LogAnalytics, MonitoringPolicy, MonitoringSubsystem,
    RetentionDays,
};
pub use scim::{ProvisioningFeature, ScimAuthMethod, ScimConfig};
