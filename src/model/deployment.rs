//! Descriptive deployment metadata carried in the configuration document.

use serde::{Deserialize, Serialize};

/// Summary of the enterprise capabilities the deployment provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseFeatureSummary {
    pub single_sign_on: String,
    pub user_provisioning: String,
    pub mobile_device_management: String,
    pub compliance_reporting: String,
    pub backup_strategy: String,
    pub disaster_recovery: String,
}

/// Prerequisites, ordered steps and follow-up tasks for a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentMetadata {
    pub prerequisites: Vec<String>,
    pub deployment_steps: Vec<String>,
    pub post_deployment: Vec<String>,
    pub enterprise_features: EnterpriseFeatureSummary,
}

impl DeploymentMetadata {
    /// Steps prefixed with their 1-based position.
    pub fn numbered_steps(&self) -> Vec<String> {
        self.deployment_steps
            .iter()
            .enumerate()
            .map(|(idx, step)| format!("{}. {}", idx + 1, step))
            .collect()
    }
}
