//! Monitoring policy for the integration.
//!
//! Three subsystems are configured independently: application telemetry
//! (metrics), alerting (rules) and log analytics (sources and retention).
//! Each carries its own `enabled` flag. A disabled subsystem keeps its
//! details in the document; reporting views filter on the flag.

use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifies one monitoring subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringSubsystem {
    ApplicationTelemetry,
    Alerting,
    LogAnalytics,
}

impl MonitoringSubsystem {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ApplicationTelemetry => "Application Telemetry",
            Self::Alerting => "Alerting",
            Self::LogAnalytics => "Log Analytics",
        }
    }
}

impl fmt::Display for MonitoringSubsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Positive number of days log data is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RetentionDays(u32);

impl RetentionDays {
    pub fn new(days: u32) -> ValidationResult<Self> {
        if days == 0 {
            Err(ValidationError::InvalidRetention { days })
        } else {
            Ok(Self(days))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for RetentionDays {
    type Error = ValidationError;

    fn try_from(days: u32) -> ValidationResult<Self> {
        Self::new(days)
    }
}

impl From<RetentionDays> for u32 {
    fn from(days: RetentionDays) -> Self {
        days.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationTelemetry {
    pub enabled: bool,
    pub metrics: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alerting {
    pub enabled: bool,
    /// Evaluated in order.
    pub alert_rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAnalytics {
    pub enabled: bool,
    pub workspace: String,
    pub retention_days: RetentionDays,
    pub log_sources: BTreeSet<String>,
}

/// Complete monitoring policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringPolicy {
    pub application_telemetry: ApplicationTelemetry,
    pub alerting: Alerting,
    pub log_analytics: LogAnalytics,
}

impl MonitoringPolicy {
    pub fn metrics(&self) -> &BTreeSet<String> {
        &self.application_telemetry.metrics
    }

    pub fn alert_rules(&self) -> &[String] {
        &self.alerting.alert_rules
    }

    pub fn log_retention_days(&self) -> u32 {
        self.log_analytics.retention_days.get()
    }

    pub fn log_sources(&self) -> &BTreeSet<String> {
        &self.log_analytics.log_sources
    }

    pub fn is_enabled(&self, subsystem: MonitoringSubsystem) -> bool {
        match subsystem {
            MonitoringSubsystem::ApplicationTelemetry => self.application_telemetry.enabled,
            MonitoringSubsystem::Alerting => self.alerting.enabled,
            MonitoringSubsystem::LogAnalytics => self.log_analytics.enabled,
        }
    }

    pub fn set_enabled(&mut self, subsystem: MonitoringSubsystem, enabled: bool) {
        match subsystem {
            MonitoringSubsystem::ApplicationTelemetry => self.application_telemetry.enabled = enabled,
            MonitoringSubsystem::Alerting => self.alerting.enabled = enabled,
            MonitoringSubsystem::LogAnalytics => self.log_analytics.enabled = enabled,
        }
    }

    /// Subsystems whose flag is set, in a fixed order.
    pub fn enabled_features(&self) -> Vec<MonitoringSubsystem> {
        [
            MonitoringSubsystem::ApplicationTelemetry,
            MonitoringSubsystem::Alerting,
            MonitoringSubsystem::LogAnalytics,
        ]
        .into_iter()
        .filter(|subsystem| self.is_enabled(*subsystem))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> MonitoringPolicy {
        MonitoringPolicy {
            application_telemetry: ApplicationTelemetry {
                enabled: true,
                metrics: ["user_login_success_rate".to_string()].into(),
            },
            alerting: Alerting {
                enabled: true,
                alert_rules: vec!["Mass password export attempts".to_string()],
            },
            log_analytics: LogAnalytics {
                enabled: true,
                workspace: "vault-logs".to_string(),
                retention_days: RetentionDays::new(90).unwrap(),
                log_sources: ["Container Runtime Logs".to_string()].into(),
            },
        }
    }

    #[test]
    fn test_retention_must_be_positive() {
        assert_eq!(
            RetentionDays::new(0),
            Err(ValidationError::InvalidRetention { days: 0 })
        );
        assert_eq!(RetentionDays::new(30).unwrap().get(), 30);

        let result: Result<RetentionDays, _> = serde_json::from_str("0");
        assert!(result.is_err());
    }

    #[test]
    fn test_disabled_subsystem_keeps_details() {
        let mut policy = policy();
        policy.set_enabled(MonitoringSubsystem::Alerting, false);

        assert_eq!(
            policy.enabled_features(),
            vec![
                MonitoringSubsystem::ApplicationTelemetry,
                MonitoringSubsystem::LogAnalytics
            ]
        );
        assert_eq!(policy.alert_rules().len(), 1);
    }

    #[test]
    fn test_flat_accessors() {
        let policy = policy();
        assert!(policy.metrics().contains("user_login_success_rate"));
        assert_eq!(policy.log_retention_days(), 90);
        assert!(policy.log_sources().contains("Container Runtime Logs"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(policy()).unwrap();
        assert_eq!(json["logAnalytics"]["retentionDays"], 90);
        assert_eq!(json["alerting"]["alertRules"][0], "Mass password export attempts");
        assert_eq!(json["applicationTelemetry"]["enabled"], true);
    }
}
