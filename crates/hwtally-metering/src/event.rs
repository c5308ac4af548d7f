//! Metering event record and its enum-valued fields

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// String-valued enum as it appears on the wire
pub trait EventEnum: Sized + Copy + 'static {
    const ALL: &'static [Self];

    /// Wire value
    fn value(&self) -> &'static str;

    /// Exact match against the wire values. No trimming or case folding.
    fn from_value(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.value() == value)
    }
}

/// Service level agreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sla {
    #[serde(rename = "")]
    Empty,
    #[serde(rename = "Premium")]
    Premium,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Self-Support")]
    SelfSupport,
}

impl EventEnum for Sla {
    const ALL: &'static [Self] = &[Sla::Empty, Sla::Premium, Sla::Standard, Sla::SelfSupport];

    fn value(&self) -> &'static str {
        match self {
            Sla::Empty => "",
            Sla::Premium => "Premium",
            Sla::Standard => "Standard",
            Sla::SelfSupport => "Self-Support",
        }
    }
}

/// Intended usage of the instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Usage {
    #[serde(rename = "")]
    Empty,
    #[serde(rename = "Production")]
    Production,
    #[serde(rename = "Development/Test")]
    DevelopmentTest,
    #[serde(rename = "Disaster Recovery")]
    DisasterRecovery,
}

impl EventEnum for Usage {
    const ALL: &'static [Self] = &[
        Usage::Empty,
        Usage::Production,
        Usage::DevelopmentTest,
        Usage::DisasterRecovery,
    ];

    fn value(&self) -> &'static str {
        match self {
            Usage::Empty => "",
            Usage::Production => "Production",
            Usage::DevelopmentTest => "Development/Test",
            Usage::DisasterRecovery => "Disaster Recovery",
        }
    }
}

/// Role the instance plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "")]
    Empty,
    #[serde(rename = "Red Hat Enterprise Linux Server")]
    RhelServer,
    #[serde(rename = "Red Hat Enterprise Linux Workstation")]
    RhelWorkstation,
    #[serde(rename = "Red Hat Enterprise Linux Compute Node")]
    RhelComputeNode,
    #[serde(rename = "ocp")]
    Ocp,
    #[serde(rename = "osd")]
    Osd,
    #[serde(rename = "rhosak")]
    Rhosak,
    #[serde(rename = "addon")]
    Addon,
    #[serde(rename = "moa-hostedcontrolplane")]
    MoaHostedControlPlane,
}

impl EventEnum for Role {
    const ALL: &'static [Self] = &[
        Role::Empty,
        Role::RhelServer,
        Role::RhelWorkstation,
        Role::RhelComputeNode,
        Role::Ocp,
        Role::Osd,
        Role::Rhosak,
        Role::Addon,
        Role::MoaHostedControlPlane,
    ];

    fn value(&self) -> &'static str {
        match self {
            Role::Empty => "",
            Role::RhelServer => "Red Hat Enterprise Linux Server",
            Role::RhelWorkstation => "Red Hat Enterprise Linux Workstation",
            Role::RhelComputeNode => "Red Hat Enterprise Linux Compute Node",
            Role::Ocp => "ocp",
            Role::Osd => "osd",
            Role::Rhosak => "rhosak",
            Role::Addon => "addon",
            Role::MoaHostedControlPlane => "moa-hostedcontrolplane",
        }
    }
}

/// Who bills for the usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillingProvider {
    #[serde(rename = "")]
    Empty,
    #[serde(rename = "red hat")]
    RedHat,
    #[serde(rename = "aws")]
    Aws,
    #[serde(rename = "gcp")]
    Gcp,
    #[serde(rename = "azure")]
    Azure,
    #[serde(rename = "oracle")]
    Oracle,
}

impl EventEnum for BillingProvider {
    const ALL: &'static [Self] = &[
        BillingProvider::Empty,
        BillingProvider::RedHat,
        BillingProvider::Aws,
        BillingProvider::Gcp,
        BillingProvider::Azure,
        BillingProvider::Oracle,
    ];

    fn value(&self) -> &'static str {
        match self {
            BillingProvider::Empty => "",
            BillingProvider::RedHat => "red hat",
            BillingProvider::Aws => "aws",
            BillingProvider::Gcp => "gcp",
            BillingProvider::Azure => "azure",
            BillingProvider::Oracle => "oracle",
        }
    }
}

/// Identifier of a measured metric, e.g. `Cores` or `Instance-hours`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricId(String);

impl MetricId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MetricId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One measured value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub uom: String,
    pub metric_id: String,
    pub value: f64,
}

/// Usage event for one (organization, instance, metric)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_type: String,
    pub event_source: String,
    pub org_id: String,
    pub instance_id: String,
    pub service_type: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub expiration: Option<DateTime<Utc>>,
    pub display_name: Option<String>,
    pub sla: Option<Sla>,
    pub usage: Option<Usage>,
    pub role: Option<Role>,
    pub billing_provider: Option<BillingProvider>,
    pub billing_account_id: Option<String>,
    pub measurements: Vec<Measurement>,
    pub metering_batch_id: Option<Uuid>,
    pub product_ids: Vec<String>,
    /// Converted from a legacy (third-party) source
    pub conversion: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value_is_exact() {
        assert_eq!(Sla::from_value("Premium"), Some(Sla::Premium));
        assert_eq!(Sla::from_value("premium"), None);
        assert_eq!(Sla::from_value(" Premium"), None);
        assert_eq!(Sla::from_value(""), Some(Sla::Empty));
        assert_eq!(
            BillingProvider::from_value("red hat"),
            Some(BillingProvider::RedHat)
        );
    }

    #[test]
    fn test_serde_uses_wire_values() {
        for usage in Usage::ALL {
            let json = serde_json::to_string(usage).unwrap();
            assert_eq!(json, format!("\"{}\"", usage.value()));
        }
        for role in Role::ALL {
            let json = serde_json::to_string(role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.value()));
        }
    }
}
