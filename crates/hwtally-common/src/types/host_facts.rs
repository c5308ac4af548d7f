//! Normalized host facts
//!
//! Produced upstream from raw inventory data. The engine only reads them.

use super::measurement::CloudProvider;
use serde::{Deserialize, Serialize};

/// Normalized view of one inventory host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostFacts {
    /// Reported core count
    pub cores: Option<u32>,
    /// Reported socket count
    pub sockets: Option<u32>,
    /// Host is a virtual guest
    pub is_virtual: bool,
    /// Guest's hypervisor could not be mapped. Only meaningful for guests.
    pub hypervisor_unknown: bool,
    /// Host runs guests of its own
    pub is_hypervisor: bool,
    /// Raw cloud-provider tag as reported upstream
    pub cloud_provider: Option<String>,
}

impl HostFacts {
    /// Physical, non-hypervisor host
    pub fn physical(cores: u32, sockets: u32) -> Self {
        Self {
            cores: Some(cores),
            sockets: Some(sockets),
            ..Default::default()
        }
    }

    pub fn hypervisor(cores: u32, sockets: u32) -> Self {
        Self {
            cores: Some(cores),
            sockets: Some(sockets),
            is_hypervisor: true,
            ..Default::default()
        }
    }

    pub fn guest(cores: u32, sockets: u32, hypervisor_unknown: bool) -> Self {
        Self {
            cores: Some(cores),
            sockets: Some(sockets),
            is_virtual: true,
            hypervisor_unknown,
            ..Default::default()
        }
    }

    pub fn cloud(provider: impl Into<String>, cores: u32, sockets: u32) -> Self {
        Self {
            cores: Some(cores),
            sockets: Some(sockets),
            is_virtual: true,
            cloud_provider: Some(provider.into()),
            ..Default::default()
        }
    }

    pub fn with_cloud_provider(mut self, provider: impl Into<String>) -> Self {
        self.cloud_provider = Some(provider.into());
        self
    }

    /// Cores, absent treated as 0
    pub fn cores_or_zero(&self) -> u64 {
        self.cores.map(u64::from).unwrap_or(0)
    }

    /// Sockets, absent treated as 0
    pub fn sockets_or_zero(&self) -> u64 {
        self.sockets.map(u64::from).unwrap_or(0)
    }

    /// Guest whose hypervisor cannot be identified
    pub fn is_guest_with_unknown_hypervisor(&self) -> bool {
        self.is_virtual && self.hypervisor_unknown
    }

    /// Supported cloud provider, if the tag names one
    pub fn cloud_provider_type(&self) -> Option<CloudProvider> {
        self.cloud_provider.as_deref().and_then(CloudProvider::from_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_counts_are_zero() {
        let facts = HostFacts::default();
        assert_eq!(facts.cores_or_zero(), 0);
        assert_eq!(facts.sockets_or_zero(), 0);
    }

    #[test]
    fn test_unknown_cloud_tag_is_ignored() {
        let facts = HostFacts::guest(3, 12, true).with_cloud_provider("UNKNOWN");
        assert_eq!(facts.cloud_provider_type(), None);

        let facts = HostFacts::cloud("aws", 4, 12);
        assert_eq!(facts.cloud_provider_type(), Some(CloudProvider::Aws));
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let facts: HostFacts =
            serde_json::from_str(r#"{"cores": 8, "isHypervisor": true}"#).unwrap();
        assert_eq!(facts.cores, Some(8));
        assert_eq!(facts.sockets, None);
        assert!(facts.is_hypervisor);
        assert!(!facts.is_virtual);
    }
}
