//! Hardware measurement categories
//!
//! Every host contribution is filed under exactly one category-specific
//! bucket and mirrored into [`HardwareMeasurementType::Total`].

use serde::{Deserialize, Serialize};

/// Supported public-cloud providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloudProvider {
    Aws,
    Google,
    Azure,
    Alibaba,
}

impl CloudProvider {
    pub const ALL: [CloudProvider; 4] = [
        CloudProvider::Aws,
        CloudProvider::Google,
        CloudProvider::Azure,
        CloudProvider::Alibaba,
    ];

    /// Match an upstream provider tag, ignoring case and surrounding whitespace.
    /// Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|provider| provider.tag().eq_ignore_ascii_case(tag))
    }

    pub fn tag(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Google => "google",
            CloudProvider::Azure => "azure",
            CloudProvider::Alibaba => "alibaba",
        }
    }

    /// The measurement category this provider's hosts are filed under
    pub fn measurement_type(&self) -> HardwareMeasurementType {
        match self {
            CloudProvider::Aws => HardwareMeasurementType::Aws,
            CloudProvider::Google => HardwareMeasurementType::Google,
            CloudProvider::Azure => HardwareMeasurementType::Azure,
            CloudProvider::Alibaba => HardwareMeasurementType::Alibaba,
        }
    }
}

impl std::fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Measurement category a contribution can be filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HardwareMeasurementType {
    Physical,
    /// Reporting-only; never written by a usage collector
    Virtual,
    Hypervisor,
    /// Aggregate of every other category
    Total,
    Aws,
    Google,
    Azure,
    Alibaba,
}

impl HardwareMeasurementType {
    pub const ALL: [HardwareMeasurementType; 8] = [
        HardwareMeasurementType::Physical,
        HardwareMeasurementType::Virtual,
        HardwareMeasurementType::Hypervisor,
        HardwareMeasurementType::Total,
        HardwareMeasurementType::Aws,
        HardwareMeasurementType::Google,
        HardwareMeasurementType::Azure,
        HardwareMeasurementType::Alibaba,
    ];

    /// The provider behind a cloud category, if this is one
    pub fn cloud_provider(&self) -> Option<CloudProvider> {
        match self {
            HardwareMeasurementType::Aws => Some(CloudProvider::Aws),
            HardwareMeasurementType::Google => Some(CloudProvider::Google),
            HardwareMeasurementType::Azure => Some(CloudProvider::Azure),
            HardwareMeasurementType::Alibaba => Some(CloudProvider::Alibaba),
            _ => None,
        }
    }

    pub fn is_cloud_provider(&self) -> bool {
        self.cloud_provider().is_some()
    }

    pub fn is_total(&self) -> bool {
        matches!(self, HardwareMeasurementType::Total)
    }
}

impl From<CloudProvider> for HardwareMeasurementType {
    fn from(provider: CloudProvider) -> Self {
        provider.measurement_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_tag_matching() {
        assert_eq!(CloudProvider::from_tag("aws"), Some(CloudProvider::Aws));
        assert_eq!(CloudProvider::from_tag(" AZURE "), Some(CloudProvider::Azure));
        assert_eq!(CloudProvider::from_tag("UNKNOWN"), None);
        assert_eq!(CloudProvider::from_tag(""), None);
    }

    #[test]
    fn test_cloud_categories_round_trip_to_providers() {
        for provider in CloudProvider::ALL {
            assert_eq!(provider.measurement_type().cloud_provider(), Some(provider));
        }

        let cloud_count = HardwareMeasurementType::ALL
            .iter()
            .filter(|m| m.is_cloud_provider())
            .count();
        assert_eq!(cloud_count, CloudProvider::ALL.len());
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_string(&HardwareMeasurementType::Hypervisor).unwrap();
        assert_eq!(json, "\"HYPERVISOR\"");
    }
}
