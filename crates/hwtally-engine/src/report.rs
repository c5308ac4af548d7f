//! Report-facing categories

use hwtally_common::HardwareMeasurementType;
use serde::{Deserialize, Serialize};

/// Bucket a measurement category is reported under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportCategory {
    Physical,
    Virtual,
    Hypervisor,
    Cloud,
}

/// Map a measurement category to its report bucket. The aggregate total has none.
pub fn report_category(measurement: HardwareMeasurementType) -> Option<ReportCategory> {
    if measurement.is_cloud_provider() {
        return Some(ReportCategory::Cloud);
    }
    match measurement {
        HardwareMeasurementType::Virtual => Some(ReportCategory::Virtual),
        HardwareMeasurementType::Physical => Some(ReportCategory::Physical),
        HardwareMeasurementType::Hypervisor => Some(ReportCategory::Hypervisor),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwtally_common::CloudProvider;

    #[test]
    fn test_every_cloud_provider_is_cloud() {
        for provider in CloudProvider::ALL {
            assert_eq!(
                report_category(provider.measurement_type()),
                Some(ReportCategory::Cloud)
            );
        }
    }

    #[test]
    fn test_on_prem_categories() {
        assert_eq!(
            report_category(HardwareMeasurementType::Physical),
            Some(ReportCategory::Physical)
        );
        assert_eq!(
            report_category(HardwareMeasurementType::Virtual),
            Some(ReportCategory::Virtual)
        );
        assert_eq!(
            report_category(HardwareMeasurementType::Hypervisor),
            Some(ReportCategory::Hypervisor)
        );
        assert_eq!(report_category(HardwareMeasurementType::Total), None);
    }
}
