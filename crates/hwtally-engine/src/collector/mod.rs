//! Product usage collectors
//!
//! A collector applies one product line's classification rules to a host
//! and folds the result into that product's [`UsageCalculation`]:
//! - RhelUsageCollector: RHEL family rules
//! - CollectorRegistry: selects the collector for a product id

pub mod rhel;

pub use rhel::RhelUsageCollector;

use crate::calculation::UsageCalculation;
use hwtally_common::{HostFacts, HwTallyError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Classification rules for one product line
pub trait ProductUsageCollector: Send + Sync {
    /// Classify `facts` and add its contribution to `calc`.
    ///
    /// On error nothing has been written to `calc`.
    fn collect(&self, calc: &mut UsageCalculation, facts: &HostFacts) -> Result<()>;
}

/// Product ids handled by the RHEL rules out of the box
pub const RHEL_PRODUCT_IDS: [&str; 5] = [
    "RHEL",
    "RHEL Server",
    "RHEL Workstation",
    "RHEL Compute Node",
    "RHEL for x86",
];

/// Collector lookup keyed by product id
#[derive(Clone, Default)]
pub struct CollectorRegistry {
    collectors: HashMap<String, Arc<dyn ProductUsageCollector>>,
}

impl CollectorRegistry {
    /// Registry with no products
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in product rules
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let rhel: Arc<dyn ProductUsageCollector> = Arc::new(RhelUsageCollector);
        for product_id in RHEL_PRODUCT_IDS {
            registry.register_shared(product_id, rhel.clone());
        }
        registry
    }

    pub fn register<C>(&mut self, product_id: impl Into<String>, collector: C)
    where
        C: ProductUsageCollector + 'static,
    {
        self.register_shared(product_id, Arc::new(collector));
    }

    pub fn register_shared(
        &mut self,
        product_id: impl Into<String>,
        collector: Arc<dyn ProductUsageCollector>,
    ) {
        self.collectors.insert(product_id.into(), collector);
    }

    /// Collector for a product, or `UnsupportedProduct`
    pub fn get(&self, product_id: &str) -> Result<Arc<dyn ProductUsageCollector>> {
        self.collectors
            .get(product_id)
            .cloned()
            .ok_or_else(|| HwTallyError::UnsupportedProduct(product_id.to_string()))
    }

    pub fn supports(&self, product_id: &str) -> bool {
        self.collectors.contains_key(product_id)
    }

    /// Registered product ids, sorted
    pub fn product_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.collectors.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for CollectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorRegistry")
            .field("products", &self.product_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwtally_common::HardwareMeasurementType;

    /// Counts every host as a single physical instance
    struct CountEverything;

    impl ProductUsageCollector for CountEverything {
        fn collect(&self, calc: &mut UsageCalculation, _facts: &HostFacts) -> Result<()> {
            calc.add_physical(0, 0, 1);
            Ok(())
        }
    }

    #[test]
    fn test_defaults_cover_rhel_family() {
        let registry = CollectorRegistry::with_defaults();
        for product_id in RHEL_PRODUCT_IDS {
            assert!(registry.supports(product_id));
        }
        assert_eq!(registry.product_ids().len(), RHEL_PRODUCT_IDS.len());
    }

    #[test]
    fn test_unknown_product_is_rejected() {
        let registry = CollectorRegistry::with_defaults();
        let err = registry.get("Satellite").err().unwrap();
        assert!(matches!(err, HwTallyError::UnsupportedProduct(id) if id == "Satellite"));
    }

    #[test]
    fn test_register_custom_collector() {
        let mut registry = CollectorRegistry::new();
        registry.register("Counter", CountEverything);

        let collector = registry.get("Counter").unwrap();
        let mut calc = UsageCalculation::new("Counter");
        collector
            .collect(&mut calc, &HostFacts::guest(2, 1, false))
            .unwrap();

        assert_eq!(
            calc.get(HardwareMeasurementType::Physical).map(|t| t.instances),
            Some(1)
        );
    }
}
