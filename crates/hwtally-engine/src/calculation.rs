//! Per-product usage accumulation
//!
//! A [`UsageCalculation`] holds the running [`Totals`] for one product over
//! one tally run. Every contribution is written twice: once into its own
//! category and once into [`HardwareMeasurementType::Total`], so the total
//! always equals the sum of the category-specific entries.

use hwtally_common::{CloudProvider, HardwareMeasurementType, HwTallyError, Result, Totals};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Usage totals for a single product
///
/// A category that never received a contribution is absent, which is not
/// the same as a present zero entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageCalculation {
    product_id: String,
    totals: BTreeMap<HardwareMeasurementType, Totals>,
}

impl UsageCalculation {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            totals: BTreeMap::new(),
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Totals for a category, or `None` if nothing was contributed to it
    pub fn get(&self, category: HardwareMeasurementType) -> Option<&Totals> {
        self.totals.get(&category)
    }

    /// Whether any host contributed to this product
    pub fn has_measurements(&self) -> bool {
        !self.totals.is_empty()
    }

    /// Present categories in a stable order
    pub fn iter(&self) -> impl Iterator<Item = (HardwareMeasurementType, &Totals)> {
        self.totals.iter().map(|(category, totals)| (*category, totals))
    }

    pub fn add_physical(&mut self, cores: u64, sockets: u64, instances: u64) {
        self.add_contribution(HardwareMeasurementType::Physical, cores, sockets, instances);
    }

    pub fn add_hypervisor(&mut self, cores: u64, sockets: u64, instances: u64) {
        self.add_contribution(HardwareMeasurementType::Hypervisor, cores, sockets, instances);
    }

    pub fn add_cloud_provider(
        &mut self,
        provider: CloudProvider,
        cores: u64,
        sockets: u64,
        instances: u64,
    ) {
        self.add_contribution(provider.measurement_type(), cores, sockets, instances);
    }

    /// Fold a contribution into `category` and into the aggregate total.
    ///
    /// The aggregate itself is not a valid target.
    pub fn add_to_category(
        &mut self,
        category: HardwareMeasurementType,
        cores: u64,
        sockets: u64,
        instances: u64,
    ) -> Result<()> {
        if category.is_total() {
            return Err(HwTallyError::AggregateTarget(format!("{:?}", category)));
        }
        self.add_contribution(category, cores, sockets, instances);
        Ok(())
    }

    fn add_contribution(
        &mut self,
        category: HardwareMeasurementType,
        cores: u64,
        sockets: u64,
        instances: u64,
    ) {
        let contribution = Totals::new(cores, sockets, instances);
        self.accumulate(category, contribution);
        self.accumulate(HardwareMeasurementType::Total, contribution);
    }

    fn accumulate(&mut self, category: HardwareMeasurementType, contribution: Totals) {
        *self.totals.entry(category).or_default() += contribution;
    }

    /// Fold another shard's totals for the same product into this one.
    ///
    /// Category by category, including the aggregate, so the aggregate
    /// invariant holds on the result. Categories absent from both stay absent.
    pub fn merge(&mut self, other: UsageCalculation) -> Result<()> {
        if other.product_id != self.product_id {
            return Err(HwTallyError::ProductMismatch {
                expected: self.product_id.clone(),
                actual: other.product_id,
            });
        }

        for (category, totals) in other.totals {
            self.accumulate(category, totals);
        }
        debug!(product_id = %self.product_id, "Merged shard usage");
        Ok(())
    }

    /// Sum of every category except the aggregate
    pub fn category_sum(&self) -> Totals {
        self.iter()
            .filter(|(category, _)| !category.is_total())
            .map(|(_, totals)| *totals)
            .sum()
    }
}
