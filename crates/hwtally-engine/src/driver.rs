//! Tally run driver
//!
//! Iterates hosts for a product and feeds them to that product's collector.
//! Three accumulation disciplines are offered, all yielding the same totals:
//! - [`TallyRunner::tally_product`]: one accumulator on the calling thread
//! - [`SharedUsageCalculation`]: one accumulator behind a mutex
//! - [`TallyRunner::tally_product_sharded`]: one accumulator per shard, merged at the end
//!
//! A data-integrity failure on any host invalidates the product's run; no
//! partial accumulator is ever handed back for it.

use crate::calculation::UsageCalculation;
use crate::collector::{CollectorRegistry, ProductUsageCollector};
use hwtally_common::{HostFacts, HwTallyError, Result};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Runs product tallies over host inventories
#[derive(Debug, Clone, Default)]
pub struct TallyRunner {
    registry: CollectorRegistry,
}

impl TallyRunner {
    pub fn new(registry: CollectorRegistry) -> Self {
        Self { registry }
    }

    /// Runner with the built-in product rules
    pub fn with_defaults() -> Self {
        Self::new(CollectorRegistry::with_defaults())
    }

    pub fn registry(&self) -> &CollectorRegistry {
        &self.registry
    }

    /// Tally one product on the calling thread
    #[instrument(skip(self, hosts), fields(hosts = hosts.len()))]
    pub fn tally_product(&self, product_id: &str, hosts: &[HostFacts]) -> Result<UsageCalculation> {
        let collector = self.registry.get(product_id)?;
        let calc = collect_all(collector.as_ref(), UsageCalculation::new(product_id), hosts)?;
        info!(
            product_id,
            categories = calc.iter().count(),
            "Completed product tally"
        );
        Ok(calc)
    }

    /// Tally one product with one accumulator per shard of `shard_size` hosts.
    ///
    /// Shards run on the blocking pool and are merged once all have finished.
    #[instrument(skip(self, hosts), fields(hosts = hosts.len()))]
    pub async fn tally_product_sharded(
        &self,
        product_id: &str,
        hosts: Arc<[HostFacts]>,
        shard_size: usize,
    ) -> Result<UsageCalculation> {
        let collector = self.registry.get(product_id)?;
        let shard_size = shard_size.max(1);

        let mut handles = Vec::new();
        for start in (0..hosts.len()).step_by(shard_size) {
            let end = (start + shard_size).min(hosts.len());
            let hosts = hosts.clone();
            let collector = collector.clone();
            let shard = UsageCalculation::new(product_id);
            handles.push(tokio::task::spawn_blocking(move || {
                collect_all(collector.as_ref(), shard, &hosts[start..end])
            }));
        }
        debug!(product_id, shards = handles.len(), "Spawned tally shards");

        let mut merged = UsageCalculation::new(product_id);
        let mut failure = None;
        for handle in handles {
            match handle.await {
                Ok(Ok(shard)) => {
                    if failure.is_none() {
                        merged.merge(shard)?;
                    }
                }
                Ok(Err(err)) => {
                    if failure.is_none() {
                        failure = Some(err);
                    }
                }
                Err(join_err) => {
                    if failure.is_none() {
                        failure = Some(HwTallyError::Internal(format!(
                            "Tally shard did not complete: {}",
                            join_err
                        )));
                    }
                }
            }
        }

        if let Some(err) = failure {
            error!(product_id, error = %err, "Aborted sharded product tally");
            return Err(err);
        }

        info!(
            product_id,
            categories = merged.iter().count(),
            "Completed sharded product tally"
        );
        Ok(merged)
    }

    /// Tally every product independently from the same inventory
    #[instrument(skip(self, hosts), fields(hosts = hosts.len()))]
    pub fn tally_account(&self, product_ids: &[String], hosts: &[HostFacts]) -> AccountTally {
        let mut tally = AccountTally::default();
        for product_id in product_ids {
            let result = self.tally_product(product_id, hosts);
            tally.record(product_id, result);
        }
        tally
    }

    /// [`TallyRunner::tally_account`] with each product tallied shard-then-merge
    #[instrument(skip(self, hosts), fields(hosts = hosts.len()))]
    pub async fn tally_account_sharded(
        &self,
        product_ids: &[String],
        hosts: Arc<[HostFacts]>,
        shard_size: usize,
    ) -> AccountTally {
        let mut tally = AccountTally::default();
        for product_id in product_ids {
            let result = self
                .tally_product_sharded(product_id, hosts.clone(), shard_size)
                .await;
            tally.record(product_id, result);
        }
        tally
    }

    /// Start a mutex-guarded run for a product
    pub fn shared(&self, product_id: &str) -> Result<SharedUsageCalculation> {
        let collector = self.registry.get(product_id)?;
        Ok(SharedUsageCalculation::new(product_id, collector))
    }
}

/// Classify hosts in order, stopping at the first failure
fn collect_all(
    collector: &dyn ProductUsageCollector,
    mut calc: UsageCalculation,
    hosts: &[HostFacts],
) -> Result<UsageCalculation> {
    for (index, facts) in hosts.iter().enumerate() {
        if let Err(err) = collector.collect(&mut calc, facts) {
            error!(
                product_id = calc.product_id(),
                host_index = index,
                error = %err,
                "Host rejected, aborting product tally"
            );
            return Err(err);
        }
    }
    Ok(calc)
}

/// Per-product outcome of an account tally
///
/// A product is either completed with its totals or failed with the error
/// that aborted it. Failed products expose no totals.
#[derive(Debug, Default)]
pub struct AccountTally {
    pub completed: BTreeMap<String, UsageCalculation>,
    pub failed: BTreeMap<String, HwTallyError>,
}

impl AccountTally {
    fn record(&mut self, product_id: &str, result: Result<UsageCalculation>) {
        match result {
            Ok(calc) => {
                self.completed.insert(product_id.to_string(), calc);
            }
            Err(err) => {
                self.failed.insert(product_id.to_string(), err);
            }
        }
    }

    pub fn get(&self, product_id: &str) -> Option<&UsageCalculation> {
        self.completed.get(product_id)
    }

    /// Whether every product finished
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

struct SharedState {
    calc: UsageCalculation,
    failed: bool,
}

/// A single accumulator that many workers feed through a mutex
///
/// The lock is held for the whole classification of one host. Once a host
/// fails, the run is marked invalid and [`SharedUsageCalculation::finish`]
/// refuses to release the totals.
pub struct SharedUsageCalculation {
    product_id: String,
    collector: Arc<dyn ProductUsageCollector>,
    state: Mutex<SharedState>,
}

impl SharedUsageCalculation {
    pub fn new(product_id: &str, collector: Arc<dyn ProductUsageCollector>) -> Self {
        Self {
            product_id: product_id.to_string(),
            collector,
            state: Mutex::new(SharedState {
                calc: UsageCalculation::new(product_id),
                failed: false,
            }),
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Classify one host into the shared accumulator
    pub fn collect(&self, facts: &HostFacts) -> Result<()> {
        let mut state = self.state.lock();
        if state.failed {
            return Err(HwTallyError::Internal(format!(
                "Tally for product '{}' was already aborted",
                self.product_id
            )));
        }
        let result = self.collector.collect(&mut state.calc, facts);
        if let Err(err) = &result {
            error!(product_id = %self.product_id, error = %err, "Host rejected, aborting shared tally");
            state.failed = true;
        }
        result
    }

    /// Release the totals, or fail if any host was rejected
    pub fn finish(self) -> Result<UsageCalculation> {
        let state = self.state.into_inner();
        if state.failed {
            return Err(HwTallyError::Internal(format!(
                "Tally for product '{}' was aborted and has no valid totals",
                self.product_id
            )));
        }
        Ok(state.calc)
    }
}

impl std::fmt::Debug for SharedUsageCalculation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedUsageCalculation")
            .field("product_id", &self.product_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwtally_common::{HardwareMeasurementType, Totals};

    fn inventory() -> Vec<HostFacts> {
        vec![
            HostFacts::hypervisor(4, 12),
            HostFacts::guest(3, 12, false),
            HostFacts::guest(12, 3, true),
            HostFacts::physical(12, 4),
            HostFacts::cloud("aws", 12, 4),
        ]
    }

    #[test]
    fn test_tally_product() {
        let runner = TallyRunner::with_defaults();
        let calc = runner.tally_product("RHEL", &inventory()).unwrap();

        assert_eq!(
            calc.get(HardwareMeasurementType::Hypervisor),
            Some(&Totals::new(16, 13, 2))
        );
        assert_eq!(
            calc.get(HardwareMeasurementType::Physical),
            Some(&Totals::new(12, 4, 1))
        );
        assert_eq!(
            calc.get(HardwareMeasurementType::Aws),
            Some(&Totals::new(12, 1, 1))
        );
        assert_eq!(
            calc.get(HardwareMeasurementType::Total),
            Some(&Totals::new(40, 18, 4))
        );
    }

    #[test]
    fn test_unknown_product_fails_before_collecting() {
        let runner = TallyRunner::with_defaults();
        let result = runner.tally_product("Satellite", &inventory());
        assert!(matches!(result, Err(HwTallyError::UnsupportedProduct(_))));
    }

    #[test]
    fn test_bad_hypervisor_aborts_product() {
        let runner = TallyRunner::with_defaults();
        let mut hosts = inventory();
        hosts.push(HostFacts::hypervisor(8, 0));

        let result = runner.tally_product("RHEL", &hosts);
        assert!(result.unwrap_err().is_data_integrity());
    }

    #[test]
    fn test_account_tally_isolates_failures() {
        let runner = TallyRunner::with_defaults();
        let products = vec!["RHEL".to_string(), "Satellite".to_string()];

        let tally = runner.tally_account(&products, &inventory());

        assert!(!tally.is_complete());
        assert!(tally.get("RHEL").is_some());
        assert!(tally.get("Satellite").is_none());
        assert!(tally.failed.contains_key("Satellite"));
    }

    #[test]
    fn test_shared_matches_single_threaded() {
        let runner = TallyRunner::with_defaults();
        let hosts = inventory();
        let shared = runner.shared("RHEL").unwrap();

        std::thread::scope(|scope| {
            for chunk in hosts.chunks(2) {
                let shared = &shared;
                scope.spawn(move || {
                    for facts in chunk {
                        shared.collect(facts).unwrap();
                    }
                });
            }
        });

        let expected = runner.tally_product("RHEL", &hosts).unwrap();
        assert_eq!(shared.finish().unwrap(), expected);
    }

    #[test]
    fn test_shared_refuses_totals_after_failure() {
        let runner = TallyRunner::with_defaults();
        let shared = runner.shared("RHEL").unwrap();

        shared.collect(&HostFacts::physical(4, 1)).unwrap();
        assert!(shared.collect(&HostFacts::hypervisor(4, 0)).is_err());
        assert!(shared.collect(&HostFacts::physical(4, 1)).is_err());
        assert!(shared.finish().is_err());
    }

    #[tokio::test]
    async fn test_sharded_matches_single_threaded() {
        let runner = TallyRunner::with_defaults();
        let hosts: Arc<[HostFacts]> = inventory().into();

        let expected = runner.tally_product("RHEL", &hosts).unwrap();
        for shard_size in [1, 2, 3, 100] {
            let merged = runner
                .tally_product_sharded("RHEL", hosts.clone(), shard_size)
                .await
                .unwrap();
            assert_eq!(merged, expected);
        }
    }

    #[tokio::test]
    async fn test_sharded_failure_publishes_nothing() {
        let runner = TallyRunner::with_defaults();
        let mut hosts = inventory();
        hosts.insert(0, HostFacts::hypervisor(2, 0));
        let hosts: Arc<[HostFacts]> = hosts.into();

        let tally = runner
            .tally_account_sharded(&["RHEL".to_string()], hosts, 2)
            .await;

        assert!(tally.get("RHEL").is_none());
        assert!(tally.failed["RHEL"].is_data_integrity());
    }

    #[tokio::test]
    async fn test_sharded_empty_inventory() {
        let runner = TallyRunner::with_defaults();
        let hosts: Arc<[HostFacts]> = Vec::new().into();

        let calc = runner
            .tally_product_sharded("RHEL", hosts, 10)
            .await
            .unwrap();
        assert!(!calc.has_measurements());
    }
}
