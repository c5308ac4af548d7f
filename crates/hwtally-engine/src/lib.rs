//! # hwtally Engine
//!
//! Hardware usage classification and accumulation.
//!
//! Each host in an inventory is classified into one measurement category
//! (physical, hypervisor, or a cloud provider) by its product's collector
//! and folded into that product's [`UsageCalculation`]:
//!
//! ```text
//! HostFacts ──► ProductUsageCollector ──► UsageCalculation
//!                 (per product)            PHYSICAL / HYPERVISOR / <CLOUD>
//!                                          TOTAL = sum of the above
//! ```
//!
//! Products are tallied independently even when they share an inventory.

pub mod calculation;
pub mod collector;
pub mod config;
pub mod driver;
pub mod report;

pub use calculation::UsageCalculation;
pub use collector::{CollectorRegistry, ProductUsageCollector, RhelUsageCollector};
pub use config::TallyConfig;
pub use driver::{AccountTally, SharedUsageCalculation, TallyRunner};
pub use report::{report_category, ReportCategory};

/// Engine version
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Product tallied when none is configured
pub const DEFAULT_PRODUCT: &str = "RHEL";

/// Hosts per shard for parallel tallies
pub const DEFAULT_SHARD_SIZE: usize = 1000;
