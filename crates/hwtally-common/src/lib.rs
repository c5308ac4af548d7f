//! # hwtally Common
//!
//! Shared types and errors for the hwtally hardware usage engine.
//!
//! ## Core Types
//!
//! - [`HostFacts`]: normalized view of one inventory host
//! - [`HardwareMeasurementType`]: the closed set of measurement categories
//! - [`CloudProvider`]: supported public-cloud providers
//! - [`Totals`]: (cores, sockets, instances) running totals
//!
//! ## Errors
//!
//! - [`HwTallyError`]: fatal errors that abort a product run
//! - [`FieldDefect`]: soft, field-level defects that are logged and skipped
//! - [`Fault`]: discriminates between the two

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{DataIntegrityError, Fault, FieldDefect, HwTallyError, Result, Sanitized};
pub use types::{
    host_facts::HostFacts,
    measurement::{CloudProvider, HardwareMeasurementType},
    totals::Totals,
};

/// hwtally version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sockets reported for any cloud-hosted instance, regardless of what the host claims
pub const CLOUD_SOCKETS: u64 = 1;

/// Sockets reported for a guest counted as its own hypervisor
pub const UNMAPPED_GUEST_SOCKETS: u64 = 1;

/// Every classified host counts as one instance
pub const INSTANCES_PER_HOST: u64 = 1;
