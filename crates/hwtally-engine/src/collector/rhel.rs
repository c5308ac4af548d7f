//! RHEL usage rules
//!
//! Branches are checked in order and the first match wins:
//!
//! ```text
//! cloud provider tag  -> <PROVIDER>   cores, 1 socket
//! hypervisor          -> HYPERVISOR   cores, sockets (0 sockets is an error)
//! guest, unknown hv   -> HYPERVISOR   cores, 1 socket
//! not virtual         -> PHYSICAL     cores, sockets
//! guest, known hv     -> nothing (counted through its hypervisor)
//! ```

use super::ProductUsageCollector;
use crate::calculation::UsageCalculation;
use hwtally_common::{
    DataIntegrityError, HostFacts, Result, CLOUD_SOCKETS, INSTANCES_PER_HOST,
    UNMAPPED_GUEST_SOCKETS,
};
use tracing::{debug, warn};

/// Collects usage for the RHEL product family
#[derive(Debug, Clone, Copy, Default)]
pub struct RhelUsageCollector;

impl ProductUsageCollector for RhelUsageCollector {
    fn collect(&self, calc: &mut UsageCalculation, facts: &HostFacts) -> Result<()> {
        let cores = facts.cores_or_zero();
        let sockets = facts.sockets_or_zero();

        if let Some(tag) = facts.cloud_provider.as_deref() {
            if facts.cloud_provider_type().is_none() {
                debug!(tag, "Unsupported cloud provider, applying on-prem rules");
            }
        }

        // Cloud hosts only account for a single socket.
        if let Some(provider) = facts.cloud_provider_type() {
            calc.add_cloud_provider(provider, cores, CLOUD_SOCKETS, INSTANCES_PER_HOST);
        } else if facts.is_hypervisor {
            if facts.is_virtual {
                warn!(
                    product_id = calc.product_id(),
                    "Host reported as both hypervisor and guest, counting as hypervisor"
                );
            }
            if sockets == 0 {
                return Err(DataIntegrityError::HypervisorWithoutSockets {
                    product_id: calc.product_id().to_string(),
                }
                .into());
            }
            calc.add_hypervisor(cores, sockets, INSTANCES_PER_HOST);
        } else if facts.is_guest_with_unknown_hypervisor() {
            // Unmapped guest stands in for its own hypervisor.
            calc.add_hypervisor(cores, UNMAPPED_GUEST_SOCKETS, INSTANCES_PER_HOST);
        } else if !facts.is_virtual {
            calc.add_physical(cores, sockets, INSTANCES_PER_HOST);
        }

        Ok(())
    }
}
