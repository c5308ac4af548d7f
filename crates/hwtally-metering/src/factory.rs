//! Metering event factory
//!
//! Builds snapshot usage events from raw per-sample inputs. Enum-valued
//! inputs come from upstream systems that do not validate them, so a bad
//! value only drops that field: a warning is logged, a [`FieldDefect`] is
//! recorded and the event is still produced.

use crate::event::{BillingProvider, Event, EventEnum, Measurement, MetricId, Role, Sla, Usage};
use chrono::{DateTime, Utc};
use hwtally_common::{FieldDefect, Sanitized};
use tracing::warn;
use uuid::Uuid;

/// Event type stamped on every metering event
pub const SNAPSHOT_EVENT_TYPE: &str = "snapshot";

/// Billing provider value that is an alias for Red Hat
const LEGACY_BILLING_ALIAS: &str = "rhm";

/// Raw inputs for one metric event
#[derive(Debug, Clone)]
pub struct MetricEventParams {
    pub org_id: String,
    pub instance_id: String,
    pub service_level: Option<String>,
    pub usage: Option<String>,
    pub role: Option<String>,
    pub event_source: String,
    pub measured_time: DateTime<Utc>,
    pub expired: DateTime<Utc>,
    pub service_type: String,
    pub billing_provider: Option<String>,
    pub billing_account_id: Option<String>,
    pub measured_metric: MetricId,
    pub measured_value: f64,
    pub metering_batch_id: Uuid,
    pub product_ids: Vec<String>,
    pub display_name: String,
    pub is_3rd_party_migrated: bool,
}

/// Create a new snapshot event for a metric measurement
pub fn create_metric_event(params: MetricEventParams) -> Sanitized<Event> {
    let mut event = Event::default();
    let defects = update_metric_event(&mut event, params);
    Sanitized::new(event, defects)
}

/// Overwrite `event` with a snapshot for a metric measurement.
///
/// Returns the fields that were dropped.
pub fn update_metric_event(event: &mut Event, params: MetricEventParams) -> Vec<FieldDefect> {
    let mut defects = Vec::new();
    let org_id = params.org_id.as_str();
    let instance_id = params.instance_id.as_str();

    event.service_type = params.service_type.clone();
    event.timestamp = Some(params.measured_time);
    event.expiration = Some(params.expired);
    event.display_name = Some(params.display_name.clone());
    event.sla = record(
        &mut defects,
        parse_sla(params.service_level.as_deref(), org_id, instance_id),
    );
    event.usage = record(
        &mut defects,
        parse_usage(params.usage.as_deref(), org_id, instance_id),
    );
    event.billing_provider = record(
        &mut defects,
        parse_billing_provider(params.billing_provider.as_deref(), org_id, instance_id),
    );
    event.billing_account_id = params.billing_account_id.clone();
    event.measurements = vec![Measurement {
        uom: params.measured_metric.value().to_string(),
        metric_id: params.measured_metric.value().to_string(),
        value: params.measured_value,
    }];
    event.role = record(
        &mut defects,
        parse_role(params.role.as_deref(), org_id, instance_id),
    );
    event.event_source = params.event_source.clone();
    event.org_id = params.org_id.clone();
    event.instance_id = params.instance_id.clone();
    event.metering_batch_id = Some(params.metering_batch_id);
    event.product_ids = params.product_ids;
    event.conversion = params.is_3rd_party_migrated;
    event.event_type = SNAPSHOT_EVENT_TYPE.to_string();

    defects
}

fn record<T>(defects: &mut Vec<FieldDefect>, parsed: Result<Option<T>, FieldDefect>) -> Option<T> {
    match parsed {
        Ok(value) => value,
        Err(defect) => {
            warn!("{}", defect);
            defects.push(defect);
            None
        }
    }
}

fn unsupported(field: &str, value: Option<&str>, org_id: &str, instance_id: &str) -> FieldDefect {
    FieldDefect::new(field, value, org_id, instance_id)
}

/// `"None"` means no SLA. A missing value is a defect.
fn parse_sla(
    service_level: Option<&str>,
    org_id: &str,
    instance_id: &str,
) -> Result<Option<Sla>, FieldDefect> {
    let sla = match service_level {
        Some(level) if level.eq_ignore_ascii_case("None") => Some(""),
        other => other,
    };
    sla.map(str::trim)
        .and_then(Sla::from_value)
        .map(Some)
        .ok_or_else(|| unsupported("SLA", service_level, org_id, instance_id))
}

fn parse_usage(
    usage: Option<&str>,
    org_id: &str,
    instance_id: &str,
) -> Result<Option<Usage>, FieldDefect> {
    parse_optional("Usage", usage, org_id, instance_id)
}

fn parse_role(
    role: Option<&str>,
    org_id: &str,
    instance_id: &str,
) -> Result<Option<Role>, FieldDefect> {
    parse_optional("Role", role, org_id, instance_id)
}

/// Missing, empty or the legacy alias all mean Red Hat
fn parse_billing_provider(
    billing_provider: Option<&str>,
    org_id: &str,
    instance_id: &str,
) -> Result<Option<BillingProvider>, FieldDefect> {
    match billing_provider {
        None => Ok(Some(BillingProvider::RedHat)),
        Some(provider)
            if provider == BillingProvider::Empty.value()
                || provider.eq_ignore_ascii_case(LEGACY_BILLING_ALIAS) =>
        {
            Ok(Some(BillingProvider::RedHat))
        }
        Some(_) => parse_optional("BillingProvider", billing_provider, org_id, instance_id),
    }
}

/// A missing value is simply absent; an unmatched one is a defect
fn parse_optional<T: EventEnum>(
    field: &str,
    value: Option<&str>,
    org_id: &str,
    instance_id: &str,
) -> Result<Option<T>, FieldDefect> {
    match value {
        None => Ok(None),
        Some(raw) => T::from_value(raw.trim())
            .map(Some)
            .ok_or_else(|| unsupported(field, value, org_id, instance_id)),
    }
}
