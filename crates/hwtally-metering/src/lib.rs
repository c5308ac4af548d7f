//! # hwtally Metering
//!
//! Usage events for individual (organization, instance, metric) samples.
//!
//! Unlike the tally engine, this boundary never fails a batch over one bad
//! value: unparseable enum fields are logged, recorded as
//! [`hwtally_common::FieldDefect`]s and left absent.

pub mod event;
pub mod factory;

pub use event::{BillingProvider, Event, EventEnum, Measurement, MetricId, Role, Sla, Usage};
pub use factory::{create_metric_event, update_metric_event, MetricEventParams, SNAPSHOT_EVENT_TYPE};
