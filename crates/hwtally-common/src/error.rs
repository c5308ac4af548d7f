//! Error types for hwtally
//!
//! Two kinds of failure exist and they are never mixed:
//! - [`HwTallyError`] is fatal. A product run that hits one is invalid and
//!   its totals must not be published.
//! - [`FieldDefect`] is soft. The offending field is left absent, a warning
//!   is logged and processing continues.
//!
//! [`Fault`] carries either one when a caller needs to route both.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using HwTallyError
pub type Result<T> = std::result::Result<T, HwTallyError>;

/// Unified error type for hwtally operations
#[derive(Debug, Error)]
pub enum HwTallyError {
    // Inventory data that cannot produce a trustworthy tally
    #[error("Data integrity error: {0}")]
    DataIntegrity(#[from] DataIntegrityError),

    #[error("No usage collector registered for product '{0}'")]
    UnsupportedProduct(String),

    #[error("Cannot merge usage for product '{actual}' into '{expected}'")]
    ProductMismatch { expected: String, actual: String },

    #[error("Cannot add to the aggregate category {0} directly")]
    AggregateTarget(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HwTallyError {
    /// Whether this error indicates the inventory itself is inconsistent
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, HwTallyError::DataIntegrity(_))
    }
}

/// Inconsistent inventory data
#[derive(Debug, Error)]
pub enum DataIntegrityError {
    #[error(
        "Hypervisor has no sockets and will not contribute to the totals. The tally for \
         product '{product_id}' will not be accurate since its guests will not contribute either."
    )]
    HypervisorWithoutSockets { product_id: String },
}

/// A field-level defect found while sanitizing upstream input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefect {
    /// Name of the field that was left absent
    pub field: String,
    /// The raw value that could not be parsed, if any was supplied
    pub value: Option<String>,
    /// Organization the record belongs to
    pub org_id: String,
    /// Instance the record describes
    pub instance_id: String,
}

impl FieldDefect {
    pub fn new(
        field: impl Into<String>,
        value: Option<&str>,
        org_id: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.map(str::to_string),
            org_id: org_id.into(),
            instance_id: instance_id.into(),
        }
    }
}

impl std::fmt::Display for FieldDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unsupported {} '{}' specified for event. orgId/instance: {}/{}",
            self.field,
            self.value.as_deref().unwrap_or("null"),
            self.org_id,
            self.instance_id
        )
    }
}

/// Either a run-aborting error or a recorded field defect
#[derive(Debug)]
pub enum Fault {
    /// Aborts the run it occurred in
    Fatal(HwTallyError),
    /// Recorded and otherwise ignored
    Defect(FieldDefect),
}

impl Fault {
    /// Whether this fault must abort the surrounding run
    pub fn aborts_run(&self) -> bool {
        matches!(self, Fault::Fatal(_))
    }
}

impl From<HwTallyError> for Fault {
    fn from(err: HwTallyError) -> Self {
        Fault::Fatal(err)
    }
}

impl From<FieldDefect> for Fault {
    fn from(defect: FieldDefect) -> Self {
        Fault::Defect(defect)
    }
}

/// A value built from upstream input along with the defects found on the way
#[derive(Debug, Clone)]
pub struct Sanitized<T> {
    pub value: T,
    pub defects: Vec<FieldDefect>,
}

impl<T> Sanitized<T> {
    pub fn new(value: T, defects: Vec<FieldDefect>) -> Self {
        Self { value, defects }
    }

    /// True when no field had to be dropped
    pub fn is_clean(&self) -> bool {
        self.defects.is_empty()
    }

    /// The defects as faults, none of which abort a run
    pub fn faults(&self) -> impl Iterator<Item = Fault> + '_ {
        self.defects.iter().cloned().map(Fault::Defect)
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

// Implement From for common external error types
impl From<serde_json::Error> for HwTallyError {
    fn from(err: serde_json::Error) -> Self {
        HwTallyError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for HwTallyError {
    fn from(err: std::io::Error) -> Self {
        HwTallyError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for HwTallyError {
    fn from(err: anyhow::Error) -> Self {
        HwTallyError::Internal(err.to_string())
    }
}
