//! Core data types for hwtally

pub mod host_facts;
pub mod measurement;
pub mod totals;
