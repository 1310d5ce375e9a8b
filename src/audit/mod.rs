//! Performance audit of persisted URLs
//!
//! This module contains:
//! - The `PerformanceProbe` seam and the metrics record it returns
//! - The Lighthouse CLI implementation of that seam
//! - The runner that finds pending groups and writes metrics back

mod lighthouse;
mod probe;
mod runner;

pub use lighthouse::LighthouseProbe;
pub use probe::{AuditError, Metrics, PerformanceProbe};
pub use runner::{pending_audits, AuditCandidate, AuditReport, AuditRunner};
