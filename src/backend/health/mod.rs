//! Health Reporting
//!
//! Data behind the `/healthz`, `/ready` and `/live` probes: tracked service
//! statuses, process memory, host details and the aggregated report.

/// Report types and collectors
pub mod report;

pub use report::{
    HealthReport, MemoryStats, OsInfo, ProbeResponse, Service, ServiceStatus, ServiceStatuses,
};
