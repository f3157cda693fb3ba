/**
 * Health Report
 *
 * The `/healthz` document:
 *
 * ```json
 * {
 *   "status": "ok",
 *   "timestamp": "2026-01-01T00:00:00Z",
 *   "version": "0.1.0",
 *   "instanceId": "…",
 *   "environment": "development",
 *   "uptime": 12.5,
 *   "memory": { "rssBytes": 1234, "virtualBytes": 5678 },
 *   "os": { "platform": "linux", "arch": "x86_64", "family": "unix", "hostname": "…", "cpus": 8 },
 *   "services": { "database": "ok", "cache": "ok", "auth": "ok" }
 * }
 * ```
 *
 * The overall status is the worst of the service statuses. Only `error`
 * makes the endpoint answer 503.
 */

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Status of one tracked service, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Ok,
    Warning,
    Error,
}

impl ServiceStatus {
    /// HTTP status used when this is the overall status
    pub fn http_status(self) -> StatusCode {
        match self {
            Self::Ok | Self::Warning => StatusCode::OK,
            Self::Error => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Services tracked by the health report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Database,
    Cache,
    Auth,
}

impl Service {
    pub const ALL: [Service; 3] = [Service::Database, Service::Cache, Service::Auth];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceStatuses {
    pub database: ServiceStatus,
    pub cache: ServiceStatus,
    pub auth: ServiceStatus,
}

impl ServiceStatuses {
    pub fn get(&self, service: Service) -> ServiceStatus {
        match service {
            Service::Database => self.database,
            Service::Cache => self.cache,
            Service::Auth => self.auth,
        }
    }

    pub fn set(&mut self, service: Service, status: ServiceStatus) {
        match service {
            Service::Database => self.database = status,
            Service::Cache => self.cache = status,
            Service::Auth => self.auth = status,
        }
    }

    /// Worst status across all services
    pub fn overall(&self) -> ServiceStatus {
        Service::ALL
            .iter()
            .map(|service| self.get(*service))
            .max()
            .unwrap_or_default()
    }
}

/// Process memory, when the platform exposes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub rss_bytes: Option<u64>,
    pub virtual_bytes: Option<u64>,
}

impl MemoryStats {
    /// Read `VmRSS`/`VmSize` from `/proc/self/status`; empty elsewhere
    pub fn collect() -> Self {
        match std::fs::read_to_string("/proc/self/status") {
            Ok(status) => Self::parse_proc_status(&status),
            Err(_) => Self::default(),
        }
    }

    fn parse_proc_status(status: &str) -> Self {
        let field = |name: &str| {
            status.lines().find_map(|line| {
                let rest = line.strip_prefix(name)?.strip_prefix(':')?;
                let kb = rest.trim().trim_end_matches("kB").trim().parse::<u64>().ok()?;
                Some(kb * 1024)
            })
        };
        Self {
            rss_bytes: field("VmRSS"),
            virtual_bytes: field("VmSize"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsInfo {
    pub platform: String,
    pub arch: String,
    pub family: String,
    pub hostname: Option<String>,
    pub cpus: usize,
}

impl OsInfo {
    pub fn collect() -> Self {
        Self {
            platform: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            family: std::env::consts::FAMILY.to_string(),
            hostname: whoami::fallible::hostname().ok(),
            cpus: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: ServiceStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub instance_id: Uuid,
    pub environment: String,
    /// Seconds since the server started
    pub uptime: f64,
    pub memory: MemoryStats,
    pub os: OsInfo,
    pub services: ServiceStatuses,
}

impl HealthReport {
    pub fn new(
        services: ServiceStatuses,
        instance_id: Uuid,
        environment: impl Into<String>,
        uptime: Duration,
    ) -> Self {
        Self {
            status: services.overall(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            instance_id,
            environment: environment.into(),
            uptime: uptime.as_secs_f64(),
            memory: MemoryStats::collect(),
            os: OsInfo::collect(),
            services,
        }
    }

    pub fn http_status(&self) -> StatusCode {
        self.status.http_status()
    }
}

/// Body of the readiness and liveness probes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
}

impl ProbeResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            uptime: None,
        }
    }

    pub fn with_uptime(mut self, uptime: Duration) -> Self {
        self.uptime = Some(uptime.as_secs_f64());
        self
    }
}
