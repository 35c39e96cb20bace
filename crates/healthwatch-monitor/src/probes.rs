//! Probe evaluators.
//!
//! Each probe turns one raw health sample into an [`Observation`]. Disk and
//! memory probes fail closed: anything they cannot measure is reported as
//! `WARN`. The containers probe surfaces discovery failures to the caller,
//! which reports them through the self-health state.

#[cfg(test)]
#[path = "probes_tests.rs"]
mod tests;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::error::MonitorError;
use crate::source::{Access, HealthSource};
use crate::state::{DiskUsage, MessageArgs, Observation, StateValue, TRUNCATED_MARKER};

/// Health endpoint carrying the disk usage table.
pub const DISKS_ENDPOINT: &str = "disks";
/// Health endpoint carrying available memory in bytes.
pub const MEMORY_ENDPOINT: &str = "memory-available";
/// Container status considered healthy.
pub const HEALTHY_STATUS: &str = "healthy";

/// A health probe.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Probe name, used in logs and self-health details.
    fn name(&self) -> &str;

    /// Evaluate one sample.
    async fn evaluate(&self, source: &dyn HealthSource) -> Result<Observation, MonitorError>;
}

/// Find the usage percentage of `disk` in a disk table.
///
/// Rows are comma separated, the disk path is the trailing field and the
/// usage is the field before it, e.g. `sda1,50%,/`. Returns `Ok(None)` when
/// no row matches.
pub fn parse_disk_usage(payload: &str, disk: &str) -> Result<Option<i64>, MonitorError> {
    for row in payload.lines().map(str::trim) {
        let fields: Vec<&str> = row.split(',').collect();
        if fields.len() < 2 || fields[fields.len() - 1] != disk {
            continue;
        }

        let raw = fields[fields.len() - 2].trim();
        let percent = raw.strip_suffix('%').unwrap_or(raw).trim();
        return percent
            .parse::<i64>()
            .map(Some)
            .map_err(|_| MonitorError::Parse(format!("Invalid disk size {:?} for {}", raw, disk)));
    }
    Ok(None)
}

/// Convert an available-bytes payload to whole megabytes.
pub fn parse_available_mb(payload: &str) -> Result<i64, MonitorError> {
    let bytes = payload
        .trim()
        .parse::<i64>()
        .map_err(|_| MonitorError::Parse(format!("Invalid memory size {:?}", payload.trim())))?;
    Ok(bytes / 1024 / 1024)
}

/// Read the `Status` field of a container payload.
///
/// Returns `Ok(None)` for valid JSON without a string `Status`.
pub fn parse_container_status(payload: &str) -> Result<Option<String>, MonitorError> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| MonitorError::Parse(format!("Invalid container payload: {}", e)))?;
    Ok(value
        .get("Status")
        .and_then(|s| s.as_str())
        .map(str::to_string))
}

/// Disk usage guard for a single mount point.
pub struct DiskGuard {
    name: String,
    disk: String,
    guard_percent: i64,
}

impl DiskGuard {
    pub fn new(disk: impl Into<String>, guard_percent: i64) -> Self {
        let disk = disk.into();
        Self {
            name: format!("disk {}", disk),
            disk,
            guard_percent,
        }
    }

    async fn usage(&self, source: &dyn HealthSource) -> Result<Option<i64>, MonitorError> {
        let payload = source.fetch_endpoint(DISKS_ENDPOINT, Access::Private).await?;
        parse_disk_usage(&payload, &self.disk)
    }
}

#[async_trait]
impl Probe for DiskGuard {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, source: &dyn HealthSource) -> Result<Observation, MonitorError> {
        let usage = match self.usage(source).await {
            Ok(Some(percent)) => Some(percent),
            Ok(None) => {
                warn!(disk = %self.disk, "Disk not found in health data");
                None
            }
            Err(e) => {
                error!(disk = %self.disk, error = %e, "Disk guard failed");
                None
            }
        };

        let value = match usage {
            Some(percent) => StateValue::warn_if(percent > self.guard_percent),
            None => StateValue::Warn,
        };
        debug!(disk = %self.disk, usage = ?usage, %value, "Disk guard evaluated");

        Ok(Observation::new(
            value,
            MessageArgs::Disk {
                usage: DiskUsage(usage),
                guard_percent: self.guard_percent,
                disk: self.disk.clone(),
            },
        )
        .with_qualifier(self.disk.clone()))
    }
}

/// Available memory guard.
pub struct MemoryGuard {
    guard_mb: i64,
}

impl MemoryGuard {
    pub fn new(guard_mb: i64) -> Self {
        Self { guard_mb }
    }
}

#[async_trait]
impl Probe for MemoryGuard {
    fn name(&self) -> &str {
        "memory"
    }

    async fn evaluate(&self, source: &dyn HealthSource) -> Result<Observation, MonitorError> {
        let available_mb = source
            .fetch_endpoint(MEMORY_ENDPOINT, Access::Private)
            .await
            .and_then(|payload| parse_available_mb(&payload))
            .unwrap_or_else(|e| {
                error!(error = %e, "Memory guard failed");
                -1
            });

        let value = StateValue::warn_if(available_mb < self.guard_mb);
        debug!(available_mb, %value, "Memory guard evaluated");

        Ok(Observation::new(
            value,
            MessageArgs::Memory {
                available_mb,
                guard_mb: self.guard_mb,
            },
        ))
    }
}

/// Aggregate health of all privately listed containers.
#[derive(Default)]
pub struct ContainersProbe;

impl ContainersProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Probe for ContainersProbe {
    fn name(&self) -> &str {
        "containers"
    }

    async fn evaluate(&self, source: &dyn HealthSource) -> Result<Observation, MonitorError> {
        let containers = source.list_containers(Access::Private).await?;
        let mut unhealthy = Vec::new();

        for container in &containers {
            let status = match source
                .fetch_endpoint(&container.endpoint, Access::Private)
                .await
                .and_then(|payload| parse_container_status(&payload))
            {
                Ok(status) => status,
                Err(e) => {
                    error!(container = %container.name, error = %e, "Container check aborted");
                    unhealthy.push(TRUNCATED_MARKER.to_string());
                    break;
                }
            };

            if status.as_deref() != Some(HEALTHY_STATUS) {
                debug!(container = %container.name, status = ?status, "Container unhealthy");
                unhealthy.push(container.name.clone());
            }
        }

        Ok(Observation::new(
            StateValue::warn_if(!unhealthy.is_empty()),
            MessageArgs::Containers { unhealthy },
        ))
    }
}
