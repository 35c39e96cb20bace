//! Private health-check cycle.

use std::sync::Arc;

use healthwatch_config::ProbesConfig;
use tracing::{error, info};

use crate::debounce::Debouncer;
use crate::probes::{ContainersProbe, DiskGuard, MemoryGuard, Probe};
use crate::source::HealthSource;
use crate::state::Observation;

/// Outcome of one cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Observations in evaluation order, self-health last.
    pub observations: Vec<Observation>,
    /// Probe errors that escaped the probes' own handling.
    pub failures: Vec<String>,
    /// Number of notifications that fired.
    pub notified: usize,
}

/// Runs the probes in order and reports every observation to the debouncer.
pub struct HealthMonitor {
    source: Arc<dyn HealthSource>,
    probes: Vec<Box<dyn Probe>>,
    debouncer: Arc<Debouncer>,
}

impl HealthMonitor {
    /// Create a monitor without probes.
    pub fn new(source: Arc<dyn HealthSource>, debouncer: Arc<Debouncer>) -> Self {
        Self {
            source,
            probes: Vec::new(),
            debouncer,
        }
    }

    /// Create a monitor with the standard probe sequence: every configured
    /// disk, then memory, then containers.
    pub fn from_config(
        config: &ProbesConfig,
        source: Arc<dyn HealthSource>,
        debouncer: Arc<Debouncer>,
    ) -> Self {
        let mut monitor = Self::new(source, debouncer);
        for disk in &config.disks {
            monitor.add_probe(Box::new(DiskGuard::new(
                disk.clone(),
                config.disk_guard_percent,
            )));
        }
        monitor.add_probe(Box::new(MemoryGuard::new(config.memory_guard_mb)));
        monitor.add_probe(Box::new(ContainersProbe::new()));
        monitor
    }

    pub fn add_probe(&mut self, probe: Box<dyn Probe>) {
        self.probes.push(probe);
    }

    pub fn probe_names(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    /// Run every probe in sequence, then report self-health.
    ///
    /// A failing probe does not stop the remaining ones. Its error becomes
    /// part of the `HEALTHMONITOR` warning.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for probe in &self.probes {
            match probe.evaluate(self.source.as_ref()).await {
                Ok(observation) => {
                    if self.debouncer.observe(&observation).await {
                        report.notified += 1;
                    }
                    report.observations.push(observation);
                }
                Err(e) => {
                    error!(probe = probe.name(), error = %e, "Probe failed");
                    report.failures.push(format!("{}: {}", probe.name(), e));
                }
            }
        }

        let self_health = Observation::health_monitor(&report.failures);
        if self.debouncer.observe(&self_health).await {
            report.notified += 1;
        }
        report.observations.push(self_health);

        info!(
            probes = self.probes.len(),
            failures = report.failures.len(),
            notified = report.notified,
            "Health cycle complete"
        );
        report
    }
}
