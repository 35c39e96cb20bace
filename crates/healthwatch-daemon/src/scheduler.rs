//! Periodic health-check scheduler.
//!
//! Cycles run strictly one after another: a tick that comes due while a cycle
//! is still running is delayed, never run concurrently. Shutdown is honoured
//! between cycles only, so in-flight probes always run to completion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use healthwatch_monitor::HealthMonitor;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::error::DaemonError;
use crate::signal::SignalHandler;

/// Runs the health monitor on a fixed period.
pub struct Scheduler {
    monitor: Arc<HealthMonitor>,
    period: Duration,
    signals: SignalHandler,
    cycles: AtomicU64,
}

impl Scheduler {
    pub fn new(
        monitor: Arc<HealthMonitor>,
        period: Duration,
        signals: SignalHandler,
    ) -> Result<Self, DaemonError> {
        if period.is_zero() {
            return Err(DaemonError::InvalidSchedule(
                "period must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            monitor,
            period,
            signals,
            cycles: AtomicU64::new(0),
        })
    }

    /// Completed cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    /// Run a cycle immediately, then one per period, until shutdown.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown = self.signals.subscribe();

        info!(period_secs = self.period.as_secs(), "Scheduler started");

        loop {
            if self.signals.is_shutdown_requested() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.monitor.run_cycle().await;
                    let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
                    if !report.failures.is_empty() {
                        warn!(cycle, failures = ?report.failures, "Cycle finished with probe failures");
                    }
                }
                _ = shutdown.recv() => break,
            }
        }

        info!(cycles = self.cycles(), "Scheduler stopped");
    }
}
