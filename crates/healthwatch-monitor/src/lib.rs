//! # healthwatch Monitor
//!
//! Periodic health probes with debounced notifications.
//!
//! ## Features
//!
//! - Health source client for public and credentialed endpoints
//! - Disk, memory and container probes that fail closed
//! - Asymmetric debounce: recovery reported at once, problems on the second sample
//! - Notifications via the log and SMTP email
//! - Cached public container status over HTTP

pub mod alert_channels;
pub mod alert_manager;
pub mod alerts;
pub mod cycle;
pub mod debounce;
pub mod error;
pub mod probes;
pub mod public_status;
pub mod server;
pub mod source;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use alert_channels::EmailChannel;
pub use alert_manager::AlertManager;
pub use alerts::{AlertChannel, LogChannel, Notification};
pub use cycle::{CycleReport, HealthMonitor};
pub use debounce::{DebounceState, Debouncer, StateStore};
pub use error::MonitorError;
pub use probes::{ContainersProbe, DiskGuard, MemoryGuard, Probe};
pub use public_status::{ContainerStatus, PublicStatusCache, StatusMap};
pub use server::{status_router, StatusServer};
pub use source::{Access, ContainerEndpoint, HealthSource, HttpHealthSource};
pub use state::{Category, MessageArgs, Observation, StateKey, StateValue};
