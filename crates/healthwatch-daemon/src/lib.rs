//! # healthwatch Daemon
//!
//! Drives the private health-check cycle on a fixed period and handles OS
//! shutdown signals.

pub mod error;
pub mod scheduler;
pub mod signal;

pub use error::DaemonError;
pub use scheduler::Scheduler;
pub use signal::{DaemonSignal, SignalHandler};
