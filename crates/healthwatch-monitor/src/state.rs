//! State keys, values and notification message templates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker appended to the unhealthy container list when discovery stops early.
pub const TRUNCATED_MARKER: &str = "...and more...";

/// Monitored category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Disk,
    Memory,
    Containers,
    #[serde(rename = "HEALTHMONITOR")]
    HealthMonitor,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Disk => write!(f, "DISK"),
            Category::Memory => write!(f, "MEMORY"),
            Category::Containers => write!(f, "CONTAINERS"),
            Category::HealthMonitor => write!(f, "HEALTHMONITOR"),
        }
    }
}

/// Observed severity. Only `Fine` is positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StateValue {
    Fine,
    Warn,
}

impl StateValue {
    /// Whether this value describes an unhealthy state.
    pub fn is_negative(&self) -> bool {
        !matches!(self, StateValue::Fine)
    }

    /// `Warn` when the condition holds, `Fine` otherwise.
    pub fn warn_if(condition: bool) -> Self {
        if condition {
            StateValue::Warn
        } else {
            StateValue::Fine
        }
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Fine => write!(f, "FINE"),
            StateValue::Warn => write!(f, "WARN"),
        }
    }
}

/// Identifies an independent debounce track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub category: Category,
    pub qualifier: Option<String>,
}

impl StateKey {
    pub fn new(category: Category, qualifier: Option<String>) -> Self {
        Self {
            category,
            qualifier,
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.qualifier {
            Some(ref q) if !q.is_empty() => write!(f, "{}-{}", self.category, q),
            _ => write!(f, "{}", self.category),
        }
    }
}

/// Disk usage as reported, `None` when it could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage(pub Option<i64>);

impl fmt::Display for DiskUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(percent) => write!(f, "{}", percent),
            None => write!(f, "undefined"),
        }
    }
}

/// Template arguments, one variant per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageArgs {
    Disk {
        usage: DiskUsage,
        guard_percent: i64,
        disk: String,
    },
    Memory {
        available_mb: i64,
        guard_mb: i64,
    },
    Containers {
        unhealthy: Vec<String>,
    },
    HealthMonitor {
        detail: Option<String>,
    },
}

impl MessageArgs {
    pub fn category(&self) -> Category {
        match self {
            MessageArgs::Disk { .. } => Category::Disk,
            MessageArgs::Memory { .. } => Category::Memory,
            MessageArgs::Containers { .. } => Category::Containers,
            MessageArgs::HealthMonitor { .. } => Category::HealthMonitor,
        }
    }
}

/// Render the message body for a category and value.
pub fn render(value: StateValue, args: &MessageArgs) -> String {
    match (args, value) {
        (
            MessageArgs::Disk {
                usage,
                guard_percent,
                disk,
            },
            StateValue::Warn,
        ) => format!(
            "WARN: Disk usage for {} is at {}%. Above the guard value of {}%",
            disk, usage, guard_percent
        ),
        (
            MessageArgs::Disk {
                usage,
                guard_percent,
                disk,
            },
            StateValue::Fine,
        ) => format!(
            "FINE: Disk usage for {} is at {}%. Below the guard value of {}%",
            disk, usage, guard_percent
        ),
        (
            MessageArgs::Memory {
                available_mb,
                guard_mb,
            },
            StateValue::Warn,
        ) => format!(
            "WARN: Available memory is {}MB. Below the guard value of {}MB",
            available_mb, guard_mb
        ),
        (
            MessageArgs::Memory {
                available_mb,
                guard_mb,
            },
            StateValue::Fine,
        ) => format!(
            "FINE: Available memory is {}MB. Above the guard value of {}MB",
            available_mb, guard_mb
        ),
        (MessageArgs::Containers { unhealthy }, StateValue::Warn) => {
            format!("WARN: Detected unhealthy containers {}", unhealthy.join(","))
        }
        (MessageArgs::Containers { .. }, StateValue::Fine) => {
            "FINE: All containers are healthy".to_string()
        }
        (MessageArgs::HealthMonitor { detail }, StateValue::Warn) => format!(
            "WARN: Health monitor is down :() {}",
            detail.as_deref().unwrap_or_default()
        ),
        (MessageArgs::HealthMonitor { .. }, StateValue::Fine) => {
            "FINE: Health monitor is fine ".to_string()
        }
    }
}

/// One evaluator result, ready for the debouncer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub value: StateValue,
    pub qualifier: Option<String>,
    pub args: MessageArgs,
}

impl Observation {
    pub fn new(value: StateValue, args: MessageArgs) -> Self {
        Self {
            value,
            qualifier: None,
            args,
        }
    }

    /// Track this observation separately per instance.
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Self-health report for a completed cycle.
    pub fn health_monitor(failures: &[String]) -> Self {
        if failures.is_empty() {
            Self::new(
                StateValue::Fine,
                MessageArgs::HealthMonitor { detail: None },
            )
        } else {
            Self::new(
                StateValue::Warn,
                MessageArgs::HealthMonitor {
                    detail: Some(failures.join("; ")),
                },
            )
        }
    }

    pub fn category(&self) -> Category {
        self.args.category()
    }

    pub fn key(&self) -> StateKey {
        StateKey::new(self.category(), self.qualifier.clone())
    }

    /// Email subject line.
    pub fn subject(&self) -> String {
        format!("MONITOR | {}", self.value)
    }

    /// Rendered message body.
    pub fn message(&self) -> String {
        render(self.value, &self.args)
    }
}
