//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub sources: SourcesConfig,

    /// SMTP delivery. Without it, notifications only reach the log.
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,

    #[serde(default)]
    pub probes: ProbesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Public status server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Health data sources.
///
/// The public base URL serves the index used for public container discovery.
/// The private base URL requires HTTP Basic credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub public_url: String,

    #[serde(default)]
    pub private_url: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Per-request timeout. Unset means transport defaults apply.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// SMTP transport security.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    /// Plain connection upgraded with STARTTLS.
    #[default]
    Starttls,
    /// Implicit TLS (SMTPS).
    Tls,
    /// Unencrypted. Only for local relays.
    None,
}

/// SMTP notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// From address.
    pub sender: String,

    /// Single monitor recipient.
    pub recipient: String,

    #[serde(default)]
    pub tls: SmtpTls,
}

fn default_smtp_port() -> u16 {
    587
}

/// Probe schedule and guard values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbesConfig {
    /// Period of the private health-check cycle.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Disk paths, checked in order.
    #[serde(default = "default_disks")]
    pub disks: Vec<String>,

    #[serde(default = "default_disk_guard_percent")]
    pub disk_guard_percent: i64,

    #[serde(default = "default_memory_guard_mb")]
    pub memory_guard_mb: i64,

    /// Minimum time between public status refreshes.
    #[serde(default = "default_public_refresh_secs")]
    pub public_refresh_secs: u64,
}

impl Default for ProbesConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            disks: default_disks(),
            disk_guard_percent: default_disk_guard_percent(),
            memory_guard_mb: default_memory_guard_mb(),
            public_refresh_secs: default_public_refresh_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    300
}

fn default_disks() -> Vec<String> {
    vec!["/".to_string(), "/srv".to_string()]
}

fn default_disk_guard_percent() -> i64 {
    90
}

fn default_memory_guard_mb() -> i64 {
    512
}

fn default_public_refresh_secs() -> u64 {
    60
}

/// Log file settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for rolling log files. Defaults to `~/.healthwatch/logs`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl LoggingConfig {
    /// Resolve the log directory.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".healthwatch").join("logs"))
                .unwrap_or_else(|| PathBuf::from(".healthwatch/logs"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_probes_defaults() {
        let probes = ProbesConfig::default();
        assert_eq!(probes.interval_secs, 300);
        assert_eq!(probes.disks, vec!["/", "/srv"]);
        assert_eq!(probes.disk_guard_percent, 90);
        assert_eq!(probes.memory_guard_mb, 512);
        assert_eq!(probes.public_refresh_secs, 60);
    }

    #[test]
    fn test_smtp_tls_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            tls: SmtpTls,
        }
        let w: Wrapper = toml::from_str("tls = \"none\"").unwrap();
        assert_eq!(w.tls, SmtpTls::None);
        let w: Wrapper = toml::from_str("tls = \"tls\"").unwrap();
        assert_eq!(w.tls, SmtpTls::Tls);
    }

    #[test]
    fn test_logging_dir_override() {
        let logging = LoggingConfig {
            dir: Some(PathBuf::from("/var/log/healthwatch")),
        };
        assert_eq!(logging.resolved_dir(), PathBuf::from("/var/log/healthwatch"));
    }

    #[test]
    fn test_logging_dir_default() {
        let logging = LoggingConfig::default();
        assert!(logging.resolved_dir().ends_with("logs"));
    }
}
