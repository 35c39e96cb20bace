//! Configuration validation.

use std::net::IpAddr;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert into an error if any validation error was recorded.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        if self.is_valid() {
            return Ok(self.warnings);
        }
        let summary = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(ConfigError::Invalid(summary))
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

/// Dot-separated labels of ASCII letters, digits and inner hyphens.
fn is_host_name(host: &str) -> bool {
    host.len() <= 253
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_sources(config, &mut result);
        Self::validate_smtp(config, &mut result);
        Self::validate_probes(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        let host = &config.server.host;
        if host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        } else if host.parse::<IpAddr>().is_err() && !is_host_name(host) {
            result.add_error(ValidationError::new(
                "server.host",
                "Host must be an IP address or a host name",
            ));
        }
    }

    fn validate_sources(config: &Config, result: &mut ValidationResult) {
        let sources = &config.sources;
        for (path, url) in [
            ("sources.public_url", &sources.public_url),
            ("sources.private_url", &sources.private_url),
        ] {
            if url.is_empty() {
                result.add_error(ValidationError::new(path, "URL cannot be empty"));
            } else if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    path,
                    "URL must start with http:// or https://",
                ));
            }
        }

        if sources.username.is_empty() {
            result.add_warning(ValidationWarning::new(
                "sources.username",
                "No credentials set for the private source",
            ));
        }

        if sources.request_timeout_secs == Some(0) {
            result.add_error(ValidationError::new(
                "sources.request_timeout_secs",
                "request_timeout_secs must be greater than 0 when set",
            ));
        }
    }

    fn validate_smtp(config: &Config, result: &mut ValidationResult) {
        let Some(ref smtp) = config.smtp else {
            result.add_warning(ValidationWarning::new(
                "smtp",
                "SMTP is not configured, notifications will only be logged",
            ));
            return;
        };

        if smtp.host.is_empty() {
            result.add_error(ValidationError::new("smtp.host", "Host cannot be empty"));
        }
        if smtp.port == 0 {
            result.add_error(ValidationError::new("smtp.port", "Port cannot be 0"));
        }
        if !smtp.sender.contains('@') {
            result.add_error(ValidationError::new(
                "smtp.sender",
                "Sender must be an email address",
            ));
        }
        if !smtp.recipient.contains('@') {
            result.add_error(ValidationError::new(
                "smtp.recipient",
                "Recipient must be an email address",
            ));
        }
        if smtp.username.is_some() != smtp.password.is_some() {
            result.add_warning(ValidationWarning::new(
                "smtp",
                "username and password should be set together",
            ));
        }
    }

    fn validate_probes(config: &Config, result: &mut ValidationResult) {
        let probes = &config.probes;

        if probes.interval_secs == 0 {
            result.add_error(ValidationError::new(
                "probes.interval_secs",
                "interval_secs must be greater than 0",
            ));
        } else if probes.interval_secs < 60 {
            result.add_warning(ValidationWarning::new(
                "probes.interval_secs",
                "interval_secs below 60 shortens the debounce window",
            ));
        }

        if probes.disks.is_empty() {
            result.add_error(ValidationError::new(
                "probes.disks",
                "At least one disk must be monitored",
            ));
        }

        if !(0..=100).contains(&probes.disk_guard_percent) {
            result.add_error(ValidationError::new(
                "probes.disk_guard_percent",
                "disk_guard_percent must be between 0 and 100",
            ));
        }

        if probes.memory_guard_mb < 0 {
            result.add_error(ValidationError::new(
                "probes.memory_guard_mb",
                "memory_guard_mb cannot be negative",
            ));
        }

        if probes.public_refresh_secs == 0 {
            result.add_warning(ValidationWarning::new(
                "probes.public_refresh_secs",
                "public_refresh_secs of 0 refreshes on every status request",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
