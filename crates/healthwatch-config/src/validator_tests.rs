
    use super::*;
    use crate::schema::{SmtpConfig, SmtpTls};

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.sources.public_url = "https://data.example.com/public".to_string();
        config.sources.private_url = "https://data.example.com/private".to_string();
        config.sources.username = "monitor".to_string();
        config.sources.password = "secret".to_string();
        config.smtp = Some(SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: Some("mailer".to_string()),
            password: Some("pw".to_string()),
            sender: "monitor@example.com".to_string(),
            recipient: "ops@example.com".to_string(),
            tls: SmtpTls::Starttls,
        });
        config
    }

    #[test]
    fn test_validate_complete_config() {
        let result = ConfigValidator::validate(&valid_config());
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_default_config_missing_sources() {
        let result = ConfigValidator::validate(&Config::default());
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "sources.public_url"));
        assert!(result.errors.iter().any(|e| e.path == "sources.private_url"));
    }

    #[test]
    fn test_validate_invalid_port() {
        let mut config = valid_config();
        config.server.port = 0;

        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "server.port"));
    }

    #[test]
    fn test_validate_host_forms() {
        for host in ["0.0.0.0", "::1", "localhost", "status.example.com"] {
            let mut config = valid_config();
            config.server.host = host.to_string();
            assert!(ConfigValidator::validate(&config).is_valid(), "{host}");
        }
    }

    #[test]
    fn test_validate_rejects_malformed_host() {
        for host in ["localhost:8080", "not a host", "-bad.example.com", "a..b"] {
            let mut config = valid_config();
            config.server.host = host.to_string();

            let result = ConfigValidator::validate(&config);
            assert!(result.errors.iter().any(|e| e.path == "server.host"), "{host}");
        }
    }

    #[test]
    fn test_validate_bad_url_scheme() {
        let mut config = valid_config();
        config.sources.private_url = "ftp://data.example.com".to_string();

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "sources.private_url"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = valid_config();
        config.sources.request_timeout_secs = Some(0);

        let result = ConfigValidator::validate(&config);
        assert!(result
            .errors
            .iter()
            .any(|e| e.path == "sources.request_timeout_secs"));
    }

    #[test]
    fn test_validate_missing_smtp_is_warning() {
        let mut config = valid_config();
        config.smtp = None;

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "smtp"));
    }

    #[test]
    fn test_validate_bad_recipient() {
        let mut config = valid_config();
        if let Some(smtp) = config.smtp.as_mut() {
            smtp.recipient = "nobody".to_string();
        }

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "smtp.recipient"));
    }

    #[test]
    fn test_validate_zero_interval() {
        let mut config = valid_config();
        config.probes.interval_secs = 0;

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "probes.interval_secs"));
    }

    #[test]
    fn test_validate_short_interval_warning() {
        let mut config = valid_config();
        config.probes.interval_secs = 10;

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.path == "probes.interval_secs"));
    }

    #[test]
    fn test_validate_guard_percent_range() {
        let mut config = valid_config();
        config.probes.disk_guard_percent = 150;

        let result = ConfigValidator::validate(&config);
        assert!(result
            .errors
            .iter()
            .any(|e| e.path == "probes.disk_guard_percent"));
    }

    #[test]
    fn test_validate_empty_disks() {
        let mut config = valid_config();
        config.probes.disks.clear();

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "probes.disks"));
    }

    #[test]
    fn test_into_result_summarizes_errors() {
        let mut config = valid_config();
        config.server.port = 0;
        config.probes.interval_secs = 0;

        let err = ConfigValidator::validate(&config).into_result().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("server.port"));
        assert!(msg.contains("probes.interval_secs"));
    }

    #[test]
    fn test_into_result_returns_warnings() {
        let mut config = valid_config();
        config.smtp = None;

        let warnings = ConfigValidator::validate(&config).into_result().unwrap();
        assert_eq!(warnings.len(), 1);
    }
