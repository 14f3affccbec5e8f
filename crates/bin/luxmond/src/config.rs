//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `luxmon.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use luxmon_domain::error::LuxmonError;
use luxmon_domain::rule::{NoComsRule, RuleSet, ZeroReadsRule};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// HTTP cross-origin settings.
    pub http: HttpConfig,
    /// Job automation settings.
    pub automation: AutomationConfig,
    /// Integration toggles.
    pub integrations: IntegrationsConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Cross-origin configuration for the JSON API.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Origins allowed by the CORS layer. An empty list allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

/// Job automation configuration — the sweep cadence plus the per-rule
/// parameter blocks.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Minutes between automation sweeps.
    pub sweep_interval_minutes: u64,
    /// No-communication rule parameters.
    pub no_coms: NoComsRule,
    /// Zero-generation rule parameters.
    pub zero_reads: ZeroReadsRule,
}

impl AutomationConfig {
    /// Assemble the domain [`RuleSet`] from the configured parameters.
    #[must_use]
    pub fn rule_set(&self) -> RuleSet {
        RuleSet {
            no_coms: self.no_coms.clone(),
            zero_reads: self.zero_reads.clone(),
        }
    }
}

/// Per-integration toggles.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    /// Seed demo sites from the simulator integration on first start.
    pub simulator_enabled: bool,
}

impl Config {
    /// Load configuration from `luxmon.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("luxmon.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LUXMON_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("LUXMON_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("LUXMON_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("LUXMON_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("LUXMON_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("LUXMON_CORS_ALLOWED_ORIGINS") {
            self.http.cors_allowed_origins = val
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Ok(val) = std::env::var("LUXMON_SWEEP_INTERVAL_MINUTES") {
            if let Ok(minutes) = val.parse() {
                self.automation.sweep_interval_minutes = minutes;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.automation.sweep_interval_minutes == 0 {
            return Err(ConfigError::Validation(
                "sweep_interval_minutes must be non-zero".to_string(),
            ));
        }
        if let Err(err) = self.automation.rule_set().validate() {
            let detail = match err {
                LuxmonError::Validation(inner) => inner.to_string(),
                other => other.to_string(),
            };
            return Err(ConfigError::Validation(detail));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:luxmon.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "luxmond=info,luxmon=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            sweep_interval_minutes: 60,
            no_coms: NoComsRule::default(),
            zero_reads: ZeroReadsRule::default(),
        }
    }
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            simulator_enabled: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.url, "sqlite:luxmon.db?mode=rwc");
        assert_eq!(config.automation.sweep_interval_minutes, 60);
        assert!(!config.integrations.simulator_enabled);
    }

    #[test]
    fn should_carry_original_rule_defaults() {
        let config = Config::default();
        let rules = config.automation.rule_set();
        assert!(rules.no_coms.enabled);
        assert_eq!(rules.no_coms.days_threshold, 3);
        assert_eq!(rules.no_coms.job_type_name, "No Communication");
        assert!(rules.no_coms.check_duplicate);
        assert_eq!(rules.zero_reads.days_to_check, 4);
        assert_eq!(rules.zero_reads.readings_to_compare, 3);
        assert_eq!(rules.zero_reads.job_type_name, "Zero Generation");
    }

    #[test]
    fn should_parse_minimal_toml() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [http]
            cors_allowed_origins = ['https://ops.example.com']

            [automation]
            sweep_interval_minutes = 15

            [automation.no_coms]
            enabled = true
            days_threshold = 5
            job_type_name = 'Comms Fault'
            check_duplicate = false

            [automation.zero_reads]
            enabled = false

            [integrations]
            simulator_enabled = true
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(
            config.http.cors_allowed_origins,
            vec!["https://ops.example.com"]
        );
        assert_eq!(config.automation.sweep_interval_minutes, 15);
        assert_eq!(config.automation.no_coms.days_threshold, 5);
        assert_eq!(config.automation.no_coms.job_type_name, "Comms Fault");
        assert!(!config.automation.no_coms.check_duplicate);
        assert!(!config.automation.zero_reads.enabled);
        assert!(config.integrations.simulator_enabled);
    }

    #[test]
    fn should_keep_rule_defaults_for_partial_automation_block() {
        let toml = "
            [automation.no_coms]
            days_threshold = 7
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.automation.no_coms.days_threshold, 7);
        assert_eq!(
            config.automation.no_coms.job_type_name,
            "No Communication"
        );
        assert_eq!(config.automation.zero_reads.readings_to_compare, 3);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_sweep_interval() {
        let mut config = Config::default();
        config.automation.sweep_interval_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_invalid_rule_parameters() {
        let mut config = Config::default();
        config.automation.zero_reads.readings_to_compare = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_default_configuration() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
