use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";

/// Application configuration.
///
/// All tunables the services need (tax rate, unit conversion factors, pool
/// sizing) live here and are injected through constructors; there are no
/// module-level constants holding mutable or environment-dependent state.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection URL
    #[validate(length(min = 1, message = "database_url must not be empty"))]
    pub database_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    #[serde(default = "default_env")]
    pub environment: String,

    /// Logging level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// Sales tax rate applied to order totals
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,

    /// Liters per US gallon, used for capacity comparisons
    #[serde(default = "default_liters_per_gallon")]
    pub liters_per_gallon: Decimal,

    /// Liters per oil barrel, used for capacity comparisons
    #[serde(default = "default_liters_per_barrel")]
    pub liters_per_barrel: Decimal,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB connect timeout (seconds)
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_env() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_tax_rate() -> Decimal {
    dec!(0.18)
}
fn default_liters_per_gallon() -> Decimal {
    dec!(3.78541)
}
fn default_liters_per_barrel() -> Decimal {
    dec!(159)
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Builds a configuration programmatically. Used by tests and tooling;
    /// production deployments go through [`load_config`].
    pub fn new(database_url: String, host: String, port: u16, environment: String) -> Self {
        Self {
            database_url,
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            tax_rate: default_tax_rate(),
            liters_per_gallon: default_liters_per_gallon(),
            liters_per_barrel: default_liters_per_barrel(),
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
        }
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

/// Loads configuration from `config/default.toml`, an environment-specific
/// overlay, and `FUELFLOW_*` environment variables (highest precedence).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let run_env = std::env::var("FUELFLOW_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let cfg = Config::builder()
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("FUELFLOW"))
        .build()?;

    let app_config: AppConfig = cfg.try_deserialize()?;

    app_config
        .validate()
        .map_err(|e| ConfigError::Message(format!("invalid configuration: {}", e)))?;

    if app_config.tax_rate < Decimal::ZERO || app_config.tax_rate >= Decimal::ONE {
        return Err(ConfigError::Message(format!(
            "tax_rate must be in [0, 1), got {}",
            app_config.tax_rate
        )));
    }

    Ok(app_config)
}

/// Initializes the global tracing subscriber.
pub fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_business_constants() {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            8080,
            "test".to_string(),
        );
        assert_eq!(cfg.tax_rate, dec!(0.18));
        assert_eq!(cfg.liters_per_gallon, dec!(3.78541));
        assert_eq!(cfg.liters_per_barrel, dec!(159));
        assert!(!cfg.auto_migrate);
    }
}
