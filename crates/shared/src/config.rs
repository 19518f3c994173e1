//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Compliance configuration.
    #[serde(default)]
    pub compliance: ComplianceConfig,
    /// Settlement provider configuration.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Reconciler configuration.
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
    /// Demo data configuration.
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
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

/// Compliance configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ComplianceConfig {
    /// Jurisdictions payments may originate from (ISO country codes).
    #[serde(default = "default_allowed_countries")]
    pub allowed_countries: Vec<String>,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            allowed_countries: default_allowed_countries(),
        }
    }
}

fn default_allowed_countries() -> Vec<String> {
    ["VN", "KR", "JP", "KZ", "KG"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Settlement provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Deadline for a single authorization call in milliseconds.
    #[serde(default = "default_authorize_timeout_ms")]
    pub authorize_timeout_ms: u64,
    /// Largest amount the sandbox provider will approve.
    #[serde(default = "default_max_amount")]
    pub max_amount: Decimal,
    /// Simulated network latency of the sandbox provider in milliseconds.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Seconds after authorization at which the sandbox reports settlement.
    #[serde(default = "default_settle_after_secs")]
    pub settle_after_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            authorize_timeout_ms: default_authorize_timeout_ms(),
            max_amount: default_max_amount(),
            latency_ms: default_latency_ms(),
            settle_after_secs: default_settle_after_secs(),
        }
    }
}

fn default_authorize_timeout_ms() -> u64 {
    3000
}

fn default_max_amount() -> Decimal {
    Decimal::new(1_000_00, 2) // 1000.00
}

fn default_latency_ms() -> u64 {
    200
}

fn default_settle_after_secs() -> u64 {
    60
}

/// Reconciler configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcilerConfig {
    /// Seconds between reconciliation cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Deadline for a single settlement check in milliseconds.
    #[serde(default = "default_check_timeout_ms")]
    pub check_timeout_ms: u64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            check_timeout_ms: default_check_timeout_ms(),
        }
    }
}

fn default_interval_secs() -> u64 {
    30
}

fn default_check_timeout_ms() -> u64 {
    1000
}

/// Demo data configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    /// Whether to credit the demo accounts on startup.
    #[serde(default = "default_seed_accounts")]
    pub seed_accounts: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed_accounts: default_seed_accounts(),
        }
    }
}

fn default_seed_accounts() -> bool {
    true
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("VIREO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
