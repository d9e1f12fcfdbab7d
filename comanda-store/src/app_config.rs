use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Monthly billable-order allowance for metered free-tier tenants
    #[serde(default = "default_monthly_order_limit")]
    pub free_monthly_order_limit: u32,
    /// Price of one pay-per-use top-up, in cents
    #[serde(default = "default_top_up_price")]
    pub top_up_price_cents: i32,
    /// Park over-limit orders instead of rejecting them outright
    #[serde(default = "default_retain")]
    pub retain_over_limit: bool,
}

fn default_monthly_order_limit() -> u32 {
    5
}

fn default_top_up_price() -> i32 {
    990
}

fn default_retain() -> bool {
    true
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            free_monthly_order_limit: default_monthly_order_limit(),
            top_up_price_cents: default_top_up_price(),
            retain_over_limit: default_retain(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default").required(false))
            // Add in the current environment file
            // Default to 'development' env
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of COMANDA)
            // Eg.. `COMANDA__SERVER__PORT=9000` would set the server port
            .add_source(config::Environment::with_prefix("COMANDA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
