//! Tries to create an `AppConfig` from config files and the environment.
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod error;
mod types;

use std::sync::OnceLock;
use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, Environment, NetConfig, WebhookConfig};

/// The env variable holding the url every signup gets relayed to.
pub const WEBHOOK_URL_ENV: &str = "MAKE_WEBHOOK_URL";

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!(
            "{:<12} - Initializing the configuration",
            "get_or_init_config"
        );

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .unwrap_or_else(|er| panic!("Fatal Error: Parsing APP_ENVIRONMENT: {er}"));

        AppConfig::load(environment)
            .unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"))
    })
}
