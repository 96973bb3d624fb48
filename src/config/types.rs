//! The configuration structs used to build the AppConfig, and their impls.
use std::{path::Path, time::Duration};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use strum_macros::AsRefStr;

use crate::config::{ConfigError, ConfigResult, WEBHOOK_URL_ENV};

// ###################################
// ->  STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    #[serde(default)]
    pub webhook_config: WebhookConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

/// Where signups get relayed to.
/// A missing `url` is a valid configuration, the app still starts but rejects every signup.
#[derive(Deserialize, Debug, Default)]
pub struct WebhookConfig {
    pub url: Option<SecretString>,
    pub timeout_millis: Option<u64>,
}

// ###################################
// ->  IMPLs
// ###################################
impl AppConfig {
    /// Loads the configuration from the `config` directory inside the current working directory.
    pub fn load(environment: Environment) -> ConfigResult<Self> {
        let config_dir = std::env::current_dir()?.join("config");
        Self::load_from(&config_dir, environment)
    }

    /// Layers, from lowest to highest priority:
    /// `base.toml`, `{environment}.toml`, `APP_*` env variables and finally `MAKE_WEBHOOK_URL`.
    pub fn load_from(config_dir: &Path, environment: Environment) -> ConfigResult<Self> {
        let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

        let config = Figment::new()
            .merge(Toml::file(config_dir.join("base.toml")))
            .merge(Toml::file(config_dir.join(environment_filename)))
            .merge(Env::prefixed("APP_").split("__"))
            .merge(
                Env::raw()
                    .only(&[WEBHOOK_URL_ENV])
                    .map(|_| "webhook_config.url".into()),
            )
            .extract()?;

        Ok(config)
    }
}

impl WebhookConfig {
    /// The configured url, unless it is empty or only whitespace.
    pub fn url(&self) -> Option<&SecretString> {
        self.url
            .as_ref()
            .filter(|url| !url.expose_secret().trim().is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_millis.map(Duration::from_millis)
    }
}

// ###################################
// ->  TRY FROMs
// ###################################
impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail),
        }
    }
}
