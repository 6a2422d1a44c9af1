//! Application configuration management.
//!
//! Configuration is loaded from an optional YAML file with environment variable overrides. The
//! configuration file path defaults to `config.yaml` but can be specified via `-f` flag or the
//! `PLANTID_CONFIG` environment variable.
//!
//! ## Loading Priority
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`, may be absent)
//! 2. **Environment variables** - Variables prefixed with `PLANTID_` override YAML values
//!
//! For nested values use double underscores, e.g. `PLANTID_IDENTIFICATION__URL` sets
//! `identification.url`.
//!
//! ## API key
//!
//! The plant.id API key is normally not part of the loaded configuration. It is
//! resolved on every request via [`IdentificationConfig::resolve_api_key`], which reads the
//! environment variable named by `identification.api_key_env` (default `PLANT_ID_API_KEY`). A
//! missing key is reported to the user on upload, never at startup.
//!
//! ```yaml
//! host: 0.0.0.0
//! port: 5000
//! identification:
//!   url: https://api.plant.id/v2/identify
//!   api_key_env: PLANT_ID_API_KEY
//!   timeout: 30s
//! uploads:
//!   dir: static
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "PLANTID_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to ("0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Verbose logging for this crate and the HTTP layer
    pub debug: bool,
    /// Outbound plant.id settings
    pub identification: IdentificationConfig,
    /// Where uploaded images are stored and how large they may be
    pub uploads: UploadsConfig,
}

#[derive(Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentificationConfig {
    /// Endpoint receiving the identification POST
    pub url: Url,
    /// Name of the environment variable holding the API key, read per request
    pub api_key_env: String,
    /// Explicit API key; takes precedence over `api_key_env` when set
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Organ hints sent alongside the image
    pub organs: Vec<String>,
    /// Request timeout. Unset means wait for the upstream indefinitely.
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadsConfig {
    /// Directory uploads are written to, also served at `/static`
    pub dir: PathBuf,
    /// Maximum request body size in bytes. Unset disables the limit.
    pub max_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: true,
            identification: IdentificationConfig::default(),
            uploads: UploadsConfig::default(),
        }
    }
}

impl Default for IdentificationConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("https://api.plant.id/v2/identify").unwrap(),
            api_key_env: "PLANT_ID_API_KEY".to_string(),
            api_key: None,
            organs: vec!["leaf".to_string()],
            timeout: None,
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("static"),
            max_size: None,
        }
    }
}

impl std::fmt::Debug for IdentificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentificationConfig")
            .field("url", &self.url.as_str())
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("organs", &self.organs)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl IdentificationConfig {
    /// Look up the API key for this request.
    ///
    /// Returns the explicit `api_key` if configured and non-empty, else the value of the
    /// `api_key_env` variable. Empty values count as missing at either step.
    pub fn resolve_api_key(&self) -> Option<String> {
        let present = |key: &String| !key.trim().is_empty();

        self.api_key
            .clone()
            .filter(present)
            .or_else(|| std::env::var(&self.api_key_env).ok().filter(present))
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        let identification = &self.identification;

        if !matches!(identification.url.scheme(), "http" | "https") {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: identification.url must be http or https, got '{}'",
                    identification.url
                ),
            });
        }

        if identification.api_key_env.trim().is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: identification.api_key_env cannot be empty".to_string(),
            });
        }

        if identification.organs.is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: identification.organs must name at least one organ".to_string(),
            });
        }

        if self.uploads.dir.as_os_str().is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: uploads.dir cannot be empty".to_string(),
            });
        }

        if self.uploads.max_size == Some(0) {
            return Err(Error::Internal {
                operation: "Config validation: uploads.max_size must be greater than 0 (omit it to disable the limit)"
                    .to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables override specific values
            .merge(Env::prefixed("PLANTID_").ignore(&["CONFIG"]).split("__"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
