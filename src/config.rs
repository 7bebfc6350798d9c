use anyhow::{Context, Result};
use config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Selects the security header preset ("development" or "production")
    pub environment: String,
}

impl Config {
    /// Load configuration from defaults, optional TOML files, `CASES__*`
    /// variables and finally `PORT`.
    pub fn load() -> Result<Self> {
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        Self::load_from(Path::new(&config_dir), &environment, env::var("PORT").ok())
    }

    pub fn load_from(config_dir: &Path, environment: &str, port: Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("security.environment", environment)?;

        let base_config = config_dir.join("base.toml");
        if base_config.exists() {
            builder = builder.add_source(File::from(base_config));
        }

        let env_config = config_dir.join(format!("{environment}.toml"));
        if env_config.exists() {
            builder = builder.add_source(File::from(env_config));
        }

        builder = builder
            .add_source(
                Environment::with_prefix("CASES")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port)?;

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.server.host.trim().is_empty() {
            anyhow::bail!("Server host must not be empty");
        }

        Ok(())
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
            },
            security: SecurityConfig {
                environment: "development".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING_DIR: &str = "does-not-exist-config-dir";

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.server.port = 0;
        assert!(config.validate().is_err());

        config.server.port = 3001;
        config.server.host = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_port_override() {
        let config =
            Config::load_from(Path::new(MISSING_DIR), "test", Some("8081".to_string())).unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.security.environment, "test");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = Config::load_from(Path::new(MISSING_DIR), "test", Some("not-a-port".into()));
        assert!(result.is_err());

        let result = Config::load_from(Path::new(MISSING_DIR), "test", Some("0".into()));
        assert!(result.is_err());
    }
}
