//! Layered configuration loading.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "RESERVA_CONFIG_DIR";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "RESERVA";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Loads configuration from (in order of priority):
/// 1. `default.toml` (required)
/// 2. `{environment}.toml` (optional)
/// 3. `local.toml` (optional)
/// 4. `RESERVA_*` environment variables (highest priority)
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: AppEnvironment,
}

impl ConfigLoader {
    pub fn new() -> Self {
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        Self {
            config_dir,
            environment: AppEnvironment::from_env(),
        }
    }

    /// Loads a single explicit file instead of the layered set. Used by the
    /// CLI `--config` flag; environment variables still apply on top.
    pub fn with_file(path: PathBuf) -> Result<Settings, ConfigError> {
        let config = Self::add_env_source(
            Config::builder()
                .add_source(File::new(path.to_str().unwrap_or_default(), FileFormat::Toml)),
        )
        .build()?;
        Self::deserialize(config)
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Loads and validates settings from all layered sources.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let builder = Config::builder();
        let builder = self.add_file_source(builder, &self.config_dir.join("default.toml"), true)?;
        let builder = self.add_file_source(
            builder,
            &self
                .config_dir
                .join(format!("{}.toml", self.environment.as_str())),
            false,
        )?;
        let builder = self.add_file_source(builder, &self.config_dir.join("local.toml"), false)?;
        let config = Self::add_env_source(builder).build()?;
        Self::deserialize(config)
    }

    fn deserialize(config: Config) -> Result<Settings, ConfigError> {
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn add_file_source(
        &self,
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }
        Ok(builder.add_source(
            File::new(path.to_str().unwrap_or_default(), FileFormat::Toml).required(required),
        ))
    }

    /// `RESERVA_SERVER__PORT` -> `server.port`, `RESERVA_DATABASE__URL` ->
    /// `database.url`, and so on.
    fn add_env_source(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> config::ConfigBuilder<config::builder::DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
