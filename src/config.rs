use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    coefficients::ModelCoefficients, engine::DEFAULT_HORIZON, error::ConfigError,
};

fn default_horizon() -> usize {
    DEFAULT_HORIZON
}

fn default_max_horizon() -> usize {
    1_200
}

fn default_noise() -> bool {
    true
}

fn default_catalogue_path() -> PathBuf {
    PathBuf::from("data/reserves.yaml")
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub coefficients: ModelCoefficients,
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    #[serde(default = "default_max_horizon")]
    pub max_horizon: usize,
    /// Master seed for the noise streams; drawn from entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_noise")]
    pub noise: bool,
    #[serde(default = "default_catalogue_path")]
    pub catalogue_path: PathBuf,
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
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

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            coefficients: ModelCoefficients::default(),
            horizon: default_horizon(),
            max_horizon: default_max_horizon(),
            seed: None,
            noise: default_noise(),
            catalogue_path: default_catalogue_path(),
            report_dir: default_report_dir(),
            server: ServerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, or returns the defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.coefficients.validate()?;
        self.check_horizon(self.horizon)
    }

    /// Where `simulate` writes reports: the explicit directory, else `report_dir`.
    pub fn report_dir_or(&self, output: Option<PathBuf>) -> PathBuf {
        output.unwrap_or_else(|| self.report_dir.clone())
    }

    pub fn check_horizon(&self, horizon: usize) -> Result<(), ConfigError> {
        if horizon > self.max_horizon {
            return Err(ConfigError::HorizonTooLong {
                horizon,
                max: self.max_horizon,
            });
        }
        Ok(())
    }
}
