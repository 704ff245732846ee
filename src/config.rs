/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::ConfigError;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub building: BuildingConfig,
    pub elevator: ElevatorConfig,
    pub generator: GeneratorConfig,
    pub status: StatusConfig,
    pub shutdown: ShutdownConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BuildingConfig {
    pub n_floors: u8,
    pub n_elevators: usize,
}

/// Timings are in milliseconds.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ElevatorConfig {
    pub start_floor: u8,
    pub floor_travel_time: u64,
    pub dwell_time: u64,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub enabled: bool,
    pub interval: u64,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFormat {
    Text,
    Json,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StatusConfig {
    pub interval: u64,
    pub format: StatusFormat,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ShutdownConfig {
    pub sentinel: String,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        BuildingConfig {
            n_floors: 10,
            n_elevators: 2,
        }
    }
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        ElevatorConfig {
            start_floor: 0,
            floor_travel_time: 1000,
            dwell_time: 1000,
        }
    }
}

impl ElevatorConfig {
    pub fn travel_duration(&self) -> Duration {
        Duration::from_millis(self.floor_travel_time)
    }

    pub fn dwell_duration(&self) -> Duration {
        Duration::from_millis(self.dwell_time)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            enabled: true,
            interval: 1000,
            seed: None,
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        StatusConfig {
            interval: 1000,
            format: StatusFormat::Text,
        }
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        ShutdownConfig {
            sentinel: "0".to_string(),
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(config_str)?)
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&config_str)
}

/// Like `load_config`, but a missing file yields the built-in defaults.
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    match load_config(path) {
        Err(ConfigError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
            log::info!("No config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
        result => result,
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
