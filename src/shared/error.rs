use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("floor {floor} is outside 1..={n_floors}")]
    InvalidFloor { floor: u8, n_floors: u8 },

    #[error("invalid building: {0}")]
    InvalidBuilding(String),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
