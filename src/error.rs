use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// The profile cannot produce a positive carrying capacity.
    #[error("invalid area profile: {0}")]
    InvalidProfile(String),
}

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("unknown reserve '{0}'")]
    UnknownReserve(String),
    #[error("catalogue validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("coefficient '{name}' must be a positive finite number, got {value}")]
    Coefficient { name: &'static str, value: f64 },
    #[error("horizon {horizon} exceeds the configured maximum of {max}")]
    HorizonTooLong { horizon: usize, max: usize },
}
