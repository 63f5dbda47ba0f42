use thiserror::Error;

/// Top-level error type for autopark.
#[derive(Debug, Error)]
pub enum AutoparkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimError),
}

/// Configuration errors, raised when a scene or episode config is loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid tick_seconds: {0} (must be > 0)")]
    InvalidTickSeconds(f64),

    #[error("Invalid required_parking_duration: {0} (must be > 0)")]
    InvalidParkingDuration(f64),

    #[error("{field} must be > 0, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Incompatible configuration: {0}")]
    Incompatible(String),
}

/// Errors surfaced by the ECS adapter when the host world is not in the
/// shape the episode engine expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Non-finite state: {0}")]
    NonFiniteState(String),
}
