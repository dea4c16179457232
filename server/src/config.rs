use shared::BoundingBox;
use std::error::Error;
use std::fmt;

/// Validated runtime configuration for the broadcast server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the WebSocket listener to.
    pub host: String,
    pub port: u16,
    /// Nominal broadcast interval. The simulation always advances by the
    /// measured elapsed time, never by this nominal value.
    pub tick_millis: u64,
    pub vehicle_count: usize,
    /// Region used for random sampling and for clamping vehicle motion.
    pub bounds: BoundingBox,
}

impl Config {
    /// Startup validation. Anything wrong here is fatal; there are no
    /// recoverable configuration errors at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bounds.is_valid() {
            return Err(ConfigError::InvalidBounds(self.bounds));
        }
        if self.vehicle_count == 0 {
            return Err(ConfigError::NoVehicles);
        }
        if self.tick_millis == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: shared::DEFAULT_PORT,
            tick_millis: shared::DEFAULT_TICK_MILLIS,
            vehicle_count: shared::DEFAULT_VEHICLE_COUNT,
            bounds: shared::DEFAULT_BOUNDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidBounds(BoundingBox),
    NoVehicles,
    ZeroTickInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBounds(bounds) => {
                write!(f, "bounding region {} is inverted or degenerate", bounds)
            }
            ConfigError::NoVehicles => write!(f, "vehicle count must be positive"),
            ConfigError::ZeroTickInterval => write!(f, "tick interval must be positive"),
        }
    }
}

impl Error for ConfigError {}
