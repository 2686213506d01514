//! Error types

/// Rejected configuration value
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Blend weight outside `[0, 1]`, not finite, or a coefficient pair
    /// that does not sum to one
    #[error("invalid complementary filter weight: {0}")]
    InvalidBlendWeight(f32),
    /// Calibration requested with zero samples
    #[error("calibration sample count must be non-zero")]
    InvalidSampleCount,
}

/// Driver error, generic over the bus error `E`
///
/// Every failing operation leaves the estimator state exactly as it was
/// before the call, so the host can skip one actuation cycle and retry.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus transaction failed (device absent, NACK, arbitration loss...)
    #[error("sensor unavailable: {0:?}")]
    SensorUnavailable(E),
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// `update` or `calibrate` called before `initialize`
    #[error("sensor has not been initialized")]
    NotInitialized,
}
