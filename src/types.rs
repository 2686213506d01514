//! Device configuration and filter settings

use crate::error::ConfigError;
use crate::registers::FULL_SCALE_SHIFT;

/// Default gyroscope weight of the complementary filter
pub const DEFAULT_GYRO_WEIGHT: f32 = 0.98;

/// Gyroscope full-scale range
///
/// The range fixes the raw-to-physical conversion, so the divisor is always
/// taken from [`GyroRange::sensitivity`] rather than stored separately.
///
/// # Example
/// ```
/// use mpu6050_fusion::GyroRange;
///
/// assert_eq!(GyroRange::Dps500.sensitivity(), 65.5);
/// assert_eq!(GyroRange::Dps500.register_value(), 0x08);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroRange {
    /// ±250 deg/s
    Dps250 = 0,
    /// ±500 deg/s
    #[default]
    Dps500 = 1,
    /// ±1000 deg/s
    Dps1000 = 2,
    /// ±2000 deg/s
    Dps2000 = 3,
}

impl GyroRange {
    /// Sensitivity in LSB per deg/s
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::Dps250 => 131.0,
            Self::Dps500 => 65.5,
            Self::Dps1000 => 32.8,
            Self::Dps2000 => 16.4,
        }
    }

    /// Value written to `GYRO_CONFIG`
    pub const fn register_value(self) -> u8 {
        (self as u8) << FULL_SCALE_SHIFT
    }

    /// Converts a raw reading to deg/s
    pub fn scale(self, raw: i16) -> f32 {
        raw as f32 / self.sensitivity()
    }
}

/// Accelerometer full-scale range
///
/// # Example
/// ```
/// use mpu6050_fusion::AccelRange;
///
/// assert_eq!(AccelRange::G2.scale(16384), 1.0);
/// assert_eq!(AccelRange::G8.register_value(), 0x10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelRange {
    /// ±2 g
    #[default]
    G2 = 0,
    /// ±4 g
    G4 = 1,
    /// ±8 g
    G8 = 2,
    /// ±16 g
    G16 = 3,
}

impl AccelRange {
    /// Sensitivity in LSB per g
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::G2 => 16384.0,
            Self::G4 => 8192.0,
            Self::G8 => 4096.0,
            Self::G16 => 2048.0,
        }
    }

    /// Value written to `ACCEL_CONFIG`
    pub const fn register_value(self) -> u8 {
        (self as u8) << FULL_SCALE_SHIFT
    }

    /// Converts a raw reading to g
    pub fn scale(self, raw: i16) -> f32 {
        raw as f32 / self.sensitivity()
    }
}

/// Digital low-pass filter bandwidth (accelerometer figure, `DLPF_CFG`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DlpfBandwidth {
    /// 260 Hz, filter effectively disabled
    #[default]
    Hz260 = 0,
    Hz184 = 1,
    Hz94 = 2,
    Hz44 = 3,
    Hz21 = 4,
    Hz10 = 5,
    Hz5 = 6,
}

impl DlpfBandwidth {
    /// Value written to `CONFIG`
    pub const fn register_value(self) -> u8 {
        self as u8
    }
}

/// Clock source selected in `PWR_MGMT_1`
///
/// Writing any of these also clears the SLEEP bit, waking the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Internal 8 MHz oscillator
    Internal = 0,
    /// PLL referenced to the X gyroscope
    #[default]
    PllGyroX = 1,
    /// PLL referenced to the Y gyroscope
    PllGyroY = 2,
    /// PLL referenced to the Z gyroscope
    PllGyroZ = 3,
}

impl ClockSource {
    /// Value written to `PWR_MGMT_1`
    pub const fn register_value(self) -> u8 {
        self as u8
    }
}

/// Device configuration written once by `initialize`
///
/// # Example
/// ```
/// use mpu6050_fusion::{DeviceConfig, DlpfBandwidth, GyroRange};
///
/// let config = DeviceConfig {
///     gyro_range: GyroRange::Dps1000,
///     dlpf: DlpfBandwidth::Hz44,
///     ..Default::default()
/// };
/// assert_eq!(config.sample_rate_divider, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Sample rate = gyro output rate / (1 + divider)
    pub sample_rate_divider: u8,
    /// Digital low-pass filter setting
    pub dlpf: DlpfBandwidth,
    /// Gyroscope full-scale range; also fixes the deg/s divisor
    pub gyro_range: GyroRange,
    /// Accelerometer full-scale range; also fixes the g divisor
    pub accel_range: AccelRange,
    /// Power management clock source
    pub clock_source: ClockSource,
}

impl DeviceConfig {
    /// Register writes performed by `initialize`, in order
    pub fn register_writes(&self) -> [(u8, u8); 5] {
        use crate::registers::{ACCEL_CONFIG, CONFIG, GYRO_CONFIG, PWR_MGMT_1, SMPLRT_DIV};

        [
            (SMPLRT_DIV, self.sample_rate_divider),
            (CONFIG, self.dlpf.register_value()),
            (GYRO_CONFIG, self.gyro_range.register_value()),
            (ACCEL_CONFIG, self.accel_range.register_value()),
            (PWR_MGMT_1, self.clock_source.register_value()),
        ]
    }
}

/// Complementary filter blend
///
/// Holds a single gyroscope weight; the accelerometer weight is derived as
/// `1 - gyro_weight`, so the pair always sums to one.
///
/// # Example
/// ```
/// use mpu6050_fusion::FilterSettings;
///
/// let settings = FilterSettings::new(0.96).unwrap();
/// assert!((settings.acc_weight() - 0.04).abs() < 1e-6);
///
/// assert!(FilterSettings::new(1.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterSettings {
    gyro_weight: f32,
}

impl FilterSettings {
    /// Creates settings from the gyroscope weight, which must lie in `[0, 1]`
    pub fn new(gyro_weight: f32) -> Result<Self, ConfigError> {
        if !gyro_weight.is_finite() || !(0.0..=1.0).contains(&gyro_weight) {
            return Err(ConfigError::InvalidBlendWeight(gyro_weight));
        }
        Ok(Self { gyro_weight })
    }

    /// Creates settings from an explicit (accelerometer, gyroscope) pair
    ///
    /// The pair must sum to one within `1e-6`.
    pub fn from_coefficients(acc_coef: f32, gyro_coef: f32) -> Result<Self, ConfigError> {
        if libm::fabsf(acc_coef + gyro_coef - 1.0) > 1e-6 {
            return Err(ConfigError::InvalidBlendWeight(gyro_coef));
        }
        Self::new(gyro_coef)
    }

    /// Weight applied to the gyro-advanced previous estimate
    pub fn gyro_weight(&self) -> f32 {
        self.gyro_weight
    }

    /// Weight applied to the accelerometer tilt angle
    pub fn acc_weight(&self) -> f32 {
        1.0 - self.gyro_weight
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            gyro_weight: DEFAULT_GYRO_WEIGHT,
        }
    }
}

/// Gyroscope bias calibration parameters
///
/// The device must stay still for the whole run. At the default timing the
/// sampling phase takes a few seconds on a 400 kHz bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationSettings {
    /// Number of gyro reads averaged into the bias (must be non-zero)
    pub sample_count: u16,
    /// Wait before sampling starts, in milliseconds
    pub settle_delay_ms: u32,
    /// Wait after the bias is stored, in milliseconds
    pub post_delay_ms: u32,
    /// Log progress at `info` level
    pub verbose: bool,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            sample_count: 3000,
            settle_delay_ms: 1000,
            post_delay_ms: 3000,
            verbose: false,
        }
    }
}
