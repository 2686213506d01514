//! Raw sample decoding and conversion to physical units

use nalgebra::Vector3;

use crate::registers::{GYRO_BLOCK_LEN, SAMPLE_BLOCK_LEN};
use crate::types::DeviceConfig;

/// Temperature sensitivity in LSB per °C
const TEMP_SENSITIVITY: f32 = 340.0;
/// Raw temperature offset
const TEMP_OFFSET: f32 = 12412.0;

/// One accel/temp/gyro reading as stored in the output registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub accel: [i16; 3],
    pub temperature: i16,
    pub gyro: [i16; 3],
}

impl RawSample {
    /// Decodes the 14-byte block starting at `ACCEL_XOUT_H`
    pub fn from_bytes(data: [u8; SAMPLE_BLOCK_LEN]) -> Self {
        let word = |i: usize| i16::from_be_bytes([data[2 * i], data[2 * i + 1]]);
        Self {
            accel: [word(0), word(1), word(2)],
            temperature: word(3),
            gyro: [word(4), word(5), word(6)],
        }
    }

    /// Converts to physical units using the configured ranges
    ///
    /// The gyro rates in the result are not bias-corrected.
    pub fn convert(&self, config: &DeviceConfig) -> Measurement {
        Measurement {
            accel: scale_triple(self.accel, |raw| config.accel_range.scale(raw)),
            gyro: scale_triple(self.gyro, |raw| config.gyro_range.scale(raw)),
            temperature: convert_temperature(self.temperature),
        }
    }
}

/// Decodes the 6-byte block starting at `GYRO_XOUT_H`
pub fn decode_gyro(data: [u8; GYRO_BLOCK_LEN]) -> [i16; 3] {
    [
        i16::from_be_bytes([data[0], data[1]]),
        i16::from_be_bytes([data[2], data[3]]),
        i16::from_be_bytes([data[4], data[5]]),
    ]
}

/// Converts a raw temperature reading to °C
pub fn convert_temperature(raw: i16) -> f32 {
    (raw as f32 + TEMP_OFFSET) / TEMP_SENSITIVITY
}

pub(crate) fn scale_triple(raw: [i16; 3], scale: impl Fn(i16) -> f32) -> Vector3<f32> {
    Vector3::new(scale(raw[0]), scale(raw[1]), scale(raw[2]))
}

/// Sample in physical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Acceleration in g
    pub accel: Vector3<f32>,
    /// Angular rate in deg/s
    pub gyro: Vector3<f32>,
    /// Die temperature in °C
    pub temperature: f32,
}

impl Default for Measurement {
    fn default() -> Self {
        Self {
            accel: Vector3::zeros(),
            gyro: Vector3::zeros(),
            temperature: 0.0,
        }
    }
}
