#![cfg_attr(not(test), no_std)]

//! MPU-6050 Fusion - pitch, roll and yaw from a 6-axis IMU
//!
//! This crate drives an InvenSense MPU-6050 over any blocking
//! [`embedded-hal`](https://docs.rs/embedded-hal) I2C bus and fuses its
//! accelerometer and gyroscope into an orientation estimate with a one-pole
//! complementary filter.
//!
//! # Features
//!
//! - Single-transaction burst reads, so one sample is never torn across bus cycles
//! - Raw-to-physical divisors derived from the configured full-scale ranges
//! - Static gyroscope bias calibration by averaging
//! - Complementary filter with a single validated blend weight
//! - Integration over the measured time between updates, not a fixed tick
//! - Bus failures reported as [`Error::SensorUnavailable`] without touching state
//! - `#![no_std]` compatible for embedded systems
//!
//! Yaw has no absolute reference on a 6-axis sensor; it is the open-loop
//! integral of the Z rate and drifts indefinitely.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use embedded_hal::{delay::DelayNs, i2c::I2c};
//! use mpu6050_fusion::{CalibrationSettings, Clock, Error, Mpu6050};
//!
//! fn run<I, C, D>(i2c: I, clock: C, delay: &mut D) -> Result<(), Error<I::Error>>
//! where
//!     I: I2c,
//!     C: Clock,
//!     D: DelayNs,
//! {
//!     let mut imu = Mpu6050::new(i2c, clock);
//!     imu.initialize()?;
//!
//!     // Keep the sensor still while the gyro bias is measured
//!     imu.calibrate(delay, CalibrationSettings::default())?;
//!
//!     loop {
//!         match imu.update() {
//!             Ok(()) => {
//!                 let (pitch, roll, yaw) = (imu.pitch(), imu.roll(), imu.yaw());
//!                 // drive actuators with the angles
//!                 # let _ = (pitch, roll, yaw);
//!             }
//!             // skip this cycle, the host decides whether to retry
//!             Err(Error::SensorUnavailable(_)) => continue,
//!             Err(e) => return Err(e),
//!         }
//!         delay.delay_ms(20);
//!     }
//! }
//! ```

pub mod calibration;
mod clock;
mod error;
mod estimator;
mod filter;
mod math;
pub mod registers;
mod sample;
mod transport;
mod types;

// Re-export all public types and functions
pub use clock::{Clock, interval_seconds};
pub use error::{ConfigError, Error};
pub use estimator::Mpu6050;
pub use filter::{ComplementaryFilter, FilterState};
pub use math::{DEG_TO_RAD, RAD_TO_DEG, accel_angles};
pub use sample::{Measurement, RawSample, convert_temperature, decode_gyro};
pub use transport::Transport;
pub use types::*;
