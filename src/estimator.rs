//! MPU-6050 orientation estimator

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info};
use nalgebra::Vector3;

use crate::calibration::{MeanAccumulator, remove_bias};
use crate::clock::Clock;
use crate::error::{ConfigError, Error};
use crate::filter::{ComplementaryFilter, FilterState};
use crate::math::accel_angles;
use crate::registers::{ACCEL_XOUT_H, ADDRESS, GYRO_BLOCK_LEN, GYRO_XOUT_H, SAMPLE_BLOCK_LEN};
use crate::sample::{Measurement, RawSample, decode_gyro, scale_triple};
use crate::transport::Transport;
use crate::types::{CalibrationSettings, DeviceConfig, FilterSettings};

/// Samples between progress ticks of a verbose calibration
const PROGRESS_INTERVAL: u16 = 1000;

/// MPU-6050 driver fusing accelerometer and gyroscope into pitch, roll and yaw
///
/// The estimator exclusively owns the bus and the clock. It is meant to be
/// driven from a single control loop: call [`initialize`](Self::initialize)
/// once, optionally [`calibrate`](Self::calibrate), then
/// [`update`](Self::update) at whatever cadence the loop runs.
///
/// Calibration offsets live in memory only and must be measured again after
/// every power cycle (or restored with [`set_gyro_offsets`](Self::set_gyro_offsets)).
#[derive(Debug)]
pub struct Mpu6050<I2C, C> {
    transport: Transport<I2C>,
    clock: C,
    config: DeviceConfig,
    gyro_offsets: Vector3<f32>,
    filter: ComplementaryFilter,
    raw: RawSample,
    measurement: Measurement,
    accel_angles: (f32, f32),
    interval: f32,
    initialized: bool,
}

impl<I2C, C, E> Mpu6050<I2C, C>
where
    I2C: I2c<Error = E>,
    C: Clock,
{
    /// Create a driver at the default address with default configuration
    /// and a 0.98 gyroscope weight
    pub fn new(i2c: I2C, clock: C) -> Self {
        Self::with_settings(i2c, ADDRESS, clock, DeviceConfig::default(), FilterSettings::default())
    }

    /// Create a driver with explicit address, device configuration and blend
    pub fn with_settings(
        i2c: I2C,
        address: u8,
        clock: C,
        config: DeviceConfig,
        filter: FilterSettings,
    ) -> Self {
        Self {
            transport: Transport::new(i2c, address),
            clock,
            config,
            gyro_offsets: Vector3::zeros(),
            filter: ComplementaryFilter::with_settings(filter),
            raw: RawSample::default(),
            measurement: Measurement::default(),
            accel_angles: (0.0, 0.0),
            interval: 0.0,
            initialized: false,
        }
    }

    /// Configure the device and seed the filter from the first reading
    ///
    /// Writes sample-rate divider, DLPF, gyro range, accel range and power
    /// management in that order, then reads one sample. Pitch and roll start
    /// at that sample's accelerometer angles; gyro accumulators and yaw start
    /// at zero and the read time becomes the integration baseline.
    ///
    /// Calling it again re-seeds the filter.
    pub fn initialize(&mut self) -> Result<(), Error<E>> {
        for (register, value) in self.config.register_writes() {
            self.transport.write_register(register, value)?;
        }
        debug!("mpu6050 configured: {:?}", self.config);

        let (raw, measurement, now) = self.read_sample()?;
        self.store(raw, measurement);
        self.filter.seed(self.accel_angles, now);
        self.interval = 0.0;
        self.initialized = true;
        Ok(())
    }

    /// Measure the static gyroscope bias
    ///
    /// The device must be stationary for the whole run. Waits
    /// `settle_delay_ms`, averages `sample_count` gyro-only reads in deg/s,
    /// replaces the stored offsets with the mean and waits `post_delay_ms`.
    /// On a bus failure the previous offsets are kept.
    ///
    /// Returns the new offsets.
    pub fn calibrate<D: DelayNs>(
        &mut self,
        delay: &mut D,
        settings: CalibrationSettings,
    ) -> Result<Vector3<f32>, Error<E>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        if settings.sample_count == 0 {
            return Err(ConfigError::InvalidSampleCount.into());
        }

        delay.delay_ms(settings.settle_delay_ms);
        if settings.verbose {
            info!(
                "calculating gyro offsets from {} samples, do not move the sensor",
                settings.sample_count
            );
        }

        let gyro_range = self.config.gyro_range;
        let mut accumulator = MeanAccumulator::new();
        for i in 0..settings.sample_count {
            if settings.verbose && i % PROGRESS_INTERVAL == 0 {
                info!("calibration sample {}/{}", i, settings.sample_count);
            }
            let bytes = self.transport.read_burst::<GYRO_BLOCK_LEN>(GYRO_XOUT_H)?;
            accumulator.add(scale_triple(decode_gyro(bytes), |raw| gyro_range.scale(raw)));
        }

        if let Some(mean) = accumulator.mean() {
            self.gyro_offsets = mean;
        }
        let offsets = self.gyro_offsets;
        if settings.verbose {
            info!(
                "gyro offsets: x={} y={} z={}",
                offsets.x, offsets.y, offsets.z
            );
        } else {
            debug!("gyro offsets: {:?}", offsets);
        }

        delay.delay_ms(settings.post_delay_ms);
        Ok(offsets)
    }

    /// Read one sample and advance the filter
    ///
    /// The integration step is the measured time since the previous
    /// successful update. On failure nothing is changed, so the next
    /// successful update integrates over the whole gap.
    pub fn update(&mut self) -> Result<(), Error<E>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }

        let (raw, measurement, now) = self.read_sample()?;
        self.store(raw, measurement);
        self.interval = self
            .filter
            .step(self.accel_angles, self.measurement.gyro, now);
        Ok(())
    }

    /// Install known gyroscope offsets in deg/s instead of calibrating
    pub fn set_gyro_offsets(&mut self, x: f32, y: f32, z: f32) {
        self.gyro_offsets = Vector3::new(x, y, z);
    }

    /// Read a single register, e.g. `WHO_AM_I`
    pub fn read_register(&mut self, register: u8) -> Result<u8, Error<E>> {
        self.transport.read_register(register)
    }

    /// Give back the bus and the clock
    pub fn release(self) -> (I2C, C) {
        (self.transport.release(), self.clock)
    }

    fn read_sample(&mut self) -> Result<(RawSample, Measurement, u64), Error<E>> {
        let bytes = self.transport.read_burst::<SAMPLE_BLOCK_LEN>(ACCEL_XOUT_H)?;
        let now = self.clock.now_us();
        let raw = RawSample::from_bytes(bytes);
        let mut measurement = raw.convert(&self.config);
        measurement.gyro = remove_bias(measurement.gyro, self.gyro_offsets);
        Ok((raw, measurement, now))
    }

    fn store(&mut self, raw: RawSample, measurement: Measurement) {
        self.raw = raw;
        self.measurement = measurement;
        self.accel_angles = accel_angles(measurement.accel);
    }
}

impl<I2C, C> Mpu6050<I2C, C> {
    /// Filtered angle about X in degrees
    pub fn pitch(&self) -> f32 {
        self.filter.state().angle_x
    }

    /// Filtered angle about Y in degrees
    pub fn roll(&self) -> f32 {
        self.filter.state().angle_y
    }

    /// Gyro-integrated angle about Z in degrees; drifts without bound
    pub fn yaw(&self) -> f32 {
        self.filter.state().angle_z
    }

    pub fn angle_x(&self) -> f32 {
        self.filter.state().angle_x
    }

    pub fn angle_y(&self) -> f32 {
        self.filter.state().angle_y
    }

    pub fn angle_z(&self) -> f32 {
        self.filter.state().angle_z
    }

    pub fn gyro_angle_x(&self) -> f32 {
        self.filter.state().gyro_angle_x
    }

    pub fn gyro_angle_y(&self) -> f32 {
        self.filter.state().gyro_angle_y
    }

    pub fn gyro_angle_z(&self) -> f32 {
        self.filter.state().gyro_angle_z
    }

    /// Accelerometer tilt about X from the latest sample, degrees
    pub fn accel_angle_x(&self) -> f32 {
        self.accel_angles.0
    }

    /// Accelerometer tilt about Y from the latest sample, degrees
    pub fn accel_angle_y(&self) -> f32 {
        self.accel_angles.1
    }

    /// Latest acceleration in g
    pub fn accel(&self) -> Vector3<f32> {
        self.measurement.accel
    }

    /// Latest bias-corrected angular rate in deg/s
    pub fn gyro(&self) -> Vector3<f32> {
        self.measurement.gyro
    }

    /// Latest die temperature in °C
    pub fn temperature(&self) -> f32 {
        self.measurement.temperature
    }

    pub fn raw_accel(&self) -> [i16; 3] {
        self.raw.accel
    }

    pub fn raw_gyro(&self) -> [i16; 3] {
        self.raw.gyro
    }

    pub fn raw_temp(&self) -> i16 {
        self.raw.temperature
    }

    /// Integration step of the last update in seconds
    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn gyro_offsets(&self) -> Vector3<f32> {
        self.gyro_offsets
    }

    pub fn filter_state(&self) -> &FilterState {
        self.filter.state()
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn filter_settings(&self) -> FilterSettings {
        self.filter.settings()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
