//! Complementary filter for pitch, roll and integrated yaw

use nalgebra::Vector3;

use crate::clock::interval_seconds;
use crate::types::FilterSettings;

/// Persistent orientation state, all angles in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterState {
    /// Filtered angle about X
    pub angle_x: f32,
    /// Filtered angle about Y
    pub angle_y: f32,
    /// Yaw; always equal to `gyro_angle_z`
    pub angle_z: f32,
    /// Pure gyro-integrated angles (drift without bound)
    pub gyro_angle_x: f32,
    pub gyro_angle_y: f32,
    pub gyro_angle_z: f32,
    /// Time of the previous step in microseconds
    pub last_update_us: u64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            angle_x: 0.0,
            angle_y: 0.0,
            angle_z: 0.0,
            gyro_angle_x: 0.0,
            gyro_angle_y: 0.0,
            gyro_angle_z: 0.0,
            last_update_us: 0,
        }
    }
}

/// One-pole complementary filter
///
/// Each step advances the previous estimate by the measured rate over the
/// measured interval and blends it with the accelerometer tilt:
///
/// `angle = gyro_weight * (angle + rate * dt) + acc_weight * accel_angle`
///
/// There is no absolute reference for rotation about the vertical axis, so
/// yaw is the open-loop integral of the Z rate and drifts indefinitely.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use mpu6050_fusion::ComplementaryFilter;
///
/// let mut filter = ComplementaryFilter::new();
/// filter.seed((10.0, -5.0), 0);
///
/// // 10 ms later, still at rest
/// filter.step((10.0, -5.0), Vector3::zeros(), 10_000);
/// assert!((filter.state().angle_x - 10.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ComplementaryFilter {
    settings: FilterSettings,
    state: FilterState,
}

impl ComplementaryFilter {
    /// Create a filter with the default 0.98 gyroscope weight
    pub fn new() -> Self {
        Self::with_settings(FilterSettings::default())
    }

    /// Create a filter with the given blend
    pub fn with_settings(settings: FilterSettings) -> Self {
        Self {
            settings,
            state: FilterState::default(),
        }
    }

    /// Start from a known tilt
    ///
    /// Sets the filtered pitch/roll to the given accelerometer angles rather
    /// than zero, clears every gyro accumulator and yaw, and takes `now_us`
    /// as the integration baseline.
    pub fn seed(&mut self, accel_angles: (f32, f32), now_us: u64) {
        self.state = FilterState {
            angle_x: accel_angles.0,
            angle_y: accel_angles.1,
            last_update_us: now_us,
            ..FilterState::default()
        };
    }

    /// Advance the filter with one measurement taken at `now_us`
    ///
    /// `gyro` is the bias-corrected rate in deg/s. Returns the integration
    /// interval in seconds, which is zero when the clock has not advanced.
    pub fn step(&mut self, accel_angles: (f32, f32), gyro: Vector3<f32>, now_us: u64) -> f32 {
        let dt = interval_seconds(self.state.last_update_us, now_us);
        let gyro_weight = self.settings.gyro_weight();
        let acc_weight = self.settings.acc_weight();
        let state = &mut self.state;

        state.gyro_angle_x += gyro.x * dt;
        state.gyro_angle_y += gyro.y * dt;
        state.gyro_angle_z += gyro.z * dt;

        state.angle_x = gyro_weight * (state.angle_x + gyro.x * dt) + acc_weight * accel_angles.0;
        state.angle_y = gyro_weight * (state.angle_y + gyro.y * dt) + acc_weight * accel_angles.1;
        state.angle_z = state.gyro_angle_z;

        state.last_update_us = now_us;
        dt
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn settings(&self) -> FilterSettings {
        self.settings
    }
}

impl Default for ComplementaryFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP_US: u64 = 10_000;

    #[test]
    fn test_seed_starts_from_accelerometer_tilt() {
        let mut filter = ComplementaryFilter::new();
        filter.step((0.0, 0.0), Vector3::new(5.0, 5.0, 5.0), 1_000_000);

        filter.seed((12.5, -3.0), 2_000_000);
        let state = filter.state();
        assert_eq!(state.angle_x, 12.5);
        assert_eq!(state.angle_y, -3.0);
        assert_eq!(state.gyro_angle_x, 0.0);
        assert_eq!(state.gyro_angle_y, 0.0);
        assert_eq!(state.gyro_angle_z, 0.0);
        assert_eq!(state.angle_z, 0.0);
        assert_eq!(state.last_update_us, 2_000_000);
    }

    #[test]
    fn test_zero_interval_leaves_gyro_angles_unchanged() {
        let mut filter = ComplementaryFilter::new();
        filter.seed((0.0, 0.0), 500);
        filter.step((0.0, 0.0), Vector3::new(20.0, -20.0, 45.0), 500 + STEP_US);
        let before = *filter.state();

        let dt = filter.step((0.0, 0.0), Vector3::new(20.0, -20.0, 45.0), 500 + STEP_US);

        assert_eq!(dt, 0.0);
        let after = filter.state();
        assert_eq!(after.gyro_angle_x, before.gyro_angle_x);
        assert_eq!(after.gyro_angle_y, before.gyro_angle_y);
        assert_eq!(after.gyro_angle_z, before.gyro_angle_z);
        assert!(after.angle_x.is_finite());
    }

    #[test]
    fn test_blend_matches_closed_form() {
        let mut filter = ComplementaryFilter::new();
        filter.seed((0.0, 0.0), 0);

        // 10 deg/s about X for 100 steps of 10 ms
        for i in 1..=100 {
            filter.step((0.0, 0.0), Vector3::new(10.0, 0.0, 0.0), i * STEP_US);
        }

        // a[n+1] = g * (a[n] + r*dt)  =>  a[n] = g*r*dt / (1-g) * (1 - g^n)
        let g: f32 = 0.98;
        let expected = g * 0.1 / (1.0 - g) * (1.0 - g.powi(100));
        let state = filter.state();
        assert!((state.gyro_angle_x - 10.0).abs() < 1e-3);
        assert!((state.angle_x - expected).abs() < 1e-3, "angle_x: {}", state.angle_x);
        assert!(state.angle_x < state.gyro_angle_x);
    }

    #[test]
    fn test_yaw_tracks_gyro_integral_exactly() {
        let mut filter = ComplementaryFilter::new();
        filter.seed((30.0, 30.0), 0);

        let rates = [3.0, -7.5, 12.25, 0.0, -1.0];
        for (i, rate) in rates.iter().enumerate() {
            filter.step((30.0, 30.0), Vector3::new(0.0, 0.0, *rate), (i as u64 + 1) * 7_300);
            assert_eq!(filter.state().angle_z, filter.state().gyro_angle_z);
        }
    }

    #[test]
    fn test_pure_gyro_weight_ignores_accelerometer() {
        let mut filter = ComplementaryFilter::with_settings(FilterSettings::new(1.0).unwrap());
        filter.seed((0.0, 0.0), 0);
        filter.step((45.0, 45.0), Vector3::zeros(), STEP_US);

        assert_eq!(filter.state().angle_x, 0.0);
        assert_eq!(filter.state().angle_y, 0.0);
    }

    #[test]
    fn test_backwards_clock_does_not_integrate() {
        let mut filter = ComplementaryFilter::new();
        filter.seed((0.0, 0.0), 1_000_000);

        let dt = filter.step((0.0, 0.0), Vector3::new(100.0, 100.0, 100.0), 900_000);
        assert_eq!(dt, 0.0);
        assert_eq!(filter.state().gyro_angle_z, 0.0);
        assert_eq!(filter.state().last_update_us, 900_000);
    }
}
