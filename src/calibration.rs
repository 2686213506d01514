//! Gyroscope bias estimation

use nalgebra::Vector3;

/// Running per-axis mean of gyroscope readings
///
/// Sums are kept in `f64` so that thousands of samples can be averaged
/// without the accumulated rounding error of an `f32` sum.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use mpu6050_fusion::calibration::MeanAccumulator;
///
/// let mut mean = MeanAccumulator::new();
/// mean.add(Vector3::new(1.0, 2.0, 3.0));
/// mean.add(Vector3::new(3.0, 2.0, 1.0));
/// assert_eq!(mean.mean(), Some(Vector3::new(2.0, 2.0, 2.0)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sum: [f64; 3],
    count: u32,
}

impl MeanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one reading in deg/s
    pub fn add(&mut self, reading: Vector3<f32>) {
        for (sum, value) in self.sum.iter_mut().zip(reading.iter()) {
            *sum += f64::from(*value);
        }
        self.count += 1;
    }

    /// Number of readings added so far
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Per-axis mean, or `None` before the first reading
    pub fn mean(&self) -> Option<Vector3<f32>> {
        if self.count == 0 {
            return None;
        }
        let n = f64::from(self.count);
        Some(Vector3::new(
            (self.sum[0] / n) as f32,
            (self.sum[1] / n) as f32,
            (self.sum[2] / n) as f32,
        ))
    }
}

/// Removes a static bias from a gyroscope reading
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use mpu6050_fusion::calibration::remove_bias;
///
/// let corrected = remove_bias(Vector3::new(1.5, -0.5, 0.0), Vector3::new(0.5, -0.5, 0.25));
/// assert_eq!(corrected, Vector3::new(1.0, 0.0, -0.25));
/// ```
pub fn remove_bias(gyroscope: Vector3<f32>, offset: Vector3<f32>) -> Vector3<f32> {
    gyroscope - offset
}
