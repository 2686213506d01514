//! Angle helpers

use nalgebra::Vector3;

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Tilt angles in degrees derived from a gravity reading in g
///
/// Returns `(angle_x, angle_y)`:
///
/// - `angle_x = atan2(y, z + |x|)` in degrees
/// - `angle_y = -atan2(x, z + |y|)` in degrees
///
/// Adding the magnitude of the other horizontal axis to the denominator
/// keeps each angle well defined when the device is rolled about the other
/// axis. The result is only meaningful while the device is not otherwise
/// accelerating, and roll beyond ±90° is ambiguous.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use mpu6050_fusion::accel_angles;
///
/// let (x, y) = accel_angles(Vector3::new(0.0, 0.0, 1.0));
/// assert_eq!(x, 0.0);
/// assert_eq!(y, 0.0);
///
/// let (x, _) = accel_angles(Vector3::new(0.0, 1.0, 1.0));
/// assert!((x - 45.0).abs() < 1e-4);
/// ```
pub fn accel_angles(accel: Vector3<f32>) -> (f32, f32) {
    let angle_x = libm::atan2f(accel.y, accel.z + libm::fabsf(accel.x)) * RAD_TO_DEG;
    let angle_y = libm::atan2f(accel.x, accel.z + libm::fabsf(accel.y)) * -RAD_TO_DEG;
    (angle_x, angle_y)
}
