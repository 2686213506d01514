//! Thrust-vector control loop against a simulated sensor
//!
//! Initializes and calibrates the IMU, then every 20 ms converts pitch and
//! roll into servo commands centred on 90° and packs both angles into radio
//! payloads. A cycle whose sensor read fails is skipped rather than driving
//! the servos with stale angles.
//!
//! Run with `RUST_LOG=info cargo run --example vector_control`.

use std::convert::Infallible;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorType, I2c, Operation};
use log::{info, warn};
use mpu6050_fusion::registers::{ACCEL_XOUT_H, GYRO_XOUT_H};
use mpu6050_fusion::{CalibrationSettings, Error, Mpu6050};

const LOOP_PERIOD_MS: u32 = 20;
const SERVO_CENTER: f32 = 90.0;

/// Sensor that slowly rocks about X with a small gyro bias
struct RockingSensor {
    start: Instant,
    pointer: u8,
}

impl RockingSensor {
    fn block(&self) -> [u8; 14] {
        let t = self.start.elapsed().as_secs_f32();
        let tilt = (0.3 * t).sin() * 0.35; // radians
        let rate = 0.3 * (0.3 * t).cos() * 0.35_f32.to_degrees(); // deg/s

        let words: [i16; 7] = [
            0,
            (tilt.sin() * 16384.0) as i16,
            (tilt.cos() * 16384.0) as i16,
            -1500,
            (rate * 65.5) as i16 + 45,
            -20,
            12,
        ];
        let mut block = [0u8; 14];
        for (i, word) in words.iter().enumerate() {
            block[2 * i..2 * i + 2].copy_from_slice(&word.to_be_bytes());
        }
        block
    }
}

impl ErrorType for RockingSensor {
    type Error = Infallible;
}

impl I2c for RockingSensor {
    fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.pointer = bytes.first().copied().unwrap_or(0),
                Operation::Read(buffer) => {
                    let block = self.block();
                    let offset = match self.pointer {
                        ACCEL_XOUT_H => 0,
                        GYRO_XOUT_H => 8,
                        _ => {
                            buffer.fill(0);
                            continue;
                        }
                    };
                    let len = buffer.len().min(block.len() - offset);
                    buffer[..len].copy_from_slice(&block[offset..offset + len]);
                }
            }
        }
        Ok(())
    }
}

struct SleepDelay;

impl DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

/// Servo position for a tilt angle; servos do not accept negative angles
fn servo_command(angle: f32) -> u8 {
    (SERVO_CENTER + angle).clamp(0.0, 180.0).round() as u8
}

/// Radio payload for one angle
fn radio_payload(angle: f32) -> [u8; 4] {
    angle.to_le_bytes()
}

fn main() -> Result<(), Error<Infallible>> {
    env_logger::init();

    let start = Instant::now();
    let sensor = RockingSensor { start, pointer: 0 };
    let clock = move || start.elapsed().as_micros() as u64;
    let mut imu = Mpu6050::new(sensor, clock);
    let mut delay = SleepDelay;

    imu.initialize()?;
    let offsets = imu.calibrate(&mut delay, CalibrationSettings {
        settle_delay_ms: 200,
        post_delay_ms: 200,
        verbose: true,
        ..Default::default()
    })?;
    info!("calibrated gyro offsets: {:?}", offsets);

    for cycle in 0..250 {
        if let Err(e) = imu.update() {
            warn!("cycle {} skipped: {}", cycle, e);
            delay.delay_ms(LOOP_PERIOD_MS);
            continue;
        }

        let (angle_x, angle_y) = (imu.angle_x(), imu.angle_y());
        let x_servo = servo_command(angle_x);
        let y_servo = servo_command(angle_y);
        let packets = [radio_payload(angle_x), radio_payload(angle_y)];

        if cycle % 10 == 0 {
            println!(
                "angleX: {:7.2}  angleY: {:7.2}  servoX: {:3}  servoY: {:3}  radio: {:02x?}",
                angle_x, angle_y, x_servo, y_servo, packets
            );
        }
        delay.delay_ms(LOOP_PERIOD_MS);
    }

    Ok(())
}
