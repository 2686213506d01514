//! MPU-6050 bus address and register map

/// Default I2C address (AD0 pulled low)
pub const ADDRESS: u8 = 0x68;
/// Alternate I2C address (AD0 pulled high)
pub const ADDRESS_ALT: u8 = 0x69;

/// Sample rate divider
pub const SMPLRT_DIV: u8 = 0x19;
/// Frame sync and digital low-pass filter configuration
pub const CONFIG: u8 = 0x1A;
/// Gyroscope full-scale selection (FS_SEL in bits 4:3)
pub const GYRO_CONFIG: u8 = 0x1B;
/// Accelerometer full-scale selection (AFS_SEL in bits 4:3)
pub const ACCEL_CONFIG: u8 = 0x1C;
/// First register of the contiguous accel/temp/gyro output block
pub const ACCEL_XOUT_H: u8 = 0x3B;
pub const TEMP_OUT_H: u8 = 0x41;
/// First register of the gyro-only output block
pub const GYRO_XOUT_H: u8 = 0x43;
/// Power management 1 (clock source in bits 2:0, SLEEP in bit 6)
pub const PWR_MGMT_1: u8 = 0x6B;
pub const WHO_AM_I: u8 = 0x75;

/// Value reported by `WHO_AM_I` on a genuine part
pub const WHO_AM_I_VALUE: u8 = 0x68;

/// Bytes in the accel + temp + gyro block (7 big-endian words)
pub const SAMPLE_BLOCK_LEN: usize = 14;
/// Bytes in the gyro block (3 big-endian words)
pub const GYRO_BLOCK_LEN: usize = 6;

/// Bit offset of the FS_SEL / AFS_SEL fields
pub(crate) const FULL_SCALE_SHIFT: u8 = 3;
