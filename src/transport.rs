//! Register access over an `embedded-hal` I2C bus

use embedded_hal::i2c::I2c;
use log::warn;

use crate::error::Error;

/// Addressed register transport
///
/// Wraps any blocking [`I2c`] implementation and exposes the three register
/// operations the driver needs. Every transaction reports bus failures as
/// [`Error::SensorUnavailable`].
#[derive(Debug)]
pub struct Transport<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C, E> Transport<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Creates a transport talking to the device at `address`
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Device address used for every transaction
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Writes one register
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<E>> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|e| self.unavailable("write", register, e))
    }

    /// Reads one register
    pub fn read_register(&mut self, register: u8) -> Result<u8, Error<E>> {
        let [value] = self.read_burst::<1>(register)?;
        Ok(value)
    }

    /// Reads `N` consecutive registers in a single write-read transaction
    ///
    /// The device auto-increments its register pointer, so all bytes come
    /// from the same output latch and a multi-word sample cannot tear.
    pub fn read_burst<const N: usize>(&mut self, start: u8) -> Result<[u8; N], Error<E>> {
        let mut buffer = [0u8; N];
        self.i2c
            .write_read(self.address, &[start], &mut buffer)
            .map_err(|e| self.unavailable("read", start, e))?;
        Ok(buffer)
    }

    /// Returns the underlying bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn unavailable(&self, op: &str, register: u8, e: E) -> Error<E> {
        warn!(
            "mpu6050 {} of register {:#04x} at address {:#04x} failed",
            op, register, self.address
        );
        Error::SensorUnavailable(e)
    }
}
