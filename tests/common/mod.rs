//! Simulated MPU-6050 register file and test clock

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use mpu6050_fusion::registers::{ACCEL_XOUT_H, ADDRESS, GYRO_XOUT_H};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// 1 g on the ±2 g range
pub const ONE_G: i16 = 16384;
/// 10 ms between updates
pub const STEP_US: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

impl i2c::Error for SimError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
    }
}

/// State shared between the test and the bus handed to the driver
#[derive(Debug)]
pub struct DeviceState {
    pub registers: [u8; 128],
    pub accel: [i16; 3],
    pub temperature: i16,
    pub gyro: [i16; 3],
    /// Peak uniform noise added to each gyro axis on every latch, in LSB
    pub gyro_noise: i16,
    /// Fail every transaction while set
    pub offline: bool,
    /// Number of transactions that latched a fresh output sample
    pub latches: usize,
    pointer: u8,
    rng: Pcg64,
}

/// Simulated device implementing the blocking `I2c` trait
#[derive(Debug, Clone)]
pub struct SimulatedMpu6050 {
    state: Rc<RefCell<DeviceState>>,
}

impl SimulatedMpu6050 {
    /// Device lying flat and still
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut registers = [0u8; 128];
        registers[0x75] = 0x68; // WHO_AM_I
        registers[0x6B] = 0x40; // PWR_MGMT_1 reset value: asleep
        Self {
            state: Rc::new(RefCell::new(DeviceState {
                registers,
                accel: [0, 0, ONE_G],
                temperature: 0,
                gyro: [0, 0, 0],
                gyro_noise: 0,
                offline: false,
                latches: 0,
                pointer: 0,
                rng: Pcg64::seed_from_u64(seed),
            })),
        }
    }

    pub fn set_accel(&self, x: i16, y: i16, z: i16) {
        self.state.borrow_mut().accel = [x, y, z];
    }

    pub fn set_gyro(&self, x: i16, y: i16, z: i16) {
        self.state.borrow_mut().gyro = [x, y, z];
    }

    pub fn set_temperature(&self, raw: i16) {
        self.state.borrow_mut().temperature = raw;
    }

    pub fn set_gyro_noise(&self, peak: i16) {
        self.state.borrow_mut().gyro_noise = peak;
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.borrow_mut().offline = offline;
    }

    pub fn register(&self, register: u8) -> u8 {
        self.state.borrow().registers[register as usize]
    }

    pub fn latches(&self) -> usize {
        self.state.borrow().latches
    }
}

impl DeviceState {
    /// Copy the current sensor values into the output registers
    fn latch(&mut self) {
        let noise = self.gyro_noise;
        let mut words = [
            self.accel[0],
            self.accel[1],
            self.accel[2],
            self.temperature,
            self.gyro[0],
            self.gyro[1],
            self.gyro[2],
        ];
        if noise > 0 {
            for word in &mut words[4..] {
                *word = word.saturating_add(self.rng.random_range(-noise..=noise));
            }
        }
        for (i, word) in words.iter().enumerate() {
            let [hi, lo] = word.to_be_bytes();
            let at = ACCEL_XOUT_H as usize + 2 * i;
            self.registers[at] = hi;
            self.registers[at + 1] = lo;
        }
        self.latches += 1;
    }

    fn write(&mut self, bytes: &[u8]) {
        let Some((&pointer, data)) = bytes.split_first() else {
            return;
        };
        self.pointer = pointer;
        if pointer == ACCEL_XOUT_H || pointer == GYRO_XOUT_H {
            self.latch();
        }
        for byte in data {
            self.registers[self.pointer as usize & 0x7F] = *byte;
            self.pointer = self.pointer.wrapping_add(1);
        }
    }

    fn read(&mut self, buffer: &mut [u8]) {
        for byte in buffer {
            *byte = self.registers[self.pointer as usize & 0x7F];
            self.pointer = self.pointer.wrapping_add(1);
        }
    }
}

impl ErrorType for SimulatedMpu6050 {
    type Error = SimError;
}

impl I2c for SimulatedMpu6050 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.offline || address != ADDRESS {
            return Err(SimError);
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => state.write(&bytes[..]),
                Operation::Read(buffer) => state.read(&mut buffer[..]),
            }
        }
        Ok(())
    }
}

/// Manually advanced microsecond clock
#[derive(Debug, Clone, Default)]
pub struct TestClock {
    now: Rc<Cell<u64>>,
}

impl TestClock {
    pub fn new(start_us: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_us)),
        }
    }

    pub fn advance(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Closure handed to the driver as its clock
    pub fn source(&self) -> impl FnMut() -> u64 + use<> {
        let now = Rc::clone(&self.now);
        move || now.get()
    }
}

/// Delay that only records how long it was asked to wait
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
