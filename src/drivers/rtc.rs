//! DS1307 real-time clock driver.
//!
//! Generic over the blocking `embedded-hal` i2c traits, so it runs on the
//! on-chip TWI in the firmware and on a transaction mock in tests. Only the
//! three time-of-day registers are touched; the calendar registers and the
//! battery-backed RAM are not this clock's business.

use crate::clock::codec::CLOCK_HALT;
use crate::clock::{TimeFields, TimeSource};
use embedded_hal::blocking::i2c::{Write, WriteRead};

/// 7-bit bus address
pub const DS1307_ADDR: u8 = 0x68;

const REG_SECONDS: u8 = 0x00;
const REG_CONTROL: u8 = 0x07;

/// Control register value written at startup: SQW pin configuration, no
/// clock output on it.
const CONTROL_INIT: u8 = 0x10;

pub struct Ds1307<I2C> {
    i2c: I2C,
}

impl<I2C, E> Ds1307<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Give the bus back, mostly for tests.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// One-time startup: set the control register, then clear the
    /// clock-halt bit so the oscillator runs. The rest of the seconds
    /// register is preserved; a battery-backed chip keeps its time across
    /// our power cycles.
    pub fn try_configure(&mut self) -> Result<(), E> {
        self.i2c.write(DS1307_ADDR, &[REG_CONTROL, CONTROL_INIT])?;

        let mut seconds = [0u8; 1];
        self.i2c
            .write_read(DS1307_ADDR, &[REG_SECONDS], &mut seconds)?;
        self.i2c
            .write(DS1307_ADDR, &[REG_SECONDS, seconds[0] & !CLOCK_HALT])
    }

    /// Register-pointer write followed by a sequential read of seconds,
    /// minutes and hours, still encoded.
    pub fn try_read_fields(&mut self) -> Result<TimeFields, E> {
        let mut buf = [0u8; 3];
        self.i2c.write_read(DS1307_ADDR, &[REG_SECONDS], &mut buf)?;
        Ok(TimeFields {
            seconds: buf[0],
            minutes: buf[1],
            hours: buf[2],
        })
    }

    /// Single write transaction covering all three fields.
    pub fn try_write_fields(&mut self, fields: TimeFields) -> Result<(), E> {
        self.i2c.write(
            DS1307_ADDR,
            &[REG_SECONDS, fields.seconds, fields.minutes, fields.hours],
        )
    }
}

/// The state machine's view of the RTC. A failed transfer leaves nothing
/// sane to display, so each operation retries until the bus answers; the
/// stalled meters and heartbeat are the fault indication.
impl<I2C, E> TimeSource for Ds1307<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    fn configure(&mut self) {
        while self.try_configure().is_err() {}
    }

    fn read_fields(&mut self) -> TimeFields {
        loop {
            if let Ok(fields) = self.try_read_fields() {
                return fields;
            }
        }
    }

    fn write_fields(&mut self, fields: TimeFields) {
        while self.try_write_fields(fields).is_err() {}
    }
}
