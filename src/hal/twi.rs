//! TWI (I2C) master driver for the RTC bus.
//!
//! Runs the bus at 50 kHz, below the DS1307's 100 kHz ceiling. The blocking
//! `embedded-hal` i2c traits are implemented on top of the raw
//! START/address/data primitives so the RTC driver stays platform agnostic.

use avr_device::atmega328p::TWI;
use core::marker::PhantomData;

/// TWI status codes (TWSR high bits)
#[derive(Clone, Copy, PartialEq)]
#[repr(u8)]
enum TwiStatus {
    StartTransmitted = 0x08,
    RepStartTransmitted = 0x10,
    AddrWriteAck = 0x18,
    DataWriteAck = 0x28,
    ArbitrationLost = 0x38,
    AddrReadAck = 0x40,
    DataReadAck = 0x50,
    DataReadNack = 0x58,
}

/// TWI bus faults
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TwiError {
    /// Address or data byte was not acknowledged
    Nack,
    /// Lost arbitration against another master
    ArbitrationLost,
    /// Any other unexpected bus state
    Bus,
}

// TWCR command patterns: TWINT | TWEN plus condition bits
const CMD_START: u8 = 0xA4; // TWINT | TWSTA | TWEN
const CMD_STOP: u8 = 0x94; // TWINT | TWSTO | TWEN
const CMD_TRANSMIT: u8 = 0x84; // TWINT | TWEN
const CMD_READ_ACK: u8 = 0xC4; // TWINT | TWEA | TWEN
const CMD_READ_NACK: u8 = 0x84;

/// TWI peripheral driver
pub struct Twi {
    _twi: PhantomData<TWI>,
}

impl Twi {
    /// Take over the TWI peripheral and set the bit rate.
    pub fn new() -> Self {
        unsafe {
            let p = TWI::ptr();

            // 50 kHz at 1 MHz: SCL = CPU / (16 + 2 * TWBR), prescaler 1
            (*p).twbr.write(|w| w.bits(2));
            (*p).twsr.write(|w| w.bits(0));

            // Enable TWI
            (*p).twcr.write(|w| w.bits(0x04));
        }

        Self { _twi: PhantomData }
    }

    fn command(&mut self, cmd: u8) -> u8 {
        unsafe {
            let p = TWI::ptr();
            (*p).twcr.write(|w| w.bits(cmd));

            // Wait for TWINT
            while (*p).twcr.read().bits() & 0x80 == 0 {}

            (*p).twsr.read().bits() & 0xF8
        }
    }

    fn check(status: u8, expected: TwiStatus) -> Result<(), TwiError> {
        if status == expected as u8 {
            Ok(())
        } else if status == TwiStatus::ArbitrationLost as u8 {
            Err(TwiError::ArbitrationLost)
        } else {
            // For address/data phases anything else is a missing ACK
            Err(TwiError::Nack)
        }
    }

    /// Send a START (or repeated START) condition.
    pub fn start(&mut self) -> Result<(), TwiError> {
        let status = self.command(CMD_START);
        if status == TwiStatus::StartTransmitted as u8
            || status == TwiStatus::RepStartTransmitted as u8
        {
            Ok(())
        } else if status == TwiStatus::ArbitrationLost as u8 {
            Err(TwiError::ArbitrationLost)
        } else {
            Err(TwiError::Bus)
        }
    }

    /// Send a STOP condition and release the bus.
    pub fn stop(&mut self) {
        unsafe {
            let p = TWI::ptr();
            (*p).twcr.write(|w| w.bits(CMD_STOP));
            while (*p).twcr.read().bits() & 0x10 != 0 {}
        }
    }

    /// Write the 7-bit address plus R/W bit.
    pub fn write_address(&mut self, addr: u8, read: bool) -> Result<(), TwiError> {
        let byte = (addr << 1) | read as u8;
        unsafe {
            (*TWI::ptr()).twdr.write(|w| w.bits(byte));
        }
        let status = self.command(CMD_TRANSMIT);
        let expected = if read {
            TwiStatus::AddrReadAck
        } else {
            TwiStatus::AddrWriteAck
        };
        Self::check(status, expected)
    }

    /// Write a single data byte.
    pub fn write_byte(&mut self, byte: u8) -> Result<(), TwiError> {
        unsafe {
            (*TWI::ptr()).twdr.write(|w| w.bits(byte));
        }
        let status = self.command(CMD_TRANSMIT);
        Self::check(status, TwiStatus::DataWriteAck)
    }

    /// Read a byte, acknowledging it unless it is the last of the transfer.
    pub fn read_byte(&mut self, ack: bool) -> Result<u8, TwiError> {
        let (cmd, expected) = if ack {
            (CMD_READ_ACK, TwiStatus::DataReadAck)
        } else {
            (CMD_READ_NACK, TwiStatus::DataReadNack)
        };
        let status = self.command(cmd);
        Self::check(status, expected)?;
        unsafe { Ok((*TWI::ptr()).twdr.read().bits()) }
    }

    fn write_transaction(&mut self, address: u8, bytes: &[u8]) -> Result<(), TwiError> {
        self.start()?;
        self.write_address(address, false)?;
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    fn read_transaction(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), TwiError> {
        self.start()?;
        self.write_address(address, true)?;
        let last = buffer.len().saturating_sub(1);
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = self.read_byte(i < last)?;
        }
        Ok(())
    }
}

impl Default for Twi {
    fn default() -> Self {
        Self::new()
    }
}

impl embedded_hal::blocking::i2c::Write for Twi {
    type Error = TwiError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), TwiError> {
        let result = self.write_transaction(address, bytes);
        self.stop();
        result
    }
}

impl embedded_hal::blocking::i2c::WriteRead for Twi {
    type Error = TwiError;

    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), TwiError> {
        let result = self
            .write_transaction(address, bytes)
            .and_then(|()| self.read_transaction(address, buffer));
        self.stop();
        result
    }
}
