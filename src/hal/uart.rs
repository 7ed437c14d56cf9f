//! Busy-wait TX driver for USART0, used only for the debug console.
//!
//! The console prints a handful of bytes per mode change, so a transmit
//! ring buffer would be dead weight; waiting on UDRE0 is plenty.

use avr_device::atmega328p::USART0;
use core::marker::PhantomData;

// 9600 baud at 1 MHz needs double-speed mode to keep the divider error
// acceptable: UBRR = 1_000_000 / (8 * 9600) - 1
const UBRR_9600_U2X: u16 = 12;

pub struct Uart {
    _usart: PhantomData<USART0>,
}

impl Uart {
    pub fn new() -> Self {
        unsafe {
            let p = USART0::ptr();

            (*p).ubrr0.write(|w| w.bits(UBRR_9600_U2X));
            (*p).ucsr0a.write(|w| w.bits(0x02)); // U2X0
            (*p).ucsr0b.write(|w| w.bits(0x08)); // TXEN0
            (*p).ucsr0c.write(|w| w.bits(0x06)); // 8N1
        }

        Self {
            _usart: PhantomData,
        }
    }

    pub fn write_byte(&mut self, byte: u8) {
        unsafe {
            let p = USART0::ptr();
            // Wait for the data register to empty (UDRE0)
            while (*p).ucsr0a.read().bits() & 0x20 == 0 {}
            (*p).udr0.write(|w| w.bits(byte));
        }
    }

    pub fn write_str(&mut self, s: &str) {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
    }
}

impl Default for Uart {
    fn default() -> Self {
        Self::new()
    }
}
