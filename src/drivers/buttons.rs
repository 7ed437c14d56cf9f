//! Raw button inputs.
//!
//! Only the tick ISR reads these, feeding the debounce sampler; the state
//! machine never touches the pins directly.

use crate::hal::gpio::board::{BtnDec, BtnInc, BtnMode};
use crate::hal::gpio::{Input, Pin};
use avr_device::atmega328p::PORTC;

pub struct ButtonPins {
    mode: Pin<PORTC, 0, Input>,
    increment: Pin<PORTC, 1, Input>,
    decrement: Pin<PORTC, 2, Input>,
}

impl ButtonPins {
    pub fn new() -> Self {
        Self {
            mode: BtnMode::default().into_pull_up_input(),
            increment: BtnInc::default().into_pull_up_input(),
            decrement: BtnDec::default().into_pull_up_input(),
        }
    }

    /// Instantaneous levels ordered Mode, Increment, Decrement.
    /// Buttons short to ground, so pressed reads low.
    pub fn read_raw(&self) -> [bool; 3] {
        [
            self.mode.is_low(),
            self.increment.is_low(),
            self.decrement.is_low(),
        ]
    }
}

impl Default for ButtonPins {
    fn default() -> Self {
        Self::new()
    }
}
