//! The two status LEDs beside the meters.

use crate::clock::{Indicator, IndicatorPanel};
use crate::hal::gpio::board::{Led1, Led2};
use crate::hal::gpio::{Output, Pin};
use avr_device::atmega328p::PORTD;

pub struct IndicatorLeds {
    led1: Pin<PORTD, 3, Output>,
    led2: Pin<PORTD, 4, Output>,
}

impl IndicatorLeds {
    pub fn new() -> Self {
        Self {
            led1: Led1::default().into_output(),
            led2: Led2::default().into_output(),
        }
    }
}

impl IndicatorPanel for IndicatorLeds {
    fn set_indicator(&mut self, id: Indicator, on: bool) {
        match id {
            Indicator::A => self.led1.set(on),
            Indicator::B => self.led2.set(on),
        }
    }
}

impl Default for IndicatorLeds {
    fn default() -> Self {
        Self::new()
    }
}
