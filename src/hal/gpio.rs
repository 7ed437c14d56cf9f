use avr_device::atmega328p::{PORTB, PORTC, PORTD};
use core::marker::PhantomData;

pub trait PinMode {}
pub struct Input;
pub struct Output;
impl PinMode for Input {}
impl PinMode for Output {}

#[derive(Debug)]
pub struct Pin<PORT, const PIN: u8, MODE> {
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

impl<PORT, const PIN: u8, MODE> Pin<PORT, PIN, MODE> {
    pub const fn new() -> Self {
        Self {
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

impl<PORT, const PIN: u8, MODE> Default for Pin<PORT, PIN, MODE> {
    fn default() -> Self {
        Self::new()
    }
}

// The three ports have distinct register names on the ATmega328P, so the
// macro takes them explicitly.
macro_rules! impl_port {
    ($PORT:ident, $ddr:ident, $port:ident, $pin:ident) => {
        impl<const P: u8, MODE: PinMode> Pin<$PORT, P, MODE> {
            pub fn into_output(self) -> Pin<$PORT, P, Output> {
                // Set DDRx bit
                unsafe {
                    (*$PORT::ptr())
                        .$ddr
                        .modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin::new()
            }

            pub fn into_input(self) -> Pin<$PORT, P, Input> {
                // Clear DDRx bit and disable pull-up
                unsafe {
                    (*$PORT::ptr())
                        .$ddr
                        .modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr())
                        .$port
                        .modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
                Pin::new()
            }

            pub fn into_pull_up_input(self) -> Pin<$PORT, P, Input> {
                // Clear DDRx bit, enable pull-up
                unsafe {
                    (*$PORT::ptr())
                        .$ddr
                        .modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr())
                        .$port
                        .modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin::new()
            }
        }

        impl<const P: u8> Pin<$PORT, P, Output> {
            #[inline]
            pub fn set_high(&mut self) {
                unsafe {
                    (*$PORT::ptr())
                        .$port
                        .modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
            }

            #[inline]
            pub fn set_low(&mut self) {
                unsafe {
                    (*$PORT::ptr())
                        .$port
                        .modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
            }

            #[inline]
            pub fn set(&mut self, high: bool) {
                if high {
                    self.set_high();
                } else {
                    self.set_low();
                }
            }
        }

        impl<const P: u8> Pin<$PORT, P, Input> {
            #[inline]
            pub fn is_high(&self) -> bool {
                unsafe { ((*$PORT::ptr()).$pin.read().bits() & (1 << P)) != 0 }
            }

            #[inline]
            pub fn is_low(&self) -> bool {
                !self.is_high()
            }
        }
    };
}

impl_port!(PORTB, ddrb, portb, pinb);
impl_port!(PORTC, ddrc, portc, pinc);
impl_port!(PORTD, ddrd, portd, pind);

// Meter clock board pin map
pub mod board {
    use super::*;

    // Status LED indicators (PORTD)
    pub type Led1 = Pin<PORTD, 3, Output>;
    pub type Led2 = Pin<PORTD, 4, Output>;

    // Buttons (PORTC, active low with internal pull-ups)
    pub type BtnMode = Pin<PORTC, 0, Input>;
    pub type BtnInc = Pin<PORTC, 1, Input>;
    pub type BtnDec = Pin<PORTC, 2, Input>;

    // Meter drive outputs are owned by the PWM timers:
    // PD5 = OC0B hours, PB1 = OC1A minutes, PB2 = OC1B seconds.
}
