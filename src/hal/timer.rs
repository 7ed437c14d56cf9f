//! Debounce tick timer.
//!
//! Timer2 in normal mode, /64 prescale: at the 1 MHz core clock it
//! overflows every 16.4 ms, which is the button sampling period. The
//! overflow ISR lives in `main.rs`.

use avr_device::atmega328p::TC2;
use core::marker::PhantomData;

pub struct TickTimer {
    _tc2: PhantomData<TC2>,
}

impl TickTimer {
    /// Put Timer2 in normal mode with the counter cleared, stopped.
    pub fn new() -> Self {
        unsafe {
            let p = TC2::ptr();
            (*p).tccr2a.write(|w| w.bits(0));
            (*p).tccr2b.write(|w| w.bits(0));
            (*p).tcnt2.write(|w| w.bits(0));
        }
        Self { _tc2: PhantomData }
    }

    pub fn enable_overflow_interrupt(&mut self) {
        unsafe {
            (*TC2::ptr()).timsk2.modify(|r, w| w.bits(r.bits() | 1));
        }
    }

    pub fn disable_overflow_interrupt(&mut self) {
        unsafe {
            (*TC2::ptr()).timsk2.modify(|r, w| w.bits(r.bits() & !1));
        }
    }

    /// Start counting with the /64 prescaler (CS22).
    pub fn start(&mut self) {
        unsafe {
            (*TC2::ptr()).tccr2b.write(|w| w.bits(0x04));
        }
    }

    pub fn stop(&mut self) {
        unsafe {
            (*TC2::ptr()).tccr2b.write(|w| w.bits(0));
        }
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new()
    }
}
