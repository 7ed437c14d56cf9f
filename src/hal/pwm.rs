//! Meter drive PWM.
//!
//! Each panel meter integrates a fast PWM output into a needle position, so
//! the duty count maps directly onto the displayed value: Timer0 runs the
//! hours meter with TOP = 12, Timer1 runs minutes and seconds with TOP = 60.

use crate::clock::{MeterBank, MeterChannel};
use avr_device::atmega328p::{PORTB, PORTD, TC0, TC1};
use core::marker::PhantomData;

/// The three meter drive channels on Timer0 (hours) and Timer1
/// (minutes/seconds).
pub struct MeterPwm {
    _tc0: PhantomData<TC0>,
    _tc1: PhantomData<TC1>,
}

impl MeterPwm {
    /// Configure both timers and claim the OC pins. Channels start at
    /// mid-scale, which is what calibration mode wants anyway.
    pub fn new() -> Self {
        unsafe {
            let t0 = TC0::ptr();
            // Fast PWM with OCR0A as TOP, OC0B non-inverting, /64 prescale
            (*t0).tccr0a.write(|w| w.bits(0x23)); // COM0B1 | WGM01 | WGM00
            (*t0).tccr0b.write(|w| w.bits(0x0B)); // WGM02 | CS01 | CS00
            (*t0)
                .ocr0a
                .write(|w| w.bits(MeterChannel::Hours.max_level()));
            (*t0)
                .ocr0b
                .write(|w| w.bits(MeterChannel::Hours.midpoint()));

            let t1 = TC1::ptr();
            // Fast PWM with ICR1 as TOP, OC1A/OC1B non-inverting, /8 prescale
            (*t1)
                .icr1
                .write(|w| w.bits(MeterChannel::Minutes.max_level() as u16));
            (*t1)
                .ocr1a
                .write(|w| w.bits(MeterChannel::Minutes.midpoint() as u16));
            (*t1)
                .ocr1b
                .write(|w| w.bits(MeterChannel::Seconds.midpoint() as u16));
            (*t1).tccr1a.write(|w| w.bits(0xA2)); // COM1A1 | COM1B1 | WGM11
            (*t1).tccr1b.write(|w| w.bits(0x1A)); // WGM13 | WGM12 | CS11

            // OC pins as outputs: PD5 = OC0B, PB1 = OC1A, PB2 = OC1B
            (*PORTD::ptr())
                .ddrd
                .modify(|r, w| w.bits(r.bits() | (1 << 5)));
            (*PORTB::ptr())
                .ddrb
                .modify(|r, w| w.bits(r.bits() | (1 << 1) | (1 << 2)));
        }

        Self {
            _tc0: PhantomData,
            _tc1: PhantomData,
        }
    }

    /// Set one channel's duty count. Clamped to the channel TOP; a compare
    /// value above TOP would pin the needle past full scale.
    pub fn set_level(&mut self, channel: MeterChannel, level: u8) {
        let level = level.min(channel.max_level());
        unsafe {
            match channel {
                MeterChannel::Hours => {
                    (*TC0::ptr()).ocr0b.write(|w| w.bits(level));
                }
                MeterChannel::Minutes => {
                    (*TC1::ptr()).ocr1a.write(|w| w.bits(level as u16));
                }
                MeterChannel::Seconds => {
                    (*TC1::ptr()).ocr1b.write(|w| w.bits(level as u16));
                }
            }
        }
    }
}

impl MeterBank for MeterPwm {
    fn set_channel_level(&mut self, channel: MeterChannel, level: u8) {
        self.set_level(channel, level);
    }
}

impl Default for MeterPwm {
    fn default() -> Self {
        Self::new()
    }
}
