//! Analog meter clock firmware library.
//!
//! Three analog panel meters show hours, minutes and seconds, each driven by
//! a hardware PWM channel. A DS1307 keeps the time; three buttons enter a
//! calibration/set mode. Everything that does not need the AVR interrupt ABI
//! lives here so it can be unit tested on the host; `main.rs` wires it to
//! the ATmega328P.

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod config;
pub mod drivers;
pub mod hal;
