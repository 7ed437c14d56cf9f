//! Configuration constants for the meter clock

/// CPU frequency in Hz (internal RC oscillator, CKDIV8 fuse set)
pub const CPU_FREQ_HZ: u32 = 1_000_000;

/// UART baud rate for the debug console
pub const UART_BAUD: u32 = 9600;

/// Debounce samples that must agree before a button state is believed
pub const DEBOUNCE_SAMPLES: u8 = 4;

/// Debounce tick period in microseconds (Timer2 overflow, /64 prescaler)
pub const DEBOUNCE_TICK_US: u32 = 16_384;
