//! Core clock logic: time codec, button debouncing and the mode state
//! machine. Hardware-free, so the whole module tests on the host.

pub mod codec;
pub mod controller;
pub mod debounce;

pub use controller::{
    AdjustField, ClockController, Edges, Indicator, IndicatorPanel, MeterBank, MeterChannel, Mode,
    TimeFields, TimeSource,
};
pub use debounce::{ButtonId, ButtonSampler};
