pub mod buttons;
pub mod indicators;
pub mod rtc;
pub mod serial_console;

pub use buttons::ButtonPins;
pub use indicators::IndicatorLeds;
pub use rtc::Ds1307;
pub use serial_console::SerialConsole;
