pub mod gpio;
pub mod pwm;
pub mod timer;
pub mod twi;
pub mod uart;

// Re-export commonly used types
pub use gpio::board;
pub use gpio::{Input, Output, Pin};
pub use pwm::MeterPwm;
pub use timer::TickTimer;
pub use twi::{Twi, TwiError};
pub use uart::Uart;
