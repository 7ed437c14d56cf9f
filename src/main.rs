//! Meter clock firmware entry point.
//!
//! Two execution contexts share the button state: the Timer2 overflow ISR
//! samples the raw pins into the debouncer, the free-running main loop
//! consumes press edges and drives the controller. Everything shared sits
//! behind `interrupt::Mutex`, the ISR only ever sets edge flags and the
//! loop only ever clears them.

#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
use avr_device::interrupt::{self, Mutex};
#[cfg(target_arch = "avr")]
use core::cell::RefCell;

#[cfg(target_arch = "avr")]
use meter_clock::clock::{
    codec, AdjustField, ButtonId, ButtonSampler, ClockController, Edges, Mode, TimeSource,
};
#[cfg(target_arch = "avr")]
use meter_clock::drivers::{ButtonPins, Ds1307, IndicatorLeds, SerialConsole};
#[cfg(target_arch = "avr")]
use meter_clock::hal::{MeterPwm, TickTimer, Twi};

// Shared between the tick ISR and the main loop
#[cfg(target_arch = "avr")]
static SAMPLER: Mutex<RefCell<ButtonSampler>> = Mutex::new(RefCell::new(ButtonSampler::new()));
#[cfg(target_arch = "avr")]
static BUTTON_PINS: Mutex<RefCell<Option<ButtonPins>>> = Mutex::new(RefCell::new(None));

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    let buttons = ButtonPins::new();
    interrupt::free(|cs| {
        BUTTON_PINS.borrow(cs).replace(Some(buttons));
    });

    let mut console = SerialConsole::new();
    let mut indicators = IndicatorLeds::new();
    let mut meters = MeterPwm::new();
    let mut rtc = Ds1307::new(Twi::new());

    let mut tick = TickTimer::new();
    tick.enable_overflow_interrupt();
    tick.start();

    // Debounce sampling starts here
    unsafe { avr_device::interrupt::enable() };

    rtc.configure();

    let mut controller = ClockController::new();

    console.write_line("meter-clock v0.1.0");
    log_mode(&mut console, &controller);

    loop {
        // Gather this iteration's press edges in one critical section so
        // the tick handler never observes a half-consumed set.
        let edges = interrupt::free(|cs| {
            let mut sampler = SAMPLER.borrow(cs).borrow_mut();
            Edges {
                mode: sampler.consume_edge(ButtonId::Mode),
                increment: sampler.consume_edge(ButtonId::Increment),
                decrement: sampler.consume_edge(ButtonId::Decrement),
            }
        });

        let before = controller.mode();
        controller.poll(edges, &mut rtc, &mut meters, &mut indicators);

        if controller.mode() != before {
            log_mode(&mut console, &controller);
        }
    }
}

#[cfg(target_arch = "avr")]
fn log_mode(console: &mut SerialConsole, controller: &ClockController) {
    match controller.mode() {
        Mode::Run => {
            // Entered via a commit; fields hold the freshly written time
            let fields = controller.fields();
            let hours =
                codec::decode_field(fields.hours, codec::HOURS_TENS_MASK, codec::HOURS_ONES_MASK);
            let minutes = codec::decode_field(
                fields.minutes,
                codec::MINUTES_TENS_MASK,
                codec::MINUTES_ONES_MASK,
            );
            ufmt::uwriteln!(console, "run: {}h {}m\r", hours, minutes).ok();
        }
        Mode::Set(AdjustField::Calibration) => console.write_line("set: meter calibration"),
        Mode::Set(AdjustField::Hours) => console.write_line("set: hours"),
        Mode::Set(AdjustField::Minutes) => console.write_line("set: minutes"),
    }
}

#[cfg(target_arch = "avr")]
#[avr_device::interrupt(atmega328p)]
fn TIMER2_OVF() {
    interrupt::free(|cs| {
        if let Some(buttons) = BUTTON_PINS.borrow(cs).borrow().as_ref() {
            SAMPLER.borrow(cs).borrow_mut().sample_tick(buttons.read_raw());
        }
    });
}

#[cfg(not(target_arch = "avr"))]
fn main() {
    // Target firmware; host builds only exercise the library.
}
