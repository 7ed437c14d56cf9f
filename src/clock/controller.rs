//! Mode/adjustment state machine.
//!
//! The clock is either running (meters track the RTC) or in one of three
//! set states: meter calibration, hours, minutes. The Mode button walks
//! that progression and the final press commits the dialed values back to
//! the RTC in one write. Increment/Decrement turn a single shared counter
//! while setting; they are ignored while running.

use super::codec::{
    self, HOURS_ONES_MASK, HOURS_TENS_MASK, HOUR_MODE_12H, MINUTES_ONES_MASK, MINUTES_TENS_MASK,
    SECONDS_ONES_MASK, SECONDS_TENS_MASK,
};

/// General ceiling for the shared set-mode counter.
pub const PENDING_MAX: u8 = 60;

/// Raw RTC register bytes for the three time fields, still in the chip's
/// packed-BCD encoding. Decoding happens at the point of use.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct TimeFields {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
}

/// One PWM-driven panel meter.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MeterChannel {
    Hours,
    Minutes,
    Seconds,
}

impl MeterChannel {
    /// PWM top count for this channel; full scale on the meter face.
    pub const fn max_level(self) -> u8 {
        match self {
            MeterChannel::Hours => 12,
            MeterChannel::Minutes => 60,
            MeterChannel::Seconds => 60,
        }
    }

    /// Mid-scale reference used for calibration.
    pub const fn midpoint(self) -> u8 {
        self.max_level() / 2
    }
}

/// The two status LEDs next to the meters.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Indicator {
    A,
    B,
}

/// Order in which the clock is set.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AdjustField {
    Calibration,
    Hours,
    Minutes,
}

impl AdjustField {
    /// Progression table; `None` means the next Mode press commits.
    fn next(self) -> Option<AdjustField> {
        match self {
            AdjustField::Calibration => Some(AdjustField::Hours),
            AdjustField::Hours => Some(AdjustField::Minutes),
            AdjustField::Minutes => None,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Mode {
    Run,
    Set(AdjustField),
}

/// Debounced press edges gathered for one loop iteration.
#[derive(Copy, Clone, Default)]
pub struct Edges {
    pub mode: bool,
    pub increment: bool,
    pub decrement: bool,
}

/// The RTC as the state machine sees it. Infallible by contract; the
/// hardware implementation retries the bus until it answers.
pub trait TimeSource {
    fn configure(&mut self);
    fn read_fields(&mut self) -> TimeFields;
    fn write_fields(&mut self, fields: TimeFields);
}

/// The three meter drive channels.
pub trait MeterBank {
    fn set_channel_level(&mut self, channel: MeterChannel, level: u8);
}

/// The two status LEDs.
pub trait IndicatorPanel {
    fn set_indicator(&mut self, id: Indicator, on: bool);
}

/// Top-level controller state. One instance, owned by the main loop.
pub struct ClockController {
    mode: Mode,
    /// Value being dialed with Increment/Decrement while setting
    pending: u8,
    /// Local copy of the RTC registers, encoded
    fields: TimeFields,
}

impl ClockController {
    /// Boots into calibration so the meter trimpots can be adjusted
    /// against a known mid-scale reference after every power cycle.
    pub const fn new() -> Self {
        Self {
            mode: Mode::Set(AdjustField::Calibration),
            pending: 0,
            fields: TimeFields {
                seconds: 0,
                minutes: 0,
                hours: 0,
            },
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pending(&self) -> u8 {
        self.pending
    }

    pub fn fields(&self) -> TimeFields {
        self.fields
    }

    /// One main-loop iteration: handle this iteration's press edges, then
    /// refresh the meters and LEDs for whatever mode we ended up in.
    pub fn poll<T, M, I>(&mut self, edges: Edges, rtc: &mut T, meters: &mut M, indicators: &mut I)
    where
        T: TimeSource,
        M: MeterBank,
        I: IndicatorPanel,
    {
        if edges.mode {
            self.on_mode_edge(rtc);
        }
        if edges.increment && matches!(self.mode, Mode::Set(_)) && self.pending < PENDING_MAX {
            self.pending += 1;
        }
        if edges.decrement && matches!(self.mode, Mode::Set(_)) && self.pending > 0 {
            self.pending -= 1;
        }

        match self.mode {
            Mode::Run => self.run_output(rtc, meters, indicators),
            Mode::Set(field) => self.set_output(field, meters, indicators),
        }
    }

    fn on_mode_edge<T: TimeSource>(&mut self, rtc: &mut T) {
        match self.mode {
            Mode::Run => {
                self.mode = Mode::Set(AdjustField::Calibration);
                self.pending = 0;
            }
            Mode::Set(field) => match field.next() {
                Some(next) => {
                    self.mode = Mode::Set(next);
                    self.pending = 0;
                }
                None => self.commit(rtc),
            },
        }
    }

    /// Push the dialed time to the RTC and go back to running. The hours
    /// byte was already computed during the hours set pass; minutes come
    /// from the counter, and the second hand restarts from zero.
    fn commit<T: TimeSource>(&mut self, rtc: &mut T) {
        self.fields.minutes =
            codec::encode_binary(self.pending.min(59)) & (MINUTES_TENS_MASK | MINUTES_ONES_MASK);
        self.fields.seconds = 0;
        rtc.write_fields(self.fields);

        self.mode = Mode::Run;
        self.pending = 0;
    }

    fn run_output<T, M, I>(&mut self, rtc: &mut T, meters: &mut M, indicators: &mut I)
    where
        T: TimeSource,
        M: MeterBank,
        I: IndicatorPanel,
    {
        self.fields = rtc.read_fields();

        let hours = codec::decode_field(self.fields.hours, HOURS_TENS_MASK, HOURS_ONES_MASK);
        let minutes = codec::decode_field(self.fields.minutes, MINUTES_TENS_MASK, MINUTES_ONES_MASK);
        let seconds = codec::decode_field(self.fields.seconds, SECONDS_TENS_MASK, SECONDS_ONES_MASK);

        meters.set_channel_level(MeterChannel::Hours, hours);
        meters.set_channel_level(MeterChannel::Minutes, minutes);
        meters.set_channel_level(MeterChannel::Seconds, seconds);

        // Seconds parity heartbeat: the alternating LEDs are the only sign
        // of life the clock has.
        let odd = seconds & 1 == 1;
        indicators.set_indicator(Indicator::A, odd);
        indicators.set_indicator(Indicator::B, !odd);
    }

    fn set_output<M, I>(&mut self, field: AdjustField, meters: &mut M, indicators: &mut I)
    where
        M: MeterBank,
        I: IndicatorPanel,
    {
        match field {
            AdjustField::Calibration => {
                // Mid-scale on every meter so the trimpots can be set
                // against a known reference.
                for channel in [MeterChannel::Hours, MeterChannel::Minutes, MeterChannel::Seconds] {
                    meters.set_channel_level(channel, channel.midpoint());
                }
                indicators.set_indicator(Indicator::A, true);
                indicators.set_indicator(Indicator::B, true);
            }
            AdjustField::Hours => {
                // Display clamp only: the shared counter keeps its general
                // 0..=60 ceiling even while the hours meter pegs at 12.
                let value = self.pending.min(12);
                self.fields.hours = (codec::encode_binary(value)
                    & (HOURS_TENS_MASK | HOURS_ONES_MASK))
                    | HOUR_MODE_12H;
                meters.set_channel_level(MeterChannel::Hours, value);
                indicators.set_indicator(Indicator::A, true);
                indicators.set_indicator(Indicator::B, false);
            }
            AdjustField::Minutes => {
                let value = self.pending.min(59);
                self.fields.minutes =
                    codec::encode_binary(value) & (MINUTES_TENS_MASK | MINUTES_ONES_MASK);
                meters.set_channel_level(MeterChannel::Minutes, value);
                indicators.set_indicator(Indicator::A, false);
                indicators.set_indicator(Indicator::B, true);
            }
        }

        // Freeze the second hand while editing; the commit writes it as 0.
        self.fields.seconds = 0;
    }
}

impl Default for ClockController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeRtc {
        fields: TimeFields,
        written: Vec<TimeFields>,
        configured: bool,
    }

    impl FakeRtc {
        fn with_time(hours: u8, minutes: u8, seconds: u8) -> Self {
            Self {
                fields: TimeFields {
                    seconds: codec::encode_binary(seconds),
                    minutes: codec::encode_binary(minutes),
                    hours: codec::encode_binary(hours) | HOUR_MODE_12H,
                },
                written: Vec::new(),
                configured: false,
            }
        }
    }

    impl TimeSource for FakeRtc {
        fn configure(&mut self) {
            self.configured = true;
        }

        fn read_fields(&mut self) -> TimeFields {
            self.fields
        }

        fn write_fields(&mut self, fields: TimeFields) {
            self.fields = fields;
            self.written.push(fields);
        }
    }

    #[derive(Default)]
    struct FakeMeters {
        hours: Option<u8>,
        minutes: Option<u8>,
        seconds: Option<u8>,
    }

    impl MeterBank for FakeMeters {
        fn set_channel_level(&mut self, channel: MeterChannel, level: u8) {
            match channel {
                MeterChannel::Hours => self.hours = Some(level),
                MeterChannel::Minutes => self.minutes = Some(level),
                MeterChannel::Seconds => self.seconds = Some(level),
            }
        }
    }

    #[derive(Default)]
    struct FakeLeds {
        a: bool,
        b: bool,
    }

    impl IndicatorPanel for FakeLeds {
        fn set_indicator(&mut self, id: Indicator, on: bool) {
            match id {
                Indicator::A => self.a = on,
                Indicator::B => self.b = on,
            }
        }
    }

    struct Rig {
        controller: ClockController,
        rtc: FakeRtc,
        meters: FakeMeters,
        leds: FakeLeds,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                controller: ClockController::new(),
                rtc: FakeRtc::with_time(10, 25, 40),
                meters: FakeMeters::default(),
                leds: FakeLeds::default(),
            }
        }

        fn poll(&mut self, edges: Edges) {
            self.controller
                .poll(edges, &mut self.rtc, &mut self.meters, &mut self.leds);
        }

        fn idle(&mut self) {
            self.poll(Edges::default());
        }

        fn press_mode(&mut self) {
            self.poll(Edges {
                mode: true,
                ..Edges::default()
            });
        }

        fn press_increment(&mut self, times: u8) {
            for _ in 0..times {
                self.poll(Edges {
                    increment: true,
                    ..Edges::default()
                });
            }
        }

        fn press_decrement(&mut self, times: u8) {
            for _ in 0..times {
                self.poll(Edges {
                    decrement: true,
                    ..Edges::default()
                });
            }
        }
    }

    #[test]
    fn boots_into_calibration_at_mid_scale() {
        let mut rig = Rig::new();
        rig.idle();

        assert_eq!(rig.controller.mode(), Mode::Set(AdjustField::Calibration));
        assert_eq!(rig.meters.hours, Some(6));
        assert_eq!(rig.meters.minutes, Some(30));
        assert_eq!(rig.meters.seconds, Some(30));
        assert!(rig.leds.a && rig.leds.b);
    }

    #[test]
    fn run_mode_tracks_the_rtc_and_blinks_the_heartbeat() {
        let mut rig = Rig::new();
        // walk through the set sequence and commit without touching anything
        rig.press_mode(); // hours
        rig.press_mode(); // minutes
        rig.press_mode(); // commit -> run

        rig.rtc.fields = TimeFields {
            seconds: codec::encode_binary(7),
            minutes: codec::encode_binary(58),
            hours: codec::encode_binary(11) | HOUR_MODE_12H,
        };
        rig.idle();
        assert_eq!(rig.controller.mode(), Mode::Run);
        assert_eq!(rig.meters.hours, Some(11));
        assert_eq!(rig.meters.minutes, Some(58));
        assert_eq!(rig.meters.seconds, Some(7));
        // odd second: A on, B off
        assert!(rig.leds.a);
        assert!(!rig.leds.b);

        rig.rtc.fields.seconds = codec::encode_binary(8);
        rig.idle();
        assert!(!rig.leds.a);
        assert!(rig.leds.b);
    }

    #[test]
    fn mode_edge_in_run_always_returns_to_calibration() {
        let mut rig = Rig::new();
        rig.press_mode();
        rig.press_increment(5);
        rig.press_mode();
        rig.press_mode(); // commit

        assert_eq!(rig.controller.mode(), Mode::Run);
        rig.press_mode();
        assert_eq!(rig.controller.mode(), Mode::Set(AdjustField::Calibration));
        assert_eq!(rig.controller.pending(), 0);
    }

    #[test]
    fn increment_saturates_at_the_general_ceiling() {
        let mut rig = Rig::new();
        rig.press_increment(75);
        assert_eq!(rig.controller.pending(), PENDING_MAX);
    }

    #[test]
    fn decrement_saturates_at_zero() {
        let mut rig = Rig::new();
        rig.press_decrement(3);
        assert_eq!(rig.controller.pending(), 0);

        rig.press_increment(2);
        rig.press_decrement(5);
        assert_eq!(rig.controller.pending(), 0);
    }

    #[test]
    fn increment_and_decrement_are_ignored_while_running() {
        let mut rig = Rig::new();
        rig.press_mode();
        rig.press_mode();
        rig.press_mode(); // commit -> run

        rig.press_increment(4);
        rig.press_decrement(2);
        assert_eq!(rig.controller.pending(), 0);
        assert_eq!(rig.controller.mode(), Mode::Run);
    }

    #[test]
    fn hours_meter_clamps_at_twelve_while_the_counter_keeps_counting() {
        let mut rig = Rig::new();
        rig.press_mode(); // -> Set(Hours)
        rig.press_increment(15);

        assert_eq!(rig.meters.hours, Some(12));
        // the counter itself is past the hours ceiling
        assert_eq!(rig.controller.pending(), 15);
        assert!(rig.leds.a);
        assert!(!rig.leds.b);
    }

    #[test]
    fn field_change_resets_the_counter() {
        let mut rig = Rig::new();
        rig.press_mode(); // hours
        rig.press_increment(9);
        assert_eq!(rig.controller.pending(), 9);

        rig.press_mode(); // minutes
        assert_eq!(rig.controller.mode(), Mode::Set(AdjustField::Minutes));
        assert_eq!(rig.controller.pending(), 0);
        assert!(!rig.leds.a);
        assert!(rig.leds.b);
    }

    #[test]
    fn commit_writes_the_dialed_time_in_one_transaction() {
        let mut rig = Rig::new();
        rig.press_mode(); // hours
        rig.press_increment(7);
        rig.press_mode(); // minutes
        rig.press_increment(42);
        rig.press_mode(); // commit

        assert_eq!(rig.controller.mode(), Mode::Run);
        assert_eq!(rig.controller.pending(), 0);
        assert_eq!(rig.rtc.written.len(), 1);

        let written = rig.rtc.written[0];
        assert_eq!(written.seconds, 0);
        assert_eq!(
            codec::decode_field(written.minutes, MINUTES_TENS_MASK, MINUTES_ONES_MASK),
            42
        );
        assert_eq!(
            codec::decode_field(written.hours, HOURS_TENS_MASK, HOURS_ONES_MASK),
            7
        );
        // 12-hour marker always rides along
        assert_ne!(written.hours & HOUR_MODE_12H, 0);
    }

    #[test]
    fn commit_clamps_minutes_dialed_past_fifty_nine() {
        let mut rig = Rig::new();
        rig.press_mode(); // hours
        rig.press_increment(1);
        rig.press_mode(); // minutes
        rig.press_increment(60);
        rig.press_mode(); // commit

        let written = rig.rtc.written[0];
        assert_eq!(
            codec::decode_field(written.minutes, MINUTES_TENS_MASK, MINUTES_ONES_MASK),
            59
        );
    }

    #[test]
    fn seconds_are_frozen_at_zero_while_setting() {
        let mut rig = Rig::new();
        rig.idle();
        assert_eq!(rig.controller.fields().seconds, 0);

        rig.press_mode();
        rig.press_increment(3);
        assert_eq!(rig.controller.fields().seconds, 0);
    }

    #[test]
    fn mode_edge_wins_over_a_simultaneous_increment() {
        let mut rig = Rig::new();
        rig.press_mode(); // hours
        rig.press_mode(); // minutes
        // both edges in one iteration: the commit runs first, so the
        // increment lands in Run mode and is dropped
        rig.poll(Edges {
            mode: true,
            increment: true,
            decrement: false,
        });
        assert_eq!(rig.controller.mode(), Mode::Run);
        assert_eq!(rig.controller.pending(), 0);
    }
}
