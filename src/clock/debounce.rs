//! Button debouncing.
//!
//! The Timer2 overflow ISR calls [`ButtonSampler::sample_tick`] roughly
//! every 16 ms; a button state is only believed once four consecutive
//! samples agree, which is far shorter than any human press but longer than
//! contact bounce. The press edge is latched as a flag, not queued: the
//! main loop must consume it before the next press or it is simply the
//! current press still pending.
//!
//! Concurrency contract: the ISR only shifts history and sets edge flags;
//! the main loop only reads and clears them, and does so inside
//! `interrupt::free`. One writer per field, no races.

use crate::config::DEBOUNCE_SAMPLES;

/// History bits that must agree for a stable reading
const HISTORY_MASK: u8 = (1 << DEBOUNCE_SAMPLES) - 1;

/// The three physical buttons on the clock face.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ButtonId {
    /// Cycle Run -> Set(Calibration) -> Set(Hours) -> Set(Minutes) -> commit
    Mode,
    /// Dial the pending value up
    Increment,
    /// Dial the pending value down
    Decrement,
}

const BUTTON_COUNT: usize = 3;

impl ButtonId {
    fn index(self) -> usize {
        match self {
            ButtonId::Mode => 0,
            ButtonId::Increment => 1,
            ButtonId::Decrement => 2,
        }
    }
}

/// Debounce state for one button.
#[derive(Copy, Clone)]
struct DebounceState {
    /// Shift register of raw samples, newest in bit 0
    history: u8,
    /// Last agreed-upon level (true = pressed)
    stable: bool,
    /// Latched on the released -> pressed stable transition
    edge: bool,
}

impl DebounceState {
    const fn new() -> Self {
        Self {
            history: 0,
            stable: false,
            edge: false,
        }
    }

    fn sample(&mut self, raw: bool) {
        self.history = ((self.history << 1) | raw as u8) & HISTORY_MASK;

        if self.history == HISTORY_MASK && !self.stable {
            self.stable = true;
            self.edge = true;
        } else if self.history == 0 {
            self.stable = false;
        }
        // Mixed history: still bouncing, keep the last stable level.
    }
}

/// Debounce state for all three buttons.
pub struct ButtonSampler {
    states: [DebounceState; BUTTON_COUNT],
}

impl ButtonSampler {
    pub const fn new() -> Self {
        Self {
            states: [DebounceState::new(); BUTTON_COUNT],
        }
    }

    /// Feed one raw reading per button, ordered Mode, Increment, Decrement.
    /// Called from the tick ISR only.
    pub fn sample_tick(&mut self, raw: [bool; BUTTON_COUNT]) {
        for (state, level) in self.states.iter_mut().zip(raw) {
            state.sample(level);
        }
    }

    /// True once per physical press. Clears the latched edge.
    pub fn consume_edge(&mut self, button: ButtonId) -> bool {
        let state = &mut self.states[button.index()];
        let pressed = state.edge;
        state.edge = false;
        pressed
    }

    /// Current debounced level.
    pub fn is_pressed(&self, button: ButtonId) -> bool {
        self.states[button.index()].stable
    }
}

impl Default for ButtonSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(sampler: &mut ButtonSampler, mode: bool) {
        sampler.sample_tick([mode, false, false]);
    }

    #[test]
    fn clean_press_produces_one_edge() {
        let mut s = ButtonSampler::new();

        for _ in 0..4 {
            tick(&mut s, true);
        }
        assert!(s.is_pressed(ButtonId::Mode));
        assert!(s.consume_edge(ButtonId::Mode));
        // consumed exactly once
        assert!(!s.consume_edge(ButtonId::Mode));
    }

    #[test]
    fn holding_does_not_repeat_the_edge() {
        let mut s = ButtonSampler::new();

        for _ in 0..4 {
            tick(&mut s, true);
        }
        assert!(s.consume_edge(ButtonId::Mode));

        // hold for a long time
        for _ in 0..100 {
            tick(&mut s, true);
            assert!(!s.consume_edge(ButtonId::Mode));
        }

        // release, then press again: a second edge
        for _ in 0..4 {
            tick(&mut s, false);
        }
        for _ in 0..4 {
            tick(&mut s, true);
        }
        assert!(s.consume_edge(ButtonId::Mode));
    }

    #[test]
    fn bounce_during_press_and_release_is_filtered() {
        let mut s = ButtonSampler::new();

        // contact bounce on the way down
        for raw in [true, false, true, false] {
            tick(&mut s, raw);
            assert!(!s.consume_edge(ButtonId::Mode));
        }
        for _ in 0..4 {
            tick(&mut s, true);
        }
        assert!(s.consume_edge(ButtonId::Mode));

        // bounce on the way up never re-latches an edge
        for raw in [false, true, false, true, false, false, false, false] {
            tick(&mut s, raw);
        }
        assert!(!s.is_pressed(ButtonId::Mode));
        assert!(!s.consume_edge(ButtonId::Mode));
    }

    #[test]
    fn unconsumed_edge_is_a_flag_not_a_queue() {
        let mut s = ButtonSampler::new();

        // two full presses without the consumer running
        for _ in 0..2 {
            for _ in 0..4 {
                tick(&mut s, true);
            }
            for _ in 0..4 {
                tick(&mut s, false);
            }
        }
        // both collapse into a single pending edge
        assert!(s.consume_edge(ButtonId::Mode));
        assert!(!s.consume_edge(ButtonId::Mode));
    }

    #[test]
    fn buttons_are_independent() {
        let mut s = ButtonSampler::new();

        for _ in 0..4 {
            s.sample_tick([false, true, true]);
        }
        assert!(!s.consume_edge(ButtonId::Mode));
        assert!(s.consume_edge(ButtonId::Increment));
        assert!(s.consume_edge(ButtonId::Decrement));
    }
}
