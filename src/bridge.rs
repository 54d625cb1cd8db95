//! Poll-side reduction of the shared counter into per-tick readings.

use fugit::MillisDurationU32;

use crate::counter::RotationCounter;

/// How long the button has to be held before a GUI treats it as a long press.
pub const LONG_PRESS_TIME: MillisDurationU32 = MillisDurationU32::millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    Pressed,
    #[default]
    Released,
}

impl ButtonState {
    /// Map a raw line level through the configured polarity.
    pub const fn from_level(is_high: bool, active_low: bool) -> Self {
        if is_high != active_low {
            ButtonState::Pressed
        } else {
            ButtonState::Released
        }
    }

    pub const fn is_pressed(self) -> bool {
        matches!(self, ButtonState::Pressed)
    }
}

/// What one poll tick hands to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderReading {
    /// Detents moved since the previous poll, clockwise positive.
    pub delta: i32,
    pub button: ButtonState,
}

/// An encoder-type input device as a GUI layer polls it.
pub trait EncoderInput {
    /// Called once per input tick.
    fn read(&mut self) -> EncoderReading;

    fn long_press_time(&self) -> MillisDurationU32 {
        LONG_PRESS_TIME
    }
}

/// Remembers the counter value seen at the previous poll.
#[derive(Debug, Default)]
pub struct PollBridge {
    last_observed: i32,
}

impl PollBridge {
    pub const fn new() -> Self {
        Self { last_observed: 0 }
    }

    /// Detents since the last call; each detent is reported exactly once.
    pub fn read_step_delta(&mut self, counter: &RotationCounter) -> i32 {
        let current = counter.get();
        let delta = current.wrapping_sub(self.last_observed);
        self.last_observed = current;
        delta
    }

    pub fn last_observed(&self) -> i32 {
        self.last_observed
    }
}
