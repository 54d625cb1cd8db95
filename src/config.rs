//! Encoder wiring and timing, fixed once the encoder is initialized.

use fugit::MillisDurationU32;

use crate::error::InvalidConfig;

/// Platform identifier of a single GPIO line.
pub type Channel = u8;

/// Debounce interval used when the caller supplies zero.
pub const DEFAULT_DEBOUNCE: MillisDurationU32 = MillisDurationU32::millis(5);

/// Pin assignment, button polarity and debounce interval of one encoder.
///
/// The two quadrature channels and the button must be three distinct lines;
/// [`validate`](Self::validate) checks this before any hardware is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    pub channel_a: Channel,
    pub channel_b: Channel,
    pub button: Channel,
    /// `true` if the button pulls its line low when pressed.
    pub button_active_low: bool,
    pub debounce: MillisDurationU32,
}

impl EncoderConfig {
    /// Active-low button (pull-up wiring) and [`DEFAULT_DEBOUNCE`].
    pub const fn new(channel_a: Channel, channel_b: Channel, button: Channel) -> Self {
        Self {
            channel_a,
            channel_b,
            button,
            button_active_low: true,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub const fn with_button_active_low(mut self, active_low: bool) -> Self {
        self.button_active_low = active_low;
        self
    }

    pub const fn with_debounce(mut self, debounce: MillisDurationU32) -> Self {
        self.debounce = debounce;
        self
    }

    /// Replace a zero debounce interval with [`DEFAULT_DEBOUNCE`].
    pub fn with_defaults(mut self) -> Self {
        if self.debounce.ticks() == 0 {
            self.debounce = DEFAULT_DEBOUNCE;
        }
        self
    }

    /// Check that all three lines are distinct.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.channel_a == self.channel_b || self.channel_a == self.button {
            return Err(InvalidConfig::DuplicateChannel(self.channel_a));
        }
        if self.channel_b == self.button {
            return Err(InvalidConfig::DuplicateChannel(self.channel_b));
        }
        Ok(())
    }
}
