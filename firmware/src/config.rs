use ec11_encoder::EncoderConfig;
use fugit::MillisDurationU32;

pub const XOSC_FREQ_HZ: u32 = 12_000_000;

pub const ENCODER_PIN_A: u8 = 1;
pub const ENCODER_PIN_B: u8 = 2;
pub const ENCODER_PIN_BUTTON: u8 = 3;
pub const BUTTON_ACTIVE_LOW: bool = true;
pub const DEBOUNCE_MS: u32 = 8;

// matches the GUI input tick
pub const POLL_TIME_US: u32 = 5_000;
pub const WATCHDOG_US: u32 = 50_000;

pub const ENCODER: EncoderConfig =
    EncoderConfig::new(ENCODER_PIN_A, ENCODER_PIN_B, ENCODER_PIN_BUTTON)
        .with_button_active_low(BUTTON_ACTIVE_LOW)
        .with_debounce(MillisDurationU32::millis(DEBOUNCE_MS));
