//! Interrupt-driven decoder for EC11-style detent rotary encoders.
//!
//! The crate splits one encoder across two execution contexts:
//!
//! - **Edge interrupt**: a [`QuadratureDecoder`] classifies phase changes
//!   on the two channels, drops contact bounce and bumps a shared
//!   [`RotationCounter`] by one per detent.
//! - **Poll tick**: an [`Ec11Encoder`] owns the lifecycle, turns the
//!   absolute count into a delta since the previous tick and reads the
//!   push button.
//!
//! The counter is the only state the two contexts share, and it is only
//! ever touched with atomic operations. Neither side blocks on the other.
//!
//! # Quick start
//!
//! ```ignore
//! use ec11_encoder::{Ec11Encoder, EncoderConfig, EncoderInput, RotationCounter};
//!
//! static COUNTER: RotationCounter = RotationCounter::new();
//!
//! // `hal` implements `EncoderHal` for the target's GPIO controller
//! let mut encoder = Ec11Encoder::new(hal, &COUNTER);
//! let decoder = encoder.init(EncoderConfig::new(1, 2, 3))?.into_decoder();
//!
//! // edge interrupt:   decoder.on_edge(phase, now);
//! // every poll tick:  let reading = encoder.input_device()?.read();
//! ```
//!
//! # Features
//!
//! - **`defmt`**: lifecycle logging and [`defmt::Format`] implementations
//!   on public types. The decoder hot path never logs.

#![cfg_attr(not(test), no_std)]

pub use bridge::{ButtonState, EncoderInput, EncoderReading, PollBridge, LONG_PRESS_TIME};
pub use config::{Channel, EncoderConfig, DEFAULT_DEBOUNCE};
pub use counter::RotationCounter;
pub use encoder::{DecoderState, Direction, Instant, Phase, QuadratureDecoder};
pub use error::{EncoderError, InvalidConfig};
pub use hal::{DispatchStatus, EncoderHal};
pub use session::{Ec11Encoder, InitOutcome, InputDevice};

mod bridge;
mod config;
mod counter;
mod encoder;
mod error;
mod hal;
mod session;
