//! Detent-based quadrature decoding.
//!
//! An EC11-style encoder rests with both channels high (`11`) between
//! detents. A clockwise detent travels `11 -> 01 -> 00 -> 10 -> 11` and a
//! counter-clockwise one the mirror. Only the step out of the rest phase is
//! counted; the intermediate phases are transient and the first to pick up
//! contact bounce.
//!
//! [`QuadratureDecoder::on_edge`] runs inside the edge interrupt. It takes
//! `&self` and never locks, so the handlers for both channels (or both
//! cores) can share one decoder and race on it.

use embedded_hal::digital::InputPin;
use fugit::{MicrosDurationU64, MillisDurationU32, TimerInstantU64};
use portable_atomic::{AtomicU64, Ordering};

use crate::counter::RotationCounter;

/// Microsecond timestamp as produced by a free-running 64-bit timer.
pub type Instant = TimerInstantU64<1_000_000>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl TryFrom<u8> for Direction {
    // upper two bits are the previous phase, lower two bits the new one
    fn try_from(s: u8) -> Result<Self, ()> {
        match s {
            0b1101 => Ok(Direction::Clockwise),
            0b1110 => Ok(Direction::CounterClockwise),
            _ => Err(()),
        }
    }

    type Error = ();
}

/// Instantaneous levels of the two channels, `A` in bit 1 and `B` in bit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phase(u8);

impl Phase {
    /// Both channels high: the encoder is sitting in a detent.
    pub const REST: Phase = Phase(0b11);

    pub const fn from_levels(a_high: bool, b_high: bool) -> Self {
        Phase(((a_high as u8) << 1) | b_high as u8)
    }

    /// Build a phase from the low two bits of `bits`.
    pub const fn from_bits(bits: u8) -> Self {
        Phase(bits & 0b11)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Read both channel lines. `None` if either read fails.
    pub fn sample<A: InputPin, B: InputPin>(a: &mut A, b: &mut B) -> Option<Self> {
        let a_high = a.is_high().ok()?;
        let b_high = b.is_high().ok()?;
        Some(Self::from_levels(a_high, b_high))
    }

    /// The detent step implied by moving from `self` to `next`, if any.
    pub fn transition(self, next: Phase) -> Option<Direction> {
        Direction::try_from((self.0 << 2) | next.0).ok()
    }
}

/// Snapshot of the decoder's private state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderState {
    pub last_phase: Phase,
    /// Time of the last counted step; `None` until the first one.
    pub last_accepted: Option<Instant>,
}

// Packed layout: bits 0..60 timestamp ticks, bits 60..62 phase, bit 62 set
// once a step has been accepted.
const TICKS_MASK: u64 = (1 << 60) - 1;
const PHASE_SHIFT: u32 = 60;
const ANCHORED: u64 = 1 << 62;

impl DecoderState {
    fn pack(self) -> u64 {
        let phase = u64::from(self.last_phase.bits()) << PHASE_SHIFT;
        match self.last_accepted {
            // a 60-bit microsecond clock wraps after ~36 000 years
            Some(at) => phase | ANCHORED | (at.ticks() & TICKS_MASK),
            None => phase,
        }
    }

    fn unpack(raw: u64) -> Self {
        Self {
            last_phase: Phase::from_bits((raw >> PHASE_SHIFT) as u8),
            last_accepted: (raw & ANCHORED != 0).then(|| Instant::from_ticks(raw & TICKS_MASK)),
        }
    }
}

/// Edge classifier and debounce gate feeding a [`RotationCounter`].
///
/// Created by [`Ec11Encoder::init`] with its phase seeded from the live
/// channel levels, then handed to the edge interrupt. Phase and timestamp
/// live in one atomic word and are replaced together with a
/// compare-and-swap, so concurrent edges from either channel see a
/// consistent state and a step is counted at most once.
///
/// [`Ec11Encoder::init`]: crate::Ec11Encoder::init
#[derive(Debug)]
pub struct QuadratureDecoder<'a> {
    state: AtomicU64,
    window: MicrosDurationU64,
    counter: &'a RotationCounter,
}

impl<'a> QuadratureDecoder<'a> {
    pub fn new(counter: &'a RotationCounter, initial: Phase, debounce: MillisDurationU32) -> Self {
        let state = DecoderState {
            last_phase: initial,
            last_accepted: None,
        };
        Self {
            state: AtomicU64::new(state.pack()),
            window: MicrosDurationU64::millis(u64::from(debounce.ticks())),
            counter,
        }
    }

    /// Handle one edge on either channel, given the phase read after it.
    ///
    /// Edges arriving less than the debounce interval after the last
    /// counted step are dropped without touching any state. Otherwise the
    /// phase is recorded, and a `11 -> 01` or `11 -> 10` move is counted
    /// and restarts the debounce window.
    pub fn on_edge(&self, phase: Phase, now: Instant) -> Option<Direction> {
        let mut raw = self.state.load(Ordering::Acquire);
        loop {
            let current = DecoderState::unpack(raw);
            if let Some(last) = current.last_accepted {
                // a clock that appears to run backwards counts as still bouncing
                let settled = now
                    .checked_duration_since(last)
                    .is_some_and(|elapsed| elapsed >= self.window);
                if !settled {
                    return None;
                }
            }

            let direction = current.last_phase.transition(phase);
            let next = DecoderState {
                last_phase: phase,
                last_accepted: if direction.is_some() {
                    Some(now)
                } else {
                    current.last_accepted
                },
            };

            match self.state.compare_exchange_weak(
                raw,
                next.pack(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    if let Some(direction) = direction {
                        self.counter.step(direction);
                    }
                    return direction;
                }
                Err(actual) => raw = actual,
            }
        }
    }

    /// Read both channels and handle the edge. A failed read drops the edge.
    pub fn sample_edge<A: InputPin, B: InputPin>(
        &self,
        a: &mut A,
        b: &mut B,
        now: Instant,
    ) -> Option<Direction> {
        let phase = Phase::sample(a, b)?;
        self.on_edge(phase, now)
    }

    pub fn state(&self) -> DecoderState {
        DecoderState::unpack(self.state.load(Ordering::Acquire))
    }
}
