//! The rotation counter shared between the edge handler and the poller.
//!
//! This is the only state that crosses the interrupt boundary. Every update
//! is a single atomic read-modify-write, so two edge handlers racing on
//! different cores never lose a step, and a reader never sees a torn value.
//! `portable-atomic` supplies the RMW on cores without native CAS.

use portable_atomic::{AtomicI32, Ordering};

use crate::encoder::Direction;

/// Signed detent count, written by the decoder and read by the poll side.
///
/// Arithmetic wraps at the `i32` boundary; deltas computed with
/// `wrapping_sub` stay correct across the wrap.
#[derive(Debug)]
pub struct RotationCounter {
    count: AtomicI32,
}

impl Default for RotationCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationCounter {
    /// `const` so the counter can live in a `static`.
    pub const fn new() -> Self {
        Self {
            count: AtomicI32::new(0),
        }
    }

    #[inline]
    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    #[inline]
    pub fn decrement(&self) {
        self.count.fetch_sub(1, Ordering::AcqRel);
    }

    /// Apply one accepted detent.
    #[inline]
    pub fn step(&self, direction: Direction) {
        match direction {
            Direction::Clockwise => self.increment(),
            Direction::CounterClockwise => self.decrement(),
        }
    }

    #[inline]
    pub fn get(&self) -> i32 {
        self.count.load(Ordering::Acquire)
    }

    /// Set the count back to zero.
    #[inline]
    pub fn reset(&self) {
        self.count.store(0, Ordering::Release);
    }
}
