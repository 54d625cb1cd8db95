//! Error types for the encoder subsystem.

use core::fmt;

use crate::config::Channel;

/// Reason a configuration was refused by [`EncoderConfig::validate`].
///
/// [`EncoderConfig::validate`]: crate::EncoderConfig::validate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidConfig {
    /// The same line was assigned to more than one role.
    DuplicateChannel(Channel),
}

/// Errors surfaced by the encoder lifecycle.
///
/// Only setup can fail. Reads on the poll path fall back to safe defaults
/// (no motion, button released) instead of returning errors every tick.
#[derive(Debug, PartialEq, Eq)]
pub enum EncoderError<E> {
    /// The configuration was rejected before any hardware was touched.
    InvalidArgument(InvalidConfig),

    /// The platform failed to configure a line or install the edge handler.
    /// Everything set up so far has been released again.
    ResourceUnavailable(E),

    /// The operation needs an initialized encoder.
    NotInitialized,
}

// Allow ergonomic `?` propagation from raw platform errors.
impl<E> From<E> for EncoderError<E> {
    fn from(error: E) -> Self {
        EncoderError::ResourceUnavailable(error)
    }
}

impl fmt::Display for InvalidConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidConfig::DuplicateChannel(line) => {
                write!(f, "line {} assigned to more than one role", line)
            }
        }
    }
}

impl<E: fmt::Debug> fmt::Display for EncoderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncoderError::InvalidArgument(reason) => write!(f, "Invalid configuration: {}", reason),
            EncoderError::ResourceUnavailable(e) => write!(f, "Platform error: {:?}", e),
            EncoderError::NotInitialized => write!(f, "Encoder not initialized"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for EncoderError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EncoderError::InvalidArgument(reason) => {
                defmt::write!(f, "Invalid configuration: {}", reason)
            }
            EncoderError::ResourceUnavailable(e) => defmt::write!(f, "Platform error: {}", e),
            EncoderError::NotInitialized => defmt::write!(f, "Encoder not initialized"),
        }
    }
}
