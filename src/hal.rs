//! Platform seam for line setup and edge-interrupt plumbing.
//!
//! Lines are addressed by [`Channel`] number so the session can be written
//! once and driven by any GPIO controller. None of these methods run on the
//! decoder hot path.

use crate::config::Channel;

/// Result of installing the shared edge-interrupt dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchStatus {
    Installed,
    /// Someone else (another driver, the task framework) installed it first.
    /// Not an error.
    AlreadyInstalled,
}

pub trait EncoderHal {
    type Error;

    /// Input with pull-up for an open-drain switch contact, interrupting on
    /// both edges once a handler is attached.
    fn configure_quadrature_line(&mut self, line: Channel) -> Result<(), Self::Error>;

    /// Input with pull-up, no interrupt.
    fn configure_button_line(&mut self, line: Channel) -> Result<(), Self::Error>;

    /// Install the GPIO interrupt dispatch shared by all lines.
    fn install_edge_dispatch(&mut self) -> Result<DispatchStatus, Self::Error>;

    /// Route edges of `line` to the decoder.
    fn attach_edge_handler(&mut self, line: Channel) -> Result<(), Self::Error>;

    /// Stop routing edges of `line`. Must be harmless if nothing is attached.
    fn detach_edge_handler(&mut self, line: Channel);

    /// Return `line` to its reset state.
    fn reset_line(&mut self, line: Channel);

    /// Current level of `line`, `true` for high.
    fn read_level(&mut self, line: Channel) -> Result<bool, Self::Error>;
}
