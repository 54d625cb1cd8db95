//! [`EncoderHal`] for the RP2040 user GPIO bank.
//!
//! Lines are addressed by GPIO number and configured straight through the
//! bank registers. The edge interrupt itself is `IO_IRQ_BANK0`, bound by the
//! RTIC app, so the dispatch is normally reported as already installed.

use cortex_m::peripheral::NVIC;
use ec11_encoder::{Channel, DispatchStatus, EncoderHal};
use rp2040_hal::pac::{self, Interrupt};

const USER_BANK_LINES: Channel = 30;

const FUNCSEL_SIO: u32 = 5;
const FUNCSEL_NULL: u32 = 0x1f;

// IE | DRIVE=4mA | PUE | SCHMITT
const PAD_PULL_UP_INPUT: u32 = 0b0101_1010;
// IE | DRIVE=4mA | PDE | SCHMITT, the power-on value
const PAD_RESET: u32 = 0b0101_0110;

// EDGE_LOW | EDGE_HIGH in a line's 4-bit interrupt nibble
const EDGE_EVENTS: u32 = 0b1100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum LineError {
    NoSuchLine(Channel),
}

/// Owns the encoder's three lines in bank 0.
///
/// Only the control, pad and interrupt-enable bits of the configured lines
/// are written; the edge task acknowledges interrupts on its own pins.
pub struct BankLines {
    _private: (),
}

impl BankLines {
    /// Requires the bank to be out of reset (e.g. after `Pins::new`).
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn io() -> &'static pac::io_bank0::RegisterBlock {
        // SAFETY: shared access to the bank; writes below only touch the
        // encoder's own lines.
        unsafe { &*pac::IO_BANK0::ptr() }
    }

    fn pads() -> &'static pac::pads_bank0::RegisterBlock {
        // SAFETY: as above, one pad register per line.
        unsafe { &*pac::PADS_BANK0::ptr() }
    }

    fn sio() -> &'static pac::sio::RegisterBlock {
        // SAFETY: GPIO_IN is read-only and GPIO_OE_CLR is a write-to-clear alias.
        unsafe { &*pac::SIO::ptr() }
    }

    fn check(line: Channel) -> Result<usize, LineError> {
        if line < USER_BANK_LINES {
            Ok(usize::from(line))
        } else {
            Err(LineError::NoSuchLine(line))
        }
    }

    fn edge_mask(line: usize) -> (usize, u32) {
        (line / 8, EDGE_EVENTS << (4 * (line % 8)))
    }

    fn pull_up_input(line: usize) {
        Self::pads()
            .gpio(line)
            .write(|w| unsafe { w.bits(PAD_PULL_UP_INPUT) });
        Self::io()
            .gpio(line)
            .gpio_ctrl()
            .write(|w| unsafe { w.bits(FUNCSEL_SIO) });
        Self::sio()
            .gpio_oe_clr()
            .write(|w| unsafe { w.bits(1 << line) });
    }
}

impl EncoderHal for BankLines {
    type Error = LineError;

    fn configure_quadrature_line(&mut self, line: Channel) -> Result<(), Self::Error> {
        let line = Self::check(line)?;
        Self::pull_up_input(line);

        // drop edges latched before the handler is attached
        let (reg, mask) = Self::edge_mask(line);
        Self::io().intr(reg).write(|w| unsafe { w.bits(mask) });
        Ok(())
    }

    fn configure_button_line(&mut self, line: Channel) -> Result<(), Self::Error> {
        Self::pull_up_input(Self::check(line)?);
        Ok(())
    }

    fn install_edge_dispatch(&mut self) -> Result<DispatchStatus, Self::Error> {
        if NVIC::is_enabled(Interrupt::IO_IRQ_BANK0) {
            return Ok(DispatchStatus::AlreadyInstalled);
        }
        // SAFETY: the IO_IRQ_BANK0 handler is bound by the RTIC app.
        unsafe { NVIC::unmask(Interrupt::IO_IRQ_BANK0) };
        Ok(DispatchStatus::Installed)
    }

    fn attach_edge_handler(&mut self, line: Channel) -> Result<(), Self::Error> {
        let (reg, mask) = Self::edge_mask(Self::check(line)?);
        Self::io()
            .proc0_inte(reg)
            .modify(|r, w| unsafe { w.bits(r.bits() | mask) });
        Ok(())
    }

    fn detach_edge_handler(&mut self, line: Channel) {
        let Ok(line) = Self::check(line) else {
            return;
        };
        let (reg, mask) = Self::edge_mask(line);
        Self::io()
            .proc0_inte(reg)
            .modify(|r, w| unsafe { w.bits(r.bits() & !mask) });
    }

    fn reset_line(&mut self, line: Channel) {
        let Ok(line) = Self::check(line) else {
            return;
        };
        Self::io()
            .gpio(line)
            .gpio_ctrl()
            .write(|w| unsafe { w.bits(FUNCSEL_NULL) });
        Self::pads().gpio(line).write(|w| unsafe { w.bits(PAD_RESET) });
    }

    fn read_level(&mut self, line: Channel) -> Result<bool, Self::Error> {
        let line = Self::check(line)?;
        Ok(Self::sio().gpio_in().read().bits() & (1 << line) != 0)
    }
}
