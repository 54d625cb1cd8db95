//! In-memory GPIO board used by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use ec11_encoder::{Channel, DispatchStatus, EncoderHal, Instant, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    ConfigureQuadrature(Channel),
    ConfigureButton(Channel),
    InstallDispatch,
    Attach(Channel),
    Detach(Channel),
    Reset(Channel),
    /// Only used to inject a failure; reads are not logged.
    ReadLevel(Channel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardError(pub Call);

#[derive(Debug)]
pub struct Board {
    pub levels: [bool; 32],
    pub calls: Vec<Call>,
    pub attached: Vec<Channel>,
    pub dispatch_installed: bool,
    pub fail_on: Option<Call>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            // pulled-up lines idle high
            levels: [true; 32],
            calls: Vec::new(),
            attached: Vec::new(),
            dispatch_installed: false,
            fail_on: None,
        }
    }
}

/// Cloneable handle; clones share one [`Board`] so tests can drive levels
/// and inspect calls while the encoder owns its copy.
#[derive(Debug, Clone, Default)]
pub struct MockHal {
    pub board: Rc<RefCell<Board>>,
}

impl MockHal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_level(&self, line: Channel, high: bool) {
        self.board.borrow_mut().levels[usize::from(line)] = high;
    }

    pub fn set_phase(&self, a: Channel, b: Channel, phase: Phase) {
        self.set_level(a, phase.bits() & 0b10 != 0);
        self.set_level(b, phase.bits() & 0b01 != 0);
    }

    pub fn fail_on(&self, call: Call) {
        self.board.borrow_mut().fail_on = Some(call);
    }

    pub fn preinstall_dispatch(&self) {
        self.board.borrow_mut().dispatch_installed = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.board.borrow().calls.clone()
    }

    pub fn attached(&self) -> Vec<Channel> {
        self.board.borrow().attached.clone()
    }

    fn record(&self, call: Call) -> Result<(), BoardError> {
        let mut board = self.board.borrow_mut();
        board.calls.push(call);
        if board.fail_on == Some(call) {
            return Err(BoardError(call));
        }
        Ok(())
    }
}

impl EncoderHal for MockHal {
    type Error = BoardError;

    fn configure_quadrature_line(&mut self, line: Channel) -> Result<(), Self::Error> {
        self.record(Call::ConfigureQuadrature(line))
    }

    fn configure_button_line(&mut self, line: Channel) -> Result<(), Self::Error> {
        self.record(Call::ConfigureButton(line))
    }

    fn install_edge_dispatch(&mut self) -> Result<DispatchStatus, Self::Error> {
        self.record(Call::InstallDispatch)?;
        let mut board = self.board.borrow_mut();
        if board.dispatch_installed {
            return Ok(DispatchStatus::AlreadyInstalled);
        }
        board.dispatch_installed = true;
        Ok(DispatchStatus::Installed)
    }

    fn attach_edge_handler(&mut self, line: Channel) -> Result<(), Self::Error> {
        self.record(Call::Attach(line))?;
        self.board.borrow_mut().attached.push(line);
        Ok(())
    }

    fn detach_edge_handler(&mut self, line: Channel) {
        let mut board = self.board.borrow_mut();
        board.calls.push(Call::Detach(line));
        board.attached.retain(|l| *l != line);
    }

    fn reset_line(&mut self, line: Channel) {
        self.board.borrow_mut().calls.push(Call::Reset(line));
    }

    fn read_level(&mut self, line: Channel) -> Result<bool, Self::Error> {
        let board = self.board.borrow();
        if board.fail_on == Some(Call::ReadLevel(line)) {
            return Err(BoardError(Call::ReadLevel(line)));
        }
        Ok(board.levels[usize::from(line)])
    }
}

/// A single input line shared with the test body.
#[derive(Debug, Clone, Default)]
pub struct MockPin {
    pub high: Rc<RefCell<bool>>,
}

impl MockPin {
    pub fn set(&self, high: bool) {
        *self.high.borrow_mut() = high;
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl embedded_hal::digital::InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(*self.high.borrow())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!*self.high.borrow())
    }
}

pub fn ms(t: u64) -> Instant {
    Instant::from_ticks(t * 1_000)
}
