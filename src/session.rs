//! Encoder lifecycle and the poll-side handle.
//!
//! [`Ec11Encoder`] owns the platform, the poll baseline and the
//! "initialized" state. Initializing it hands back the
//! [`QuadratureDecoder`] that the edge interrupt owns from then on; the
//! [`RotationCounter`] both sides reference is the only shared state.

use crate::bridge::{ButtonState, EncoderInput, EncoderReading, PollBridge};
use crate::config::EncoderConfig;
use crate::counter::RotationCounter;
use crate::encoder::{Phase, QuadratureDecoder};
use crate::error::EncoderError;
use crate::hal::{DispatchStatus, EncoderHal};

/// What a successful [`Ec11Encoder::init`] did.
#[derive(Debug)]
pub enum InitOutcome<'a> {
    /// A new session started. Move the decoder into the edge interrupt.
    Started(QuadratureDecoder<'a>),
    /// A session was already running and was left untouched.
    AlreadyInitialized,
}

impl<'a> InitOutcome<'a> {
    pub fn into_decoder(self) -> Option<QuadratureDecoder<'a>> {
        match self {
            InitOutcome::Started(decoder) => Some(decoder),
            InitOutcome::AlreadyInitialized => None,
        }
    }
}

/// Single EC11 encoder: lifecycle, counter queries and the poll bridge.
///
/// Everything here runs in the poll context. Reads before [`init`] or after
/// [`deinit`] return a count of zero and a released button.
///
/// # Example
///
/// ```ignore
/// static COUNTER: RotationCounter = RotationCounter::new();
///
/// let mut encoder = Ec11Encoder::new(hal, &COUNTER);
/// let decoder = encoder
///     .init(EncoderConfig::new(1, 2, 3).with_debounce(8.millis()))?
///     .into_decoder();
/// // hand `decoder` to the edge interrupt, then every tick:
/// let reading = encoder.input_device()?.read();
/// ```
///
/// [`init`]: Self::init
/// [`deinit`]: Self::deinit
#[derive(Debug)]
pub struct Ec11Encoder<'a, H> {
    hal: H,
    counter: &'a RotationCounter,
    session: Option<EncoderConfig>,
    bridge: PollBridge,
}

impl<'a, H> Ec11Encoder<'a, H>
where
    H: EncoderHal,
{
    pub fn new(hal: H, counter: &'a RotationCounter) -> Self {
        Self {
            hal,
            counter,
            session: None,
            bridge: PollBridge::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Configure the lines, seed the decoder and start counting.
    ///
    /// A zero debounce interval is replaced by the default. The
    /// configuration is checked first; a valid one passed while a session
    /// is running succeeds without reconfiguring anything.
    ///
    /// # Errors
    /// * [`EncoderError::InvalidArgument`] if two roles share a line
    /// * [`EncoderError::ResourceUnavailable`] if the platform fails; any
    ///   line already configured is released again before returning
    pub fn init(
        &mut self,
        config: EncoderConfig,
    ) -> Result<InitOutcome<'a>, EncoderError<H::Error>> {
        let config = config.with_defaults();
        config.validate().map_err(EncoderError::InvalidArgument)?;

        if self.session.is_some() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Encoder already initialized");
            return Ok(InitOutcome::AlreadyInitialized);
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Initializing EC11 encoder on pins A={}, B={}, button={}",
            config.channel_a,
            config.channel_b,
            config.button
        );

        let initial = match self.bring_up(&config) {
            Ok(phase) => phase,
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("EC11 encoder setup failed, releasing lines");
                self.release_lines(&config);
                return Err(e.into());
            }
        };

        self.counter.reset();
        self.bridge = PollBridge::new();
        self.session = Some(config);

        #[cfg(feature = "defmt")]
        defmt::info!("EC11 encoder initialized, phase {}", initial);

        Ok(InitOutcome::Started(QuadratureDecoder::new(
            self.counter,
            initial,
            config.debounce,
        )))
    }

    /// Detach the edge handlers and reset all three lines. No-op if not
    /// initialized.
    ///
    /// The decoder handed out by [`init`](Self::init) stops receiving edges
    /// and should be dropped by its owner.
    pub fn deinit(&mut self) {
        if let Some(config) = self.session.take() {
            self.release_lines(&config);

            #[cfg(feature = "defmt")]
            defmt::info!("EC11 encoder deinitialized");
        }
    }

    /// Deinitialize and give the platform back.
    pub fn release(mut self) -> H {
        self.deinit();
        self.hal
    }

    fn bring_up(&mut self, config: &EncoderConfig) -> Result<Phase, H::Error> {
        self.hal.configure_quadrature_line(config.channel_a)?;
        self.hal.configure_quadrature_line(config.channel_b)?;
        self.hal.configure_button_line(config.button)?;

        let a_high = self.hal.read_level(config.channel_a)?;
        let b_high = self.hal.read_level(config.channel_b)?;

        if self.hal.install_edge_dispatch()? == DispatchStatus::AlreadyInstalled {
            #[cfg(feature = "defmt")]
            defmt::debug!("GPIO edge dispatch already installed");
        }
        self.hal.attach_edge_handler(config.channel_a)?;
        self.hal.attach_edge_handler(config.channel_b)?;

        Ok(Phase::from_levels(a_high, b_high))
    }

    fn release_lines(&mut self, config: &EncoderConfig) {
        self.hal.detach_edge_handler(config.channel_a);
        self.hal.detach_edge_handler(config.channel_b);
        self.hal.reset_line(config.channel_a);
        self.hal.reset_line(config.channel_b);
        self.hal.reset_line(config.button);
    }

    // -----------------------------------------------------------------------
    // Queries and control
    // -----------------------------------------------------------------------

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    pub fn config(&self) -> Option<&EncoderConfig> {
        self.session.as_ref()
    }

    /// Absolute detent count since init or the last reset, 0 if not initialized.
    pub fn get_count(&self) -> i32 {
        match self.session {
            Some(_) => self.counter.get(),
            None => 0,
        }
    }

    /// Zero the counter.
    ///
    /// The poll baseline is left alone, so the next
    /// [`read_step_delta`](Self::read_step_delta) reports the jump back to
    /// zero. Treat a reset as moving the origin, not as dropping motion.
    pub fn reset_count(&self) {
        self.counter.reset();
    }

    /// Logical button state after polarity mapping. Not debounced.
    ///
    /// Released when not initialized or when the line cannot be read.
    pub fn button_state(&mut self) -> ButtonState {
        let Some(config) = self.session else {
            return ButtonState::Released;
        };
        match self.hal.read_level(config.button) {
            Ok(is_high) => ButtonState::from_level(is_high, config.button_active_low),
            Err(_) => ButtonState::Released,
        }
    }

    /// Detents since the previous call, 0 if not initialized.
    pub fn read_step_delta(&mut self) -> i32 {
        if self.session.is_none() {
            return 0;
        }
        self.bridge.read_step_delta(self.counter)
    }

    /// Borrow the session as an encoder-type input device for a GUI layer.
    ///
    /// # Errors
    /// * [`EncoderError::NotInitialized`] before [`init`](Self::init)
    pub fn input_device(&mut self) -> Result<InputDevice<'_, 'a, H>, EncoderError<H::Error>> {
        if self.session.is_none() {
            #[cfg(feature = "defmt")]
            defmt::error!("Encoder not initialized, call init() first");
            return Err(EncoderError::NotInitialized);
        }
        Ok(InputDevice { encoder: self })
    }
}

/// Input-device view of an initialized [`Ec11Encoder`].
#[derive(Debug)]
pub struct InputDevice<'s, 'a, H> {
    encoder: &'s mut Ec11Encoder<'a, H>,
}

impl<H: EncoderHal> EncoderInput for InputDevice<'_, '_, H> {
    fn read(&mut self) -> EncoderReading {
        EncoderReading {
            delta: self.encoder.read_step_delta(),
            button: self.encoder.button_state(),
        }
    }
}
